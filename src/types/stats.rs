//! Aggregate counters, trend series and routing recommendations

use serde::{Deserialize, Serialize};

use super::patient::Urgency;

/// Patient counts per triage level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriageDistribution {
    pub urgent: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl TriageDistribution {
    pub fn count(&self, urgency: Urgency) -> u32 {
        match urgency {
            Urgency::Urgent => self.urgent,
            Urgency::High => self.high,
            Urgency::Medium => self.medium,
            Urgency::Low => self.low,
        }
    }

    pub fn total(&self) -> u32 {
        self.urgent + self.high + self.medium + self.low
    }
}

/// Hospital-wide counters.
///
/// These are maintained alongside the patient and bed collections rather than
/// recomputed from them, so they are only eventually consistent with the rest
/// of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HospitalStats {
    pub total_patients: u32,
    pub available_beds: u32,
    pub occupied_beds: u32,
    pub average_wait_time: u32,
    pub triage_distribution: TriageDistribution,
}

/// One department's wait-time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTimeSeries {
    pub department: String,
    pub data: Vec<u32>,
}

/// One flow category's series (admissions, discharges, transfers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSeries {
    pub kind: String,
    pub data: Vec<u32>,
}

/// Wait times across the day
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WaitTimeTrends {
    pub labels: Vec<String>,
    pub datasets: Vec<WaitTimeSeries>,
}

/// Admissions, discharges and transfers across the day
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatientFlowTrends {
    pub labels: Vec<String>,
    pub datasets: Vec<FlowSeries>,
}

/// Chart series carried by the snapshot; never mutated by the simulation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Trends {
    pub wait_times: WaitTimeTrends,
    #[serde(default)]
    pub patient_flow: PatientFlowTrends,
}

/// A suggested department transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecommendation {
    pub patient_id: String,
    pub current_dept: String,
    pub recommended_dept: String,
    pub reason: String,
    /// Patient urgency at the time the recommendation was made
    pub urgency: Urgency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triage_distribution_count() {
        let dist = TriageDistribution { urgent: 12, high: 25, medium: 35, low: 10 };
        assert_eq!(dist.count(Urgency::High), 25);
        assert_eq!(dist.total(), 82);
    }
}
