//! Immutable view of the hospital state

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::seed::SeedData;
use crate::types::{Bed, Department, HospitalStats, Patient, RouteRecommendation, Trends};

/// Full in-memory state at a point in time.
///
/// The store never edits a published snapshot; every mutation builds a new
/// one and swaps it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub patients: Vec<Patient>,
    pub departments: Vec<Department>,
    pub beds: Vec<Bed>,
    pub stats: HospitalStats,
    pub trends: Trends,
    pub recommendations: Vec<RouteRecommendation>,
    pub triage_samples: Vec<String>,
    pub last_updated: DateTime<Utc>,
    /// True while at least one refresh is in flight
    pub loading: bool,
}

impl Snapshot {
    pub fn from_seed(seed: SeedData) -> Self {
        Self {
            patients: seed.patients,
            departments: seed.departments,
            beds: seed.beds,
            stats: seed.stats,
            trends: seed.trends,
            recommendations: seed.recommendations,
            triage_samples: seed.triage_samples,
            last_updated: Utc::now(),
            loading: false,
        }
    }

    /// Set `last_updated` to now, keeping it strictly increasing
    pub(crate) fn stamp(&mut self) {
        let floor = self.last_updated + Duration::microseconds(1);
        self.last_updated = Utc::now().max(floor);
    }
}
