//! Rule-based route recommender
//!
//! Picks a random department other than the patient's own and justifies the
//! move with a canned reason keyed by urgency and destination. This is a
//! template table, not a clinical model.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{Department, NewPatient, RouteRecommendation, Urgency};

/// Reason templates for urgent patients
const URGENT_REASONS: &[(&str, &str)] = &[
    ("cardiology", "Urgent cardiac evaluation required based on initial assessment"),
    ("surgery", "Immediate surgical consultation needed for acute symptoms"),
    ("icu", "Critical care monitoring recommended due to unstable vitals"),
    ("radiology", "Stat imaging needed to rule out critical condition"),
];
const URGENT_FALLBACK: &str = "Urgent specialist consultation required";

/// Reason templates for high-urgency patients
const HIGH_REASONS: &[(&str, &str)] = &[
    ("cardiology", "Cardiac monitoring advised based on symptoms"),
    ("surgery", "Surgical evaluation recommended for potential intervention"),
    ("radiology", "Diagnostic imaging needed for proper assessment"),
];
const HIGH_FALLBACK: &str = "Specialist consultation recommended for proper treatment";

/// Reason templates for medium and low urgency
const ROUTINE_REASONS: &[(&str, &str)] = &[
    ("cardiology", "Cardiology follow-up recommended based on risk factors"),
    ("radiology", "Imaging would provide valuable diagnostic information"),
];
const ROUTINE_FALLBACK: &str = "Follow-up with specialist recommended for comprehensive care";

/// Produces transfer suggestions for newly admitted patients
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteRecommender;

impl RouteRecommender {
    pub fn new() -> Self {
        Self
    }

    /// Suggest a transfer for `patient`, or `None` when no other department exists
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        patient_id: &str,
        patient: &NewPatient,
        departments: &[Department],
        rng: &mut R,
    ) -> Option<RouteRecommendation> {
        let candidates: Vec<&Department> = departments
            .iter()
            .filter(|d| d.id != patient.department)
            .collect();

        let target = candidates.choose(rng)?;

        Some(RouteRecommendation {
            patient_id: patient_id.to_string(),
            current_dept: patient.department.clone(),
            recommended_dept: target.id.clone(),
            reason: Self::reason(patient.urgency, &target.id).to_string(),
            urgency: patient.urgency,
        })
    }

    /// Reason text for routing a patient of `urgency` to `department`
    pub fn reason(urgency: Urgency, department: &str) -> &'static str {
        let (table, fallback) = match urgency {
            Urgency::Urgent => (URGENT_REASONS, URGENT_FALLBACK),
            Urgency::High => (HIGH_REASONS, HIGH_FALLBACK),
            Urgency::Medium | Urgency::Low => (ROUTINE_REASONS, ROUTINE_FALLBACK),
        };

        table
            .iter()
            .find(|(dept, _)| *dept == department)
            .map(|(_, reason)| *reason)
            .unwrap_or(fallback)
    }
}
