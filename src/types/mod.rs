//! Type definitions module
//!
//! Entities held in a hospital snapshot.

pub mod facility;
pub mod patient;
pub mod stats;

// Re-export commonly used types
pub use facility::{Bed, BedStatus, Coordinates, Department};
pub use patient::{NewPatient, Patient, PatientStatus, Urgency};
pub use stats::{
    FlowSeries, HospitalStats, PatientFlowTrends, RouteRecommendation, Trends, TriageDistribution,
    WaitTimeSeries, WaitTimeTrends,
};
