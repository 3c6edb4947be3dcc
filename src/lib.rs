//! MedFlow - Hospital Operations Simulation
//!
//! An in-memory state store for a hospital operations dashboard: patients,
//! departments, beds, aggregate statistics and routing recommendations,
//! kept "live" by a periodic randomized refresh.
//!
//! # Architecture
//!
//! - **store**: the `HospitalStore` snapshot owner, queries and auto-refresh
//! - **seed**: validated reference data the store starts from
//! - **simulation**: bounded jitter applied on every refresh
//! - **routing / triage / prediction**: rule engines standing in for "AI"
//!   features; none of them perform inference

pub mod errors;
pub mod types;
pub mod config;
pub mod seed;

// Re-export commonly used types
pub use errors::{MedflowError, Result};

// State store and change notification
pub mod events;
pub mod simulation;
pub mod store;
pub use store::{AutoRefreshHandle, HospitalStore, Snapshot};

// Rule engines
pub mod prediction;
pub mod routing;
pub mod triage;

// Observability and CLI
pub mod cli;
pub mod telemetry;
