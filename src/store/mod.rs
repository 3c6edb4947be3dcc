//! Hospital state store
//!
//! One explicitly constructed `HospitalStore` owns the snapshot; consumers
//! get a clone of the handle rather than reaching for a global.

pub mod hospital;
pub mod query;
pub mod scheduler;
pub mod snapshot;

pub use hospital::HospitalStore;
pub use query::{PatientSortField, SortDirection};
pub use scheduler::AutoRefreshHandle;
pub use snapshot::Snapshot;
