//! Change notifications for store subscribers
//!
//! Every mutation publishes the snapshot it produced, so a subscriber sees
//! exactly the state that triggered the event even if the store has moved on.

use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::store::Snapshot;

/// What changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A refresh began; the snapshot has `loading = true`
    RefreshStarted,

    /// A refresh applied new data
    Refreshed {
        status_changes: usize,
        beds_cycled: usize,
    },

    /// A refresh was dropped before its data landed; `loading` is off again
    RefreshAbandoned,

    /// A patient was admitted
    PatientAdded {
        patient_id: String,
        department: String,
        recommended_dept: Option<String>,
    },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::RefreshStarted => write!(f, "refresh started"),
            Change::Refreshed { status_changes, beds_cycled } => write!(
                f,
                "refreshed ({} status changes, {} beds cycled)",
                status_changes, beds_cycled
            ),
            Change::RefreshAbandoned => write!(f, "refresh abandoned"),
            Change::PatientAdded { patient_id, department, .. } => {
                write!(f, "patient {} admitted to {}", patient_id, department)
            }
        }
    }
}

/// A change together with the snapshot it produced
#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub change: Change,
    pub snapshot: Arc<Snapshot>,
}

/// Broadcast bus for store events
///
/// Slow subscribers lag rather than block the store: once a receiver falls
/// `capacity` events behind, its oldest events are dropped.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        EventBus { sender }
    }

    /// Publish an event; returns how many subscribers will see it
    pub fn emit(&self, event: StoreEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
