//! Telemetry system for MedFlow
//!
//! Counts store activity and renders a short session summary.

use colored::Colorize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Telemetry event types
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    RefreshStarted {
        timestamp: Instant,
    },
    RefreshCompleted {
        duration_ms: u64,
        timestamp: Instant,
    },
    PatientAdded {
        patient_id: String,
        timestamp: Instant,
    },
    RecommendationIssued {
        patient_id: String,
        timestamp: Instant,
    },
    BedsCycled {
        count: usize,
        timestamp: Instant,
    },
}

/// Telemetry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryStats {
    pub refreshes_started: usize,
    pub refreshes_completed: usize,
    pub patients_added: usize,
    pub recommendations_issued: usize,
    pub beds_cycled: usize,
    pub total_refresh_ms: u64,
}

/// Keep this many events; older ones are discarded
const MAX_EVENTS: usize = 1000;

/// Telemetry collector
#[derive(Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<VecDeque<TelemetryEvent>>>,
    stats: Arc<Mutex<TelemetryStats>>,
    start_time: Instant,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_EVENTS))),
            stats: Arc::new(Mutex::new(TelemetryStats::default())),
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        {
            let mut stats = lock(&self.stats);
            match &event {
                TelemetryEvent::RefreshStarted { .. } => {
                    stats.refreshes_started += 1;
                }
                TelemetryEvent::RefreshCompleted { duration_ms, .. } => {
                    stats.refreshes_completed += 1;
                    stats.total_refresh_ms += duration_ms;
                }
                TelemetryEvent::PatientAdded { .. } => {
                    stats.patients_added += 1;
                }
                TelemetryEvent::RecommendationIssued { .. } => {
                    stats.recommendations_issued += 1;
                }
                TelemetryEvent::BedsCycled { count, .. } => {
                    stats.beds_cycled += count;
                }
            }
        }

        let mut events = lock(&self.events);
        if events.len() >= MAX_EVENTS {
            events.pop_front();
        }
        events.push_back(event);
    }

    pub fn get_stats(&self) -> TelemetryStats {
        lock(&self.stats).clone()
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    pub fn event_count(&self) -> usize {
        lock(&self.events).len()
    }

    /// Get recent events (last n)
    pub fn recent_events(&self, n: usize) -> Vec<TelemetryEvent> {
        let events = lock(&self.events);
        let start = events.len().saturating_sub(n);
        events.range(start..).cloned().collect()
    }

    /// Mean simulated refresh duration
    pub fn average_refresh_ms(&self) -> f64 {
        let stats = lock(&self.stats);
        if stats.refreshes_completed == 0 {
            0.0
        } else {
            stats.total_refresh_ms as f64 / stats.refreshes_completed as f64
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple telemetry display
pub struct TelemetryDisplay {
    collector: TelemetryCollector,
}

impl TelemetryDisplay {
    pub fn new(collector: TelemetryCollector) -> Self {
        Self { collector }
    }

    /// Display summary statistics
    pub fn display_summary(&self) {
        let stats = self.collector.get_stats();
        let elapsed = self.collector.elapsed();

        println!("\n{}", "Session Summary".bold());
        println!("─────────────────────────────────────");
        println!("Duration:          {:.1?}", elapsed);
        println!("Refreshes:         {}", stats.refreshes_completed);
        println!("Avg refresh:       {:.0}ms", self.collector.average_refresh_ms());
        println!("Patients added:    {}", stats.patients_added);
        println!("Recommendations:   {}", stats.recommendations_issued);
        println!("Beds cycled:       {}", stats.beds_cycled);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_creation() {
        let collector = TelemetryCollector::new();
        assert_eq!(collector.event_count(), 0);
        assert_eq!(collector.get_stats(), TelemetryStats::default());
    }

    #[test]
    fn test_refresh_events() {
        let collector = TelemetryCollector::new();
        collector.record(TelemetryEvent::RefreshStarted { timestamp: Instant::now() });
        collector.record(TelemetryEvent::RefreshCompleted {
            duration_ms: 1000,
            timestamp: Instant::now(),
        });
        collector.record(TelemetryEvent::RefreshCompleted {
            duration_ms: 500,
            timestamp: Instant::now(),
        });

        let stats = collector.get_stats();
        assert_eq!(stats.refreshes_started, 1);
        assert_eq!(stats.refreshes_completed, 2);
        assert_eq!(collector.average_refresh_ms(), 750.0);
    }

    #[test]
    fn test_admission_events() {
        let collector = TelemetryCollector::new();
        collector.record(TelemetryEvent::PatientAdded {
            patient_id: "P009".into(),
            timestamp: Instant::now(),
        });
        collector.record(TelemetryEvent::RecommendationIssued {
            patient_id: "P009".into(),
            timestamp: Instant::now(),
        });
        collector.record(TelemetryEvent::BedsCycled {
            count: 3,
            timestamp: Instant::now(),
        });

        let stats = collector.get_stats();
        assert_eq!(stats.patients_added, 1);
        assert_eq!(stats.recommendations_issued, 1);
        assert_eq!(stats.beds_cycled, 3);
    }

    #[test]
    fn test_recent_events() {
        let collector = TelemetryCollector::new();
        for _ in 0..5 {
            collector.record(TelemetryEvent::RefreshStarted { timestamp: Instant::now() });
        }
        assert_eq!(collector.recent_events(3).len(), 3);
        assert_eq!(collector.recent_events(10).len(), 5);
    }

    #[test]
    fn test_event_history_is_bounded() {
        let collector = TelemetryCollector::new();
        for _ in 0..(MAX_EVENTS + 10) {
            collector.record(TelemetryEvent::RefreshStarted { timestamp: Instant::now() });
        }
        assert_eq!(collector.event_count(), MAX_EVENTS);
        assert_eq!(collector.get_stats().refreshes_started, MAX_EVENTS + 10);
    }

    #[test]
    fn test_oldest_events_evicted_first() {
        let collector = TelemetryCollector::new();
        for count in 0..(MAX_EVENTS + 5) {
            collector.record(TelemetryEvent::BedsCycled {
                count,
                timestamp: Instant::now(),
            });
        }

        let events = collector.recent_events(MAX_EVENTS);
        assert!(matches!(events.first(), Some(TelemetryEvent::BedsCycled { count: 5, .. })));
        assert!(matches!(
            events.last(),
            Some(TelemetryEvent::BedsCycled { count, .. }) if *count == MAX_EVENTS + 4
        ));
    }
}
