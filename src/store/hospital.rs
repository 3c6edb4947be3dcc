//! The hospital state store

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockWriteGuard, Weak};
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::scheduler::AutoRefreshHandle;
use super::Snapshot;
use crate::config::{Config, StoreConfig};
use crate::errors::{MedflowError, Result};
use crate::events::{Change, EventBus, StoreEvent};
use crate::routing::RouteRecommender;
use crate::seed::SeedData;
use crate::simulation::Simulator;
use crate::telemetry::{TelemetryCollector, TelemetryEvent, TelemetryStats};
use crate::types::patient::format_patient_id;
use crate::types::{NewPatient, Patient, PatientStatus};

struct StoreInner {
    state: RwLock<Arc<Snapshot>>,
    rng: Mutex<StdRng>,
    simulator: Simulator,
    recommender: RouteRecommender,
    events: EventBus,
    telemetry: TelemetryCollector,
    config: StoreConfig,
}

/// Owns the canonical hospital snapshot and mediates every change to it.
///
/// Cloning is cheap and every clone shares the same state. Reads hand out
/// `Arc<Snapshot>`s that stay valid, unchanged, after later mutations.
#[derive(Clone)]
pub struct HospitalStore {
    inner: Arc<StoreInner>,
}

/// Non-owning handle held by the background refresh task
#[derive(Clone)]
pub(crate) struct WeakHospitalStore {
    inner: Weak<StoreInner>,
}

impl WeakHospitalStore {
    pub(crate) fn upgrade(&self) -> Option<HospitalStore> {
        self.inner.upgrade().map(|inner| HospitalStore { inner })
    }
}

impl HospitalStore {
    /// Build a store from validated seed data
    pub fn new(seed: SeedData, config: &Config) -> Result<Self> {
        config.validate()?;
        seed.validate()?;

        let rng = match config.store.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            departments = seed.departments.len(),
            patients = seed.patients.len(),
            beds = seed.beds.len(),
            "Hospital store created"
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(Arc::new(Snapshot::from_seed(seed))),
                rng: Mutex::new(rng),
                simulator: Simulator::new(config.simulation.clone()),
                recommender: RouteRecommender::new(),
                events: EventBus::new(config.store.event_capacity),
                telemetry: TelemetryCollector::new(),
                config: config.store.clone(),
            }),
        })
    }

    /// Build a store from the configured seed file, or the built-in data
    pub fn from_config(config: &Config) -> Result<Self> {
        let seed = SeedData::load_or_builtin(config.seed_path().as_deref())?;
        Self::new(seed, config)
    }

    /// Current snapshot. No side effects.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self.inner.state.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Receive a `StoreEvent` for every subsequent change
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.events.subscribe()
    }

    pub fn telemetry(&self) -> TelemetryStats {
        self.inner.telemetry.get_stats()
    }

    pub fn telemetry_collector(&self) -> TelemetryCollector {
        self.inner.telemetry.clone()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Perturb the whole snapshot after the configured simulated latency.
    ///
    /// Subscribers are notified twice: when `loading` turns on and when the
    /// new data lands with `loading` off. The jitter is applied to whatever the
    /// snapshot is when the latency elapses, so admissions made in the meantime
    /// are kept. Overlapping refreshes are last-write-wins: each completion
    /// clears `loading`.
    pub async fn refresh(&self) {
        let started = Instant::now();
        let mut in_flight = InFlightRefresh::new(self);

        self.commit(|snapshot| {
            snapshot.loading = true;
            ((), Some(Change::RefreshStarted))
        });
        self.inner.telemetry.record(TelemetryEvent::RefreshStarted { timestamp: started });
        debug!("Refresh started");

        tokio::time::sleep(self.inner.config.refresh_latency()).await;

        let report = {
            let mut rng = self.rng();
            self.commit(|snapshot| {
                let report = self.inner.simulator.perturb(snapshot, &mut *rng);
                snapshot.stamp();
                snapshot.loading = false;
                in_flight.finish();
                let change = Change::Refreshed {
                    status_changes: report.status_changes,
                    beds_cycled: report.beds_cycled,
                };
                (report, Some(change))
            })
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        self.inner.telemetry.record(TelemetryEvent::RefreshCompleted {
            duration_ms,
            timestamp: Instant::now(),
        });
        if report.beds_cycled > 0 {
            self.inner.telemetry.record(TelemetryEvent::BedsCycled {
                count: report.beds_cycled,
                timestamp: Instant::now(),
            });
        }

        info!(
            duration_ms,
            status_changes = report.status_changes,
            beds_cycled = report.beds_cycled,
            "Refresh completed"
        );
    }

    /// Admit a patient and return the new id.
    ///
    /// The patient starts `waiting` with no wait time. The department count
    /// and hospital total go up by one; capacity is not checked. When another
    /// department exists a route recommendation is appended too.
    pub fn add_patient(&self, input: NewPatient) -> Result<String> {
        input.validate()?;

        let (patient_id, recommended_dept) = {
            let mut rng = self.rng();
            self.try_commit(|snapshot| {
                let dept_index = snapshot
                    .departments
                    .iter()
                    .position(|d| d.id == input.department)
                    .ok_or_else(|| MedflowError::DepartmentNotFound(input.department.clone()))?;

                let patient_id = next_patient_id(&snapshot.patients);
                snapshot.patients.push(Patient {
                    id: patient_id.clone(),
                    name: input.name.clone(),
                    age: input.age,
                    urgency: input.urgency,
                    wait_time: 0,
                    department: input.department.clone(),
                    status: PatientStatus::Waiting,
                });

                let dept = &mut snapshot.departments[dept_index];
                dept.current_patients = dept.current_patients.saturating_add(1);
                snapshot.stats.total_patients = snapshot.stats.total_patients.saturating_add(1);

                let recommendation = self.inner.recommender.recommend(
                    &patient_id,
                    &input,
                    &snapshot.departments,
                    &mut *rng,
                );
                let recommended_dept = recommendation.as_ref().map(|r| r.recommended_dept.clone());
                if let Some(recommendation) = recommendation {
                    snapshot.recommendations.push(recommendation);
                }

                snapshot.stamp();

                let change = Change::PatientAdded {
                    patient_id: patient_id.clone(),
                    department: input.department.clone(),
                    recommended_dept: recommended_dept.clone(),
                };
                Ok(((patient_id, recommended_dept), Some(change)))
            })?
        };

        self.inner.telemetry.record(TelemetryEvent::PatientAdded {
            patient_id: patient_id.clone(),
            timestamp: Instant::now(),
        });
        if recommended_dept.is_some() {
            self.inner.telemetry.record(TelemetryEvent::RecommendationIssued {
                patient_id: patient_id.clone(),
                timestamp: Instant::now(),
            });
        }

        info!(
            patient_id = %patient_id,
            department = %input.department,
            urgency = %input.urgency,
            recommended = ?recommended_dept,
            "Patient admitted"
        );

        Ok(patient_id)
    }

    /// Spawn the periodic refresh task. Must be called within a tokio runtime.
    pub fn start_auto_refresh(&self) -> AutoRefreshHandle {
        AutoRefreshHandle::spawn(self.downgrade(), self.inner.config.refresh_interval())
    }

    pub(crate) fn downgrade(&self) -> WeakHospitalStore {
        WeakHospitalStore {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.inner.rng.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Arc<Snapshot>> {
        self.inner.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy-on-write update that cannot fail
    fn commit<T>(&self, f: impl FnOnce(&mut Snapshot) -> (T, Option<Change>)) -> T {
        let mut guard = self.write_state();
        let mut next = Snapshot::clone(&guard);
        let (out, change) = f(&mut next);
        self.publish(&mut guard, next, change);
        out
    }

    /// Copy-on-write update; on error the published snapshot is left as it was
    fn try_commit<T>(&self, f: impl FnOnce(&mut Snapshot) -> Result<(T, Option<Change>)>) -> Result<T> {
        let mut guard = self.write_state();
        let mut next = Snapshot::clone(&guard);
        let (out, change) = f(&mut next)?;
        self.publish(&mut guard, next, change);
        Ok(out)
    }

    /// Swap in `next` and notify. Runs under the write lock so subscribers
    /// see changes in commit order.
    fn publish(&self, guard: &mut RwLockWriteGuard<'_, Arc<Snapshot>>, next: Snapshot, change: Option<Change>) {
        let next = Arc::new(next);
        **guard = Arc::clone(&next);

        if let Some(change) = change {
            self.inner.events.emit(StoreEvent {
                change,
                snapshot: next,
            });
        }
    }
}

/// Clears `loading` and notifies subscribers if the refresh future is
/// dropped before its data lands.
struct InFlightRefresh<'a> {
    store: &'a HospitalStore,
    finished: bool,
}

impl<'a> InFlightRefresh<'a> {
    fn new(store: &'a HospitalStore) -> Self {
        Self {
            store,
            finished: false,
        }
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

impl Drop for InFlightRefresh<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!("Refresh abandoned before completion");
        self.store.commit(|snapshot| {
            snapshot.loading = false;
            ((), Some(Change::RefreshAbandoned))
        });
    }
}

/// `P` + sequence from the current patient count, skipping ids already taken
fn next_patient_id(patients: &[Patient]) -> String {
    let taken: HashSet<&str> = patients.iter().map(|p| p.id.as_str()).collect();
    let mut sequence = patients.len() + 1;
    loop {
        let id = format_patient_id(sequence);
        if !taken.contains(id.as_str()) {
            return id;
        }
        sequence += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Urgency;

    fn store() -> HospitalStore {
        let mut config = Config::default();
        config.store.rng_seed = Some(42);
        config.store.refresh_latency_ms = 0;
        HospitalStore::new(SeedData::builtin().unwrap(), &config).unwrap()
    }

    #[test]
    fn test_next_patient_id_skips_taken() {
        let s = store().snapshot();
        assert_eq!(next_patient_id(&s.patients), "P009");

        let mut patients = s.patients.clone();
        patients.remove(0);
        // seven patients left, P008 still exists
        assert_eq!(next_patient_id(&patients), "P009");
    }

    #[test]
    fn test_add_patient_scenario() {
        let store = store();
        let before = store.snapshot();

        let id = store
            .add_patient(NewPatient::new("Test", 40, Urgency::High, "cardiology"))
            .unwrap();
        assert_eq!(id, "P009");

        let after = store.snapshot();
        let patient = after.patient("P009").unwrap();
        assert_eq!(patient.wait_time, 0);
        assert_eq!(patient.status, PatientStatus::Waiting);
        assert_eq!(after.department("cardiology").unwrap().current_patients, 23);
        assert_eq!(after.stats.total_patients, before.stats.total_patients + 1);
        assert_eq!(after.recommendations.len(), before.recommendations.len() + 1);

        let rec = after.recommendations.last().unwrap();
        assert_eq!(rec.patient_id, "P009");
        assert_eq!(rec.current_dept, "cardiology");
        assert_ne!(rec.recommended_dept, "cardiology");
        assert_eq!(rec.urgency, Urgency::High);
        assert!(after.last_updated > before.last_updated);

        // the earlier snapshot is untouched
        assert_eq!(before.patients.len(), 8);
        assert_eq!(before.department("cardiology").unwrap().current_patients, 22);
    }

    #[test]
    fn test_add_patient_unknown_department() {
        let store = store();
        let err = store
            .add_patient(NewPatient::new("Test", 40, Urgency::Low, "oncology"))
            .unwrap_err();
        assert!(matches!(err, MedflowError::DepartmentNotFound(ref d) if d == "oncology"));
        assert_eq!(store.snapshot().patients.len(), 8);
        assert_eq!(store.telemetry().patients_added, 0);
    }

    #[test]
    fn test_add_patient_invalid_age() {
        let store = store();
        let err = store
            .add_patient(NewPatient::new("Test", 130, Urgency::Low, "icu"))
            .unwrap_err();
        assert!(matches!(err, MedflowError::ValidationFailed { .. }));
    }

    #[test]
    fn test_add_patient_may_exceed_capacity() {
        let store = store();
        for i in 0..3 {
            store
                .add_patient(NewPatient::new(format!("Overflow {}", i), 50, Urgency::Medium, "icu"))
                .unwrap();
        }
        let icu = store.snapshot().department("icu").cloned().unwrap();
        assert_eq!(icu.current_patients, 11);
        assert!(icu.is_over_capacity());
    }

    #[test]
    fn test_add_patient_notifies_subscribers() {
        let store = store();
        let mut rx = store.subscribe();
        store
            .add_patient(NewPatient::new("Test", 40, Urgency::Urgent, "emergency"))
            .unwrap();

        let event = rx.try_recv().unwrap();
        match event.change {
            Change::PatientAdded { patient_id, department, recommended_dept } => {
                assert_eq!(patient_id, "P009");
                assert_eq!(department, "emergency");
                assert!(recommended_dept.is_some());
            }
            other => panic!("unexpected change {:?}", other),
        }
        assert!(event.snapshot.patient("P009").is_some());
    }

    #[test]
    fn test_abandoned_refresh_clears_loading() {
        let mut config = Config::default();
        config.store.rng_seed = Some(1);
        let store = HospitalStore::new(SeedData::builtin().unwrap(), &config).unwrap();
        let mut rx = store.subscribe();

        tokio_test::block_on(async {
            let refresh = store.refresh();
            tokio::pin!(refresh);
            // first poll sets loading, then parks on the simulated latency
            let _ = poll_once(refresh.as_mut()).await;
            assert!(store.snapshot().loading);
        });
        assert!(!store.snapshot().loading);

        assert_eq!(rx.try_recv().unwrap().change, Change::RefreshStarted);
        let abandoned = rx.try_recv().unwrap();
        assert_eq!(abandoned.change, Change::RefreshAbandoned);
        assert!(!abandoned.snapshot.loading);
    }

    async fn poll_once<F: std::future::Future + Unpin>(fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            out = fut => Some(out),
            _ = std::future::ready(()) => None,
        }
    }
}
