//! Live-data simulation
//!
//! Every refresh nudges the snapshot with bounded random deltas so the
//! dashboard looks alive. Nothing here models real patient flow.

use rand::Rng;
use std::ops::RangeInclusive;

use crate::config::SimulationConfig;
use crate::store::Snapshot;
use crate::types::{Bed, BedStatus, Department, HospitalStats, Patient};

/// Average wait drifts down slightly faster than it rises
const AVERAGE_WAIT_DELTA: RangeInclusive<i64> = -2..=1;

/// What a single perturbation pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerturbationReport {
    pub status_changes: usize,
    pub beds_cycled: usize,
}

/// Applies the jitter rules to a snapshot
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Perturb every patient, department, bed and the aggregate counters
    pub fn perturb<R: Rng + ?Sized>(&self, snapshot: &mut Snapshot, rng: &mut R) -> PerturbationReport {
        let status_changes = self.perturb_patients(&mut snapshot.patients, rng);
        self.perturb_departments(&mut snapshot.departments, rng);
        let beds_cycled = self.perturb_beds(&mut snapshot.beds, rng);
        self.perturb_stats(&mut snapshot.stats, rng);

        PerturbationReport {
            status_changes,
            beds_cycled,
        }
    }

    /// Jitter wait times and occasionally advance status; returns status changes
    pub fn perturb_patients<R: Rng + ?Sized>(&self, patients: &mut [Patient], rng: &mut R) -> usize {
        let mut changed = 0;
        for patient in patients.iter_mut() {
            let delta = symmetric(rng, self.config.patient_wait_jitter);
            patient.wait_time = shift(patient.wait_time, delta, 0, u32::MAX);

            if rng.gen_bool(self.config.status_advance_probability) {
                patient.status = patient.status.advance();
                changed += 1;
            }
        }
        changed
    }

    /// Jitter headcounts, clamped to `[0, capacity]`
    pub fn perturb_departments<R: Rng + ?Sized>(&self, departments: &mut [Department], rng: &mut R) {
        for dept in departments.iter_mut() {
            let delta = symmetric(rng, self.config.department_jitter);
            dept.current_patients = shift(dept.current_patients, delta, 0, dept.capacity);
        }
    }

    /// Advance some beds through the turnover cycle; returns beds changed
    pub fn perturb_beds<R: Rng + ?Sized>(&self, beds: &mut [Bed], rng: &mut R) -> usize {
        let mut cycled = 0;
        for bed in beds.iter_mut() {
            if bed.status == BedStatus::Reserved {
                continue;
            }
            if rng.gen_bool(self.config.bed_cycle_probability) {
                bed.status = bed.status.cycle();
                cycled += 1;
            }
        }
        cycled
    }

    /// Drift the aggregate counters. Occupied beds and triage counts are left alone.
    pub fn perturb_stats<R: Rng + ?Sized>(&self, stats: &mut HospitalStats, rng: &mut R) {
        let delta = symmetric(rng, self.config.total_patients_jitter);
        stats.total_patients = shift(stats.total_patients, delta, 0, u32::MAX);

        let delta = symmetric(rng, self.config.available_beds_jitter);
        stats.available_beds = shift(stats.available_beds, delta, 0, u32::MAX)
            .max(self.config.available_beds_floor);

        let delta = rng.gen_range(AVERAGE_WAIT_DELTA);
        stats.average_wait_time = shift(stats.average_wait_time, delta, 0, u32::MAX)
            .max(self.config.average_wait_floor);
    }
}

/// Uniform delta in `[-spread, spread]`
fn symmetric<R: Rng + ?Sized>(rng: &mut R, spread: u32) -> i64 {
    let spread = spread as i64;
    rng.gen_range(-spread..=spread)
}

/// Apply a signed delta and clamp into `[min, max]`
fn shift(value: u32, delta: i64, min: u32, max: u32) -> u32 {
    (value as i64 + delta).clamp(min as i64, max as i64) as u32
}
