//! Wait-time predictor
//!
//! Each "prediction" is the current wait scaled up or down by 20% at random.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::Department;

/// Waits above this many minutes are flagged
pub const ELEVATED_WAIT_MINUTES: u32 = 30;

const IMPROVING_FACTOR: f64 = 0.8;
const WORSENING_FACTOR: f64 = 1.2;

/// Current and predicted wait for one department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTimePrediction {
    pub department: String,
    pub name: String,
    pub current: u32,
    pub predicted: u32,
    pub elevated: bool,
}

/// Randomized wait-time predictor
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitTimePredictor;

impl WaitTimePredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn predict<R: Rng + ?Sized>(&self, department: &Department, rng: &mut R) -> WaitTimePrediction {
        let factor = if rng.gen_bool(0.5) {
            IMPROVING_FACTOR
        } else {
            WORSENING_FACTOR
        };

        WaitTimePrediction {
            department: department.id.clone(),
            name: department.name.clone(),
            current: department.wait_time,
            predicted: (department.wait_time as f64 * factor).round() as u32,
            elevated: department.wait_time > ELEVATED_WAIT_MINUTES,
        }
    }

    pub fn predict_all<R: Rng + ?Sized>(&self, departments: &[Department], rng: &mut R) -> Vec<WaitTimePrediction> {
        departments.iter().map(|d| self.predict(d, rng)).collect()
    }
}
