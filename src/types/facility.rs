//! Departments and beds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Map placement of a department; presentational only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A hospital department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub current_patients: u32,
    pub capacity: u32,
    /// Current wait in minutes
    pub wait_time: u32,
    #[serde(default)]
    pub coordinates: Coordinates,
}

impl Department {
    /// Occupancy as a fraction of capacity
    pub fn occupancy(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.current_patients as f64 / self.capacity as f64
    }

    pub fn is_over_capacity(&self) -> bool {
        self.current_patients > self.capacity
    }
}

/// Bed status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedStatus {
    Available,
    Occupied,
    Cleaning,
    Reserved,
}

impl BedStatus {
    /// Next status in the turnover cycle; reserved beds never cycle
    pub fn cycle(self) -> Self {
        match self {
            BedStatus::Available => BedStatus::Occupied,
            BedStatus::Occupied => BedStatus::Cleaning,
            BedStatus::Cleaning => BedStatus::Available,
            BedStatus::Reserved => BedStatus::Reserved,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BedStatus::Available => "available",
            BedStatus::Occupied => "occupied",
            BedStatus::Cleaning => "cleaning",
            BedStatus::Reserved => "reserved",
        }
    }
}

impl fmt::Display for BedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bed in a department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bed {
    pub id: String,
    pub department: String,
    pub status: BedStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    /// Flagged by the allocation heuristic as a good placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<bool>,
}
