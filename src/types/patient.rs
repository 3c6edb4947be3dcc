//! Patient records and triage levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{MedflowError, Result};

/// Oldest age accepted at admission
pub const MAX_PATIENT_AGE: u8 = 120;

/// Triage level, ordered `Low < Medium < High < Urgent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Urgent,
}

impl Urgency {
    /// All levels, most urgent first
    pub const ALL: [Urgency; 4] = [Urgency::Urgent, Urgency::High, Urgency::Medium, Urgency::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = MedflowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            "urgent" => Ok(Urgency::Urgent),
            other => Err(MedflowError::validation(
                "urgency",
                format!("unknown level '{}', expected urgent|high|medium|low", other),
            )),
        }
    }
}

/// Where a patient is in their visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatientStatus {
    Waiting,
    InProgress,
    Completed,
}

impl PatientStatus {
    /// Next status in the simulated visit cycle (completed wraps to waiting)
    pub fn advance(self) -> Self {
        match self {
            PatientStatus::Waiting => PatientStatus::InProgress,
            PatientStatus::InProgress => PatientStatus::Completed,
            PatientStatus::Completed => PatientStatus::Waiting,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Waiting => "waiting",
            PatientStatus::InProgress => "in-progress",
            PatientStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u8,
    pub urgency: Urgency,
    /// Minutes waited so far
    pub wait_time: u32,
    /// Owning department id
    pub department: String,
    pub status: PatientStatus,
}

/// Admission input; id, wait time and status are assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub age: u8,
    pub urgency: Urgency,
    pub department: String,
}

impl NewPatient {
    pub fn new(name: impl Into<String>, age: u8, urgency: Urgency, department: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            urgency,
            department: department.into(),
        }
    }

    /// Field-level checks that do not need the snapshot
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MedflowError::validation("name", "must not be empty"));
        }
        if self.age > MAX_PATIENT_AGE {
            return Err(MedflowError::validation(
                "age",
                format!("{} is outside 0..={}", self.age, MAX_PATIENT_AGE),
            ));
        }
        Ok(())
    }
}

/// Format a patient id from its sequence number, e.g. `7 -> "P007"`
pub fn format_patient_id(sequence: usize) -> String {
    format!("P{:03}", sequence)
}
