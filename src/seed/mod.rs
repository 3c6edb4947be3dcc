//! Seed data loading
//!
//! The store is seeded once from static reference data. The loader validates
//! referential integrity up front so a malformed data set fails at startup
//! instead of surfacing as odd behavior later.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::{MedflowError, Result};
use crate::types::patient::MAX_PATIENT_AGE;
use crate::types::{Bed, Department, HospitalStats, Patient, RouteRecommendation, Trends};

const BUILTIN_SEED: &str = include_str!("../../data/seed.toml");

/// Reference data for a fresh store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    pub departments: Vec<Department>,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub beds: Vec<Bed>,
    #[serde(default)]
    pub stats: HospitalStats,
    #[serde(default)]
    pub recommendations: Vec<RouteRecommendation>,
    #[serde(default)]
    pub trends: Trends,
    #[serde(default)]
    pub triage_samples: Vec<String>,
}

impl SeedData {
    /// The bundled demo data set
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_SEED)
    }

    /// Load and validate a seed file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MedflowError::SeedError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let seed = Self::from_toml_str(&contents)?;
        info!(
            path = %path.display(),
            departments = seed.departments.len(),
            patients = seed.patients.len(),
            beds = seed.beds.len(),
            "Seed data loaded"
        );
        Ok(seed)
    }

    /// Load the configured seed file, or the bundled data when none is set
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("No seed path configured, using built-in data");
                Self::builtin()
            }
        }
    }

    /// Parse and validate seed data from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let seed: SeedData = toml::from_str(contents)
            .map_err(|e| MedflowError::SeedError(format!("Failed to parse seed data: {}", e)))?;
        seed.validate()?;
        Ok(seed)
    }

    /// Check ids are unique and every reference resolves
    pub fn validate(&self) -> Result<()> {
        if self.departments.is_empty() {
            return Err(seed_error("at least one department is required"));
        }

        let dept_ids = unique_ids("department", self.departments.iter().map(|d| d.id.as_str()))?;
        let patient_ids = unique_ids("patient", self.patients.iter().map(|p| p.id.as_str()))?;
        unique_ids("bed", self.beds.iter().map(|b| b.id.as_str()))?;

        for dept in &self.departments {
            if dept.capacity == 0 {
                return Err(seed_error(format!("department '{}' has zero capacity", dept.id)));
            }
            if dept.current_patients > dept.capacity {
                return Err(seed_error(format!(
                    "department '{}' holds {} patients but capacity is {}",
                    dept.id, dept.current_patients, dept.capacity
                )));
            }
        }

        for patient in &self.patients {
            if patient.age > MAX_PATIENT_AGE {
                return Err(seed_error(format!(
                    "patient '{}' has age {} above {}",
                    patient.id, patient.age, MAX_PATIENT_AGE
                )));
            }
            if !dept_ids.contains(patient.department.as_str()) {
                return Err(seed_error(format!(
                    "patient '{}' references unknown department '{}'",
                    patient.id, patient.department
                )));
            }
        }

        for bed in &self.beds {
            if !dept_ids.contains(bed.department.as_str()) {
                return Err(seed_error(format!(
                    "bed '{}' references unknown department '{}'",
                    bed.id, bed.department
                )));
            }
            if let Some(patient_id) = &bed.patient_id {
                if !patient_ids.contains(patient_id.as_str()) {
                    return Err(seed_error(format!(
                        "bed '{}' is assigned to unknown patient '{}'",
                        bed.id, patient_id
                    )));
                }
            }
        }

        for rec in &self.recommendations {
            if !patient_ids.contains(rec.patient_id.as_str()) {
                return Err(seed_error(format!(
                    "recommendation references unknown patient '{}'",
                    rec.patient_id
                )));
            }
            for dept in [&rec.current_dept, &rec.recommended_dept] {
                if !dept_ids.contains(dept.as_str()) {
                    return Err(seed_error(format!(
                        "recommendation for '{}' references unknown department '{}'",
                        rec.patient_id, dept
                    )));
                }
            }
        }

        let wait = &self.trends.wait_times;
        for series in &wait.datasets {
            if series.data.len() != wait.labels.len() {
                return Err(seed_error(format!(
                    "wait-time series '{}' has {} points for {} labels",
                    series.department,
                    series.data.len(),
                    wait.labels.len()
                )));
            }
        }
        let flow = &self.trends.patient_flow;
        for series in &flow.datasets {
            if series.data.len() != flow.labels.len() {
                return Err(seed_error(format!(
                    "patient-flow series '{}' has {} points for {} labels",
                    series.kind,
                    series.data.len(),
                    flow.labels.len()
                )));
            }
        }

        Ok(())
    }
}

fn seed_error(msg: impl Into<String>) -> MedflowError {
    MedflowError::SeedError(msg.into())
}

fn unique_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<HashSet<&'a str>> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(seed_error(format!("{} with empty id", kind)));
        }
        if !seen.insert(id) {
            return Err(seed_error(format!("duplicate {} id '{}'", kind, id)));
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BedStatus, Urgency};
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
[[departments]]
id = "icu"
name = "ICU"
current_patients = 1
capacity = 4
wait_time = 0

[[patients]]
id = "P001"
name = "Ann"
age = 30
urgency = "low"
wait_time = 3
department = "icu"
status = "waiting"
"#;

    #[test]
    fn test_builtin_seed() {
        let seed = SeedData::builtin().unwrap();
        assert_eq!(seed.departments.len(), 6);
        assert_eq!(seed.patients.len(), 8);
        assert_eq!(seed.beds.len(), 15);
        assert_eq!(seed.recommendations.len(), 3);
        assert_eq!(seed.triage_samples.len(), 5);
        assert_eq!(seed.stats.total_patients, 82);
        assert_eq!(seed.stats.triage_distribution.medium, 35);

        let cardiology = seed.departments.iter().find(|d| d.id == "cardiology").unwrap();
        assert_eq!(cardiology.capacity, 30);
        assert_eq!(cardiology.current_patients, 22);

        let b005 = seed.beds.iter().find(|b| b.id == "B005").unwrap();
        assert_eq!(b005.status, BedStatus::Reserved);
        assert_eq!(seed.patients[2].urgency, Urgency::Urgent);
    }

    #[test]
    fn test_minimal_seed_uses_defaults() {
        let seed = SeedData::from_toml_str(MINIMAL).unwrap();
        assert!(seed.beds.is_empty());
        assert!(seed.recommendations.is_empty());
        assert_eq!(seed.stats, HospitalStats::default());
    }

    #[test]
    fn test_rejects_empty_departments() {
        let err = SeedData::from_toml_str("departments = []").unwrap_err();
        assert!(matches!(err, MedflowError::SeedError(_)));
    }

    #[test]
    fn test_rejects_unknown_patient_department() {
        let text = MINIMAL.replace("department = \"icu\"", "department = \"oncology\"");
        let err = SeedData::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("oncology"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut seed = SeedData::from_toml_str(MINIMAL).unwrap();
        seed.patients.push(seed.patients[0].clone());
        assert!(seed.validate().unwrap_err().to_string().contains("duplicate patient"));
    }

    #[test]
    fn test_rejects_over_capacity() {
        let text = MINIMAL.replace("current_patients = 1", "current_patients = 9");
        assert!(SeedData::from_toml_str(&text).is_err());
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let text = MINIMAL
            .replace("current_patients = 1", "current_patients = 0")
            .replace("capacity = 4", "capacity = 0");
        assert!(SeedData::from_toml_str(&text).unwrap_err().to_string().contains("zero capacity"));
    }

    #[test]
    fn test_rejects_dangling_bed_patient() {
        let mut seed = SeedData::from_toml_str(MINIMAL).unwrap();
        seed.beds.push(Bed {
            id: "B001".into(),
            department: "icu".into(),
            status: BedStatus::Occupied,
            patient_id: Some("P404".into()),
            recommended: None,
        });
        assert!(seed.validate().unwrap_err().to_string().contains("P404"));
    }

    #[test]
    fn test_rejects_mismatched_trend_series() {
        let mut seed = SeedData::builtin().unwrap();
        seed.trends.wait_times.datasets[0].data.pop();
        assert!(seed.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = SeedData::from_toml_str("[[departments]\nid=").unwrap_err();
        assert!(matches!(err, MedflowError::SeedError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seed.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let seed = SeedData::load_or_builtin(Some(&path)).unwrap();
        assert_eq!(seed.departments[0].id, "icu");

        let missing = SeedData::load(&temp_dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(MedflowError::SeedError(_))));
    }
}
