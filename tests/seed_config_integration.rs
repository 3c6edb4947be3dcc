//! Seed and configuration loading from disk

use medflow::{config::Config, types::Urgency, HospitalStore, MedflowError};
use std::fs;
use tempfile::TempDir;

const SMALL_SEED: &str = r#"
[[departments]]
id = "emergency"
name = "Emergency"
current_patients = 3
capacity = 5
wait_time = 10

[[departments]]
id = "icu"
name = "ICU"
current_patients = 1
capacity = 2
wait_time = 0

[[patients]]
id = "P001"
name = "Ada"
age = 70
urgency = "urgent"
wait_time = 0
department = "icu"
status = "in-progress"

[[beds]]
id = "B001"
department = "icu"
status = "reserved"
"#;

#[test]
fn test_store_from_seed_file() {
    let dir = TempDir::new().unwrap();
    let seed_path = dir.path().join("seed.toml");
    fs::write(&seed_path, SMALL_SEED).unwrap();

    let mut config = Config::default();
    config.store.seed_path = Some(seed_path.display().to_string());
    config.store.rng_seed = Some(42);

    let store = HospitalStore::from_config(&config).unwrap();
    let snapshot = store.snapshot();
    assert_eq!(snapshot.departments.len(), 2);
    assert_eq!(snapshot.patients.len(), 1);
    assert!(snapshot.recommendations.is_empty());
    assert!(!snapshot.loading);

    let id = store
        .add_patient(medflow::types::NewPatient::new("Grace", 50, Urgency::Urgent, "emergency"))
        .unwrap();
    assert_eq!(id, "P002");

    // the only other department is icu
    let snapshot = store.snapshot();
    let recs = snapshot.recommendations_for("P002");
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].recommended_dept, "icu");
}

#[test]
fn test_invalid_seed_file_rejected() {
    let dir = TempDir::new().unwrap();
    let seed_path = dir.path().join("seed.toml");
    fs::write(&seed_path, SMALL_SEED.replace("department = \"icu\"\nstatus = \"in-progress\"", "department = \"nowhere\"\nstatus = \"in-progress\"")).unwrap();

    let mut config = Config::default();
    config.store.seed_path = Some(seed_path.display().to_string());

    let result = HospitalStore::from_config(&config);
    assert!(matches!(result, Err(MedflowError::SeedError(_))));
}

#[test]
fn test_missing_seed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.store.seed_path = Some(dir.path().join("absent.toml").display().to_string());

    assert!(HospitalStore::from_config(&config).is_err());
}

#[test]
fn test_config_file_drives_store() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[store]\nrefresh_interval_secs = 5\nrefresh_latency_ms = 0\nrng_seed = 7\n",
    )
    .unwrap();

    let config = Config::load(Some(config_path)).unwrap();
    assert_eq!(config.store.refresh_interval_secs, 5);
    assert_eq!(config.simulation.bed_cycle_probability, 0.1);

    let store = HospitalStore::from_config(&config).unwrap();
    assert_eq!(store.config().refresh_interval_secs, 5);
    assert_eq!(store.snapshot().patients.len(), 8);
}

#[test]
fn test_invalid_config_rejected() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[simulation]\nbed_cycle_probability = 1.5\n").unwrap();

    let result = Config::load(Some(config_path));
    assert!(matches!(result, Err(MedflowError::ConfigError(_))));
}

#[test]
fn test_saved_config_reloads() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.store.event_capacity = 16;
    config.save(&config_path).unwrap();

    let loaded = Config::load_from_file(&config_path).unwrap();
    assert_eq!(loaded.store.event_capacity, 16);
}
