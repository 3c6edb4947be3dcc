//! Configuration management for MedFlow
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.medflow/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{MedflowError, Result};

/// Complete configuration for MedFlow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Store lifecycle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Period of the background refresh
    pub refresh_interval_secs: u64,
    /// Simulated backend latency applied by every refresh
    pub refresh_latency_ms: u64,
    /// Buffered change notifications per subscriber
    pub event_capacity: usize,
    /// Fixed RNG seed for reproducible runs
    pub rng_seed: Option<u64>,
    /// Seed data file; the built-in data set is used when unset
    pub seed_path: Option<String>,
}

/// Bounds of the random jitter applied on refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Patient wait time moves by at most this many minutes
    pub patient_wait_jitter: u32,
    /// Chance a patient's status advances on a refresh
    pub status_advance_probability: f64,
    /// Department headcount moves by at most this many patients
    pub department_jitter: u32,
    /// Chance a non-reserved bed advances its turnover cycle
    pub bed_cycle_probability: f64,
    pub total_patients_jitter: u32,
    pub available_beds_jitter: u32,
    pub available_beds_floor: u32,
    pub average_wait_floor: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 30,
            refresh_latency_ms: 1000,
            event_capacity: 100,
            rng_seed: None,
            seed_path: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            patient_wait_jitter: 2,
            status_advance_probability: 0.2,
            department_jitter: 1,
            bed_cycle_probability: 0.1,
            total_patients_jitter: 2,
            available_beds_jitter: 1,
            available_beds_floor: 10,
            average_wait_floor: 5,
        }
    }
}

impl StoreConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn refresh_latency(&self) -> Duration {
        Duration::from_millis(self.refresh_latency_ms)
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MedflowError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| MedflowError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from ~/.medflow/config.toml when present, otherwise built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration location
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".medflow").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.store.refresh_interval_secs == 0 {
            return Err(MedflowError::ConfigError(
                "refresh_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.store.event_capacity == 0 {
            return Err(MedflowError::ConfigError(
                "event_capacity must be greater than 0".to_string(),
            ));
        }

        for (name, p) in [
            ("status_advance_probability", self.simulation.status_advance_probability),
            ("bed_cycle_probability", self.simulation.bed_cycle_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(MedflowError::ConfigError(format!(
                    "{} must be between 0.0 and 1.0",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| MedflowError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MedflowError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| MedflowError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Seed file path, if one is configured
    pub fn seed_path(&self) -> Option<PathBuf> {
        self.store.seed_path.as_deref().map(Self::expand_path)
    }
}
