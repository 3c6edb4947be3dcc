//! Error types for MedFlow
//!
//! The simulation itself never fails for valid input; errors come from
//! admission validation, seed loading and configuration.

use thiserror::Error;

/// Main error type for the MedFlow store
#[derive(Error, Debug)]
pub enum MedflowError {
    /// Admission referenced a department the snapshot does not know
    #[error("Department not found: {0}")]
    DepartmentNotFound(String),

    /// Admission input rejected
    #[error("Validation failed for {field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Seed data malformed or inconsistent
    #[error("Seed data error: {0}")]
    SeedError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl MedflowError {
    /// Shorthand for a validation failure on a named field
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        MedflowError::ValidationFailed {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, MedflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MedflowError::DepartmentNotFound("oncology".to_string());
        assert!(err.to_string().contains("oncology"));
    }

    #[test]
    fn test_validation_error() {
        let err = MedflowError::validation("age", "must be between 0 and 120");
        assert!(err.to_string().contains("age"));
        assert!(err.to_string().contains("120"));
    }
}
