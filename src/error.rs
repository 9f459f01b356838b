// src/error.rs
use thiserror::Error;

/// Error types for the asian-cv library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CvError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Averaging schedule or option specification violates its invariants
    #[error("Invalid averaging schedule: {reason}")]
    ScheduleValidation { reason: String },

    /// Failure reported by the asset simulation provider
    #[error("Simulation failed: {reason}")]
    Simulation { reason: String },

    /// Control sample has (numerically) zero variance, so the optimal coefficient is undefined
    #[error(
        "Degenerate control variate: variance {variance:e} is not above tolerance {tolerance:e}"
    )]
    DegenerateControlVariate { variance: f64, tolerance: f64 },

    /// Elementwise operation on samples with different path counts
    #[error("Sample length mismatch: {left} paths vs {right} paths")]
    SampleLengthMismatch { left: usize, right: usize },

    /// Numerical instability or non-finite estimates
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },
}

/// Result type alias for asian-cv operations
pub type CvResult<T> = Result<T, CvError>;

/// Validation utilities
pub mod validation {
    use super::{CvError, CvResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> CvResult<()> {
        if value.is_nan() || value <= 0.0 {
            Err(CvError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> CvResult<()> {
        if value.is_nan() || value < 0.0 {
            Err(CvError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> CvResult<()> {
        if !value.is_finite() {
            Err(CvError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> CvResult<()> {
        if paths == 0 {
            Err(CvError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if paths > 100_000_000 {
            Err(CvError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "exceeds maximum allowed (100 million)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> CvResult<()> {
        if steps == 0 {
            Err(CvError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if steps > 100_000 {
            Err(CvError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "exceeds maximum allowed (100,000)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("strike", 1.0).is_ok());
        assert!(validate_positive("strike", 0.0).is_err());
        assert!(validate_positive("strike", -0.1).is_err());
        assert!(validate_positive("strike", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("time", 0.0).is_ok());
        assert!(validate_non_negative("time", 0.2).is_ok());
        assert!(validate_non_negative("time", -1e-9).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_paths_and_steps() {
        assert!(validate_paths(1).is_ok());
        assert!(validate_paths(0).is_err());
        assert!(validate_steps(20).is_ok());
        assert!(validate_steps(0).is_err());
        assert!(validate_steps(100_001).is_err());
    }

    #[test]
    fn test_error_display() {
        let error = CvError::InvalidParameters {
            parameter: "strike".to_string(),
            value: -0.1,
            constraint: "must be positive".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("strike"));
        assert!(display.contains("-0.1"));
        assert!(display.contains("positive"));
    }

    #[test]
    fn test_degenerate_error_display() {
        let error = CvError::DegenerateControlVariate {
            variance: 0.0,
            tolerance: 1e-14,
        };

        let display = format!("{}", error);
        assert!(display.contains("Degenerate control variate"));
        assert!(display.contains("1e-14"));
    }
}
