//! Validation utilities
//!
//! Field-level checks shared by configuration and header validation. Bounds
//! come from the constants in the config module.

use std::fmt;

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value out of valid range
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },
    /// Required field missing or empty
    RequiredFieldMissing(String),
    /// Value must be finite and strictly positive
    NotPositive {
        field: String,
        value: String,
    },
    /// Array size violation
    InvalidArraySize {
        field: String,
        actual: usize,
        expected: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfRange { field, value, min, max } => {
                write!(f, "Field '{}' value '{}' is out of range [{}, {}]", field, value, min, max)
            }
            ValidationError::RequiredFieldMissing(field) => {
                write!(f, "Required field '{}' is missing", field)
            }
            ValidationError::NotPositive { field, value } => {
                write!(f, "Field '{}' value '{}' must be finite and positive", field, value)
            }
            ValidationError::InvalidArraySize { field, actual, expected } => {
                write!(f, "Field '{}' array size {} doesn't match expected {}", field, actual, expected)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check that `value` lies in `[min, max]`
pub fn validate_range<T>(field: &str, value: T, min: T, max: T) -> ValidationResult<()>
where
    T: PartialOrd + fmt::Display,
{
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Check that a string field is not blank
pub fn validate_non_empty(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing(field.to_string()));
    }
    Ok(())
}

pub fn validate_positive_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::NotPositive {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Check that a length matches exactly
pub fn validate_len(field: &str, actual: usize, expected: usize) -> ValidationResult<()> {
    if actual != expected {
        return Err(ValidationError::InvalidArraySize {
            field: field.to_string(),
            actual,
            expected,
        });
    }
    Ok(())
}
