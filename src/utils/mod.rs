//! Common utility functions
//!
//! - Field validation helpers used by configuration and header checks

pub mod validation;

pub use validation::{
    ValidationError,
    ValidationResult,
    validate_len,
    validate_non_empty,
    validate_positive_finite,
    validate_range,
};
