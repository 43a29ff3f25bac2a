// src/error.rs
//! Unified error handling for the windowing pipeline
//!
//! Every fallible phase (discovery, harmonization, skeleton loading, window
//! materialization) reports through [`DatasetError`]. Recording-source failures
//! are wrapped, never retried: a single corrupt subject aborts the whole call.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;
use serde::Serialize;

use crate::source::SourceError;

/// Unified error type for dataset preparation
#[derive(Debug, Clone)]
pub enum DatasetError {
    /// Input path rejected during discovery
    InvalidInput {
        path: String,
        reason: String,
        context: ErrorContext,
    },

    /// Recording source failure while reading a subject
    Source {
        subject_path: String,
        error: Arc<SourceError>,
        context: ErrorContext,
    },

    /// Configuration and setup errors
    Configuration {
        component: String,
        reason: String,
        context: ErrorContext,
    },

    /// Array or header content that violates the pipeline's shape contract
    InvalidData {
        data_type: String,
        reason: String,
        expected: Option<String>,
        actual: Option<String>,
        context: ErrorContext,
    },

    /// Subject subset names a subject that was never discovered
    SubjectIndexOutOfRange {
        index: usize,
        subject_count: usize,
        context: ErrorContext,
    },
}

/// Error context for debugging and analysis
#[derive(Debug, Clone, Serialize)]
pub struct ErrorContext {
    pub timestamp: SystemTime,
    pub component: String,
    pub operation: String,
    pub file: Option<&'static str>,
    pub line: Option<u32>,
    pub additional_info: HashMap<String, String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            component: component.to_string(),
            operation: operation.to_string(),
            file: None,
            line: None,
            additional_info: HashMap::new(),
        }
    }

    /// Create error context with file and line information
    pub fn with_location(
        component: &str,
        operation: &str,
        file: &'static str,
        line: u32,
    ) -> Self {
        let mut context = Self::new(component, operation);
        context.file = Some(file);
        context.line = Some(line);
        context
    }

    /// Add additional information to the context
    pub fn add_info<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }
}

/// Macro for creating error context with file and line info
#[macro_export]
macro_rules! error_context {
    ($component:expr, $operation:expr) => {
        $crate::error::ErrorContext::with_location($component, $operation, file!(), line!())
    };
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::InvalidInput { path, reason, context } => {
                write!(f, "[INPUT] Invalid input '{}': {} ({})", path, reason, context.operation)
            }
            DatasetError::Source { subject_path, error, context } => {
                write!(f, "[SOURCE] Recording error for '{}': {} (at {}:{})",
                       subject_path, error,
                       context.file.unwrap_or("unknown"), context.line.unwrap_or(0))
            }
            DatasetError::Configuration { component, reason, context } => {
                write!(f, "[CONFIG] Configuration error in {}: {} ({})",
                       component, reason, context.operation)
            }
            DatasetError::InvalidData { data_type, reason, expected, actual, context } => {
                match (expected, actual) {
                    (Some(exp), Some(act)) => write!(f, "[DATA] Invalid {}: {} (expected: {}, got: {}) ({})",
                                                     data_type, reason, exp, act, context.operation),
                    _ => write!(f, "[DATA] Invalid {}: {} ({})", data_type, reason, context.operation),
                }
            }
            DatasetError::SubjectIndexOutOfRange { index, subject_count, context } => {
                write!(f, "[SUBSET] Subject index {} out of range for {} discovered subjects ({})",
                       index, subject_count, context.operation)
            }
        }
    }
}

impl Error for DatasetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DatasetError::Source { error, .. } => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl From<crate::utils::validation::ValidationError> for DatasetError {
    fn from(err: crate::utils::validation::ValidationError) -> Self {
        DatasetError::Configuration {
            component: "validation".to_string(),
            reason: err.to_string(),
            context: error_context!("validation", "validate_config"),
        }
    }
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Error builder for convenient error construction
pub struct DatasetErrorBuilder {
    component: String,
    operation: String,
}

impl DatasetErrorBuilder {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn invalid_input(self, path: &str, reason: &str) -> DatasetError {
        DatasetError::InvalidInput {
            path: path.to_string(),
            reason: reason.to_string(),
            context: ErrorContext::new(&self.component, &self.operation),
        }
    }

    pub fn configuration(self, reason: &str) -> DatasetError {
        let context = ErrorContext::new(&self.component, &self.operation);
        DatasetError::Configuration {
            component: self.component,
            reason: reason.to_string(),
            context,
        }
    }

    pub fn invalid_data(self, data_type: &str, reason: &str) -> DatasetError {
        DatasetError::InvalidData {
            data_type: data_type.to_string(),
            reason: reason.to_string(),
            expected: None,
            actual: None,
            context: ErrorContext::new(&self.component, &self.operation),
        }
    }

    pub fn shape_mismatch(self, data_type: &str, expected: String, actual: String) -> DatasetError {
        DatasetError::InvalidData {
            data_type: data_type.to_string(),
            reason: "array shape does not match the trial layout".to_string(),
            expected: Some(expected),
            actual: Some(actual),
            context: ErrorContext::new(&self.component, &self.operation),
        }
    }

    pub fn subject_out_of_range(self, index: usize, subject_count: usize) -> DatasetError {
        DatasetError::SubjectIndexOutOfRange {
            index,
            subject_count,
            context: ErrorContext::new(&self.component, &self.operation),
        }
    }
}

/// Attach the offending subject path to recording-source failures
pub trait IntoDatasetError<T> {
    #[track_caller]
    fn dataset_err(self, subject_path: &std::path::Path, operation: &str) -> DatasetResult<T>;
}

impl<T> IntoDatasetError<T> for Result<T, SourceError> {
    #[track_caller]
    fn dataset_err(self, subject_path: &std::path::Path, operation: &str) -> DatasetResult<T> {
        // Closures do not inherit the caller location, so capture it here.
        let caller = std::panic::Location::caller();
        self.map_err(|err| DatasetError::Source {
            subject_path: subject_path.display().to_string(),
            error: Arc::new(err),
            context: ErrorContext::with_location("recording_source", operation, caller.file(), caller.line()),
        })
    }
}
