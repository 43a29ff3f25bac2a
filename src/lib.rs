//! Biomech-Windows: subject-aligned training windows from biomechanics recordings
//!
//! This library turns a directory of per-subject motion-capture recordings into
//! fixed-length windows of kinematic inputs and dynamics labels. It features:
//!
//! - Recursive subject discovery that reads headers only
//! - A contact body registry shared by every subject
//! - Mass-normalized, registry-ordered ground contact labels
//! - Window filtering against per-frame missing ground-reaction flags
//! - Layered TOML and environment configuration
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use biomech_windows::config::DatasetConfig;
//! use biomech_windows::dataset::WindowedDataset;
//! use biomech_windows::source::JsonRecordingSource;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatasetConfig::for_path("./data/train", 50);
//!     let mut dataset = WindowedDataset::new(JsonRecordingSource::new(), config)?;
//!
//!     let stats = dataset.prepare_all()?;
//!     println!("{} windows, {} skipped", stats.windows, stats.skipped_windows);
//!
//!     if let Some((inputs, outputs, subject)) = dataset.get(0) {
//!         println!("subject {}: {} inputs, {} outputs", subject, inputs.len(), outputs.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod source;
pub mod utils;

// Re-export commonly used types for convenience
pub use dataset::{
    ContactBodyRegistry, FieldMap, PrepareStats, Window, WindowStore, WindowedDataset,
};

pub use error::{DatasetError, DatasetResult, ErrorContext};

pub use source::{RecordingSource, SourceError, SubjectHeader, SubjectRecording};

pub use utils::validation::{ValidationError, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Subject-aligned training windows from biomechanics recordings".to_string(),
        features: vec![
            "Header-only subject discovery".to_string(),
            "Cross-subject contact body harmonization".to_string(),
            "Missing-GRF window filtering".to_string(),
            "Mass-normalized dynamics labels".to_string(),
            "Layered configuration management".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
