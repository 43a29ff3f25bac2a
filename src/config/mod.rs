// src/config/mod.rs
//! Dataset preparation configuration

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigLoader, ConfigError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::validation::{validate_non_empty, validate_range, ValidationResult};

/// Complete dataset configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct DatasetConfig {
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub harmonization: HarmonizationConfig,
    #[serde(default)]
    pub passes: PassConfig,
}

/// Where the data lives and how it is windowed
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DatasetSettings {
    /// Directory searched recursively, or a single recording
    #[serde(default = "defaults::data_path")]
    pub data_path: PathBuf,

    #[serde(default = "defaults::window_size")]
    pub window_size: usize,

    #[serde(default = "defaults::geometry_folder")]
    pub geometry_folder: PathBuf,

    #[serde(default = "defaults::skip_loading_skeletons")]
    pub skip_loading_skeletons: bool,

    /// Keep only the first few subjects
    #[serde(default = "defaults::testing_with_short_dataset")]
    pub testing_with_short_dataset: bool,
}

/// How per-subject contact bodies are merged into one schema
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HarmonizationConfig {
    #[serde(default = "defaults::ignored_contact_bodies")]
    pub ignored_contact_bodies: Vec<String>,

    #[serde(default)]
    pub policy: HarmonizationPolicy,
}

/// Which subjects contribute contact-body names to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonizationPolicy {
    /// Only the first discovered subject's list
    #[default]
    FirstSubject,
    /// Every subject's list, unseen names appended in discovery order
    Union,
}

/// Processing pass selection
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PassConfig {
    /// Pass that feeds input fields; labels always come from the final pass
    #[serde(default = "defaults::input_pass_index")]
    pub input_pass_index: usize,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;
    use std::path::PathBuf;

    pub fn data_path() -> PathBuf { PathBuf::from(paths::DEFAULT_DATA_PATH) }
    pub fn window_size() -> usize { windowing::DEFAULT_WINDOW_SIZE }
    pub fn geometry_folder() -> PathBuf { PathBuf::from(paths::DEFAULT_GEOMETRY_FOLDER) }
    pub fn skip_loading_skeletons() -> bool { false }
    pub fn testing_with_short_dataset() -> bool { false }

    pub fn ignored_contact_bodies() -> Vec<String> {
        contact::DEFAULT_IGNORED_CONTACT_BODIES.iter().map(|s| s.to_string()).collect()
    }

    pub fn input_pass_index() -> usize { passes::DEFAULT_INPUT_PASS_INDEX }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            data_path: defaults::data_path(),
            window_size: defaults::window_size(),
            geometry_folder: defaults::geometry_folder(),
            skip_loading_skeletons: defaults::skip_loading_skeletons(),
            testing_with_short_dataset: defaults::testing_with_short_dataset(),
        }
    }
}

impl Default for HarmonizationConfig {
    fn default() -> Self {
        Self {
            ignored_contact_bodies: defaults::ignored_contact_bodies(),
            policy: HarmonizationPolicy::default(),
        }
    }
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            input_pass_index: defaults::input_pass_index(),
        }
    }
}

impl DatasetConfig {
    /// Configuration for a data path with every other setting defaulted
    pub fn for_path<P: Into<PathBuf>>(data_path: P, window_size: usize) -> Self {
        let mut config = Self::default();
        config.dataset.data_path = data_path.into();
        config.dataset.window_size = window_size;
        config
    }

    /// Validate field ranges
    pub fn validate(&self) -> ValidationResult<()> {
        validate_range(
            "dataset.window_size",
            self.dataset.window_size,
            windowing::MIN_WINDOW_SIZE,
            windowing::MAX_WINDOW_SIZE,
        )?;
        validate_non_empty("dataset.data_path", &self.dataset.data_path.to_string_lossy())?;
        if !self.dataset.skip_loading_skeletons {
            validate_non_empty(
                "dataset.geometry_folder",
                &self.dataset.geometry_folder.to_string_lossy(),
            )?;
        }
        for body in &self.harmonization.ignored_contact_bodies {
            validate_non_empty("harmonization.ignored_contact_bodies", body)?;
        }
        Ok(())
    }

    /// Configuration summary for logging
    pub fn get_summary(&self) -> ConfigSummary {
        ConfigSummary {
            data_path: self.dataset.data_path.display().to_string(),
            window_size: self.dataset.window_size,
            policy: self.harmonization.policy,
            ignored_contact_bodies: self.harmonization.ignored_contact_bodies.len(),
            input_pass_index: self.passes.input_pass_index,
            loads_skeletons: !self.dataset.skip_loading_skeletons,
        }
    }
}

/// Configuration summary for display/logging
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub data_path: String,
    pub window_size: usize,
    pub policy: HarmonizationPolicy,
    pub ignored_contact_bodies: usize,
    pub input_pass_index: usize,
    pub loads_skeletons: bool,
}
