// src/source/mod.rs
//! Recording source abstraction
//!
//! The windowing pipeline never decodes recordings itself. It talks to a
//! [`RecordingSource`] that opens subject files and hands back header metadata,
//! per-frame missing-GRF flags and frame-major processing-pass arrays.

pub mod types;
pub mod memory;
pub mod json;
pub mod synthetic;

pub use types::*;
pub use memory::{InMemoryRecordingSource, InMemorySubject, SubjectData, TrialData};
pub use json::{JsonRecordingSource, JsonSubject};
pub use synthetic::SyntheticSubject;

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::constants::recording;

/// Errors raised by a recording source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed recording {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("no recording registered at {0:?}")]
    NotFound(PathBuf),

    #[error("trial {trial} out of range ({num_trials} trials)")]
    TrialOutOfRange { trial: usize, num_trials: usize },

    #[error("processing pass {pass} out of range for trial {trial} ({num_passes} passes)")]
    PassOutOfRange { trial: usize, pass: usize, num_passes: usize },

    #[error("frame data requested before load_all_frames")]
    FramesNotLoaded,

    #[error("no skeleton stored in {0:?}")]
    SkeletonUnavailable(PathBuf),
}

/// Result type alias for recording source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Opens subject recordings
pub trait RecordingSource: Send + Sync {
    type Subject: SubjectRecording;

    /// Open a subject, reading only its header
    fn open(&self, path: &Path) -> SourceResult<Self::Subject>;

    /// File extension (without dot) that marks a subject recording
    fn recording_extension(&self) -> &str {
        recording::RECORDING_EXTENSION
    }
}

/// One opened subject recording
pub trait SubjectRecording {
    /// Header metadata, available without loading frames
    fn header(&self) -> &SubjectHeader;

    /// Per-frame missing-GRF reasons for a trial
    fn missing_grf(&self, trial: usize) -> SourceResult<Vec<MissingGrfReason>>;

    /// Number of frames in a trial
    fn trial_length(&self, trial: usize) -> SourceResult<usize>;

    /// Number of processing passes recorded for a trial
    fn num_processing_passes(&self, trial: usize) -> SourceResult<usize>;

    /// Materialize all trial frames. When `do_not_standardize_force_plate_data`
    /// is set the source must keep force-plate data in its recorded units.
    fn load_all_frames(&mut self, do_not_standardize_force_plate_data: bool) -> SourceResult<()>;

    /// Pull every frame-major array of one processing pass
    fn processing_pass(&self, trial: usize, pass: usize) -> SourceResult<ProcessingPass>;

    /// Read the articulated-body structure as of the given processing pass
    fn read_skeleton(&self, pass: usize, geometry_folder: &Path) -> SourceResult<Skeleton>;
}

pub(crate) fn check_trial(trial: usize, num_trials: usize) -> SourceResult<()> {
    if trial >= num_trials {
        return Err(SourceError::TrialOutOfRange { trial, num_trials });
    }
    Ok(())
}

pub(crate) fn check_pass(trial: usize, pass: usize, num_passes: usize) -> SourceResult<()> {
    if pass >= num_passes {
        return Err(SourceError::PassOutOfRange { trial, pass, num_passes });
    }
    Ok(())
}
