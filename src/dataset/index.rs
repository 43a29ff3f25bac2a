// src/dataset/index.rs
//! Subject discovery
//!
//! Walks the data path for recordings and reads the header of the first one.
//! Frame data is never touched here.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{DatasetErrorBuilder, DatasetResult, IntoDatasetError};
use crate::source::{RecordingSource, SubjectHeader, SubjectRecording};

/// Ordered list of subject recordings plus the reference header
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectIndex {
    paths: Vec<PathBuf>,
    reference_header: Option<SubjectHeader>,
}

impl SubjectIndex {
    /// Discover subjects under `data_path` and read the first subject's header
    pub fn discover<S: RecordingSource>(source: &S, data_path: &Path) -> DatasetResult<Self> {
        let paths = discover_paths(data_path, source.recording_extension())?;
        info!("Discovered {} subject recordings under {}", paths.len(), data_path.display());

        let reference_header = match paths.first() {
            Some(first) => {
                let subject = source.open(first).dataset_err(first, "open")?;
                Some(subject.header().clone())
            }
            None => None,
        };

        Ok(Self { paths, reference_header })
    }

    /// Keep at most `limit` subjects, in discovery order
    pub fn truncate(&mut self, limit: usize) {
        if self.paths.len() > limit {
            debug!("Truncating subject list from {} to {}", self.paths.len(), limit);
            self.paths.truncate(limit);
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Header of the first discovered subject
    pub fn reference_header(&self) -> Option<&SubjectHeader> {
        self.reference_header.as_ref()
    }

    /// Degrees of freedom of the first subject; zero when nothing was found
    pub fn num_dofs(&self) -> usize {
        self.reference_header.as_ref().map_or(0, |h| h.num_dofs)
    }

    pub fn num_joints(&self) -> usize {
        self.reference_header.as_ref().map_or(0, |h| h.num_joints)
    }
}

/// List recordings under a directory (recursively, sorted by file name), or
/// accept a single recording path carrying the expected extension.
pub fn discover_paths(data_path: &Path, extension: &str) -> DatasetResult<Vec<PathBuf>> {
    if !data_path.is_dir() {
        if !has_extension(data_path, extension) {
            return Err(DatasetErrorBuilder::new("index", "discover").invalid_input(
                &data_path.display().to_string(),
                &format!("not a directory and not a .{} recording", extension),
            ));
        }
        return Ok(vec![data_path.to_path_buf()]);
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(data_path).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            DatasetErrorBuilder::new("index", "discover")
                .invalid_input(&data_path.display().to_string(), &e.to_string())
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}
