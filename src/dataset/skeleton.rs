// src/dataset/skeleton.rs
//! Optional per-subject skeleton loading

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::registry::ContactBodyRegistry;
use crate::error::{DatasetErrorBuilder, DatasetResult, IntoDatasetError};
use crate::source::{BodyHandle, RecordingSource, Skeleton, SubjectRecording};

/// A subject's skeleton with its registry bodies resolved to handles
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectSkeleton {
    pub skeleton: Skeleton,
    /// One entry per registry slot; `None` when the skeleton lacks the body
    pub contact_bodies: Vec<Option<BodyHandle>>,
}

impl SubjectSkeleton {
    pub fn new(skeleton: Skeleton, registry: &ContactBodyRegistry) -> Self {
        let contact_bodies = registry
            .names()
            .iter()
            .map(|name| skeleton.body_node(name))
            .collect();
        Self { skeleton, contact_bodies }
    }

    /// Handle of the body at a registry slot
    pub fn contact_body(&self, slot: usize) -> Option<BodyHandle> {
        self.contact_bodies.get(slot).copied().flatten()
    }
}

/// Read every subject's skeleton at its final processing pass, in subject order
pub fn load_skeletons<S: RecordingSource>(
    source: &S,
    paths: &[PathBuf],
    registry: &ContactBodyRegistry,
    geometry_folder: &Path,
) -> DatasetResult<Vec<SubjectSkeleton>> {
    let mut skeletons = Vec::with_capacity(paths.len());

    for (i, path) in paths.iter().enumerate() {
        info!("Loading skeleton {}/{}", i + 1, paths.len());
        let subject = source.open(path).dataset_err(path, "open")?;

        let num_passes = subject.header().num_processing_passes;
        let final_pass = num_passes.checked_sub(1).ok_or_else(|| {
            DatasetErrorBuilder::new("skeleton", "load_skeletons")
                .invalid_data("num_processing_passes", &format!("{} has no processing passes", path.display()))
        })?;

        let skeleton = subject
            .read_skeleton(final_pass, geometry_folder)
            .dataset_err(path, "read_skeleton")?;
        let resolved = SubjectSkeleton::new(skeleton, registry);

        let unresolved = resolved.contact_bodies.iter().filter(|h| h.is_none()).count();
        if unresolved > 0 {
            warn!("{} contact bodies missing from skeleton of {}", unresolved, path.display());
        }
        skeletons.push(resolved);
    }

    Ok(skeletons)
}
