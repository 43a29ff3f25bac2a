// src/dataset/registry.rs
//! Cross-subject contact body registry
//!
//! Subjects list their contact bodies in whatever order their recording used.
//! The registry fixes one ordered schema; every harmonized label array lays
//! its per-body triples out in registry order, zero-filling absent bodies.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

use super::index::SubjectIndex;
use crate::config::constants::contact;
use crate::config::{HarmonizationConfig, HarmonizationPolicy};
use crate::error::{DatasetResult, IntoDatasetError};
use crate::source::{RecordingSource, SubjectRecording};

/// Ordered, duplicate-free list of contact body names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactBodyRegistry {
    bodies: Vec<String>,
}

/// Accumulates body names in first-seen order, skipping ignored ones
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    bodies: Vec<String>,
    seen: HashSet<String>,
    ignored: HashSet<String>,
}

impl RegistryBuilder {
    pub fn new<S: AsRef<str>>(ignored: &[S]) -> Self {
        Self {
            bodies: Vec::new(),
            seen: HashSet::new(),
            ignored: ignored.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Append this subject's unseen, non-ignored bodies
    pub fn add_subject<S: AsRef<str>>(&mut self, raw_bodies: &[S]) -> &mut Self {
        for name in raw_bodies.iter().map(AsRef::as_ref) {
            if self.ignored.contains(name) || self.seen.contains(name) {
                continue;
            }
            self.seen.insert(name.to_string());
            self.bodies.push(name.to_string());
        }
        self
    }

    pub fn build(self) -> ContactBodyRegistry {
        ContactBodyRegistry { bodies: self.bodies }
    }
}

impl ContactBodyRegistry {
    /// Registry from a single subject's list
    pub fn from_bodies<S: AsRef<str>, I: AsRef<str>>(raw_bodies: &[S], ignored: &[I]) -> Self {
        let mut builder = RegistryBuilder::new(ignored);
        builder.add_subject(raw_bodies);
        builder.build()
    }

    pub fn names(&self) -> &[String] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b == name)
    }

    /// Column count of a harmonized per-body vector array
    pub fn width(&self) -> usize {
        contact::VEC3_WIDTH * self.bodies.len()
    }

    /// For each registry slot, the body's position in a subject's raw list
    pub fn raw_slots<S: AsRef<str>>(&self, raw_bodies: &[S]) -> Vec<Option<usize>> {
        self.bodies
            .iter()
            .map(|name| raw_bodies.iter().position(|raw| raw.as_ref() == name.as_str()))
            .collect()
    }
}

/// Build the registry for a discovered subject list.
///
/// `FirstSubject` uses the reference header already read during discovery.
/// `Union` opens every subject's header, still without loading frames.
pub fn harmonize<S: RecordingSource>(
    source: &S,
    index: &SubjectIndex,
    config: &HarmonizationConfig,
) -> DatasetResult<ContactBodyRegistry> {
    let mut builder = RegistryBuilder::new(config.ignored_contact_bodies.as_slice());

    match config.policy {
        HarmonizationPolicy::FirstSubject => {
            if let Some(header) = index.reference_header() {
                builder.add_subject(header.ground_force_bodies.as_slice());
            }
        }
        HarmonizationPolicy::Union => {
            for path in index.paths() {
                let subject = source.open(path).dataset_err(path, "open")?;
                debug!("Merging contact bodies of {}", path.display());
                builder.add_subject(subject.header().ground_force_bodies.as_slice());
            }
        }
    }

    let registry = builder.build();
    info!("Contact body registry ({:?}): {:?}", config.policy, registry.names());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_bodies_removed() {
        let registry = ContactBodyRegistry::from_bodies(&["calcn_r", "pelvis", "calcn_l"], &["pelvis"]);
        assert_eq!(registry.names(), &["calcn_r".to_string(), "calcn_l".to_string()]);
        assert_eq!(registry.width(), 6);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let registry = ContactBodyRegistry::from_bodies(&["calcn_r", "calcn_l", "calcn_r"], &["pelvis"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.index_of("calcn_l"), Some(1));
    }

    #[test]
    fn test_empty_when_only_ignored() {
        let registry = ContactBodyRegistry::from_bodies(&["pelvis"], &["pelvis"]);
        assert!(registry.is_empty());
        assert_eq!(registry.width(), 0);
    }

    #[test]
    fn test_union_appends_unseen_in_order() {
        let mut builder = RegistryBuilder::new(&["pelvis"]);
        builder
            .add_subject(&["calcn_r", "calcn_l"])
            .add_subject(&["pelvis", "hand_r", "calcn_r"])
            .add_subject(&["calcn_l", "hand_l"]);
        let registry = builder.build();

        assert_eq!(registry.names(), &["calcn_r", "calcn_l", "hand_r", "hand_l"]);
    }

    #[test]
    fn test_raw_slots_follow_registry_order() {
        let registry = ContactBodyRegistry::from_bodies(&["calcn_r", "calcn_l"], &["pelvis"]);

        assert_eq!(registry.raw_slots(&["calcn_l", "calcn_r"]), vec![Some(1), Some(0)]);
        assert_eq!(registry.raw_slots(&["pelvis", "calcn_r"]), vec![Some(1), None]);
        assert_eq!(registry.raw_slots::<&str>(&[]), vec![None, None]);
    }
}
