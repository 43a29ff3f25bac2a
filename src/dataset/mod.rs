// src/dataset/mod.rs
//! Windowed, subject-aligned dataset
//!
//! Construction discovers subjects, fixes the contact body registry and
//! optionally loads skeletons; it never touches frame data. Windows are
//! materialized later by [`WindowedDataset::prepare_data_for_subset`], which
//! replaces whatever an earlier call produced.

pub mod alignment;
pub mod extractor;
pub mod index;
pub mod keys;
pub mod registry;
pub mod skeleton;
pub mod store;

pub use alignment::{assemble_inputs, assemble_outputs, ContactLayout};
pub use extractor::{scan_windows, WindowExtractor, WindowScan};
pub use index::{discover_paths, SubjectIndex};
pub use keys::{input_keys, output_keys, FieldMap};
pub use registry::{harmonize, ContactBodyRegistry, RegistryBuilder};
pub use skeleton::{load_skeletons, SubjectSkeleton};
pub use store::{subject_rng, PrepareStats, Window, WindowStore};

use std::path::PathBuf;
use tracing::info;

use crate::config::constants::testing;
use crate::config::DatasetConfig;
use crate::error::{DatasetErrorBuilder, DatasetResult, IntoDatasetError};
use crate::source::RecordingSource;

/// Subject-aligned window dataset over a recording source
#[derive(Debug)]
pub struct WindowedDataset<S: RecordingSource> {
    source: S,
    config: DatasetConfig,
    index: SubjectIndex,
    registry: ContactBodyRegistry,
    skeletons: Vec<SubjectSkeleton>,
    store: WindowStore,
}

impl<S: RecordingSource> WindowedDataset<S> {
    /// Discover subjects, build the registry and load skeletons unless skipped
    pub fn new(source: S, config: DatasetConfig) -> DatasetResult<Self> {
        config.validate()?;

        let mut index = SubjectIndex::discover(&source, &config.dataset.data_path)?;
        if config.dataset.testing_with_short_dataset {
            index.truncate(testing::SHORT_DATASET_SUBJECT_LIMIT);
        }

        let registry = harmonize(&source, &index, &config.harmonization)?;

        let skeletons = if config.dataset.skip_loading_skeletons {
            Vec::new()
        } else {
            load_skeletons(&source, index.paths(), &registry, &config.dataset.geometry_folder)?
        };

        info!(
            "Dataset ready: {} subjects, {} contact bodies, window size {}",
            index.len(),
            registry.len(),
            config.dataset.window_size
        );

        Ok(Self {
            source,
            config,
            index,
            registry,
            skeletons,
            store: WindowStore::default(),
        })
    }

    /// Materialize windows for the given subject indices, or all subjects.
    ///
    /// Previous windows are discarded first, so a failed call leaves the
    /// dataset empty rather than half-rebuilt.
    pub fn prepare_data_for_subset(&mut self, subset: Option<&[usize]>) -> DatasetResult<&PrepareStats> {
        self.store = WindowStore::default();

        let selected: Vec<usize> = match subset {
            Some(indices) => indices.to_vec(),
            None => (0..self.index.len()).collect(),
        };
        for &subject_index in &selected {
            if subject_index >= self.index.len() {
                return Err(DatasetErrorBuilder::new("dataset", "prepare_data_for_subset")
                    .subject_out_of_range(subject_index, self.index.len()));
            }
        }

        let extractor = WindowExtractor::new(
            &self.registry,
            self.config.dataset.window_size,
            self.config.passes.input_pass_index,
        );
        let mut windows = Vec::new();
        let mut stats = PrepareStats::default();

        for (progress, &subject_index) in selected.iter().enumerate() {
            let path = &self.index.paths()[subject_index];
            info!("Pre-loading subject {}/{}: {}", progress + 1, selected.len(), path.display());

            let mut subject = self.source.open(path).dataset_err(path, "open")?;
            extractor.extract_subject(&mut subject, path, subject_index, &mut windows, &mut stats)?;
        }

        info!(
            "Prepared {} windows from {} trials ({} skipped for missing ground reaction data)",
            stats.windows, stats.trials, stats.skipped_windows
        );
        self.store = WindowStore::new(windows, stats);
        Ok(self.store.stats())
    }

    /// Materialize windows for every discovered subject
    pub fn prepare_all(&mut self) -> DatasetResult<&PrepareStats> {
        self.prepare_data_for_subset(None)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Inputs, outputs and subject index of window `index`
    pub fn get(&self, index: usize) -> Option<(&FieldMap, &FieldMap, usize)> {
        self.store.get(index)
    }

    pub fn store(&self) -> &WindowStore {
        &self.store
    }

    pub fn registry(&self) -> &ContactBodyRegistry {
        &self.registry
    }

    pub fn subject_paths(&self) -> &[PathBuf] {
        self.index.paths()
    }

    pub fn num_subjects(&self) -> usize {
        self.index.len()
    }

    pub fn num_dofs(&self) -> usize {
        self.index.num_dofs()
    }

    pub fn num_joints(&self) -> usize {
        self.index.num_joints()
    }

    /// Loaded skeletons in subject order; empty when loading was skipped
    pub fn skeletons(&self) -> &[SubjectSkeleton] {
        &self.skeletons
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarmonizationPolicy;
    use crate::error::DatasetError;
    use crate::source::{InMemoryRecordingSource, SyntheticSubject};

    fn source() -> InMemoryRecordingSource {
        InMemoryRecordingSource::new()
            .with_subject("/data/s01.b3d", SyntheticSubject::new(70.0, &["calcn_r", "calcn_l"]).with_trial(8, &[]).build())
            .with_subject("/data/s02.b3d", SyntheticSubject::new(80.0, &["calcn_l", "hand_r"]).with_trial(6, &[1]).build())
    }

    fn config(path: &str) -> DatasetConfig {
        DatasetConfig::for_path(path, 3)
    }

    #[test]
    fn test_construction_touches_headers_only() {
        let dataset = WindowedDataset::new(source(), config("/data/s01.b3d")).unwrap();

        assert_eq!(dataset.num_subjects(), 1);
        assert!(dataset.is_empty());
        assert_eq!(dataset.num_dofs(), 6);
        assert_eq!(dataset.skeletons().len(), 1);
        assert_eq!(dataset.source().counters().frame_loads(), 0);
    }

    #[test]
    fn test_prepare_single_file() {
        let mut dataset = WindowedDataset::new(source(), config("/data/s01.b3d")).unwrap();
        let stats = dataset.prepare_all().unwrap().clone();

        assert_eq!(stats.windows, 6);
        assert_eq!(dataset.len(), 6);
        assert_eq!(dataset.source().counters().standardized_loads(), 0);
        let (inputs, outputs, subject) = dataset.get(0).unwrap();
        assert_eq!(subject, 0);
        assert_eq!(inputs.len(), input_keys::ALL.len());
        assert_eq!(outputs[output_keys::GROUND_CONTACT_FORCES_IN_ROOT_FRAME].dim(), (3, 6));
    }

    #[test]
    fn test_subset_out_of_range() {
        let mut dataset = WindowedDataset::new(source(), config("/data/s01.b3d")).unwrap();
        dataset.prepare_all().unwrap();

        let result = dataset.prepare_data_for_subset(Some(&[1]));
        assert!(matches!(
            result,
            Err(DatasetError::SubjectIndexOutOfRange { index: 1, subject_count: 1, .. })
        ));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_union_policy_config() {
        let mut cfg = config("/data/s01.b3d");
        cfg.harmonization.policy = HarmonizationPolicy::Union;
        cfg.dataset.skip_loading_skeletons = true;

        let dataset = WindowedDataset::new(source(), cfg).unwrap();
        assert_eq!(dataset.registry().names(), &["calcn_r", "calcn_l"]);
        assert!(dataset.skeletons().is_empty());
    }

    #[test]
    fn test_invalid_window_size_rejected() {
        let result = WindowedDataset::new(source(), DatasetConfig::for_path("/data/s01.b3d", 0));
        assert!(matches!(result, Err(DatasetError::Configuration { .. })));
    }
}
