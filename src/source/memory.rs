// src/source/memory.rs
//! In-memory recording source
//!
//! Holds fully decoded subjects keyed by path. Used for tests, benchmarks and
//! callers that decode recordings elsewhere. Access counters let callers check
//! that discovery stays header-only.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use serde::{Deserialize, Serialize};

use super::{
    check_pass, check_trial, MissingGrfReason, ProcessingPass, RecordingSource, Skeleton,
    SourceError, SourceResult, SubjectHeader, SubjectRecording,
};

/// One trial: frame count, missing-GRF flags and its processing passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialData {
    pub length: usize,
    pub missing_grf: Vec<MissingGrfReason>,
    pub passes: Vec<ProcessingPass>,
}

/// A decoded subject recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectData {
    pub header: SubjectHeader,
    pub trials: Vec<TrialData>,
    #[serde(default)]
    pub skeleton: Option<Skeleton>,
}

impl SubjectData {
    pub(crate) fn trial(&self, trial: usize) -> SourceResult<&TrialData> {
        check_trial(trial, self.trials.len())?;
        Ok(&self.trials[trial])
    }

    pub(crate) fn pass(&self, trial: usize, pass: usize) -> SourceResult<&ProcessingPass> {
        let data = self.trial(trial)?;
        check_pass(trial, pass, data.passes.len())?;
        Ok(&data.passes[pass])
    }
}

/// Access statistics shared between a source and the subjects it opened
#[derive(Debug, Default)]
pub struct SourceCounters {
    opens: AtomicUsize,
    frame_loads: AtomicUsize,
    standardized_loads: AtomicUsize,
}

impl SourceCounters {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }

    pub fn frame_loads(&self) -> usize {
        self.frame_loads.load(Ordering::Relaxed)
    }

    /// Frame loads that allowed force-plate re-standardization
    pub fn standardized_loads(&self) -> usize {
        self.standardized_loads.load(Ordering::Relaxed)
    }
}

/// Path-keyed table of decoded subjects
#[derive(Debug, Default)]
pub struct InMemoryRecordingSource {
    subjects: HashMap<PathBuf, Arc<SubjectData>>,
    counters: Arc<SourceCounters>,
}

impl InMemoryRecordingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subject under a path
    pub fn insert<P: Into<PathBuf>>(&mut self, path: P, subject: SubjectData) {
        self.subjects.insert(path.into(), Arc::new(subject));
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_subject<P: Into<PathBuf>>(mut self, path: P, subject: SubjectData) -> Self {
        self.insert(path, subject);
        self
    }

    pub fn counters(&self) -> &SourceCounters {
        &self.counters
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl RecordingSource for InMemoryRecordingSource {
    type Subject = InMemorySubject;

    fn open(&self, path: &Path) -> SourceResult<InMemorySubject> {
        let data = self
            .subjects
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_path_buf()))?;
        self.counters.opens.fetch_add(1, Ordering::Relaxed);

        Ok(InMemorySubject {
            path: path.to_path_buf(),
            data,
            frames_loaded: false,
            counters: self.counters.clone(),
        })
    }
}

/// Subject handed out by [`InMemoryRecordingSource`]
#[derive(Debug)]
pub struct InMemorySubject {
    path: PathBuf,
    data: Arc<SubjectData>,
    frames_loaded: bool,
    counters: Arc<SourceCounters>,
}

impl InMemorySubject {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn loaded(&self) -> SourceResult<&SubjectData> {
        if !self.frames_loaded {
            return Err(SourceError::FramesNotLoaded);
        }
        Ok(&self.data)
    }
}

impl SubjectRecording for InMemorySubject {
    fn header(&self) -> &SubjectHeader {
        &self.data.header
    }

    fn missing_grf(&self, trial: usize) -> SourceResult<Vec<MissingGrfReason>> {
        Ok(self.data.trial(trial)?.missing_grf.clone())
    }

    fn trial_length(&self, trial: usize) -> SourceResult<usize> {
        Ok(self.data.trial(trial)?.length)
    }

    fn num_processing_passes(&self, trial: usize) -> SourceResult<usize> {
        Ok(self.data.trial(trial)?.passes.len())
    }

    fn load_all_frames(&mut self, do_not_standardize_force_plate_data: bool) -> SourceResult<()> {
        self.counters.frame_loads.fetch_add(1, Ordering::Relaxed);
        if !do_not_standardize_force_plate_data {
            self.counters.standardized_loads.fetch_add(1, Ordering::Relaxed);
        }
        self.frames_loaded = true;
        Ok(())
    }

    fn processing_pass(&self, trial: usize, pass: usize) -> SourceResult<ProcessingPass> {
        Ok(self.loaded()?.pass(trial, pass)?.clone())
    }

    fn read_skeleton(&self, pass: usize, _geometry_folder: &Path) -> SourceResult<Skeleton> {
        check_pass(0, pass, self.data.header.num_processing_passes)?;
        self.data
            .skeleton
            .clone()
            .ok_or_else(|| SourceError::SkeletonUnavailable(self.path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn pass(frames: usize) -> ProcessingPass {
        let z = |w: usize| Array2::<f64>::zeros((frames, w));
        ProcessingPass {
            poses: z(2),
            vels: z(2),
            accs: z(2),
            joint_centers_in_root_frame: z(3),
            root_spatial_vel_in_root_frame: z(6),
            root_spatial_acc_in_root_frame: z(6),
            root_pos_history_in_root_frame: z(3),
            root_euler_history_in_root_frame: z(3),
            taus: z(2),
            ground_body_wrenches_in_root_frame: z(6),
            ground_body_cop_torque_force_in_root_frame: z(9),
            com_accs_in_root_frame: z(3),
            residual_wrench_in_root_frame: z(6),
        }
    }

    fn subject() -> SubjectData {
        SubjectData {
            header: SubjectHeader {
                mass_kg: 70.0,
                num_dofs: 2,
                num_joints: 1,
                ground_force_bodies: vec!["calcn_r".to_string()],
                num_trials: 1,
                num_processing_passes: 2,
            },
            trials: vec![TrialData {
                length: 4,
                missing_grf: vec![MissingGrfReason::NotMissingGrf; 4],
                passes: vec![pass(4), pass(4)],
            }],
            skeleton: None,
        }
    }

    #[test]
    fn test_open_unknown_path() {
        let source = InMemoryRecordingSource::new();
        assert!(matches!(source.open(Path::new("missing.b3d")), Err(SourceError::NotFound(_))));
        assert_eq!(source.counters().opens(), 0);
    }

    #[test]
    fn test_frames_require_loading() {
        let source = InMemoryRecordingSource::new().with_subject("s.b3d", subject());
        let mut opened = source.open(Path::new("s.b3d")).unwrap();

        assert_eq!(opened.trial_length(0).unwrap(), 4);
        assert!(matches!(opened.processing_pass(0, 0), Err(SourceError::FramesNotLoaded)));

        opened.load_all_frames(true).unwrap();
        assert_eq!(opened.processing_pass(0, 1).unwrap().poses.nrows(), 4);
        assert!(matches!(
            opened.processing_pass(0, 2),
            Err(SourceError::PassOutOfRange { pass: 2, num_passes: 2, .. })
        ));
        assert!(matches!(opened.missing_grf(1), Err(SourceError::TrialOutOfRange { .. })));

        assert_eq!(source.counters().opens(), 1);
        assert_eq!(source.counters().frame_loads(), 1);
        assert_eq!(source.counters().standardized_loads(), 0);
    }

    #[test]
    fn test_missing_skeleton() {
        let source = InMemoryRecordingSource::new().with_subject("s.b3d", subject());
        let opened = source.open(Path::new("s.b3d")).unwrap();
        assert!(matches!(
            opened.read_skeleton(1, Path::new("Geometry")),
            Err(SourceError::SkeletonUnavailable(_))
        ));
    }
}
