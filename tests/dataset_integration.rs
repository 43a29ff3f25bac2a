// tests/dataset_integration.rs
//! End-to-end dataset preparation tests
//!
//! Subjects are written as JSON recordings into temporary directories and read
//! back through the public API, covering:
//! - Registry construction and contact body harmonization
//! - Missing-GRF window filtering and skip counting
//! - Mass normalization and zero-filling of absent bodies
//! - Subset replacement, determinism and header-only discovery

use biomech_windows::config::{DatasetConfig, HarmonizationPolicy};
use biomech_windows::dataset::{input_keys, output_keys, WindowedDataset};
use biomech_windows::error::DatasetError;
use biomech_windows::source::synthetic::{array_ids, signal_value};
use biomech_windows::source::{
    InMemoryRecordingSource, JsonRecordingSource, SubjectData, SyntheticSubject,
};
use ndarray::s;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn write_subjects(subjects: &[(&str, SubjectData)]) -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    for (name, data) in subjects {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create subject dir");
        }
        JsonRecordingSource::write_subject(&path, data).expect("Failed to write subject");
    }
    dir
}

fn json_dataset(dir: &Path, window_size: usize) -> WindowedDataset<JsonRecordingSource> {
    WindowedDataset::new(JsonRecordingSource::new(), DatasetConfig::for_path(dir, window_size))
        .expect("Failed to build dataset")
}

#[test]
fn test_registry_skips_ignored_bodies() {
    let dir = write_subjects(&[(
        "s01.json",
        SyntheticSubject::new(70.0, &["calcn_r", "pelvis", "calcn_l"]).with_trial(6, &[]).build(),
    )]);
    let dataset = json_dataset(dir.path(), 3);

    assert_eq!(dataset.registry().names(), &["calcn_r", "calcn_l"]);
    assert_eq!(dataset.registry().width(), 6);
    assert_eq!(dataset.num_dofs(), 6);
    assert_eq!(dataset.num_joints(), 3);
}

#[test]
fn test_missing_frames_skip_every_overlapping_window() {
    let dir = write_subjects(&[(
        "s01.json",
        SyntheticSubject::new(70.0, &["calcn_r"]).with_trial(10, &[3, 7]).build(),
    )]);
    let mut dataset = json_dataset(dir.path(), 5);

    let stats = dataset.prepare_all().expect("prepare failed").clone();
    assert_eq!(stats.candidate_windows, 6);
    assert_eq!(stats.skipped_windows, 6);
    assert_eq!(stats.windows, 0);
    assert!(dataset.is_empty());
}

#[test]
fn test_length_is_candidates_minus_skipped() {
    let dir = write_subjects(&[
        ("s01.json", SyntheticSubject::new(70.0, &["calcn_r"]).with_trial(12, &[5]).with_trial(3, &[]).build()),
        ("s02.json", SyntheticSubject::new(65.0, &["calcn_r"]).with_trial(9, &[0, 8]).build()),
    ]);
    let mut dataset = json_dataset(dir.path(), 4);
    let stats = dataset.prepare_all().expect("prepare failed").clone();

    // s01 trial 0: 9 candidates, 4 touch frame 5; trial 1 is too short
    // s02: 6 candidates, frames 0 and 8 cover starts 0 and 5
    assert_eq!(stats.candidate_windows, 9 + 6);
    assert_eq!(stats.skipped_windows, 4 + 2);
    assert_eq!(dataset.len(), stats.candidate_windows - stats.skipped_windows);

    for window in dataset.store() {
        assert!(window.start_frame + 4 <= if window.subject_index == 0 { 12 } else { 9 });
        for array in window.inputs.values().chain(window.outputs.values()) {
            assert_eq!(array.nrows(), 4);
        }
    }
}

#[test]
fn test_force_labels_divided_by_mass() {
    let dir = write_subjects(&[(
        "s01.json",
        SyntheticSubject::new(70.0, &["calcn_r"]).with_trial(6, &[]).with_constant_force(700.0).build(),
    )]);
    let mut dataset = json_dataset(dir.path(), 3);
    dataset.prepare_all().expect("prepare failed");

    let (_, outputs, _) = dataset.get(0).expect("window 0");
    let forces = &outputs[output_keys::GROUND_CONTACT_FORCES_IN_ROOT_FRAME];
    assert!(forces.iter().all(|&f| f == 10.0));

    // CoP keeps its recorded units
    let cops = &outputs[output_keys::GROUND_CONTACT_COPS_IN_ROOT_FRAME];
    assert_eq!(cops[[0, 1]], signal_value(array_ids::COP_TORQUE_FORCE, 1, 0, 1) as f32);

    let torques = &outputs[output_keys::GROUND_CONTACT_TORQUES_IN_ROOT_FRAME];
    let raw_torque = signal_value(array_ids::COP_TORQUE_FORCE, 1, 2, 3);
    assert_eq!(torques[[2, 0]], (raw_torque / 70.0) as f32);

    let wrenches = &outputs[output_keys::GROUND_CONTACT_WRENCHES_IN_ROOT_FRAME];
    let raw_wrench = signal_value(array_ids::GROUND_WRENCHES, 1, 1, 4);
    assert_eq!(wrenches[[1, 4]], (raw_wrench / 70.0) as f32);
}

#[test]
fn test_absent_contact_body_zero_filled() {
    let dir = write_subjects(&[
        ("s01.json", SyntheticSubject::new(70.0, &["calcn_r", "calcn_l"]).with_trial(4, &[]).build()),
        ("s02.json", SyntheticSubject::new(60.0, &["calcn_r"]).with_trial(4, &[]).build()),
    ]);
    let mut dataset = json_dataset(dir.path(), 4);
    dataset.prepare_data_for_subset(Some(&[1])).expect("prepare failed");

    assert_eq!(dataset.len(), 1);
    let (_, outputs, subject) = dataset.get(0).expect("window 0");
    assert_eq!(subject, 1);
    for key in [
        output_keys::GROUND_CONTACT_COPS_IN_ROOT_FRAME,
        output_keys::GROUND_CONTACT_TORQUES_IN_ROOT_FRAME,
        output_keys::GROUND_CONTACT_FORCES_IN_ROOT_FRAME,
    ] {
        let array = &outputs[key];
        assert_eq!(array.dim(), (4, 6));
        assert!(array.slice(s![.., 3..6]).iter().all(|&v| v == 0.0), "{} not zero-filled", key);
    }
}

#[test]
fn test_inputs_from_first_pass_outputs_from_final_pass() {
    let dir = write_subjects(&[(
        "s01.json",
        SyntheticSubject::new(70.0, &["calcn_r"]).with_passes(3).with_trial(5, &[]).build(),
    )]);
    let mut dataset = json_dataset(dir.path(), 2);
    dataset.prepare_all().expect("prepare failed");

    let window = dataset.store().window(1).expect("window 1");
    assert_eq!(window.start_frame, 1);
    assert_eq!(window.inputs[input_keys::POS][[0, 2]], signal_value(array_ids::POSES, 0, 1, 2) as f32);
    assert_eq!(window.outputs[output_keys::TAU][[1, 0]], signal_value(array_ids::TAUS, 2, 2, 0) as f32);
}

#[test]
fn test_subset_replaces_previous_windows() {
    let dir = write_subjects(&[
        ("a/s01.json", SyntheticSubject::new(70.0, &["calcn_r"]).with_trial(6, &[]).build()),
        ("b/s02.json", SyntheticSubject::new(70.0, &["calcn_r"]).with_trial(8, &[]).build()),
    ]);
    let mut dataset = json_dataset(dir.path(), 3);

    dataset.prepare_all().expect("prepare failed");
    assert_eq!(dataset.len(), 4 + 6);

    dataset.prepare_data_for_subset(Some(&[1])).expect("prepare failed");
    assert_eq!(dataset.len(), 6);
    assert!(dataset.store().iter().all(|w| w.subject_index == 1));

    dataset.prepare_data_for_subset(Some(&[])).expect("prepare failed");
    assert!(dataset.is_empty());
}

#[test]
fn test_preparation_is_deterministic() {
    let dir = write_subjects(&[
        ("s02.json", SyntheticSubject::new(81.0, &["calcn_l", "calcn_r"]).with_trial(9, &[4]).build()),
        ("s01.json", SyntheticSubject::new(70.0, &["calcn_r", "calcn_l"]).with_trial(7, &[]).build()),
    ]);

    let mut first = json_dataset(dir.path(), 3);
    let mut second = json_dataset(dir.path(), 3);
    first.prepare_all().expect("prepare failed");
    second.prepare_all().expect("prepare failed");

    assert_eq!(first.subject_paths(), second.subject_paths());
    assert!(first.subject_paths()[0].ends_with("s01.json"));
    assert_eq!(first.len(), second.len());
    assert!(first.store().iter().zip(second.store().iter()).all(|(a, b)| a == b));
    assert_eq!(first.store().shuffled_order(11), second.store().shuffled_order(11));
}

#[test]
fn test_union_policy_collects_all_bodies() {
    let dir = write_subjects(&[
        ("s01.json", SyntheticSubject::new(70.0, &["calcn_r", "pelvis"]).with_trial(4, &[]).build()),
        ("s02.json", SyntheticSubject::new(70.0, &["calcn_l", "calcn_r"]).with_trial(4, &[]).build()),
    ]);

    let mut config = DatasetConfig::for_path(dir.path(), 2);
    config.harmonization.policy = HarmonizationPolicy::Union;
    let mut dataset = WindowedDataset::new(JsonRecordingSource::new(), config).expect("Failed to build dataset");

    assert_eq!(dataset.registry().names(), &["calcn_r", "calcn_l"]);
    dataset.prepare_all().expect("prepare failed");
    let (_, outputs, _) = dataset.get(0).expect("window 0");
    assert_eq!(outputs[output_keys::GROUND_CONTACT_FORCES_IN_ROOT_FRAME].ncols(), 6);
}

#[test]
fn test_first_subject_policy_drops_later_bodies() {
    let dir = write_subjects(&[
        ("s01.json", SyntheticSubject::new(70.0, &["calcn_r"]).with_trial(4, &[]).build()),
        ("s02.json", SyntheticSubject::new(70.0, &["calcn_l", "calcn_r"]).with_trial(4, &[]).build()),
    ]);
    let dataset = json_dataset(dir.path(), 2);
    assert_eq!(dataset.registry().names(), &["calcn_r"]);
}

#[test]
fn test_short_dataset_keeps_two_subjects() {
    let subjects: Vec<(String, SubjectData)> = (0..4)
        .map(|i| {
            (
                format!("s{:02}.json", i),
                SyntheticSubject::new(70.0, &["calcn_r"]).with_trial(4, &[]).build(),
            )
        })
        .collect();
    let named: Vec<(&str, SubjectData)> = subjects.iter().map(|(n, d)| (n.as_str(), d.clone())).collect();
    let dir = write_subjects(&named);

    let mut config = DatasetConfig::for_path(dir.path(), 2);
    config.dataset.testing_with_short_dataset = true;
    let dataset = WindowedDataset::new(JsonRecordingSource::new(), config).expect("Failed to build dataset");

    assert_eq!(dataset.num_subjects(), 2);
    assert_eq!(dataset.skeletons().len(), 2);
}

#[test]
fn test_non_recording_file_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("subject.csv");
    std::fs::write(&path, "frame,force\n").expect("Failed to write file");

    let result = WindowedDataset::new(JsonRecordingSource::new(), DatasetConfig::for_path(&path, 5));
    assert!(matches!(result, Err(DatasetError::InvalidInput { .. })));
}

#[test]
fn test_corrupt_subject_aborts_prepare() {
    let dir = write_subjects(&[(
        "s01.json",
        SyntheticSubject::new(70.0, &["calcn_r"]).with_trial(4, &[]).build(),
    )]);
    std::fs::write(dir.path().join("s02.json"), "{ not json").expect("Failed to write file");

    let mut config = DatasetConfig::for_path(dir.path(), 2);
    config.dataset.skip_loading_skeletons = true;
    let mut dataset = WindowedDataset::new(JsonRecordingSource::new(), config).expect("Failed to build dataset");

    let err = dataset.prepare_all().unwrap_err();
    assert!(matches!(err, DatasetError::Source { .. }));
    assert!(err.to_string().contains("s02.json"));
    assert!(dataset.is_empty());
}

#[test]
fn test_discovery_reads_headers_only() {
    let source = InMemoryRecordingSource::new()
        .with_subject("/data/s01.b3d", SyntheticSubject::new(70.0, &["calcn_r"]).with_trial(6, &[]).build());

    let mut config = DatasetConfig::for_path("/data/s01.b3d", 3);
    config.dataset.skip_loading_skeletons = true;
    let mut dataset = WindowedDataset::new(source, config).expect("Failed to build dataset");

    assert_eq!(dataset.source().counters().opens(), 1);
    assert_eq!(dataset.source().counters().frame_loads(), 0);

    dataset.prepare_all().expect("prepare failed");
    assert_eq!(dataset.source().counters().frame_loads(), 1);
    assert_eq!(dataset.source().counters().standardized_loads(), 0);
}

#[test]
fn test_skipping_skeletons_leaves_windows_unchanged() {
    let dir = write_subjects(&[(
        "s01.json",
        SyntheticSubject::new(70.0, &["calcn_r"]).with_trial(6, &[2]).build(),
    )]);

    let mut with_skeletons = json_dataset(dir.path(), 2);
    let mut config = DatasetConfig::for_path(dir.path(), 2);
    config.dataset.skip_loading_skeletons = true;
    let mut without = WindowedDataset::new(JsonRecordingSource::new(), config).expect("Failed to build dataset");

    with_skeletons.prepare_all().expect("prepare failed");
    without.prepare_all().expect("prepare failed");

    assert_eq!(with_skeletons.skeletons().len(), 1);
    assert!(without.skeletons().is_empty());
    assert!(with_skeletons.store().iter().eq(without.store().iter()));
}
