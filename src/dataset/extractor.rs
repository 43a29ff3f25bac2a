// src/dataset/extractor.rs
//! Window extraction
//!
//! Turns one subject's trials into fixed-length windows. A candidate window
//! touching any frame without trustworthy ground-reaction data is dropped and
//! counted, never reported as an error. Header or array shapes that break the
//! expected layout are fatal for the whole prepare call.

use ndarray::Array2;
use std::path::Path;
use tracing::debug;

use super::alignment::{assemble_inputs, assemble_outputs, ContactLayout};
use super::registry::ContactBodyRegistry;
use super::store::{PrepareStats, Window};
use crate::config::constants::{contact, spatial};
use crate::error::{DatasetError, DatasetErrorBuilder, DatasetResult, IntoDatasetError};
use crate::source::{ProcessingPass, SubjectRecording};
use crate::utils::validation::{validate_len, validate_positive_finite};

/// Valid window starts of one trial
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowScan {
    pub valid_starts: Vec<usize>,
    /// Every start in `0..=len - window_size`
    pub candidates: usize,
    pub skipped: usize,
}

/// Find window starts whose frames are all flagged present.
///
/// Keeps a running count of missing frames inside the window, so the scan is
/// linear in the trial length.
pub fn scan_windows(missing: &[bool], window_size: usize) -> WindowScan {
    if window_size == 0 || missing.len() < window_size {
        return WindowScan::default();
    }

    let candidates = missing.len() - window_size + 1;
    let mut missing_in_window = missing[..window_size].iter().filter(|&&m| m).count();
    let mut valid_starts = Vec::with_capacity(candidates);

    for start in 0..candidates {
        if start > 0 {
            if missing[start - 1] {
                missing_in_window -= 1;
            }
            if missing[start + window_size - 1] {
                missing_in_window += 1;
            }
        }
        if missing_in_window == 0 {
            valid_starts.push(start);
        }
    }

    let skipped = candidates - valid_starts.len();
    WindowScan { valid_starts, candidates, skipped }
}

struct SubjectContext<'a> {
    path: &'a Path,
    index: usize,
    mass_kg: f64,
    num_raw_bodies: usize,
    layout: ContactLayout,
}

/// Builds windows for subjects against a fixed registry
#[derive(Debug, Clone)]
pub struct WindowExtractor<'a> {
    registry: &'a ContactBodyRegistry,
    window_size: usize,
    input_pass_index: usize,
}

impl<'a> WindowExtractor<'a> {
    pub fn new(registry: &'a ContactBodyRegistry, window_size: usize, input_pass_index: usize) -> Self {
        Self {
            registry,
            window_size,
            input_pass_index,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Load a subject's frames and append every valid window of every trial
    pub fn extract_subject<R: SubjectRecording>(
        &self,
        subject: &mut R,
        subject_path: &Path,
        subject_index: usize,
        windows: &mut Vec<Window>,
        stats: &mut PrepareStats,
    ) -> DatasetResult<()> {
        // Force-plate data stays in recorded units; labels are mass-scaled here.
        subject
            .load_all_frames(true)
            .dataset_err(subject_path, "load_all_frames")?;

        let header = subject.header().clone();
        validate_positive_finite("mass_kg", header.mass_kg).map_err(|e| {
            DatasetErrorBuilder::new("extractor", "extract_subject")
                .invalid_data("mass_kg", &format!("{}: {}", subject_path.display(), e))
        })?;

        let ctx = SubjectContext {
            path: subject_path,
            index: subject_index,
            mass_kg: header.mass_kg,
            num_raw_bodies: header.ground_force_bodies.len(),
            layout: ContactLayout::new(self.registry, header.ground_force_bodies.as_slice()),
        };
        for slot in ctx.layout.absent_slots() {
            debug!(
                "{} has no '{}' contact body, zero-filling",
                subject_path.display(),
                self.registry.names()[slot]
            );
        }

        for trial in 0..header.num_trials {
            self.extract_trial(subject, &ctx, trial, windows, stats)?;
        }
        stats.subjects += 1;
        Ok(())
    }

    fn extract_trial<R: SubjectRecording>(
        &self,
        subject: &R,
        ctx: &SubjectContext<'_>,
        trial: usize,
        windows: &mut Vec<Window>,
        stats: &mut PrepareStats,
    ) -> DatasetResult<()> {
        let path = ctx.path;
        let trial_length = subject.trial_length(trial).dataset_err(path, "trial_length")?;
        let missing = subject.missing_grf(trial).dataset_err(path, "missing_grf")?;
        validate_len("missing_grf", missing.len(), trial_length).map_err(|e| {
            DatasetErrorBuilder::new("extractor", "extract_trial")
                .invalid_data("missing_grf", &format!("{}: {}", path.display(), e))
        })?;

        let mask: Vec<bool> = missing.iter().map(|r| r.is_missing()).collect();
        let scan = scan_windows(&mask, self.window_size);
        stats.trials += 1;
        stats.candidate_windows += scan.candidates;
        stats.skipped_windows += scan.skipped;
        debug!(
            "{} trial {}: {} frames, {} windows, {} skipped",
            path.display(),
            trial,
            trial_length,
            scan.valid_starts.len(),
            scan.skipped
        );
        if scan.valid_starts.is_empty() {
            return Ok(());
        }

        let num_passes = subject
            .num_processing_passes(trial)
            .dataset_err(path, "num_processing_passes")?;
        let final_pass = num_passes.checked_sub(1).ok_or_else(|| {
            DatasetErrorBuilder::new("extractor", "extract_trial")
                .invalid_data("processing_passes", &format!("trial {} has no processing passes", trial))
        })?;

        let input_pass = subject
            .processing_pass(trial, self.input_pass_index)
            .dataset_err(path, "processing_pass")?;
        check_input_layout(&input_pass, trial_length)?;

        let final_owned;
        let output_pass = if final_pass == self.input_pass_index {
            &input_pass
        } else {
            final_owned = subject
                .processing_pass(trial, final_pass)
                .dataset_err(path, "processing_pass")?;
            &final_owned
        };
        check_output_layout(output_pass, trial_length, ctx.num_raw_bodies)?;

        windows.reserve(scan.valid_starts.len());
        for &start in &scan.valid_starts {
            let end = start + self.window_size;
            windows.push(Window {
                inputs: assemble_inputs(&input_pass, start, end),
                outputs: assemble_outputs(output_pass, start, end, ctx.mass_kg, &ctx.layout),
                subject_index: ctx.index,
                trial_index: trial,
                start_frame: start,
            });
        }
        stats.windows += scan.valid_starts.len();
        Ok(())
    }
}

fn mismatch(name: &str, expected: String, actual: &[usize]) -> DatasetError {
    DatasetErrorBuilder::new("extractor", "check_pass_layout").shape_mismatch(
        name,
        expected,
        format!("{:?}", actual),
    )
}

fn check_widths(trial_length: usize, widths: &[(&str, &Array2<f64>, usize)]) -> DatasetResult<()> {
    for &(name, array, width) in widths {
        if array.ncols() != width {
            return Err(mismatch(name, format!("[{}, {}]", trial_length, width), array.shape()));
        }
    }
    Ok(())
}

fn check_rows<'p>(
    trial_length: usize,
    arrays: impl IntoIterator<Item = (&'static str, &'p Array2<f64>)>,
) -> DatasetResult<()> {
    for (name, array) in arrays {
        if array.nrows() != trial_length {
            return Err(mismatch(name, format!("[{}, _]", trial_length), array.shape()));
        }
    }
    Ok(())
}

/// Shape check for the arrays windows read as inputs
fn check_input_layout(pass: &ProcessingPass, trial_length: usize) -> DatasetResult<()> {
    check_rows(trial_length, pass.input_arrays())?;
    check_widths(
        trial_length,
        &[
            ("root_spatial_vel_in_root_frame", &pass.root_spatial_vel_in_root_frame, spatial::SPATIAL_WIDTH),
            ("root_spatial_acc_in_root_frame", &pass.root_spatial_acc_in_root_frame, spatial::SPATIAL_WIDTH),
        ],
    )
}

/// Shape check for the label arrays, including the per-body packed widths
fn check_output_layout(pass: &ProcessingPass, trial_length: usize, num_raw_bodies: usize) -> DatasetResult<()> {
    check_rows(trial_length, pass.output_arrays())?;
    check_widths(
        trial_length,
        &[
            (
                "ground_body_wrenches_in_root_frame",
                &pass.ground_body_wrenches_in_root_frame,
                contact::WRENCH_WIDTH * num_raw_bodies,
            ),
            (
                "ground_body_cop_torque_force_in_root_frame",
                &pass.ground_body_cop_torque_force_in_root_frame,
                contact::COP_TORQUE_FORCE_WIDTH * num_raw_bodies,
            ),
        ],
    )
}
