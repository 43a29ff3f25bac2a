// src/source/synthetic.rs
//! Deterministic synthetic subjects
//!
//! Every array element is a closed-form function of (array, pass, frame,
//! column), so callers can predict any value the pipeline should emit.

use ndarray::Array2;

use super::memory::{SubjectData, TrialData};
use super::{BodyHandle, BodyNode, MissingGrfReason, ProcessingPass, Skeleton, SubjectHeader};
use crate::config::constants::{contact, spatial};

/// Frames of root history packed per row
pub const ROOT_HISTORY_FRAMES: usize = 2;

/// Array ordinals mixed into generated values
pub mod array_ids {
    pub const POSES: usize = 0;
    pub const VELS: usize = 1;
    pub const ACCS: usize = 2;
    pub const JOINT_CENTERS: usize = 3;
    pub const ROOT_SPATIAL_VEL: usize = 4;
    pub const ROOT_SPATIAL_ACC: usize = 5;
    pub const ROOT_POS_HISTORY: usize = 6;
    pub const ROOT_EULER_HISTORY: usize = 7;
    pub const TAUS: usize = 8;
    pub const GROUND_WRENCHES: usize = 9;
    pub const COP_TORQUE_FORCE: usize = 10;
    pub const COM_ACCS: usize = 11;
    pub const RESIDUAL_WRENCH: usize = 12;
}

/// Value stored at `(frame, column)` of array `array_id` in pass `pass`.
///
/// Kept exactly representable in `f32` for any realistic frame count.
pub fn signal_value(array_id: usize, pass: usize, frame: usize, column: usize) -> f64 {
    (array_id * 100_000 + pass * 10_000 + frame) as f64 + column as f64 * 0.125
}

#[derive(Debug, Clone)]
struct SyntheticTrial {
    length: usize,
    missing_frames: Vec<usize>,
}

/// Builder for a synthetic [`SubjectData`]
#[derive(Debug, Clone)]
pub struct SyntheticSubject {
    mass_kg: f64,
    num_dofs: usize,
    num_joints: usize,
    contact_bodies: Vec<String>,
    trials: Vec<SyntheticTrial>,
    num_passes: usize,
    constant_force: Option<f64>,
    with_skeleton: bool,
}

impl SyntheticSubject {
    pub fn new(mass_kg: f64, contact_bodies: &[&str]) -> Self {
        Self {
            mass_kg,
            num_dofs: 6,
            num_joints: 3,
            contact_bodies: contact_bodies.iter().map(|s| s.to_string()).collect(),
            trials: Vec::new(),
            num_passes: 2,
            constant_force: None,
            with_skeleton: true,
        }
    }

    pub fn with_dofs(mut self, num_dofs: usize) -> Self {
        self.num_dofs = num_dofs;
        self
    }

    pub fn with_joints(mut self, num_joints: usize) -> Self {
        self.num_joints = num_joints;
        self
    }

    /// Add a trial; `missing_frames` are flagged as off the force plate
    pub fn with_trial(mut self, length: usize, missing_frames: &[usize]) -> Self {
        self.trials.push(SyntheticTrial {
            length,
            missing_frames: missing_frames.to_vec(),
        });
        self
    }

    pub fn with_passes(mut self, num_passes: usize) -> Self {
        self.num_passes = num_passes;
        self
    }

    /// Replace every contact force component with `newtons`
    pub fn with_constant_force(mut self, newtons: f64) -> Self {
        self.constant_force = Some(newtons);
        self
    }

    pub fn without_skeleton(mut self) -> Self {
        self.with_skeleton = false;
        self
    }

    pub fn build(&self) -> SubjectData {
        let trials = self.trials.iter().map(|trial| self.build_trial(trial)).collect();

        SubjectData {
            header: SubjectHeader {
                mass_kg: self.mass_kg,
                num_dofs: self.num_dofs,
                num_joints: self.num_joints,
                ground_force_bodies: self.contact_bodies.clone(),
                num_trials: self.trials.len(),
                num_processing_passes: self.num_passes,
            },
            trials,
            skeleton: self.with_skeleton.then(|| self.build_skeleton()),
        }
    }

    fn build_trial(&self, trial: &SyntheticTrial) -> TrialData {
        let missing_grf = (0..trial.length)
            .map(|frame| {
                if trial.missing_frames.contains(&frame) {
                    MissingGrfReason::NotOverForcePlate
                } else {
                    MissingGrfReason::NotMissingGrf
                }
            })
            .collect();

        TrialData {
            length: trial.length,
            missing_grf,
            passes: (0..self.num_passes).map(|pass| self.build_pass(pass, trial.length)).collect(),
        }
    }

    fn build_pass(&self, pass: usize, frames: usize) -> ProcessingPass {
        use array_ids::*;

        let generate = |array_id: usize, width: usize| {
            Array2::from_shape_fn((frames, width), |(frame, column)| {
                signal_value(array_id, pass, frame, column)
            })
        };
        let num_bodies = self.contact_bodies.len();

        let mut packed = generate(COP_TORQUE_FORCE, contact::COP_TORQUE_FORCE_WIDTH * num_bodies);
        if let Some(newtons) = self.constant_force {
            for body in 0..num_bodies {
                let start = body * contact::COP_TORQUE_FORCE_WIDTH + contact::FORCE_OFFSET;
                for column in start..start + contact::VEC3_WIDTH {
                    packed.column_mut(column).fill(newtons);
                }
            }
        }

        ProcessingPass {
            poses: generate(POSES, self.num_dofs),
            vels: generate(VELS, self.num_dofs),
            accs: generate(ACCS, self.num_dofs),
            joint_centers_in_root_frame: generate(JOINT_CENTERS, contact::VEC3_WIDTH * self.num_joints),
            root_spatial_vel_in_root_frame: generate(ROOT_SPATIAL_VEL, spatial::SPATIAL_WIDTH),
            root_spatial_acc_in_root_frame: generate(ROOT_SPATIAL_ACC, spatial::SPATIAL_WIDTH),
            root_pos_history_in_root_frame: generate(ROOT_POS_HISTORY, contact::VEC3_WIDTH * ROOT_HISTORY_FRAMES),
            root_euler_history_in_root_frame: generate(ROOT_EULER_HISTORY, contact::VEC3_WIDTH * ROOT_HISTORY_FRAMES),
            taus: generate(TAUS, self.num_dofs),
            ground_body_wrenches_in_root_frame: generate(GROUND_WRENCHES, contact::WRENCH_WIDTH * num_bodies),
            ground_body_cop_torque_force_in_root_frame: packed,
            com_accs_in_root_frame: generate(COM_ACCS, contact::VEC3_WIDTH),
            residual_wrench_in_root_frame: generate(RESIDUAL_WRENCH, contact::WRENCH_WIDTH),
        }
    }

    // Pelvis root with every other contact body hanging off it
    fn build_skeleton(&self) -> Skeleton {
        let mut bodies = vec![BodyNode { name: "pelvis".to_string(), parent: None }];
        for name in &self.contact_bodies {
            if bodies.iter().all(|b| &b.name != name) {
                bodies.push(BodyNode { name: name.clone(), parent: Some(BodyHandle(0)) });
            }
        }
        Skeleton { bodies }
    }
}
