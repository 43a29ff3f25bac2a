// src/source/types.rs
//! Core types exchanged with a recording source

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Subject metadata readable without loading frame data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectHeader {
    pub mass_kg: f64,
    pub num_dofs: usize,
    pub num_joints: usize,
    /// Contact bodies in the order the recording packs them
    pub ground_force_bodies: Vec<String>,
    pub num_trials: usize,
    pub num_processing_passes: usize,
}

/// Why a frame's ground-reaction force is not trustworthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingGrfReason {
    NotMissingGrf,
    MeasuredGrfZeroWhenAccelerationNonZero,
    UnmeasuredExternalForceDetected,
    TorqueDiscrepancy,
    ForceDiscrepancy,
    NotOverForcePlate,
    MissingImpact,
    MissingBlip,
    ShiftGrf,
    ManualReview,
    InterpolatedClippedGrf,
}

impl MissingGrfReason {
    /// Whether the frame must be excluded from training labels
    pub fn is_missing(self) -> bool {
        self != MissingGrfReason::NotMissingGrf
    }
}

/// Frame-major arrays of one processing pass (rows are frames)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingPass {
    pub poses: Array2<f64>,
    pub vels: Array2<f64>,
    pub accs: Array2<f64>,
    pub joint_centers_in_root_frame: Array2<f64>,
    /// Angular (first 3 columns) then linear (last 3 columns)
    pub root_spatial_vel_in_root_frame: Array2<f64>,
    /// Angular (first 3 columns) then linear (last 3 columns)
    pub root_spatial_acc_in_root_frame: Array2<f64>,
    pub root_pos_history_in_root_frame: Array2<f64>,
    pub root_euler_history_in_root_frame: Array2<f64>,
    pub taus: Array2<f64>,
    /// Six columns per raw contact body
    pub ground_body_wrenches_in_root_frame: Array2<f64>,
    /// Nine columns per raw contact body: CoP, torque, force
    pub ground_body_cop_torque_force_in_root_frame: Array2<f64>,
    pub com_accs_in_root_frame: Array2<f64>,
    pub residual_wrench_in_root_frame: Array2<f64>,
}

impl ProcessingPass {
    /// Arrays read from the kinematics (input) pass
    pub fn input_arrays(&self) -> [(&'static str, &Array2<f64>); 8] {
        [
            ("poses", &self.poses),
            ("vels", &self.vels),
            ("accs", &self.accs),
            ("joint_centers_in_root_frame", &self.joint_centers_in_root_frame),
            ("root_spatial_vel_in_root_frame", &self.root_spatial_vel_in_root_frame),
            ("root_spatial_acc_in_root_frame", &self.root_spatial_acc_in_root_frame),
            ("root_pos_history_in_root_frame", &self.root_pos_history_in_root_frame),
            ("root_euler_history_in_root_frame", &self.root_euler_history_in_root_frame),
        ]
    }

    /// Arrays read from the final (label) pass
    pub fn output_arrays(&self) -> [(&'static str, &Array2<f64>); 5] {
        [
            ("taus", &self.taus),
            ("ground_body_wrenches_in_root_frame", &self.ground_body_wrenches_in_root_frame),
            ("ground_body_cop_torque_force_in_root_frame", &self.ground_body_cop_torque_force_in_root_frame),
            ("com_accs_in_root_frame", &self.com_accs_in_root_frame),
            ("residual_wrench_in_root_frame", &self.residual_wrench_in_root_frame),
        ]
    }
}

/// Index of a body inside its skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub usize);

/// One rigid body of an articulated skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyNode {
    pub name: String,
    pub parent: Option<BodyHandle>,
}

/// Articulated-body structure of one subject
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Skeleton {
    pub bodies: Vec<BodyNode>,
}

impl Skeleton {
    /// Look up a body by name
    pub fn body_node(&self, name: &str) -> Option<BodyHandle> {
        self.bodies.iter().position(|b| b.name == name).map(BodyHandle)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&BodyNode> {
        self.bodies.get(handle.0)
    }

    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }
}
