// src/dataset/keys.rs
//! Field names of materialized windows

use ndarray::Array2;
use std::collections::BTreeMap;

/// Named, frame-major `f32` arrays of one window
pub type FieldMap = BTreeMap<&'static str, Array2<f32>>;

/// Model input fields, taken from the configured input pass
pub mod input_keys {
    pub const POS: &str = "pos";
    pub const VEL: &str = "vel";
    pub const ACC: &str = "acc";
    pub const JOINT_CENTERS_IN_ROOT_FRAME: &str = "jointCentersInRootFrame";
    pub const ROOT_LINEAR_VEL_IN_ROOT_FRAME: &str = "rootLinearVelInRootFrame";
    pub const ROOT_ANGULAR_VEL_IN_ROOT_FRAME: &str = "rootAngularVelInRootFrame";
    pub const ROOT_LINEAR_ACC_IN_ROOT_FRAME: &str = "rootLinearAccInRootFrame";
    pub const ROOT_ANGULAR_ACC_IN_ROOT_FRAME: &str = "rootAngularAccInRootFrame";
    pub const ROOT_POS_HISTORY_IN_ROOT_FRAME: &str = "rootPosHistoryInRootFrame";
    pub const ROOT_EULER_HISTORY_IN_ROOT_FRAME: &str = "rootEulerHistoryInRootFrame";

    pub const ALL: [&str; 10] = [
        POS,
        VEL,
        ACC,
        JOINT_CENTERS_IN_ROOT_FRAME,
        ROOT_LINEAR_VEL_IN_ROOT_FRAME,
        ROOT_ANGULAR_VEL_IN_ROOT_FRAME,
        ROOT_LINEAR_ACC_IN_ROOT_FRAME,
        ROOT_ANGULAR_ACC_IN_ROOT_FRAME,
        ROOT_POS_HISTORY_IN_ROOT_FRAME,
        ROOT_EULER_HISTORY_IN_ROOT_FRAME,
    ];
}

/// Label fields, always taken from the final processing pass
pub mod output_keys {
    pub const TAU: &str = "tau";
    /// Divided by subject mass
    pub const GROUND_CONTACT_WRENCHES_IN_ROOT_FRAME: &str = "groundContactWrenchesInRootFrame";
    pub const RESIDUAL_WRENCH_IN_ROOT_FRAME: &str = "residualWrenchInRootFrame";
    pub const COM_ACC_IN_ROOT_FRAME: &str = "comAccInRootFrame";
    /// Registry layout, not mass-scaled
    pub const GROUND_CONTACT_COPS_IN_ROOT_FRAME: &str = "groundContactCenterOfPressureInRootFrame";
    /// Registry layout, divided by subject mass
    pub const GROUND_CONTACT_TORQUES_IN_ROOT_FRAME: &str = "groundContactTorqueInRootFrame";
    /// Registry layout, divided by subject mass
    pub const GROUND_CONTACT_FORCES_IN_ROOT_FRAME: &str = "groundContactForceInRootFrame";

    pub const ALL: [&str; 7] = [
        TAU,
        GROUND_CONTACT_WRENCHES_IN_ROOT_FRAME,
        RESIDUAL_WRENCH_IN_ROOT_FRAME,
        COM_ACC_IN_ROOT_FRAME,
        GROUND_CONTACT_COPS_IN_ROOT_FRAME,
        GROUND_CONTACT_TORQUES_IN_ROOT_FRAME,
        GROUND_CONTACT_FORCES_IN_ROOT_FRAME,
    ];
}
