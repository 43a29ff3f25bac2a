// src/config/constants.rs
//! System-wide configuration constants

/// Recording discovery constants
pub mod recording {
    pub const RECORDING_EXTENSION: &str = "b3d";
    pub const JSON_RECORDING_EXTENSION: &str = "json";
}

/// Window extraction constants
pub mod windowing {
    pub const DEFAULT_WINDOW_SIZE: usize = 5;
    pub const MIN_WINDOW_SIZE: usize = 1;
    pub const MAX_WINDOW_SIZE: usize = 100_000;
}

/// Processing pass selection
pub mod passes {
    /// Kinematics pass; the final pass always supplies labels
    pub const DEFAULT_INPUT_PASS_INDEX: usize = 0;
}

/// Contact body layout constants
pub mod contact {
    /// Segments never treated as instrumented contact surfaces
    pub const DEFAULT_IGNORED_CONTACT_BODIES: &[&str] = &["pelvis"];

    pub const VEC3_WIDTH: usize = 3;
    pub const WRENCH_WIDTH: usize = 6;

    /// Packed per-body layout: CoP, torque, force
    pub const COP_TORQUE_FORCE_WIDTH: usize = 9;
    pub const COP_OFFSET: usize = 0;
    pub const TORQUE_OFFSET: usize = 3;
    pub const FORCE_OFFSET: usize = 6;
}

/// Spatial vector layout (angular first, linear last)
pub mod spatial {
    pub const SPATIAL_WIDTH: usize = 6;
    pub const ANGULAR_OFFSET: usize = 0;
    pub const LINEAR_OFFSET: usize = 3;
}

/// Reduced-size runs for quick checks
pub mod testing {
    pub const SHORT_DATASET_SUBJECT_LIMIT: usize = 2;
}

/// Configuration file paths
pub mod paths {
    pub const DEFAULT_CONFIG_FILE: &str = "biomech.toml";
    pub const LOCAL_CONFIG_FILE: &str = "biomech.local.toml";
    pub const DEFAULT_DATA_PATH: &str = "./data/train";
    pub const DEFAULT_GEOMETRY_FOLDER: &str = "./Geometry";
}

/// Environment override naming
pub mod env {
    /// `BIOMECH_DATASET__WINDOW_SIZE=10` sets `dataset.window_size`
    pub const ENV_PREFIX: &str = "BIOMECH_";
    pub const ENV_SECTION_SEPARATOR: &str = "__";
}
