// src/dataset/alignment.rs
//! Per-window field assembly
//!
//! Slices one window out of a trial's processing passes, splits root spatial
//! vectors, divides force-like labels by subject mass and re-lays the packed
//! per-body contact arrays out in registry order.

use ndarray::{s, Array2, ArrayView2};

use super::keys::{input_keys, output_keys, FieldMap};
use super::registry::ContactBodyRegistry;
use crate::config::constants::{contact, spatial};
use crate::source::ProcessingPass;

/// Mapping from registry slots to one subject's raw contact body positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLayout {
    slots: Vec<Option<usize>>,
}

impl ContactLayout {
    pub fn new<S: AsRef<str>>(registry: &ContactBodyRegistry, raw_bodies: &[S]) -> Self {
        Self {
            slots: registry.raw_slots(raw_bodies),
        }
    }

    pub fn slots(&self) -> &[Option<usize>] {
        &self.slots
    }

    /// Harmonized column count
    pub fn width(&self) -> usize {
        contact::VEC3_WIDTH * self.slots.len()
    }

    /// Registry slots this subject has no data for
    pub fn absent_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().enumerate().filter(|(_, s)| s.is_none()).map(|(i, _)| i)
    }
}

fn window_rows(array: &Array2<f64>, start: usize, end: usize) -> ArrayView2<'_, f64> {
    array.slice(s![start..end, ..])
}

fn to_f32(view: ArrayView2<f64>) -> Array2<f32> {
    view.mapv(|v| v as f32)
}

fn per_mass(view: ArrayView2<f64>, mass_kg: f64) -> Array2<f32> {
    view.mapv(|v| (v / mass_kg) as f32)
}

/// Input fields for frames `[start, end)` of `pass`
pub fn assemble_inputs(pass: &ProcessingPass, start: usize, end: usize) -> FieldMap {
    let rows = |a: &Array2<f64>| to_f32(window_rows(a, start, end));
    let angular = s![start..end, spatial::ANGULAR_OFFSET..spatial::ANGULAR_OFFSET + contact::VEC3_WIDTH];
    let linear = s![start..end, spatial::LINEAR_OFFSET..spatial::LINEAR_OFFSET + contact::VEC3_WIDTH];

    let mut inputs = FieldMap::new();
    inputs.insert(input_keys::POS, rows(&pass.poses));
    inputs.insert(input_keys::VEL, rows(&pass.vels));
    inputs.insert(input_keys::ACC, rows(&pass.accs));
    inputs.insert(input_keys::JOINT_CENTERS_IN_ROOT_FRAME, rows(&pass.joint_centers_in_root_frame));
    inputs.insert(
        input_keys::ROOT_LINEAR_VEL_IN_ROOT_FRAME,
        to_f32(pass.root_spatial_vel_in_root_frame.slice(linear)),
    );
    inputs.insert(
        input_keys::ROOT_ANGULAR_VEL_IN_ROOT_FRAME,
        to_f32(pass.root_spatial_vel_in_root_frame.slice(angular)),
    );
    inputs.insert(
        input_keys::ROOT_LINEAR_ACC_IN_ROOT_FRAME,
        to_f32(pass.root_spatial_acc_in_root_frame.slice(linear)),
    );
    inputs.insert(
        input_keys::ROOT_ANGULAR_ACC_IN_ROOT_FRAME,
        to_f32(pass.root_spatial_acc_in_root_frame.slice(angular)),
    );
    inputs.insert(input_keys::ROOT_POS_HISTORY_IN_ROOT_FRAME, rows(&pass.root_pos_history_in_root_frame));
    inputs.insert(input_keys::ROOT_EULER_HISTORY_IN_ROOT_FRAME, rows(&pass.root_euler_history_in_root_frame));
    inputs
}

/// Label fields for frames `[start, end)` of `pass`
///
/// `mass_kg` must already be validated as finite and positive.
pub fn assemble_outputs(
    pass: &ProcessingPass,
    start: usize,
    end: usize,
    mass_kg: f64,
    layout: &ContactLayout,
) -> FieldMap {
    let frames = end - start;
    let mut cops = Array2::<f32>::zeros((frames, layout.width()));
    let mut torques = Array2::<f32>::zeros((frames, layout.width()));
    let mut forces = Array2::<f32>::zeros((frames, layout.width()));

    let packed = window_rows(&pass.ground_body_cop_torque_force_in_root_frame, start, end);
    for (slot, raw) in layout.slots().iter().enumerate() {
        let Some(raw) = *raw else { continue };
        let base = raw * contact::COP_TORQUE_FORCE_WIDTH;
        let dst = s![.., slot * contact::VEC3_WIDTH..(slot + 1) * contact::VEC3_WIDTH];
        let block = |offset: usize| s![.., base + offset..base + offset + contact::VEC3_WIDTH];

        cops.slice_mut(dst).assign(&to_f32(packed.slice(block(contact::COP_OFFSET))));
        torques.slice_mut(dst).assign(&per_mass(packed.slice(block(contact::TORQUE_OFFSET)), mass_kg));
        forces.slice_mut(dst).assign(&per_mass(packed.slice(block(contact::FORCE_OFFSET)), mass_kg));
    }

    let mut outputs = FieldMap::new();
    outputs.insert(output_keys::TAU, to_f32(window_rows(&pass.taus, start, end)));
    outputs.insert(
        output_keys::GROUND_CONTACT_WRENCHES_IN_ROOT_FRAME,
        per_mass(window_rows(&pass.ground_body_wrenches_in_root_frame, start, end), mass_kg),
    );
    outputs.insert(output_keys::RESIDUAL_WRENCH_IN_ROOT_FRAME, to_f32(window_rows(&pass.residual_wrench_in_root_frame, start, end)));
    outputs.insert(output_keys::COM_ACC_IN_ROOT_FRAME, to_f32(window_rows(&pass.com_accs_in_root_frame, start, end)));
    outputs.insert(output_keys::GROUND_CONTACT_COPS_IN_ROOT_FRAME, cops);
    outputs.insert(output_keys::GROUND_CONTACT_TORQUES_IN_ROOT_FRAME, torques);
    outputs.insert(output_keys::GROUND_CONTACT_FORCES_IN_ROOT_FRAME, forces);
    outputs
}
