//! Actuation commands dispatched back to the simulator.

use tm_core::{ActorId, Transform};

/// Throttle/brake/steer triple for a physics-enabled vehicle.
///
/// Throttle and brake are in `[0, 1]`, steer in `[-1, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct VehicleControl {
    pub throttle: f32,
    pub brake: f32,
    pub steer: f32,
}

/// One per-vehicle actuation decision for the current tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    /// Drive a physics-enabled vehicle through its controls.
    ApplyVehicleControl {
        actor: ActorId,
        control: VehicleControl,
    },
    /// Move a physics-less vehicle to a new pose.
    ApplyTransform {
        actor: ActorId,
        transform: Transform,
    },
}

impl Command {
    /// The vehicle this command addresses.
    pub fn actor(&self) -> ActorId {
        match *self {
            Command::ApplyVehicleControl { actor, .. } => actor,
            Command::ApplyTransform { actor, .. } => actor,
        }
    }
}
