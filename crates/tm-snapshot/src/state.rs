//! Per-actor snapshot state.

use cgmath::InnerSpace;
use tm_core::{ActorType, Location, Rotation, Vector3d};

/// The kinematic state of one actor at the current tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KinematicState {
    pub location: Location,
    pub velocity: Vector3d,
    pub rotation: Rotation,
    /// `false` for hybrid-mode actors that are moved by teleportation
    /// instead of throttle/brake/steer.
    pub physics_enabled: bool,
}

impl KinematicState {
    /// Unit forward vector derived from the rotation.
    #[inline]
    pub fn forward_vector(&self) -> Vector3d {
        self.rotation.forward_vector()
    }

    /// Scalar speed, m/s.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    /// Signed speed along the forward vector, m/s.  Negative while
    /// reversing, which shrinks the detection boundary to its floor.
    #[inline]
    pub fn forward_speed(&self) -> f32 {
        self.velocity.dot(self.forward_vector())
    }
}

/// Static attributes of one actor — fixed for the actor's lifetime.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StaticAttributes {
    pub actor_type: ActorType,
    /// Half the footprint length, metres.
    pub half_length: f32,
    /// Half the footprint width, metres.
    pub half_width: f32,
    /// Posted speed limit at spawn, km/h.
    pub speed_limit: f32,
}

// ── Traffic lights ────────────────────────────────────────────────────────────

/// Signal colour visible to one vehicle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum LightState {
    Red,
    Yellow,
    Green,
    /// The light exists but is switched off.
    Off,
    /// No signal information (default state).
    #[default]
    Unknown,
}

/// What the traffic-light stage last reported for one vehicle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TrafficLightState {
    /// `true` while the vehicle is inside a signalized stop zone.
    pub at_traffic_light: bool,
    pub state: LightState,
}

impl TrafficLightState {
    /// `true` unless the signal is green — yellow, red, off, and unknown
    /// all hold the vehicle at a junction entrance.
    #[inline]
    pub fn stopped_by_light(&self) -> bool {
        self.state != LightState::Green
    }
}
