//! Upcoming-waypoint buffers and the helpers the stages use to read them.
//!
//! Localization maintains one buffer per managed vehicle: an ordered
//! sequence of upcoming waypoints starting just ahead of the vehicle.  The
//! decision core only ever reads buffers; popping passed waypoints and
//! extending the horizon are the localization stage's job.

use tm_core::geom::{self, Location, Rotation, Transform, Vector3d};

/// One point of a vehicle's planned path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimpleWaypoint {
    pub location: Location,
    pub rotation: Rotation,
    /// `true` for waypoints inside a junction.
    pub is_junction: bool,
}

impl SimpleWaypoint {
    #[inline]
    pub fn new(location: Location, rotation: Rotation, is_junction: bool) -> Self {
        Self { location, rotation, is_junction }
    }

    #[inline]
    pub fn forward_vector(&self) -> Vector3d {
        self.rotation.forward_vector()
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        Transform::new(self.location, self.rotation)
    }

    #[inline]
    pub fn distance_squared(&self, other: &SimpleWaypoint) -> f32 {
        geom::distance_squared(self.location, other.location)
    }

    #[inline]
    pub fn distance(&self, other: &SimpleWaypoint) -> f32 {
        geom::distance(self.location, other.location)
    }
}

/// A vehicle's upcoming path, front first.
pub type WaypointBuffer = Vec<SimpleWaypoint>;

/// The first waypoint whose cumulative along-buffer distance from the front
/// meets or exceeds `distance`, or the last waypoint otherwise.
///
/// Returns `None` only for an empty buffer.
pub fn target_waypoint(buffer: &[SimpleWaypoint], distance: f32) -> Option<(usize, &SimpleWaypoint)> {
    let mut covered = 0.0_f32;
    let mut index = 0;
    for (i, waypoint) in buffer.iter().enumerate() {
        if i > 0 {
            covered += waypoint.distance(&buffer[i - 1]);
        }
        index = i;
        if covered >= distance {
            break;
        }
    }
    buffer.get(index).map(|waypoint| (index, waypoint))
}

/// Alignment of `heading` with the direction from `location` to `target`,
/// both flattened to the horizontal plane and unit-normalized.
///
/// 1 means dead ahead, -1 dead behind, 0 perpendicular (or a degenerate
/// direction).
pub fn deviation_dot_product(location: Location, heading: Vector3d, target: Location) -> f32 {
    let to_target = geom::unit_or_zero(geom::flatten(target - location));
    let heading = geom::unit_or_zero(geom::flatten(heading));
    heading.x * to_target.x + heading.y * to_target.y
}

/// z-component of `heading × (target - location)` on unit horizontal-plane
/// vectors — negative when the target lies to one side, positive the other.
pub fn deviation_cross_product(location: Location, heading: Vector3d, target: Location) -> f32 {
    let to_target = geom::unit_or_zero(geom::flatten(target - location));
    let heading = geom::unit_or_zero(geom::flatten(heading));
    heading.x * to_target.y - heading.y * to_target.x
}
