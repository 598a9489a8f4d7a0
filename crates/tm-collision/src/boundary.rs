//! Actor footprints and extrapolated corridors.

use std::collections::HashMap;

use cgmath::InnerSpace;
use tm_core::constants::collision::{
    BOUNDARY_EXTENSION_MINIMUM, BOUNDARY_EXTENSION_RATE, COS_10_DEGREES, LOCKING_DISTANCE_PADDING,
    MAX_LOCKING_EXTENSION, WALKER_TIME_EXTENSION,
};
use tm_core::geom::{self, Location};
use tm_core::ActorId;
use tm_snapshot::{target_waypoint, KinematicState, SimpleWaypoint, StaticAttributes};

use crate::lock::LockView;

/// Per-tick memo of geodesic boundaries, keyed by actor id.
///
/// Constructed fresh for every ego evaluation; the same actor queried twice
/// within one evaluation gets the cached vertex list verbatim.
pub type GeodesicBoundaryCache = HashMap<ActorId, Vec<Location>>;

/// Speed-dependent forward extension of a vehicle's detection boundary.
///
/// Grows linearly with signed forward speed, floored at
/// `BOUNDARY_EXTENSION_MINIMUM`.  While a collision lock is held, the
/// extension instead tracks the lead-vehicle gap (plus padding) so the lead
/// is not lost as the gap closes — bounded above so a lock can never
/// stretch the boundary more than `MAX_LOCKING_EXTENSION` beyond the gap it
/// was acquired at.
pub fn bounding_box_extension(
    actor: ActorId,
    kinematics: &KinematicState,
    locks: &LockView<'_>,
) -> f32 {
    let forward_speed = kinematics.forward_speed();
    let mut extension = BOUNDARY_EXTENSION_RATE * forward_speed + BOUNDARY_EXTENSION_MINIMUM;

    if let Some(lock) = locks.get(actor) {
        let lock_extension =
            (lock.distance_to_lead_vehicle + f64::from(LOCKING_DISTANCE_PADDING)) as f32;
        if lock_extension - (lock.initial_lock_distance as f32) < MAX_LOCKING_EXTENSION {
            extension = lock_extension;
        }
    }

    extension
}

/// The four corners of an actor's oriented footprint, clockwise in the
/// left-handed top view: `(+h,-p), (-h,-p), (-h,+p), (+h,+p)`.
///
/// Pedestrian footprints are grown on both axes by `speed ·
/// WALKER_TIME_EXTENSION` to cover where the walker is about to be.
pub fn actor_boundary(kinematics: &KinematicState, attributes: &StaticAttributes) -> Vec<Location> {
    let heading = kinematics.forward_vector();

    let mut forward_extension = 0.0;
    if attributes.actor_type.is_pedestrian() {
        forward_extension = kinematics.speed() * WALKER_TIME_EXTENSION;
    }

    let x_boundary = heading * (attributes.half_length + forward_extension);
    let perpendicular = geom::left_perpendicular(heading);
    let y_boundary = perpendicular * (attributes.half_width + forward_extension);

    let location = kinematics.location;
    vec![
        location + (x_boundary - y_boundary),
        location + (-x_boundary - y_boundary),
        location + (-x_boundary + y_boundary),
        location + (x_boundary + y_boundary),
    ]
}

/// The polygon tracing the corridor a vehicle is about to occupy along its
/// waypoint buffer, assembled clockwise as
/// `reverse(right samples) ++ footprint corners ++ left samples`.
///
/// Non-vehicles (and vehicles with an empty buffer) fall back to the plain
/// footprint.  Results are memoized in `cache` for the current tick.
pub fn geodesic_boundary(
    actor: ActorId,
    cache: &mut GeodesicBoundaryCache,
    kinematics: &KinematicState,
    attributes: &StaticAttributes,
    buffer: &[SimpleWaypoint],
    specific_lead_distance: f32,
    locks: &LockView<'_>,
) -> Vec<Location> {
    if let Some(cached) = cache.get(&actor) {
        return cached.clone();
    }

    let bbox = actor_boundary(kinematics, attributes);
    let boundary = if attributes.actor_type.is_vehicle() {
        match vehicle_corridor(actor, kinematics, attributes, buffer, specific_lead_distance, locks)
        {
            Some((right, left)) => {
                let mut boundary = right;
                boundary.reverse();
                boundary.extend(bbox);
                boundary.extend(left);
                boundary
            }
            None => bbox,
        }
    } else {
        bbox
    };

    cache.insert(actor, boundary.clone());
    boundary
}

/// Walk the buffer and sample the corridor's (right, left) edges.
///
/// Samples are emitted at the walk start, wherever the path heading has
/// turned by more than 10°, and at the end of the extension distance.
/// Returns `None` for an empty buffer.
fn vehicle_corridor(
    actor: ActorId,
    kinematics: &KinematicState,
    attributes: &StaticAttributes,
    buffer: &[SimpleWaypoint],
    specific_lead_distance: f32,
    locks: &LockView<'_>,
) -> Option<(Vec<Location>, Vec<Location>)> {
    let (start_index, boundary_start) = target_waypoint(buffer, attributes.half_length)?;

    let extension = bounding_box_extension(actor, kinematics, locks).max(specific_lead_distance);
    let extension_squared = extension * extension;
    let width = attributes.half_width;

    let mut left_boundary = Vec::new();
    let mut right_boundary = Vec::new();

    let mut boundary_end: Option<&SimpleWaypoint> = None;
    let mut current = &buffer[start_index];
    let mut reached_distance = false;
    let mut j = start_index;
    while !reached_distance && j < buffer.len() {
        if boundary_start.distance_squared(current) > extension_squared || j == buffer.len() - 1 {
            reached_distance = true;
        }

        let emit = match boundary_end {
            None => true,
            Some(end) => {
                end.forward_vector().dot(current.forward_vector()) < COS_10_DEGREES
                    || reached_distance
            }
        };
        if emit {
            let scaled_perpendicular = geom::left_perpendicular(current.forward_vector()) * width;
            left_boundary.push(current.location + scaled_perpendicular);
            right_boundary.push(current.location - scaled_perpendicular);
            boundary_end = Some(current);
        }

        // The predicate above runs one waypoint behind this read: the last
        // buffer element is read into `current` but never tested or emitted.
        current = &buffer[j];
        j += 1;
    }

    Some((right_boundary, left_boundary))
}
