//! Pairwise collision negotiation and the lock state machine.

use cgmath::InnerSpace;
use tracing::trace;

use tm_core::constants::collision::{
    BOUNDARY_EXTENSION_MINIMUM, OVERLAP_THRESHOLD, SQUARE_ROOT_OF_TWO,
};
use tm_core::geom;
use tm_snapshot::TrafficLightState;

use crate::boundary::bounding_box_extension;
use crate::geometry::{geometry_between_actors, ActorView, ScratchCaches};
use crate::lock::{CollisionLock, LockView};

/// Verdict for one ego/candidate pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NegotiationResult {
    /// `true` when the ego must stop and wait for the other actor to pass.
    pub hazard: bool,
    /// Clear distance still available to the ego, metres.
    pub available_distance_margin: f32,
}

/// Decide whether `reference` must yield to `other`, updating the
/// reference's lock row through `locks`.
///
/// `junction_look_ahead_index` is the reference buffer index a few metres
/// ahead, used to detect imminent junction entry.
pub fn negotiate_collision(
    reference: &ActorView<'_>,
    other: &ActorView<'_>,
    reference_tl: &TrafficLightState,
    junction_look_ahead_index: usize,
    caches: &mut ScratchCaches,
    locks: &mut LockView<'_>,
) -> NegotiationResult {
    let mut hazard = false;
    let mut available_distance_margin = f32::INFINITY;

    let reference_location = reference.kinematics.location;
    let other_location = other.kinematics.location;

    let reference_heading = reference.kinematics.forward_vector();
    let reference_to_other = geom::unit_or_zero(other_location - reference_location);

    // Both angular-priority headings derive from the reference state.
    let other_heading = reference.kinematics.forward_vector();
    let other_to_reference = geom::unit_or_zero(reference_location - other_location);

    let reference_length = reference.attributes.half_length * SQUARE_ROOT_OF_TWO;
    let other_length = other.attributes.half_length * SQUARE_ROOT_OF_TWO;

    let inter_vehicle_distance = geom::distance_squared(reference_location, other_location);
    let ego_extension = bounding_box_extension(reference.id, reference.kinematics, locks);
    let other_extension = bounding_box_extension(other.id, other.kinematics, locks);

    // Minimum separations below which negotiation is worth the geometry.
    let inter_vehicle_length = reference_length + other_length;
    let ego_detection_range = (ego_extension + inter_vehicle_length).powi(2);
    let cross_detection_range =
        (ego_extension + inter_vehicle_length + other_extension).powi(2);

    let other_in_ego_range = inter_vehicle_distance < ego_detection_range;
    let other_in_cross_range = inter_vehicle_distance < cross_detection_range;
    let other_in_front = reference_heading.dot(reference_to_other) > 0.0;

    let ego_inside_junction = reference.buffer.first().is_some_and(|wp| wp.is_junction);
    let look_ahead_junction = reference
        .buffer
        .get(junction_look_ahead_index)
        .is_some_and(|wp| wp.is_junction);
    let ego_at_junction_entrance = !ego_inside_junction && look_ahead_junction;
    let ego_at_traffic_light = reference_tl.at_traffic_light;
    let ego_stopped_by_light = reference_tl.stopped_by_light();

    // A vehicle held at a signalized junction entrance is already stopping;
    // everyone else negotiates only inside the relevant detection range.
    let engaged = !(ego_at_junction_entrance && ego_at_traffic_light && ego_stopped_by_light)
        && ((ego_inside_junction && other_in_cross_range)
            || (!ego_inside_junction && other_in_front && other_in_ego_range));

    if engaged {
        let geometry = geometry_between_actors(caches, reference, other, locks);

        let geodesic_path_touching = geometry.inter_geodesic_distance < OVERLAP_THRESHOLD;
        let bbox_touching = geometry.inter_bbox_distance < OVERLAP_THRESHOLD;
        let ego_path_clear = geometry.other_to_reference_geodesic > OVERLAP_THRESHOLD;
        let other_path_clear = geometry.reference_to_other_geodesic > OVERLAP_THRESHOLD;
        // Whichever actor's path is farther from the other actor has
        // priority to move.
        let ego_path_priority =
            geometry.reference_to_other_geodesic < geometry.other_to_reference_geodesic;
        let ego_angular_priority = reference_heading.dot(reference_to_other)
            < other_heading.dot(other_to_reference);

        if geodesic_path_touching
            && ((!bbox_touching
                && (!ego_path_clear
                    || (ego_path_clear
                        && other_path_clear
                        && !ego_angular_priority
                        && !ego_path_priority)))
                || (bbox_touching && !ego_angular_priority && !ego_path_priority))
        {
            hazard = true;

            let specific_distance_margin =
                f64::from(reference.lead_distance.max(BOUNDARY_EXTENSION_MINIMUM));
            available_distance_margin = (geometry.reference_to_other_geodesic
                - specific_distance_margin)
                .max(0.0) as f32;

            match locks.get(reference.id).copied() {
                // Same lead still tracked: refresh the gap only.
                Some(mut lock) if lock.lead_vehicle_id == other.id => {
                    if geometry.other_to_reference_geodesic < OVERLAP_THRESHOLD {
                        // The lead's body already touches the reference
                        // corridor; track body-to-body distance.
                        lock.distance_to_lead_vehicle = geometry.inter_bbox_distance;
                    } else {
                        lock.distance_to_lead_vehicle = geometry.reference_to_other_geodesic;
                    }
                    locks.set_ego(lock);
                }
                // New lead (or no lock yet): initialize a fresh entry.
                _ => {
                    trace!(ego = %reference.id, lead = %other.id, "collision lock acquired");
                    locks.set_ego(CollisionLock {
                        lead_vehicle_id: other.id,
                        initial_lock_distance: geometry.inter_bbox_distance,
                        distance_to_lead_vehicle: geometry.inter_bbox_distance,
                    });
                }
            }
        }
    }

    // No hazard from this candidate: whatever lock the ego held is stale.
    if !hazard && locks.get(reference.id).is_some() {
        trace!(ego = %reference.id, "collision lock released");
        locks.clear_ego();
    }

    NegotiationResult { hazard, available_distance_margin }
}
