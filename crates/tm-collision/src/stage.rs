//! Per-index driver of the collision-avoidance stage.

use tracing::debug;

use tm_core::constants::collision::{MAX_COLLISION_RADIUS, VERTICAL_OVERLAP_THRESHOLD};
use tm_core::constants::waypoint_selection::JUNCTION_LOOK_AHEAD;
use tm_core::{geom, ActorId, ActorRng, ActorType};
use tm_snapshot::{target_waypoint, WorldSnapshot};

use crate::geometry::{ActorView, ScratchCaches};
use crate::lock::{CollisionLockTable, LockUpdate, LockView};
use crate::negotiation::negotiate_collision;

/// Collision verdict for one vehicle index.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionHazardData {
    pub hazard: bool,
    /// The obstacle that caused the hazard, `ActorId::NONE` otherwise.
    pub hazard_actor_id: ActorId,
    /// Clear distance still available to the ego, metres.
    pub available_distance_margin: f32,
}

impl Default for CollisionHazardData {
    fn default() -> Self {
        Self {
            hazard: false,
            hazard_actor_id: ActorId::NONE,
            available_distance_margin: f32::INFINITY,
        }
    }
}

/// Everything one ego evaluation produced: the verdict for the output frame
/// and the update for the ego's lock row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionStageOutput {
    pub hazard: CollisionHazardData,
    pub lock_update: LockUpdate,
}

impl Default for CollisionStageOutput {
    fn default() -> Self {
        Self {
            hazard: CollisionHazardData::default(),
            lock_update: LockUpdate::Leave,
        }
    }
}

/// Evaluate collision avoidance for the vehicle at `index`.
///
/// Candidates come from the corridor-overlap relation, filtered to a
/// `MAX_COLLISION_RADIUS` disc and `VERTICAL_OVERLAP_THRESHOLD` height
/// band, and are negotiated in ascending distance order until the first
/// confirmed hazard.  A hazard is confirmed only when the ego's
/// ignore-percentage roll allows it.
pub fn collision_avoidance(
    index: usize,
    vehicle_ids: &[ActorId],
    snapshot: &WorldSnapshot,
    locks: &CollisionLockTable,
    rng: &mut ActorRng,
) -> CollisionStageOutput {
    let mut output = CollisionStageOutput::default();

    let Some(&ego_id) = vehicle_ids.get(index) else {
        return output;
    };
    let (Some(ego_kinematics), Some(ego_attributes)) = (
        snapshot.kinematics.get(&ego_id),
        snapshot.attributes.get(&ego_id),
    ) else {
        return output;
    };

    let ego_location = ego_kinematics.location;
    let ego_buffer = snapshot.usable_buffer(ego_id);
    let look_ahead_index = ego_buffer
        .and_then(|buffer| target_waypoint(buffer, JUNCTION_LOOK_AHEAD))
        .map_or(0, |(i, _)| i);

    // Filter overlapping actors down to plausible candidates.
    let radius_squared = MAX_COLLISION_RADIUS * MAX_COLLISION_RADIUS;
    let mut candidates: Vec<(f32, ActorId)> = snapshot
        .track_traffic
        .overlapping_vehicles(ego_id)
        .filter(|&other| other != ego_id)
        .filter_map(|other| {
            let other_location = snapshot.location_of(other)?;
            let separation = geom::distance_squared(ego_location, other_location);
            let in_range = separation < radius_squared
                && (ego_location.z - other_location.z).abs() < VERTICAL_OVERLAP_THRESHOLD;
            in_range.then_some((separation, other))
        })
        .collect();

    // Nearest first; ties broken by id so results do not depend on the
    // overlap set's iteration order.
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let reference_lead_distance = snapshot.parameters.distance_to_leading_vehicle(ego_id);
    let mut caches = ScratchCaches::default();
    let mut lock_view = LockView::new(locks, ego_id);

    for (_, other_id) in candidates {
        let Some(other_kinematics) = snapshot.kinematics.get(&other_id) else {
            continue;
        };
        let Some(other_attributes) = snapshot.attributes.get(&other_id) else {
            continue;
        };
        if !snapshot.parameters.collision_detection(ego_id, other_id) {
            continue;
        }
        let Some(ego_tl) = snapshot.traffic_lights.get(&ego_id) else {
            continue;
        };
        let (Some(ego_buf), Some(other_buf)) = (ego_buffer, snapshot.usable_buffer(other_id))
        else {
            continue;
        };

        let reference = ActorView {
            id: ego_id,
            kinematics: ego_kinematics,
            attributes: ego_attributes,
            buffer: ego_buf,
            lead_distance: reference_lead_distance,
        };
        let other = ActorView {
            id: other_id,
            kinematics: other_kinematics,
            attributes: other_attributes,
            buffer: other_buf,
            lead_distance: snapshot.parameters.distance_to_leading_vehicle(other_id),
        };

        let negotiation = negotiate_collision(
            &reference,
            &other,
            ego_tl,
            look_ahead_index,
            &mut caches,
            &mut lock_view,
        );

        if negotiation.hazard {
            let sample = rng.sample_percentage() as f32;
            let confirmed = match other_attributes.actor_type {
                ActorType::Vehicle => {
                    snapshot.parameters.percentage_ignore_vehicles(ego_id) <= sample
                }
                ActorType::Pedestrian => {
                    snapshot.parameters.percentage_ignore_walkers(ego_id) <= sample
                }
                ActorType::Other => false,
            };
            if confirmed {
                debug!(
                    ego = %ego_id,
                    obstacle = %other_id,
                    kind = other_attributes.actor_type.as_str(),
                    margin = negotiation.available_distance_margin,
                    "collision hazard",
                );
                output.hazard = CollisionHazardData {
                    hazard: true,
                    hazard_actor_id: other_id,
                    available_distance_margin: negotiation.available_distance_margin,
                };
                break;
            }
        }
    }

    output.lock_update = lock_view.into_update();
    output
}
