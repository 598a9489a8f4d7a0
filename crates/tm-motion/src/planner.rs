//! Per-index driver of the motion-planning stage.

use std::collections::HashMap;

use cgmath::InnerSpace;
use tracing::trace;

use tm_collision::CollisionHazardData;
use tm_core::constants::hybrid_mode::HYBRID_MODE_DT;
use tm_core::constants::motion_plan::{
    CRITICAL_BRAKING_MARGIN, EPSILON_RELATIVE_SPEED, FOLLOW_DISTANCE_RATE,
    MIN_FOLLOW_LEAD_DISTANCE, RELATIVE_APPROACH_SPEED,
};
use tm_core::constants::waypoint_selection::{
    TARGET_WAYPOINT_HORIZON_LENGTH, TARGET_WAYPOINT_TIME_HORIZON,
};
use tm_core::{geom, ActorId, TimeInstant, Transform};
use tm_snapshot::{
    deviation_cross_product, deviation_dot_product, target_waypoint, WorldSnapshot,
};

use crate::command::{Command, VehicleControl};
use crate::pid::{run_step, state_update, PidParameters, PidState};

/// PID controller memory, keyed by vehicle.
pub type PidStateTable = HashMap<ActorId, PidState>;

/// When each hybrid-mode vehicle was first seen, keyed by vehicle.
///
/// Entries are inserted on first sight and never advanced afterwards, so
/// the asynchronous teleport gate opens permanently once the first hybrid
/// period has elapsed.
pub type TeleportInstantTable = HashMap<ActorId, TimeInstant>;

/// Everything one motion-plan evaluation produced: the command for the
/// output frame plus the updates for the ego's state-table rows.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionPlanOutput {
    pub command: Command,
    /// New PID state for the ego's row; `None` leaves the row untouched.
    pub pid_state: Option<PidState>,
    /// Insert-if-absent value for the ego's teleport-clock row.
    pub teleport_instant: Option<TimeInstant>,
}

/// Plan motion for the vehicle at `index`.
///
/// `collision_frame` and `tl_hazards` are the per-index outputs of the
/// collision and traffic-light stages for this tick.  The state tables are
/// read-only here; the returned row updates are applied by the pipeline.
#[allow(clippy::too_many_arguments)]
pub fn motion_plan(
    index: usize,
    vehicle_ids: &[ActorId],
    snapshot: &WorldSnapshot,
    collision_frame: &[CollisionHazardData],
    tl_hazards: &[bool],
    pid_states: &PidStateTable,
    teleport_instants: &TeleportInstantTable,
    pid_parameters: &PidParameters,
    now: TimeInstant,
) -> MotionPlanOutput {
    let no_op = |actor: ActorId, transform: Transform| MotionPlanOutput {
        command: Command::ApplyTransform { actor, transform },
        pid_state: None,
        teleport_instant: None,
    };

    let Some(&actor_id) = vehicle_ids.get(index) else {
        return no_op(ActorId::NONE, Transform::default());
    };
    let Some(kinematics) = snapshot.kinematics.get(&actor_id) else {
        return no_op(actor_id, Transform::default());
    };
    let current_pose = Transform::new(kinematics.location, kinematics.rotation);
    let Some(attributes) = snapshot.attributes.get(&actor_id) else {
        return no_op(actor_id, current_pose);
    };

    let ego_location = kinematics.location;
    let ego_velocity = kinematics.velocity;
    let ego_speed = kinematics.speed();
    let ego_heading = kinematics.forward_vector();
    let buffer = snapshot.usable_buffer(actor_id);

    // ── Path deviation toward the steering target ─────────────────────────
    let target_point_distance =
        (ego_speed * TARGET_WAYPOINT_TIME_HORIZON).max(TARGET_WAYPOINT_HORIZON_LENGTH);
    let steering_target =
        buffer.and_then(|b| target_waypoint(b, target_point_distance).map(|(_, wp)| wp.location));
    let current_deviation = match steering_target {
        Some(target_location) => {
            let dot = deviation_dot_product(ego_location, ego_heading, target_location);
            let cross = deviation_cross_product(ego_location, ego_heading, target_location);
            let magnitude = 1.0 - dot;
            if cross < 0.0 {
                -magnitude
            } else {
                magnitude
            }
        }
        None => 0.0,
    };

    let previous_state = pid_states
        .get(&actor_id)
        .copied()
        .unwrap_or_else(|| PidState::reset(now));
    let (longitudinal_gains, lateral_gains) = pid_parameters.gains_for_speed(ego_speed);

    // ── Target velocity and the collision-response ladder ─────────────────
    let max_target_velocity = snapshot
        .parameters
        .vehicle_target_velocity(actor_id, attributes.speed_limit)
        / 3.6;
    let mut dynamic_target_velocity = max_target_velocity;

    let mut collision_emergency_stop = false;
    let collision_hazard = collision_frame.get(index).copied().unwrap_or_default();
    if collision_hazard.hazard {
        let available_distance_margin = collision_hazard.available_distance_margin;

        if let Some(other_kinematics) = snapshot.kinematics.get(&collision_hazard.hazard_actor_id)
        {
            let other_velocity = other_kinematics.velocity;
            let relative_speed = (ego_velocity - other_velocity).magnitude();
            let other_speed_along_heading = other_velocity.dot(ego_heading);

            // Only react while actually closing the gap.
            if relative_speed > EPSILON_RELATIVE_SPEED {
                let follow_lead_distance =
                    relative_speed * FOLLOW_DISTANCE_RATE + MIN_FOLLOW_LEAD_DISTANCE;
                if available_distance_margin > follow_lead_distance {
                    // Close the gap while holding a small speed surplus.
                    dynamic_target_velocity =
                        other_speed_along_heading + RELATIVE_APPROACH_SPEED;
                } else if available_distance_margin > CRITICAL_BRAKING_MARGIN {
                    // Follow at the lead's pace.
                    dynamic_target_velocity =
                        other_speed_along_heading.max(RELATIVE_APPROACH_SPEED);
                } else {
                    collision_emergency_stop = true;
                }
            }
        }
        if available_distance_margin < CRITICAL_BRAKING_MARGIN {
            collision_emergency_stop = true;
        }
    }

    dynamic_target_velocity = dynamic_target_velocity.min(max_target_velocity);

    let tl_hazard = tl_hazards.get(index).copied().unwrap_or(false);
    let mut emergency_stop = tl_hazard || collision_emergency_stop;
    if buffer.is_none() {
        // Nothing to steer toward; idle in place until localization
        // catches up, without declaring an emergency.
        dynamic_target_velocity = 0.0;
        emergency_stop = false;
    }

    // ── Physics path: PID actuation ───────────────────────────────────────
    if kinematics.physics_enabled {
        let mut current_state = state_update(
            &previous_state,
            ego_speed,
            dynamic_target_velocity,
            current_deviation,
            now,
            pid_parameters.windup_guard,
        );
        let mut actuation = run_step(
            &current_state,
            &previous_state,
            dynamic_target_velocity,
            longitudinal_gains,
            lateral_gains,
        );

        if emergency_stop {
            trace!(ego = %actor_id, tl_hazard, "emergency stop");
            current_state.deviation_integral = 0.0;
            current_state.velocity_integral = 0.0;
            actuation.throttle = 0.0;
            actuation.brake = 1.0;
            // Steer passes through from the lateral controller.
        }

        return MotionPlanOutput {
            command: Command::ApplyVehicleControl {
                actor: actor_id,
                control: VehicleControl {
                    throttle: actuation.throttle,
                    brake: actuation.brake,
                    steer: actuation.steer,
                },
            },
            pid_state: Some(current_state),
            teleport_instant: None,
        };
    }

    // ── Teleport path: physics-less vehicles ──────────────────────────────
    let current_state = PidState::reset(now);

    let teleport_anchor = teleport_instants.get(&actor_id).copied();
    let elapsed = now.elapsed_since(teleport_anchor.unwrap_or(now));

    let transform = if !emergency_stop
        && (snapshot.parameters.synchronous_mode() || elapsed > f64::from(HYBRID_MODE_DT))
    {
        // Displacement that realizes the target velocity over one hybrid
        // period, walked along the buffer.
        let target_displacement = dynamic_target_velocity * HYBRID_MODE_DT;
        match buffer.and_then(|b| target_waypoint(b, target_displacement)) {
            Some((_, teleport_wp)) => {
                let base_displacement = geom::distance(teleport_wp.location, ego_location);
                let missing_displacement = (target_displacement - base_displacement).max(0.0);
                let base_transform = teleport_wp.transform();
                Transform::new(
                    base_transform.location
                        + base_transform.forward_vector() * missing_displacement,
                    base_transform.rotation,
                )
            }
            None => current_pose,
        }
    } else {
        // Emergency stop, or the hybrid period has not elapsed yet.
        current_pose
    };

    MotionPlanOutput {
        command: Command::ApplyTransform { actor: actor_id, transform },
        pid_state: Some(current_state),
        teleport_instant: teleport_anchor.is_none().then_some(now),
    }
}
