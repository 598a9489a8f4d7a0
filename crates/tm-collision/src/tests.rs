//! Unit tests for the collision-avoidance stage.

use tm_core::{ActorId, ActorRng, ActorType, Location, Rotation, Vector3d};
use tm_snapshot::{
    KinematicState, LightState, SimpleWaypoint, StaticAttributes, TrafficLightState,
    WaypointBuffer, WorldSnapshot,
};

use crate::lock::{CollisionLock, CollisionLockTable, LockUpdate, LockView};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HALF_LENGTH: f32 = 2.5;
const HALF_WIDTH: f32 = 1.0;

fn vehicle_state(x: f32, y: f32, yaw: f32, speed: f32) -> KinematicState {
    let rotation = Rotation::from_yaw_degrees(yaw);
    KinematicState {
        location: Location::new(x, y, 0.0),
        velocity: rotation.forward_vector() * speed,
        rotation,
        physics_enabled: true,
    }
}

fn vehicle_attributes() -> StaticAttributes {
    StaticAttributes {
        actor_type: ActorType::Vehicle,
        half_length: HALF_LENGTH,
        half_width: HALF_WIDTH,
        speed_limit: 50.0,
    }
}

fn walker_attributes() -> StaticAttributes {
    StaticAttributes {
        actor_type: ActorType::Pedestrian,
        half_length: 0.5,
        half_width: 0.5,
        speed_limit: 0.0,
    }
}

/// `count` waypoints from `(x, y)` along `yaw`, `step` metres apart.
fn buffer_along(x: f32, y: f32, yaw: f32, count: usize, step: f32) -> WaypointBuffer {
    let rotation = Rotation::from_yaw_degrees(yaw);
    let forward = rotation.forward_vector();
    (0..count)
        .map(|i| {
            let offset = forward * (i as f32 * step);
            SimpleWaypoint::new(
                Location::new(x + offset.x, y + offset.y, 0.0),
                rotation,
                false,
            )
        })
        .collect()
}

fn green_light() -> TrafficLightState {
    TrafficLightState { at_traffic_light: false, state: LightState::Green }
}

/// Register a managed vehicle with a straight 60 m buffer along its yaw.
fn add_vehicle(snapshot: &mut WorldSnapshot, id: ActorId, state: KinematicState, yaw: f32) {
    let buffer = buffer_along(state.location.x, state.location.y, yaw, 31, 2.0);
    snapshot.kinematics.insert(id, state);
    snapshot.attributes.insert(id, vehicle_attributes());
    snapshot.traffic_lights.insert(id, green_light());
    snapshot.buffers.insert(id, buffer);
}

fn ego_rng() -> ActorRng {
    ActorRng::new(42, ActorId(1))
}

#[cfg(test)]
mod boundary {
    use super::*;
    use crate::boundary::{actor_boundary, bounding_box_extension, geodesic_boundary};
    use tm_core::constants::collision::{
        BOUNDARY_EXTENSION_MINIMUM, BOUNDARY_EXTENSION_RATE,
    };

    #[test]
    fn footprint_corners_in_clockwise_order() {
        let corners = actor_boundary(&vehicle_state(0.0, 0.0, 0.0, 0.0), &vehicle_attributes());
        // (+h,-p), (-h,-p), (-h,+p), (+h,+p) with left perpendicular = +y.
        let expected = [
            (HALF_LENGTH, -HALF_WIDTH),
            (-HALF_LENGTH, -HALF_WIDTH),
            (-HALF_LENGTH, HALF_WIDTH),
            (HALF_LENGTH, HALF_WIDTH),
        ];
        assert_eq!(corners.len(), 4);
        for (corner, (x, y)) in corners.iter().zip(expected) {
            assert!((corner.x - x).abs() < 1e-5, "{corner:?} vs ({x}, {y})");
            assert!((corner.y - y).abs() < 1e-5, "{corner:?} vs ({x}, {y})");
        }
    }

    #[test]
    fn walker_footprint_grows_with_speed() {
        let still = actor_boundary(&vehicle_state(0.0, 0.0, 0.0, 0.0), &walker_attributes());
        let moving = actor_boundary(&vehicle_state(0.0, 0.0, 0.0, 2.0), &walker_attributes());
        // 2 m/s * WALKER_TIME_EXTENSION widens both half-extents by 3 m.
        assert!((still[0].x - 0.5).abs() < 1e-5);
        assert!((moving[0].x - 3.5).abs() < 1e-4);
        assert!((moving[0].y + 3.5).abs() < 1e-4);
    }

    #[test]
    fn extension_scales_with_forward_speed() {
        let table = CollisionLockTable::new();
        let locks = LockView::new(&table, ActorId(1));

        let stopped = bounding_box_extension(ActorId(1), &vehicle_state(0.0, 0.0, 0.0, 0.0), &locks);
        assert!((stopped - BOUNDARY_EXTENSION_MINIMUM).abs() < 1e-5);

        let fast = bounding_box_extension(ActorId(1), &vehicle_state(0.0, 0.0, 0.0, 10.0), &locks);
        assert!((fast - (BOUNDARY_EXTENSION_RATE * 10.0 + BOUNDARY_EXTENSION_MINIMUM)).abs() < 1e-3);

        // Reversing shrinks the boundary below its forward floor.
        let mut reversing = vehicle_state(0.0, 0.0, 0.0, 0.0);
        reversing.velocity = Vector3d::new(-2.0, 0.0, 0.0);
        let backward = bounding_box_extension(ActorId(1), &reversing, &locks);
        assert!(backward < BOUNDARY_EXTENSION_MINIMUM);
    }

    #[test]
    fn lock_overrides_extension_within_bound() {
        let mut table = CollisionLockTable::new();
        table.insert(
            ActorId(1),
            CollisionLock {
                lead_vehicle_id: ActorId(2),
                initial_lock_distance: 10.0,
                distance_to_lead_vehicle: 10.0,
            },
        );
        let locks = LockView::new(&table, ActorId(1));
        let extension =
            bounding_box_extension(ActorId(1), &vehicle_state(0.0, 0.0, 0.0, 10.0), &locks);
        // distance + padding, not the speed-based value.
        assert!((extension - 14.0).abs() < 1e-5);
    }

    #[test]
    fn runaway_lock_falls_back_to_speed_extension() {
        let mut table = CollisionLockTable::new();
        table.insert(
            ActorId(1),
            CollisionLock {
                lead_vehicle_id: ActorId(2),
                initial_lock_distance: 10.0,
                distance_to_lead_vehicle: 20.0,
            },
        );
        let locks = LockView::new(&table, ActorId(1));
        let extension =
            bounding_box_extension(ActorId(1), &vehicle_state(0.0, 0.0, 0.0, 10.0), &locks);
        // 20 + 4 padding is more than 10 beyond the initial distance.
        assert!((extension - 27.0).abs() < 1e-3);
    }

    #[test]
    fn corridor_never_samples_the_last_waypoint() {
        let table = CollisionLockTable::new();
        let locks = LockView::new(&table, ActorId(1));
        let mut cache = Default::default();

        let buffer = buffer_along(0.0, 0.0, 0.0, 4, 2.0);
        let boundary = geodesic_boundary(
            ActorId(1),
            &mut cache,
            &vehicle_state(0.0, 0.0, 0.0, 0.0),
            &vehicle_attributes(),
            &buffer,
            0.0,
            &locks,
        );
        // The walk reads buffer[3] (x = 6) into its cursor after the final
        // test, so no sample is emitted there.
        assert!(boundary.iter().all(|v| v.x < 6.0));
        // Two corridor samples per side plus the four footprint corners.
        assert_eq!(boundary.len(), 8);
    }

    #[test]
    fn empty_buffer_falls_back_to_footprint() {
        let table = CollisionLockTable::new();
        let locks = LockView::new(&table, ActorId(1));
        let mut cache = Default::default();
        let state = vehicle_state(0.0, 0.0, 0.0, 5.0);

        let boundary = geodesic_boundary(
            ActorId(1),
            &mut cache,
            &state,
            &vehicle_attributes(),
            &[],
            2.0,
            &locks,
        );
        assert_eq!(boundary, actor_boundary(&state, &vehicle_attributes()));
    }

    #[test]
    fn walker_corridor_is_its_footprint() {
        let table = CollisionLockTable::new();
        let locks = LockView::new(&table, ActorId(1));
        let mut cache = Default::default();
        let state = vehicle_state(0.0, 0.0, 0.0, 1.0);
        let buffer = buffer_along(0.0, 0.0, 0.0, 10, 2.0);

        let boundary = geodesic_boundary(
            ActorId(1),
            &mut cache,
            &state,
            &walker_attributes(),
            &buffer,
            2.0,
            &locks,
        );
        assert_eq!(boundary, actor_boundary(&state, &walker_attributes()));
    }

    #[test]
    fn corridor_is_cached_per_actor() {
        let table = CollisionLockTable::new();
        let locks = LockView::new(&table, ActorId(1));
        let mut cache = Default::default();
        let state = vehicle_state(0.0, 0.0, 0.0, 5.0);
        let buffer = buffer_along(0.0, 0.0, 0.0, 31, 2.0);

        let first = geodesic_boundary(
            ActorId(1),
            &mut cache,
            &state,
            &vehicle_attributes(),
            &buffer,
            2.0,
            &locks,
        );
        // Second call must return the memoized vertex list verbatim, even
        // if the inputs were to change mid-tick.
        let second = geodesic_boundary(
            ActorId(1),
            &mut cache,
            &vehicle_state(99.0, 99.0, 90.0, 0.0),
            &vehicle_attributes(),
            &buffer,
            2.0,
            &locks,
        );
        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod geometry {
    use super::*;
    use crate::geometry::{boundary_polygon, geometry_between_actors, ActorView, ScratchCaches};

    fn view<'a>(
        id: ActorId,
        state: &'a KinematicState,
        attributes: &'a StaticAttributes,
        buffer: &'a [SimpleWaypoint],
    ) -> ActorView<'a> {
        ActorView { id, kinematics: state, attributes, buffer, lead_distance: 2.0 }
    }

    #[test]
    fn polygon_ring_is_closed() {
        let corners = crate::boundary::actor_boundary(
            &vehicle_state(0.0, 0.0, 0.0, 0.0),
            &vehicle_attributes(),
        );
        let polygon = boundary_polygon(&corners);
        let ring = &polygon.exterior().0;
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn distance_is_zero_for_overlapping_footprints() {
        let table = CollisionLockTable::new();
        let locks = LockView::new(&table, ActorId(1));
        let mut caches = ScratchCaches::default();

        let a_state = vehicle_state(0.0, 0.0, 0.0, 0.0);
        let b_state = vehicle_state(3.0, 0.0, 0.0, 0.0);
        let attributes = vehicle_attributes();
        let a_buffer = buffer_along(0.0, 0.0, 0.0, 5, 2.0);
        let b_buffer = buffer_along(3.0, 0.0, 0.0, 5, 2.0);

        let comparison = geometry_between_actors(
            &mut caches,
            &view(ActorId(1), &a_state, &attributes, &a_buffer),
            &view(ActorId(2), &b_state, &attributes, &b_buffer),
            &locks,
        );
        assert_eq!(comparison.inter_bbox_distance, 0.0);
        assert_eq!(comparison.inter_geodesic_distance, 0.0);
    }

    #[test]
    fn reversed_query_swaps_caller_relative_scalars() {
        let table = CollisionLockTable::new();
        let locks = LockView::new(&table, ActorId(1));
        let mut caches = ScratchCaches::default();

        // Asymmetric setup so the two caller-relative scalars differ.
        let a_state = vehicle_state(0.0, 0.0, 0.0, 10.0);
        let b_state = vehicle_state(10.0, 30.0, 90.0, 2.0);
        let attributes = vehicle_attributes();
        let a_buffer = buffer_along(0.0, 0.0, 0.0, 31, 2.0);
        let b_buffer = buffer_along(10.0, 30.0, 90.0, 31, 2.0);

        let a_view = view(ActorId(1), &a_state, &attributes, &a_buffer);
        let b_view = view(ActorId(2), &b_state, &attributes, &b_buffer);

        let forward = geometry_between_actors(&mut caches, &a_view, &b_view, &locks);
        let reversed = geometry_between_actors(&mut caches, &b_view, &a_view, &locks);

        // The setup is asymmetric enough that a missing swap would show.
        assert_ne!(
            forward.reference_to_other_geodesic,
            forward.other_to_reference_geodesic
        );
        // The second query hit the cache under the unordered-pair key.
        assert_eq!(caches.geometry.len(), 1);
        assert_eq!(
            forward.reference_to_other_geodesic,
            reversed.other_to_reference_geodesic
        );
        assert_eq!(
            forward.other_to_reference_geodesic,
            reversed.reference_to_other_geodesic
        );
        assert_eq!(forward.inter_geodesic_distance, reversed.inter_geodesic_distance);
        assert_eq!(forward.inter_bbox_distance, reversed.inter_bbox_distance);
    }
}

#[cfg(test)]
mod negotiation {
    use super::*;
    use crate::geometry::{ActorView, ScratchCaches};
    use crate::negotiation::negotiate_collision;

    fn negotiate(
        snapshot: &WorldSnapshot,
        ego: ActorId,
        other: ActorId,
        look_ahead_index: usize,
        table: &CollisionLockTable,
    ) -> (crate::negotiation::NegotiationResult, LockUpdate) {
        let mut caches = ScratchCaches::default();
        let mut locks = LockView::new(table, ego);
        let reference = ActorView {
            id: ego,
            kinematics: &snapshot.kinematics[&ego],
            attributes: &snapshot.attributes[&ego],
            buffer: &snapshot.buffers[&ego],
            lead_distance: snapshot.parameters.distance_to_leading_vehicle(ego),
        };
        let other_view = ActorView {
            id: other,
            kinematics: &snapshot.kinematics[&other],
            attributes: &snapshot.attributes[&other],
            buffer: &snapshot.buffers[&other],
            lead_distance: snapshot.parameters.distance_to_leading_vehicle(other),
        };
        let result = negotiate_collision(
            &reference,
            &other_view,
            &snapshot.traffic_lights[&ego],
            look_ahead_index,
            &mut caches,
            &mut locks,
        );
        (result, locks.into_update())
    }

    #[test]
    fn red_light_at_junction_entrance_gates_out() {
        let mut snapshot = WorldSnapshot::new();
        add_vehicle(&mut snapshot, ActorId(1), vehicle_state(0.0, 0.0, 0.0, 5.0), 0.0);
        add_vehicle(&mut snapshot, ActorId(2), vehicle_state(8.0, 0.0, 0.0, 0.0), 0.0);

        // Junction starts a few waypoints ahead of the ego; the look-ahead
        // index lands inside it while the front does not.
        if let Some(buffer) = snapshot.buffers.get_mut(&ActorId(1)) {
            for waypoint in buffer.iter_mut().skip(3) {
                waypoint.is_junction = true;
            }
        }
        snapshot.traffic_lights.insert(
            ActorId(1),
            TrafficLightState { at_traffic_light: true, state: LightState::Red },
        );

        let table = CollisionLockTable::new();
        let (result, update) = negotiate(&snapshot, ActorId(1), ActorId(2), 3, &table);
        assert!(!result.hazard);
        assert_eq!(update, LockUpdate::Leave);
    }

    #[test]
    fn same_geometry_without_light_is_a_hazard() {
        let mut snapshot = WorldSnapshot::new();
        add_vehicle(&mut snapshot, ActorId(1), vehicle_state(0.0, 0.0, 0.0, 5.0), 0.0);
        add_vehicle(&mut snapshot, ActorId(2), vehicle_state(8.0, 0.0, 0.0, 0.0), 0.0);

        let table = CollisionLockTable::new();
        let (result, update) = negotiate(&snapshot, ActorId(1), ActorId(2), 3, &table);
        assert!(result.hazard);
        assert!(result.available_distance_margin >= 0.0);
        assert!(matches!(update, LockUpdate::Set(_)));
    }

    #[test]
    fn margin_is_clamped_to_zero_when_paths_interlock() {
        // Oncoming traffic: corridors fully overlap, so the raw margin
        // would be negative.
        let mut snapshot = WorldSnapshot::new();
        add_vehicle(&mut snapshot, ActorId(1), vehicle_state(0.0, 0.0, 0.0, 10.0), 0.0);
        add_vehicle(&mut snapshot, ActorId(2), vehicle_state(30.0, 0.0, 180.0, 10.0), 180.0);

        let table = CollisionLockTable::new();
        let (result, _) = negotiate(&snapshot, ActorId(1), ActorId(2), 2, &table);
        assert!(result.hazard);
        assert_eq!(result.available_distance_margin, 0.0);
    }

    #[test]
    fn angular_priority_reads_the_reference_heading() {
        // Ego inside a junction; the other actor overlaps its tail while
        // driving away behind it.  With both angular-priority headings
        // derived from the reference state the comparison is
        //   dot(h, to_other) < dot(h, to_reference) = -1 < 1,
        // so the ego has no angular priority and yields nothing.  Deriving
        // the second heading from the other actor's own state would flip
        // the verdict to a hazard; this fixture pins the shipped behavior.
        let mut snapshot = WorldSnapshot::new();
        add_vehicle(&mut snapshot, ActorId(1), vehicle_state(0.0, 0.0, 0.0, 2.0), 0.0);
        add_vehicle(&mut snapshot, ActorId(2), vehicle_state(-4.2, 0.0, 180.0, 2.0), 180.0);
        if let Some(buffer) = snapshot.buffers.get_mut(&ActorId(1)) {
            for waypoint in buffer.iter_mut().take(4) {
                waypoint.is_junction = true;
            }
        }

        let table = CollisionLockTable::new();
        let (result, update) = negotiate(&snapshot, ActorId(1), ActorId(2), 2, &table);
        assert!(!result.hazard);
        assert_eq!(update, LockUpdate::Leave);
    }

    #[test]
    fn new_lead_reinitializes_the_lock() {
        let mut snapshot = WorldSnapshot::new();
        add_vehicle(&mut snapshot, ActorId(1), vehicle_state(0.0, 0.0, 0.0, 5.0), 0.0);
        add_vehicle(&mut snapshot, ActorId(7), vehicle_state(8.0, 0.0, 0.0, 0.0), 0.0);

        let mut table = CollisionLockTable::new();
        table.insert(
            ActorId(1),
            CollisionLock {
                lead_vehicle_id: ActorId(5),
                initial_lock_distance: 3.0,
                distance_to_lead_vehicle: 3.0,
            },
        );

        let (result, update) = negotiate(&snapshot, ActorId(1), ActorId(7), 3, &table);
        assert!(result.hazard);
        match update {
            LockUpdate::Set(lock) => {
                assert_eq!(lock.lead_vehicle_id, ActorId(7));
                assert_eq!(lock.initial_lock_distance, lock.distance_to_lead_vehicle);
            }
            other => panic!("expected a fresh lock, got {other:?}"),
        }
    }

    #[test]
    fn same_lead_keeps_initial_distance() {
        let mut snapshot = WorldSnapshot::new();
        add_vehicle(&mut snapshot, ActorId(1), vehicle_state(0.0, 0.0, 0.0, 5.0), 0.0);
        add_vehicle(&mut snapshot, ActorId(7), vehicle_state(9.0, 0.0, 0.0, 0.0), 0.0);

        let mut table = CollisionLockTable::new();
        table.insert(
            ActorId(1),
            CollisionLock {
                lead_vehicle_id: ActorId(7),
                initial_lock_distance: 3.0,
                distance_to_lead_vehicle: 3.0,
            },
        );

        let (result, update) = negotiate(&snapshot, ActorId(1), ActorId(7), 3, &table);
        assert!(result.hazard);
        match update {
            LockUpdate::Set(lock) => {
                assert_eq!(lock.lead_vehicle_id, ActorId(7));
                assert_eq!(lock.initial_lock_distance, 3.0);
                assert!(lock.distance_to_lead_vehicle > 3.0);
            }
            other => panic!("expected an updated lock, got {other:?}"),
        }
    }
}

#[cfg(test)]
mod stage {
    use super::*;
    use crate::stage::{collision_avoidance, CollisionHazardData};

    fn two_vehicle_snapshot(
        ego_state: KinematicState,
        ego_yaw: f32,
        other_state: KinematicState,
        other_yaw: f32,
    ) -> WorldSnapshot {
        let mut snapshot = WorldSnapshot::new();
        add_vehicle(&mut snapshot, ActorId(1), ego_state, ego_yaw);
        add_vehicle(&mut snapshot, ActorId(2), other_state, other_yaw);
        snapshot.track_traffic.register_overlap(ActorId(1), ActorId(2));
        snapshot
    }

    #[test]
    fn missing_ego_produces_the_default_output() {
        let snapshot = WorldSnapshot::new();
        let locks = CollisionLockTable::new();
        let output =
            collision_avoidance(0, &[ActorId(1)], &snapshot, &locks, &mut ego_rng());
        assert_eq!(output.hazard, CollisionHazardData::default());
        assert_eq!(output.lock_update, LockUpdate::Leave);
        assert_eq!(output.hazard.hazard_actor_id, ActorId::NONE);
        assert!(output.hazard.available_distance_margin.is_infinite());
    }

    #[test]
    fn lone_vehicle_sees_no_hazard() {
        let mut snapshot = WorldSnapshot::new();
        add_vehicle(&mut snapshot, ActorId(1), vehicle_state(0.0, 0.0, 0.0, 10.0), 0.0);

        let locks = CollisionLockTable::new();
        let output =
            collision_avoidance(0, &[ActorId(1)], &snapshot, &locks, &mut ego_rng());
        assert!(!output.hazard.hazard);
        assert_eq!(output.lock_update, LockUpdate::Leave);
    }

    #[test]
    fn oncoming_vehicle_is_a_hazard_and_locks() {
        let snapshot = two_vehicle_snapshot(
            vehicle_state(0.0, 0.0, 0.0, 10.0),
            0.0,
            vehicle_state(30.0, 0.0, 180.0, 10.0),
            180.0,
        );

        let mut locks = CollisionLockTable::new();
        let output =
            collision_avoidance(0, &[ActorId(1), ActorId(2)], &snapshot, &locks, &mut ego_rng());

        assert!(output.hazard.hazard);
        assert_eq!(output.hazard.hazard_actor_id, ActorId(2));
        assert!((0.0..=5.0).contains(&output.hazard.available_distance_margin));

        output.lock_update.apply(&mut locks, ActorId(1));
        let lock = locks.get(&ActorId(1)).expect("lock should be created");
        assert_eq!(lock.lead_vehicle_id, ActorId(2));
        // Footprint gap: 30 m separation minus both half-lengths.
        assert!((lock.initial_lock_distance - 25.0).abs() < 0.1);
        assert_eq!(lock.initial_lock_distance, lock.distance_to_lead_vehicle);
    }

    #[test]
    fn initial_lock_distance_survives_consecutive_ticks() {
        let snapshot = two_vehicle_snapshot(
            vehicle_state(0.0, 0.0, 0.0, 10.0),
            0.0,
            vehicle_state(15.0, 0.0, 0.0, 5.0),
            0.0,
        );
        let ids = [ActorId(1), ActorId(2)];
        let mut locks = CollisionLockTable::new();
        let mut rng = ego_rng();

        let first = collision_avoidance(0, &ids, &snapshot, &locks, &mut rng);
        assert!(first.hazard.hazard);
        first.lock_update.apply(&mut locks, ActorId(1));
        let initial = locks[&ActorId(1)].initial_lock_distance;

        let second = collision_avoidance(0, &ids, &snapshot, &locks, &mut rng);
        assert!(second.hazard.hazard);
        second.lock_update.apply(&mut locks, ActorId(1));

        let lock = &locks[&ActorId(1)];
        assert_eq!(lock.lead_vehicle_id, ActorId(2));
        assert_eq!(lock.initial_lock_distance, initial);
    }

    #[test]
    fn vanished_hazard_releases_the_lock() {
        let near = two_vehicle_snapshot(
            vehicle_state(0.0, 0.0, 0.0, 10.0),
            0.0,
            vehicle_state(15.0, 0.0, 0.0, 5.0),
            0.0,
        );
        let ids = [ActorId(1), ActorId(2)];
        let mut locks = CollisionLockTable::new();
        let mut rng = ego_rng();

        collision_avoidance(0, &ids, &near, &locks, &mut rng)
            .lock_update
            .apply(&mut locks, ActorId(1));
        assert!(locks.contains_key(&ActorId(1)));

        // The lead pulls far out of detection range but stays a candidate.
        let far = two_vehicle_snapshot(
            vehicle_state(0.0, 0.0, 0.0, 10.0),
            0.0,
            vehicle_state(80.0, 0.0, 0.0, 20.0),
            0.0,
        );
        let output = collision_avoidance(0, &ids, &far, &locks, &mut rng);
        assert!(!output.hazard.hazard);
        assert_eq!(output.lock_update, LockUpdate::Clear);

        output.lock_update.apply(&mut locks, ActorId(1));
        assert!(!locks.contains_key(&ActorId(1)));
    }

    #[test]
    fn nearest_hazard_wins() {
        let mut snapshot = WorldSnapshot::new();
        add_vehicle(&mut snapshot, ActorId(1), vehicle_state(0.0, 0.0, 0.0, 10.0), 0.0);
        add_vehicle(&mut snapshot, ActorId(5), vehicle_state(14.0, 0.0, 0.0, 0.0), 0.0);
        add_vehicle(&mut snapshot, ActorId(9), vehicle_state(8.0, 0.0, 0.0, 0.0), 0.0);
        snapshot.track_traffic.register_overlap(ActorId(1), ActorId(5));
        snapshot.track_traffic.register_overlap(ActorId(1), ActorId(9));

        let locks = CollisionLockTable::new();
        let output = collision_avoidance(
            0,
            &[ActorId(1), ActorId(5), ActorId(9)],
            &snapshot,
            &locks,
            &mut ego_rng(),
        );
        assert!(output.hazard.hazard);
        assert_eq!(output.hazard.hazard_actor_id, ActorId(9));
        match output.lock_update {
            LockUpdate::Set(lock) => assert_eq!(lock.lead_vehicle_id, ActorId(9)),
            other => panic!("expected a lock on the nearest lead, got {other:?}"),
        }
    }

    #[test]
    fn walker_in_path_is_a_hazard() {
        let mut snapshot = WorldSnapshot::new();
        add_vehicle(&mut snapshot, ActorId(1), vehicle_state(0.0, 0.0, 0.0, 10.0), 0.0);
        snapshot.kinematics.insert(ActorId(3), vehicle_state(8.0, 0.0, 90.0, 0.0));
        snapshot.attributes.insert(ActorId(3), walker_attributes());
        snapshot.traffic_lights.insert(ActorId(3), green_light());
        snapshot
            .buffers
            .insert(ActorId(3), buffer_along(8.0, 0.0, 90.0, 5, 1.0));
        snapshot.track_traffic.register_overlap(ActorId(1), ActorId(3));

        let locks = CollisionLockTable::new();
        let output =
            collision_avoidance(0, &[ActorId(1), ActorId(3)], &snapshot, &locks, &mut ego_rng());
        assert!(output.hazard.hazard);
        assert_eq!(output.hazard.hazard_actor_id, ActorId(3));
    }

    #[test]
    fn disabled_collision_detection_skips_the_pair() {
        let mut snapshot = two_vehicle_snapshot(
            vehicle_state(0.0, 0.0, 0.0, 10.0),
            0.0,
            vehicle_state(15.0, 0.0, 0.0, 5.0),
            0.0,
        );
        snapshot
            .parameters
            .set_collision_detection(ActorId(1), ActorId(2), false);

        let locks = CollisionLockTable::new();
        let output =
            collision_avoidance(0, &[ActorId(1), ActorId(2)], &snapshot, &locks, &mut ego_rng());
        assert!(!output.hazard.hazard);
        // The negotiator never ran, so the lock row is left untouched
        // rather than cleared.
        assert_eq!(output.lock_update, LockUpdate::Leave);
    }

    #[test]
    fn full_ignore_percentage_rarely_confirms() {
        let mut snapshot = two_vehicle_snapshot(
            vehicle_state(0.0, 0.0, 0.0, 10.0),
            0.0,
            vehicle_state(15.0, 0.0, 0.0, 5.0),
            0.0,
        );
        snapshot
            .parameters
            .set_percentage_ignore_vehicles(ActorId(1), 100.0);

        let ids = [ActorId(1), ActorId(2)];
        let locks = CollisionLockTable::new();
        let mut rng = ego_rng();

        // Only a roll of exactly 100 (1 in 101) confirms the hazard.
        let confirmations = (0..10_000)
            .filter(|_| collision_avoidance(0, &ids, &snapshot, &locks, &mut rng).hazard.hazard)
            .count();
        assert!(
            (30..=200).contains(&confirmations),
            "expected ~1% confirmations, got {confirmations}"
        );
    }
}
