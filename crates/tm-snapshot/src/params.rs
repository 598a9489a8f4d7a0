//! Per-vehicle policy registry.
//!
//! Users of the traffic manager tune individual vehicles (or the whole
//! fleet) through this registry; the decision core only reads it.  Every
//! getter falls back to a fleet-wide default so unregistered vehicles
//! behave sensibly.

use std::collections::{HashMap, HashSet};

use tm_core::constants::parameter_defaults::DISTANCE_TO_LEADING_VEHICLE;
use tm_core::ActorId;

/// Policy knobs consulted by the collision and motion stages.
#[derive(Clone, Debug)]
pub struct Parameters {
    synchronous_mode: bool,
    global_percentage_speed_difference: f32,
    distance_to_leading_vehicle: HashMap<ActorId, f32>,
    percentage_speed_difference: HashMap<ActorId, f32>,
    percentage_ignore_vehicles: HashMap<ActorId, f32>,
    percentage_ignore_walkers: HashMap<ActorId, f32>,
    collision_detection_disabled: HashSet<(ActorId, ActorId)>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            synchronous_mode: false,
            global_percentage_speed_difference: 0.0,
            distance_to_leading_vehicle: HashMap::new(),
            percentage_speed_difference: HashMap::new(),
            percentage_ignore_vehicles: HashMap::new(),
            percentage_ignore_walkers: HashMap::new(),
            collision_detection_disabled: HashSet::new(),
        }
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Getters (read by the stages) ──────────────────────────────────────

    /// Gap the vehicle tries to hold to a leading vehicle, metres.
    pub fn distance_to_leading_vehicle(&self, actor: ActorId) -> f32 {
        self.distance_to_leading_vehicle
            .get(&actor)
            .copied()
            .unwrap_or(DISTANCE_TO_LEADING_VEHICLE)
    }

    /// Whether `ego` should negotiate collisions against `other` at all.
    /// The relation is directional: detection can be disabled for one side
    /// of a pair only.
    pub fn collision_detection(&self, ego: ActorId, other: ActorId) -> bool {
        !self.collision_detection_disabled.contains(&(ego, other))
    }

    /// Probability in `[0, 100]` that the vehicle ignores a vehicle hazard.
    pub fn percentage_ignore_vehicles(&self, actor: ActorId) -> f32 {
        self.percentage_ignore_vehicles
            .get(&actor)
            .copied()
            .unwrap_or(0.0)
    }

    /// Probability in `[0, 100]` that the vehicle ignores a walker hazard.
    pub fn percentage_ignore_walkers(&self, actor: ActorId) -> f32 {
        self.percentage_ignore_walkers
            .get(&actor)
            .copied()
            .unwrap_or(0.0)
    }

    /// The vehicle's target velocity in km/h given the posted limit:
    /// `speed_limit · (1 - percentage_difference / 100)`.  A negative
    /// percentage makes the vehicle exceed the limit.
    pub fn vehicle_target_velocity(&self, actor: ActorId, speed_limit_kmh: f32) -> f32 {
        let difference = self
            .percentage_speed_difference
            .get(&actor)
            .copied()
            .unwrap_or(self.global_percentage_speed_difference);
        speed_limit_kmh * (1.0 - difference / 100.0)
    }

    /// `true` when the simulator steps synchronously with the client, in
    /// which case hybrid-mode teleports run every tick.
    pub fn synchronous_mode(&self) -> bool {
        self.synchronous_mode
    }

    // ── Setters (called by the embedding layer) ───────────────────────────

    pub fn set_synchronous_mode(&mut self, on: bool) {
        self.synchronous_mode = on;
    }

    pub fn set_distance_to_leading_vehicle(&mut self, actor: ActorId, metres: f32) {
        self.distance_to_leading_vehicle.insert(actor, metres);
    }

    pub fn set_global_percentage_speed_difference(&mut self, percentage: f32) {
        self.global_percentage_speed_difference = percentage;
    }

    pub fn set_percentage_speed_difference(&mut self, actor: ActorId, percentage: f32) {
        self.percentage_speed_difference.insert(actor, percentage);
    }

    pub fn set_percentage_ignore_vehicles(&mut self, actor: ActorId, percentage: f32) {
        self.percentage_ignore_vehicles.insert(actor, percentage);
    }

    pub fn set_percentage_ignore_walkers(&mut self, actor: ActorId, percentage: f32) {
        self.percentage_ignore_walkers.insert(actor, percentage);
    }

    pub fn set_collision_detection(&mut self, ego: ActorId, other: ActorId, detect: bool) {
        if detect {
            self.collision_detection_disabled.remove(&(ego, other));
        } else {
            self.collision_detection_disabled.insert((ego, other));
        }
    }
}
