//! The read-only world bundle handed to every stage invocation.

use std::collections::HashMap;

use tm_core::{ActorId, ActorType, Location};

use crate::{
    KinematicState, Parameters, StaticAttributes, TrackTraffic, TrafficLightState, WaypointBuffer,
};

/// Everything the decision core may read during one tick.
///
/// Built once per tick by the embedding layer and shared immutably across
/// all per-vehicle evaluations of both stages.  Actors may be missing from
/// any table (despawned mid-tick, not yet localized); the stages treat
/// absence defensively rather than as an error.
#[derive(Clone, Debug, Default)]
pub struct WorldSnapshot {
    /// Kinematic state per actor, managed or not.
    pub kinematics: HashMap<ActorId, KinematicState>,

    /// Static attributes per actor.
    pub attributes: HashMap<ActorId, StaticAttributes>,

    /// Traffic-light view per managed vehicle.
    pub traffic_lights: HashMap<ActorId, TrafficLightState>,

    /// Upcoming-waypoint buffer per managed vehicle.
    pub buffers: HashMap<ActorId, WaypointBuffer>,

    /// Corridor-overlap relation from localization.
    pub track_traffic: TrackTraffic,

    /// Per-vehicle policy registry.
    pub parameters: Parameters,
}

impl WorldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Location of `actor`, if it has kinematic state this tick.
    #[inline]
    pub fn location_of(&self, actor: ActorId) -> Option<Location> {
        self.kinematics.get(&actor).map(|k| k.location)
    }

    /// Actor kind, defaulting to `Other` when attributes are missing.
    #[inline]
    pub fn actor_type_of(&self, actor: ActorId) -> ActorType {
        self.attributes
            .get(&actor)
            .map(|a| a.actor_type)
            .unwrap_or_default()
    }

    /// The waypoint buffer of `actor`, if present **and non-empty**.
    ///
    /// An empty buffer means localization has not caught up yet; callers
    /// uniformly treat it like a missing one.
    pub fn usable_buffer(&self, actor: ActorId) -> Option<&WaypointBuffer> {
        self.buffers.get(&actor).filter(|b| !b.is_empty())
    }
}
