//! Actor kind enum shared across all decision-core crates.
//!
//! The set is closed: anything the simulator reports that is neither a
//! vehicle nor a pedestrian (props, sensors, spectators…) maps to `Other`
//! and receives no motion prediction and no corridor extrapolation.

/// The kind of a simulator actor, as far as this core cares.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorType {
    /// A managed or unmanaged road vehicle.
    Vehicle,
    /// A walker.  Its footprint is grown along its velocity to predict
    /// where it will be.
    Pedestrian,
    /// Anything else (default state).
    #[default]
    Other,
}

impl ActorType {
    /// `true` only for road vehicles — the only kind whose corridor is
    /// extrapolated along its waypoint buffer.
    #[inline]
    pub fn is_vehicle(self) -> bool {
        matches!(self, ActorType::Vehicle)
    }

    #[inline]
    pub fn is_pedestrian(self) -> bool {
        matches!(self, ActorType::Pedestrian)
    }

    /// Human-readable label, useful for log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ActorType::Vehicle => "vehicle",
            ActorType::Pedestrian => "pedestrian",
            ActorType::Other => "other",
        }
    }
}

impl std::fmt::Display for ActorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
