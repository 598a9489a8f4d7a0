//! Tunable constants, one module per concern.
//!
//! Values are stable across a run but are deliberately not user
//! configuration: they encode the shape of the decision algorithms
//! themselves.  The few knobs that *are* per-vehicle policy (lead distance,
//! ignore percentages, speed difference) live in the `Parameters` registry
//! instead.

/// Collision-avoidance geometry thresholds.
pub mod collision {
    /// Metres of forward detection boundary added per m/s of forward speed.
    pub const BOUNDARY_EXTENSION_RATE: f32 = 2.5;

    /// Floor of the forward detection boundary, metres.
    pub const BOUNDARY_EXTENSION_MINIMUM: f32 = 2.0;

    /// cos(10°) — heading-change threshold for emitting corridor samples.
    pub const COS_10_DEGREES: f32 = 0.984_807_7;

    pub const SQUARE_ROOT_OF_TWO: f32 = 1.414_213_5;

    /// Polygon distances below this count as touching, metres.
    pub const OVERLAP_THRESHOLD: f64 = 0.1;

    /// Padding over the tracked lead-vehicle distance when a collision lock
    /// drives the boundary extension, metres.
    pub const LOCKING_DISTANCE_PADDING: f32 = 4.0;

    /// A lock may not stretch the boundary more than this beyond its
    /// initial lock distance, metres.
    pub const MAX_LOCKING_EXTENSION: f32 = 10.0;

    /// Candidates farther than this from the ego are never negotiated,
    /// metres.
    pub const MAX_COLLISION_RADIUS: f32 = 100.0;

    /// Candidates more than this far above/below the ego are never
    /// negotiated (overpasses, tunnels), metres.
    pub const VERTICAL_OVERLAP_THRESHOLD: f32 = 4.0;

    /// Seconds of walker motion folded into a pedestrian's footprint.
    pub const WALKER_TIME_EXTENSION: f32 = 1.5;
}

/// Target-waypoint selection horizons.
pub mod waypoint_selection {
    /// Steering target horizon, seconds of travel at current speed.
    pub const TARGET_WAYPOINT_TIME_HORIZON: f32 = 1.0;

    /// Floor of the steering target horizon, metres.
    pub const TARGET_WAYPOINT_HORIZON_LENGTH: f32 = 5.0;

    /// Look-ahead used to detect imminent junction entry, metres.
    pub const JUNCTION_LOOK_AHEAD: f32 = 5.0;
}

/// Longitudinal hazard-response ladder.
pub mod motion_plan {
    /// Relative speeds below this are treated as "not closing", m/s.
    pub const EPSILON_RELATIVE_SPEED: f32 = 0.2;

    /// Follow distance at zero relative speed, metres.
    pub const MIN_FOLLOW_LEAD_DISTANCE: f32 = 5.0;

    /// Growth of the follow distance per m/s of relative speed
    /// (0 km/h → 5 m, 100 km/h → 10 m).
    pub const FOLLOW_DISTANCE_RATE: f32 = 0.18;

    /// Speed surplus held while closing a large gap to a lead, m/s (10 km/h).
    pub const RELATIVE_APPROACH_SPEED: f32 = 2.778;

    /// Margins below this trigger an emergency stop, metres.
    pub const CRITICAL_BRAKING_MARGIN: f32 = 0.25;
}

/// Urban/highway regime boundary.
pub mod speed_threshold {
    /// Speeds above this select the highway PID gain set, m/s (50 km/h).
    pub const HIGHWAY_SPEED: f32 = 13.89;
}

/// Physics-less (hybrid) actuation.
pub mod hybrid_mode {
    /// Teleport step period, seconds.
    pub const HYBRID_MODE_DT: f32 = 0.05;
}

/// PID actuation limits and default gain sets.
pub mod vehicle_control {
    pub const MAX_THROTTLE: f32 = 0.75;
    pub const MAX_BRAKE: f32 = 1.0;

    /// Symmetric clamp applied to both PID integrals.
    pub const INTEGRAL_WINDUP_GUARD: f32 = 10.0;

    // Default gain triples, ordered (Kp, Kd, Ki).
    pub const URBAN_LONGITUDINAL_GAINS: (f32, f32, f32) = (5.0, 0.0, 0.1);
    pub const HIGHWAY_LONGITUDINAL_GAINS: (f32, f32, f32) = (5.0, 0.0, 0.1);
    pub const URBAN_LATERAL_GAINS: (f32, f32, f32) = (10.0, 0.0, 0.1);
    pub const HIGHWAY_LATERAL_GAINS: (f32, f32, f32) = (6.0, 0.0, 0.1);
}

/// Defaults for per-vehicle policy not set through the registry.
pub mod parameter_defaults {
    /// Default gap held to a leading vehicle, metres.
    pub const DISTANCE_TO_LEADING_VEHICLE: f32 = 2.0;
}
