//! Longitudinal and lateral PID control.
//!
//! Two independent controllers share one state record per vehicle: the
//! longitudinal controller tracks a target velocity and the lateral one
//! tracks the signed path deviation.  Gains come in urban/highway pairs
//! selected by the ego's current speed.

use tm_core::constants::speed_threshold::HIGHWAY_SPEED;
use tm_core::constants::vehicle_control::{
    HIGHWAY_LATERAL_GAINS, HIGHWAY_LONGITUDINAL_GAINS, INTEGRAL_WINDUP_GUARD, MAX_BRAKE,
    MAX_THROTTLE, URBAN_LATERAL_GAINS, URBAN_LONGITUDINAL_GAINS,
};
use tm_core::TimeInstant;

/// Controller memory for one vehicle, carried across ticks.
///
/// The `previous_*` fields hold the samples taken at `time_instant` — they
/// are "previous" from the perspective of the next tick, which reads them
/// for the derivative terms.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidState {
    pub velocity_integral: f32,
    pub deviation_integral: f32,
    pub time_instant: TimeInstant,
    pub previous_deviation: f32,
    pub previous_velocity: f32,
}

impl PidState {
    /// A zeroed state anchored at `now`.
    pub fn reset(now: TimeInstant) -> Self {
        Self {
            velocity_integral: 0.0,
            deviation_integral: 0.0,
            time_instant: now,
            previous_deviation: 0.0,
            previous_velocity: 0.0,
        }
    }
}

// ── Gains ─────────────────────────────────────────────────────────────────────

/// One controller's gain triple.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidGains {
    pub kp: f32,
    pub kd: f32,
    pub ki: f32,
}

impl PidGains {
    pub const fn new(kp: f32, kd: f32, ki: f32) -> Self {
        Self { kp, kd, ki }
    }

    const fn from_triple(triple: (f32, f32, f32)) -> Self {
        Self { kp: triple.0, kd: triple.1, ki: triple.2 }
    }
}

/// The four gain sets (urban/highway × longitudinal/lateral) plus the
/// symmetric integral clamp.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidParameters {
    pub urban_longitudinal: PidGains,
    pub highway_longitudinal: PidGains,
    pub urban_lateral: PidGains,
    pub highway_lateral: PidGains,
    /// Both integrals are clamped to `[-windup_guard, windup_guard]`.
    pub windup_guard: f32,
}

impl Default for PidParameters {
    fn default() -> Self {
        Self {
            urban_longitudinal: PidGains::from_triple(URBAN_LONGITUDINAL_GAINS),
            highway_longitudinal: PidGains::from_triple(HIGHWAY_LONGITUDINAL_GAINS),
            urban_lateral: PidGains::from_triple(URBAN_LATERAL_GAINS),
            highway_lateral: PidGains::from_triple(HIGHWAY_LATERAL_GAINS),
            windup_guard: INTEGRAL_WINDUP_GUARD,
        }
    }
}

impl PidParameters {
    /// The (longitudinal, lateral) gain pair for the ego's speed regime.
    pub fn gains_for_speed(&self, speed: f32) -> (&PidGains, &PidGains) {
        if speed > HIGHWAY_SPEED {
            (&self.highway_longitudinal, &self.highway_lateral)
        } else {
            (&self.urban_longitudinal, &self.urban_lateral)
        }
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Throttle/brake/steer produced by one controller step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ActuationSignal {
    pub throttle: f32,
    pub brake: f32,
    pub steer: f32,
}

/// Advance the controller state by one tick.
///
/// Integration is skipped entirely when the clock did not move forward
/// (`dt <= 0`); the sample fields and timestamp are recorded regardless.
pub fn state_update(
    previous: &PidState,
    velocity: f32,
    target_velocity: f32,
    deviation: f32,
    now: TimeInstant,
    windup_guard: f32,
) -> PidState {
    let dt = now.elapsed_since(previous.time_instant) as f32;

    let mut velocity_integral = previous.velocity_integral;
    let mut deviation_integral = previous.deviation_integral;
    if dt > 0.0 {
        let velocity_error = target_velocity - velocity;
        velocity_integral =
            (velocity_integral + velocity_error * dt).clamp(-windup_guard, windup_guard);
        deviation_integral =
            (deviation_integral + deviation * dt).clamp(-windup_guard, windup_guard);
    }

    PidState {
        velocity_integral,
        deviation_integral,
        time_instant: now,
        previous_deviation: deviation,
        previous_velocity: velocity,
    }
}

/// One actuation step: `Kp·e + Ki·∫e + Kd·(e - e_prev)/dt` on both axes.
///
/// A non-negative longitudinal output becomes throttle, a negative one
/// becomes brake; the two are never both non-zero.  The derivative terms
/// are dropped when `dt <= 0`.
pub fn run_step(
    current: &PidState,
    previous: &PidState,
    target_velocity: f32,
    longitudinal: &PidGains,
    lateral: &PidGains,
) -> ActuationSignal {
    let dt = current.time_instant.elapsed_since(previous.time_instant) as f32;

    // Longitudinal: velocity error against the current target.
    let velocity_error = target_velocity - current.previous_velocity;
    let previous_velocity_error = target_velocity - previous.previous_velocity;
    let mut acceleration =
        longitudinal.kp * velocity_error + longitudinal.ki * current.velocity_integral;
    if dt > 0.0 {
        acceleration += longitudinal.kd * (velocity_error - previous_velocity_error) / dt;
    }

    let (throttle, brake) = if acceleration >= 0.0 {
        (acceleration.clamp(0.0, MAX_THROTTLE), 0.0)
    } else {
        (0.0, (-acceleration).clamp(0.0, MAX_BRAKE))
    };

    // Lateral: signed path deviation.
    let deviation = current.previous_deviation;
    let mut steer = lateral.kp * deviation + lateral.ki * current.deviation_integral;
    if dt > 0.0 {
        steer += lateral.kd * (deviation - previous.previous_deviation) / dt;
    }

    ActuationSignal {
        throttle,
        brake,
        steer: steer.clamp(-1.0, 1.0),
    }
}
