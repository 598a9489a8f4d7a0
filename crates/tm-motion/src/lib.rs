//! `tm-motion` — the motion-planning stage of the decision core.
//!
//! Consumes the collision stage's hazard frame, the traffic-light stage's
//! hazard flags, and the shared world snapshot, and produces one
//! [`Command`] per vehicle index: either a PID-derived
//! throttle/brake/steer triple (physics-enabled vehicles) or a teleport
//! transform (hybrid-mode vehicles).
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | [`pid`]     | PID state, gain sets, `state_update`/`run_step`        |
//! | [`command`] | `Command`, `VehicleControl`                            |
//! | [`planner`] | The per-index motion planner                           |

pub mod command;
pub mod pid;
pub mod planner;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use command::{Command, VehicleControl};
pub use pid::{run_step, state_update, ActuationSignal, PidGains, PidParameters, PidState};
pub use planner::{motion_plan, MotionPlanOutput, PidStateTable, TeleportInstantTable};
