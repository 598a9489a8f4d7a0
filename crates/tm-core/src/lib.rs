//! `tm-core` — foundational types for the traffic-manager decision core.
//!
//! This crate is a dependency of every other `tm-*` crate.  It intentionally
//! has no `tm-*` dependencies and minimal external ones (only `cgmath` and
//! `rand`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `ActorId`                                               |
//! | [`actor`]     | `ActorType` enum                                        |
//! | [`geom`]      | `Location`, `Vector3d`, `Rotation`, `Transform`         |
//! | [`time`]      | `TimeInstant`                                           |
//! | [`rng`]       | `ActorRng` (per-actor deterministic RNG)                |
//! | [`constants`] | Tunable constants, one module per concern               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.      |

pub mod actor;
pub mod constants;
pub mod geom;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use actor::ActorType;
pub use geom::{Location, Rotation, Transform, Vector3d};
pub use ids::ActorId;
pub use rng::ActorRng;
pub use time::TimeInstant;
