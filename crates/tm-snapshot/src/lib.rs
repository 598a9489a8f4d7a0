//! `tm-snapshot` — the per-tick read-only view of the simulated world.
//!
//! The decision core never talks to the simulator.  Upstream collaborators
//! (localization, traffic-light stage, the RPC client) refresh these tables
//! once per tick; the core's stages then read them concurrently without
//! locking.
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`state`]    | `KinematicState`, `StaticAttributes`, traffic lights   |
//! | [`waypoint`] | `SimpleWaypoint`, buffers, target-waypoint/deviation   |
//! | [`traffic`]  | `TrackTraffic` corridor-overlap lookup                 |
//! | [`params`]   | `Parameters` per-vehicle policy registry               |
//! | [`snapshot`] | `WorldSnapshot` bundle handed to the stages            |

pub mod params;
pub mod snapshot;
pub mod state;
pub mod traffic;
pub mod waypoint;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use params::Parameters;
pub use snapshot::WorldSnapshot;
pub use state::{KinematicState, LightState, StaticAttributes, TrafficLightState};
pub use traffic::TrackTraffic;
pub use waypoint::{
    deviation_cross_product, deviation_dot_product, target_waypoint, SimpleWaypoint,
    WaypointBuffer,
};
