//! `tm-pipeline` — the per-tick driver of the decision core.
//!
//! # Two-stage tick
//!
//! ```text
//! for each tick:
//!   ① Collision avoidance — one evaluation per vehicle index against the
//!     shared snapshot and the start-of-tick lock table (parallel with the
//!     `parallel` feature), then sequential application of the per-ego
//!     lock-row updates in ascending index order.
//!   ② Motion planning — one evaluation per vehicle index consuming the
//!     collision frame and the traffic-light hazard frame (parallel with
//!     the `parallel` feature), then sequential application of the per-ego
//!     PID/teleport-row updates.
//! ```
//!
//! Stage evaluations are pure against shared state: all row writes happen
//! in the sequential apply passes, so results are identical for any worker
//! count.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                               |
//! |------------|------------------------------------------------------|
//! | `parallel` | Runs both stages' evaluations on Rayon's thread pool. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tm_pipeline::{PipelineConfig, TrafficPipeline};
//!
//! let mut pipeline = TrafficPipeline::builder(PipelineConfig::new(42)).build()?;
//! loop {
//!     let snapshot = refresh_world_snapshot();
//!     let frames = pipeline.run_tick(&snapshot, &vehicle_ids, &tl_hazards, clock.now())?;
//!     dispatch(frames.control);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod pipeline;
mod rngs;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::PipelineBuilder;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{TickFrames, TrafficPipeline};
