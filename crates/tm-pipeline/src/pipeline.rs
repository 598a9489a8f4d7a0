//! The `TrafficPipeline` struct and its two-stage tick.

use tracing::debug;

use tm_collision::{
    collision_avoidance, CollisionHazardData, CollisionLockTable, CollisionStageOutput,
};
use tm_core::{ActorId, TimeInstant};
use tm_motion::{
    motion_plan, Command, MotionPlanOutput, PidParameters, PidStateTable, TeleportInstantTable,
};
use tm_snapshot::WorldSnapshot;

use crate::rngs::ActorRngs;
use crate::{PipelineBuilder, PipelineConfig, PipelineError, PipelineResult};

/// Index-aligned outputs of one tick.
#[derive(Clone, Debug)]
pub struct TickFrames {
    /// `collision[i]` is the hazard verdict for `vehicle_ids[i]`.
    pub collision: Vec<CollisionHazardData>,
    /// `control[i]` is the command to dispatch for `vehicle_ids[i]`.
    pub control: Vec<Command>,
}

/// The per-vehicle decision core.
///
/// Owns every table that survives across ticks — collision locks, PID
/// controller state, teleport clocks, and the per-vehicle RNG rows — and
/// runs the two stages over a caller-supplied [`WorldSnapshot`] once per
/// tick.  Create via [`TrafficPipeline::builder`].
pub struct TrafficPipeline {
    pub(crate) config: PipelineConfig,
    pub(crate) pid_parameters: PidParameters,

    /// Per-ego collision locks (stage 1 state).
    pub(crate) collision_locks: CollisionLockTable,
    /// Per-ego PID controller memory (stage 2 state).
    pub(crate) pid_states: PidStateTable,
    /// First-sight instants for hybrid-mode vehicles (stage 2 state).
    pub(crate) teleport_instants: TeleportInstantTable,
    /// Per-vehicle RNG rows, index-aligned per tick.
    pub(crate) rngs: ActorRngs,

    /// Dedicated worker pool; `None` shares Rayon's global pool.
    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl TrafficPipeline {
    /// Start building a pipeline.
    pub fn builder(config: PipelineConfig) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    /// Run both stages for one tick.
    ///
    /// `vehicle_ids` defines the index order of both output frames;
    /// `tl_hazards` is the traffic-light stage's hazard flag per index and
    /// must have the same length.
    pub fn run_tick(
        &mut self,
        snapshot: &WorldSnapshot,
        vehicle_ids: &[ActorId],
        tl_hazards: &[bool],
        now: TimeInstant,
    ) -> PipelineResult<TickFrames> {
        if tl_hazards.len() != vehicle_ids.len() {
            return Err(PipelineError::FrameSizeMismatch {
                expected: vehicle_ids.len(),
                got: tl_hazards.len(),
                what: "traffic-light hazard frame",
            });
        }

        self.rngs.align(vehicle_ids);

        // ── Stage 1: collision avoidance ──────────────────────────────────
        //
        // Evaluations read the start-of-tick lock table; row writes are
        // applied afterwards in ascending index order so the outcome does
        // not depend on worker scheduling.
        let collision_outputs = self.compute_collision(snapshot, vehicle_ids);

        let mut collision_frame = Vec::with_capacity(vehicle_ids.len());
        for (index, output) in collision_outputs.into_iter().enumerate() {
            output
                .lock_update
                .apply(&mut self.collision_locks, vehicle_ids[index]);
            collision_frame.push(output.hazard);
        }

        // ── Stage 2: motion planning ──────────────────────────────────────
        let motion_outputs =
            self.compute_motion(snapshot, vehicle_ids, &collision_frame, tl_hazards, now);

        let mut control_frame = Vec::with_capacity(vehicle_ids.len());
        for (index, output) in motion_outputs.into_iter().enumerate() {
            let actor = vehicle_ids[index];
            if let Some(state) = output.pid_state {
                self.pid_states.insert(actor, state);
            }
            if let Some(instant) = output.teleport_instant {
                self.teleport_instants.entry(actor).or_insert(instant);
            }
            control_frame.push(output.command);
        }

        let hazards = collision_frame.iter().filter(|h| h.hazard).count();
        debug!(vehicles = vehicle_ids.len(), hazards, %now, "tick planned");

        Ok(TickFrames { collision: collision_frame, control: control_frame })
    }

    // ── Read-only access to the persistent tables ─────────────────────────

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn collision_locks(&self) -> &CollisionLockTable {
        &self.collision_locks
    }

    pub fn pid_states(&self) -> &PidStateTable {
        &self.pid_states
    }

    pub fn teleport_instants(&self) -> &TeleportInstantTable {
        &self.teleport_instants
    }

    // ── Stage compute passes ──────────────────────────────────────────────

    fn compute_collision(
        &mut self,
        snapshot: &WorldSnapshot,
        vehicle_ids: &[ActorId],
    ) -> Vec<CollisionStageOutput> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let locks = &self.collision_locks;
        let rows = self.rngs.rows_mut();

        #[cfg(not(feature = "parallel"))]
        {
            rows.iter_mut()
                .enumerate()
                .map(|(index, (_, rng))| {
                    collision_avoidance(index, vehicle_ids, snapshot, locks, rng)
                })
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let pool = &self.pool;
            let run = move || {
                rows.par_iter_mut()
                    .enumerate()
                    .map(|(index, (_, rng))| {
                        collision_avoidance(index, vehicle_ids, snapshot, locks, rng)
                    })
                    .collect()
            };
            match pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }

    fn compute_motion(
        &self,
        snapshot: &WorldSnapshot,
        vehicle_ids: &[ActorId],
        collision_frame: &[CollisionHazardData],
        tl_hazards: &[bool],
        now: TimeInstant,
    ) -> Vec<MotionPlanOutput> {
        let pid_states = &self.pid_states;
        let teleport_instants = &self.teleport_instants;
        let pid_parameters = &self.pid_parameters;

        #[cfg(not(feature = "parallel"))]
        {
            (0..vehicle_ids.len())
                .map(|index| {
                    motion_plan(
                        index,
                        vehicle_ids,
                        snapshot,
                        collision_frame,
                        tl_hazards,
                        pid_states,
                        teleport_instants,
                        pid_parameters,
                        now,
                    )
                })
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let run = || {
                (0..vehicle_ids.len())
                    .into_par_iter()
                    .map(|index| {
                        motion_plan(
                            index,
                            vehicle_ids,
                            snapshot,
                            collision_frame,
                            tl_hazards,
                            pid_states,
                            teleport_instants,
                            pid_parameters,
                            now,
                        )
                    })
                    .collect()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }
}
