//! Fluent builder for constructing a [`TrafficPipeline`].

use tm_collision::CollisionLockTable;
use tm_motion::{PidParameters, PidStateTable, TeleportInstantTable};

use crate::rngs::ActorRngs;
use crate::{PipelineConfig, PipelineError, PipelineResult, TrafficPipeline};

/// Fluent builder for [`TrafficPipeline`].
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                    |
/// |---------------------|--------------------------------------------|
/// | `.pid_parameters(p)`| [`PidParameters::default()`]               |
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = TrafficPipeline::builder(PipelineConfig::new(seed))
///     .pid_parameters(tuned_gains)
///     .build()?;
/// ```
pub struct PipelineBuilder {
    config: PipelineConfig,
    pid_parameters: Option<PidParameters>,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, pid_parameters: None }
    }

    /// Override the default PID gain sets.
    pub fn pid_parameters(mut self, parameters: PidParameters) -> Self {
        self.pid_parameters = Some(parameters);
        self
    }

    /// Validate inputs and return a ready-to-run [`TrafficPipeline`].
    pub fn build(self) -> PipelineResult<TrafficPipeline> {
        let pid_parameters = self.pid_parameters.unwrap_or_default();

        if !pid_parameters.windup_guard.is_finite() || pid_parameters.windup_guard <= 0.0 {
            return Err(PipelineError::Config(format!(
                "windup guard must be finite and positive, got {}",
                pid_parameters.windup_guard
            )));
        }
        for gains in [
            &pid_parameters.urban_longitudinal,
            &pid_parameters.highway_longitudinal,
            &pid_parameters.urban_lateral,
            &pid_parameters.highway_lateral,
        ] {
            if !(gains.kp.is_finite() && gains.kd.is_finite() && gains.ki.is_finite()) {
                return Err(PipelineError::Config(format!(
                    "PID gains must be finite, got {gains:?}"
                )));
            }
        }
        if self.config.num_threads == Some(0) {
            return Err(PipelineError::Config(
                "num_threads must be at least 1".to_string(),
            ));
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| PipelineError::Config(e.to_string()))?,
            ),
            None => None,
        };

        Ok(TrafficPipeline {
            rngs: ActorRngs::new(self.config.seed),
            config: self.config,
            pid_parameters,
            collision_locks: CollisionLockTable::new(),
            pid_states: PidStateTable::new(),
            teleport_instants: TeleportInstantTable::new(),
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
