//! Pipeline configuration.

/// Top-level configuration for a [`TrafficPipeline`][crate::TrafficPipeline].
///
/// Typically loaded from the application's config file and passed to
/// [`TrafficPipeline::builder`][crate::TrafficPipeline::builder].
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Master RNG seed.  The same seed always produces the same
    /// ignore-percentage rolls for every vehicle.
    pub seed: u64,

    /// Worker thread count for the stage evaluations.  `None` shares
    /// Rayon's global pool; ignored without the `parallel` feature.
    pub num_threads: Option<usize>,
}

impl PipelineConfig {
    pub fn new(seed: u64) -> Self {
        Self { seed, num_threads: None }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
