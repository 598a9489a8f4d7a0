//! Deterministic per-actor RNG.
//!
//! # Determinism strategy
//!
//! Each managed vehicle gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (actor_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive actor ids uniformly across the seed space.
//! This means:
//!
//! - Actors never share RNG state (no contention, no ordering dependency).
//! - The ignore-percentage sampling for a given actor is reproducible for a
//!   given global seed, regardless of how many workers evaluate the fleet.
//! - All RNG calls are local to the owning worker; no synchronisation.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ActorId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-actor deterministic RNG.
///
/// The type is `Send` but intentionally not `Sync` — each worker must hold
/// its own exclusive row (the pipeline aligns one per vehicle index).
pub struct ActorRng(SmallRng);

impl ActorRng {
    /// Seed deterministically from the run's global seed and an actor id.
    pub fn new(global_seed: u64, actor: ActorId) -> Self {
        let seed = global_seed ^ (actor.0 as u64).wrapping_mul(MIXING_CONSTANT);
        ActorRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform integer in `[0, 100]`, the domain of the ignore-percentage
    /// samplers.
    #[inline]
    pub fn sample_percentage(&mut self) -> u32 {
        self.0.gen_range(0..=100)
    }
}
