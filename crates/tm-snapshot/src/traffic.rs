//! Corridor-overlap lookup.
//!
//! Localization knows which actors' extended corridors intersect and
//! publishes the symmetric relation here once per tick.  The collision
//! stage uses it as its candidate pre-filter, so an actor pair that never
//! appears here is never negotiated.

use std::collections::{HashMap, HashSet};

use tm_core::ActorId;

/// Which actors' corridors overlap which, keyed by actor id.
#[derive(Clone, Debug, Default)]
pub struct TrackTraffic {
    overlaps: HashMap<ActorId, HashSet<ActorId>>,
}

impl TrackTraffic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `a`'s and `b`'s corridors overlap.  The relation is kept
    /// symmetric; self-overlap is ignored.
    pub fn register_overlap(&mut self, a: ActorId, b: ActorId) {
        if a == b {
            return;
        }
        self.overlaps.entry(a).or_default().insert(b);
        self.overlaps.entry(b).or_default().insert(a);
    }

    /// All actors whose corridors overlap `ego`'s.  Empty for unknown ids.
    pub fn overlapping_vehicles(&self, ego: ActorId) -> impl Iterator<Item = ActorId> + '_ {
        self.overlaps.get(&ego).into_iter().flatten().copied()
    }
}
