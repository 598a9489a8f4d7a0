//! Index-aligned per-vehicle RNG rows.
//!
//! The collision stage needs `&mut` access to each ego's RNG while reading
//! the shared snapshot and lock table.  Keeping the rows in their own
//! container, aligned with the vehicle index order, lets the pipeline hand
//! each worker exclusive access to exactly one row.

use tm_core::{ActorId, ActorRng};

pub(crate) struct ActorRngs {
    seed: u64,
    rows: Vec<(ActorId, ActorRng)>,
}

impl ActorRngs {
    pub(crate) fn new(seed: u64) -> Self {
        Self { seed, rows: Vec::new() }
    }

    /// Align the rows with `vehicle_ids`.
    ///
    /// A row keeps its RNG stream as long as the same actor occupies its
    /// index; rows for new or re-ordered actors are re-seeded from
    /// `(seed, actor)`, so streams stay per-actor deterministic across
    /// fleet changes.
    pub(crate) fn align(&mut self, vehicle_ids: &[ActorId]) {
        self.rows.truncate(vehicle_ids.len());
        for (index, &actor) in vehicle_ids.iter().enumerate() {
            match self.rows.get_mut(index) {
                Some(row) if row.0 == actor => {}
                Some(row) => *row = (actor, ActorRng::new(self.seed, actor)),
                None => self.rows.push((actor, ActorRng::new(self.seed, actor))),
            }
        }
    }

    /// Exclusive access to all rows, index-aligned with the last `align`.
    pub(crate) fn rows_mut(&mut self) -> &mut [(ActorId, ActorRng)] {
        &mut self.rows
    }
}
