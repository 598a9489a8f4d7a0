//! Collision locks: per-ego memory of the currently tracked lead vehicle.
//!
//! While a vehicle brakes for a lead, its detection boundary must not
//! shrink faster than the gap closes or the lead would be "lost" between
//! ticks and re-acquired with a jolt.  The lock records the gap at
//! acquisition time and the most recent gap, and the boundary extension in
//! [`crate::boundary`] uses both to hold the lead smoothly.

use std::collections::HashMap;

use tm_core::ActorId;

/// One vehicle's lock on its current lead.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionLock {
    pub lead_vehicle_id: ActorId,
    /// Gap at lock acquisition, metres.  Written only when the lock is
    /// created or re-assigned to a new lead, never while tracking.
    pub initial_lock_distance: f64,
    /// Most recent gap to the lead, metres.
    pub distance_to_lead_vehicle: f64,
}

/// All locks, keyed by the ego holding them.
pub type CollisionLockTable = HashMap<ActorId, CollisionLock>;

// ── LockUpdate ────────────────────────────────────────────────────────────────

/// What one ego evaluation decided about its own lock-table row.
///
/// Evaluations never write the shared table directly; the pipeline applies
/// these sequentially in ascending index order after the (possibly
/// parallel) compute pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LockUpdate {
    /// Write this lock into the ego's row.
    Set(CollisionLock),
    /// Erase the ego's row.
    Clear,
    /// The negotiator never touched the row; leave it as it was.
    Leave,
}

impl LockUpdate {
    /// Apply this update to `ego`'s row of `table`.
    pub fn apply(self, table: &mut CollisionLockTable, ego: ActorId) {
        match self {
            LockUpdate::Set(lock) => {
                table.insert(ego, lock);
            }
            LockUpdate::Clear => {
                table.remove(&ego);
            }
            LockUpdate::Leave => {}
        }
    }
}

// ── LockView ──────────────────────────────────────────────────────────────────

/// Copy-on-write view of the lock table for one ego evaluation.
///
/// Reads of other actors' rows go straight to the start-of-tick table;
/// reads of the ego's own row see the transitions made earlier in the same
/// evaluation (a candidate that produced no hazard releases the lock before
/// the next candidate is negotiated).  This is what makes evaluations safe
/// to run concurrently: each one mutates only its private ego-row copy.
pub struct LockView<'a> {
    table: &'a CollisionLockTable,
    ego: ActorId,
    ego_row: Option<CollisionLock>,
    touched: bool,
}

impl<'a> LockView<'a> {
    pub fn new(table: &'a CollisionLockTable, ego: ActorId) -> Self {
        Self {
            table,
            ego,
            ego_row: table.get(&ego).copied(),
            touched: false,
        }
    }

    /// The lock held by `actor`, as visible to this evaluation.
    pub fn get(&self, actor: ActorId) -> Option<&CollisionLock> {
        if actor == self.ego {
            self.ego_row.as_ref()
        } else {
            self.table.get(&actor)
        }
    }

    pub(crate) fn set_ego(&mut self, lock: CollisionLock) {
        self.touched = true;
        self.ego_row = Some(lock);
    }

    pub(crate) fn clear_ego(&mut self) {
        self.touched = true;
        self.ego_row = None;
    }

    /// Collapse the evaluation's transitions into the row update to apply.
    pub fn into_update(self) -> LockUpdate {
        if !self.touched {
            return LockUpdate::Leave;
        }
        match self.ego_row {
            Some(lock) => LockUpdate::Set(lock),
            None => LockUpdate::Clear,
        }
    }
}
