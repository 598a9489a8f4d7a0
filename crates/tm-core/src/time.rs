//! Simulation time model.
//!
//! The core never reads a wall clock: the stage scheduler stamps each tick
//! with a `TimeInstant` and passes it down, so runs are reproducible and
//! tests can drive time explicitly.  An instant is seconds since an
//! arbitrary epoch as `f64`; all arithmetic the core needs is "seconds
//! elapsed between two instants".

use std::fmt;
use std::ops::Sub;

/// A point in simulation time, in seconds since an arbitrary epoch.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeInstant(pub f64);

impl TimeInstant {
    pub const ZERO: TimeInstant = TimeInstant(0.0);

    #[inline]
    pub fn from_seconds(seconds: f64) -> Self {
        TimeInstant(seconds)
    }

    #[inline]
    pub fn seconds(self) -> f64 {
        self.0
    }

    /// Seconds elapsed from `earlier` to `self`.  Negative when the clock
    /// stepped backwards; callers guard `dt <= 0` explicitly.
    #[inline]
    pub fn elapsed_since(self, earlier: TimeInstant) -> f64 {
        self.0 - earlier.0
    }

    /// The instant `seconds` after `self`.
    #[inline]
    pub fn offset(self, seconds: f64) -> TimeInstant {
        TimeInstant(self.0 + seconds)
    }
}

impl Sub for TimeInstant {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: TimeInstant) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for TimeInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}s", self.0)
    }
}
