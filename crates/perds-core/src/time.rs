//! Simulation time model.
//!
//! # Design
//!
//! Time is an absolute `SimTime` counted in **milliseconds** since the start
//! of the scenario.  Durations (edge travel times, repositioning horizons) use
//! `std::time::Duration`, and `SimTime + Duration` yields a later `SimTime`.
//!
//! Integer milliseconds keep event ordering exact (no floating-point drift)
//! while still resolving sub-second travel times.

use std::fmt;
use std::time::Duration;

/// An absolute simulation timestamp in milliseconds since scenario start.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    #[inline]
    pub fn from_secs(secs: u64) -> SimTime {
        SimTime(secs * 1_000)
    }

    #[inline]
    pub fn from_millis(millis: u64) -> SimTime {
        SimTime(millis)
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000.0
    }

    /// Time elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: SimTime) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add<Duration> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: Duration) -> SimTime {
        let millis = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        SimTime(self.0.saturating_add(millis))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T+{}.{:03}s", self.0 / 1_000, self.0 % 1_000)
    }
}
