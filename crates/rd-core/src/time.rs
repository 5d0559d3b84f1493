//! Simulation time model.
//!
//! # Design
//!
//! Virtual time is a monotonically increasing `Tick` counter.  The mapping to
//! wall-clock time is held in `SimClock`:
//!
//!   wall_time = start_unix_secs + tick * tick_duration_secs
//!
//! Integer ticks keep all scheduling arithmetic exact and make equal-time
//! comparisons (which decide FIFO tie-breaking in the event queue) reliable.
//! The relief model runs at one tick per simulated minute by default.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and Unix wall-clock seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (seconds since epoch) of tick 0.
    pub start_unix_secs: i64,
    /// How many real seconds one tick represents.  Default: 60.
    pub tick_duration_secs: u32,
}

impl SimClock {
    pub fn new(start_unix_secs: i64, tick_duration_secs: u32) -> Self {
        Self { start_unix_secs, tick_duration_secs }
    }

    /// Elapsed simulated seconds at `tick`.
    #[inline]
    pub fn elapsed_secs(&self, tick: Tick) -> i64 {
        tick.0 as i64 * self.tick_duration_secs as i64
    }

    /// Unix timestamp corresponding to `tick`.
    #[inline]
    pub fn unix_secs(&self, tick: Tick) -> i64 {
        self.start_unix_secs + self.elapsed_secs(tick)
    }

    /// Break the time at `tick` into (day, hour, minute) components from sim
    /// start.  Handy for log lines without a datetime library.
    pub fn elapsed_dhm(&self, tick: Tick) -> (u64, u32, u32) {
        let total_secs = self.elapsed_secs(tick).max(0) as u64;
        let days = total_secs / 86_400;
        let hours = ((total_secs % 86_400) / 3_600) as u32;
        let minutes = ((total_secs % 3_600) / 60) as u32;
        (days, hours, minutes)
    }

    /// How many ticks span `secs` seconds? (rounds up)
    #[inline]
    pub fn ticks_for_secs(&self, secs: u64) -> u64 {
        secs.div_ceil(self.tick_duration_secs.max(1) as u64)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(0, 60)
    }
}
