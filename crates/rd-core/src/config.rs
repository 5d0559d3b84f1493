//! Model parameters for a relief-distribution run.
//!
//! Typically loaded from a JSON file by the application crate (enable the
//! `serde` feature) and handed to the simulation builder.  The defaults are
//! the calibrated values of the reference Gloucestershire scenario.

use crate::{CoreError, CoreResult, SimClock, Tick};

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReliefConfig {
    /// Maximum distance at which a parcel counts as delivered (exclusive).
    pub tolerance: f64,

    /// Ticks a driver spends in a bay loading one round.
    pub loading_time: u64,

    /// Ticks a driver spends at a delivery point handing a parcel over.
    pub delivery_time: u64,

    /// Target number of parcels per round.
    pub approx_manifest_size: usize,

    /// Number of drivers (each with one vehicle).
    pub num_drivers: usize,

    /// Number of parcels generated when no parcel file is supplied.
    pub num_parcels: usize,

    /// Loading bays per depot.
    pub num_bays: usize,

    /// Probability that a driver fails to reach the exact delivery point.
    pub prob_failed_delivery: f64,

    /// Vehicle speed in distance units per tick.
    pub vehicle_speed: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Hard stop for the event loop.
    pub total_ticks: u64,

    /// Emit a depot snapshot every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,

    /// Unix timestamp for tick 0.
    pub start_unix_secs: i64,

    /// Seconds per tick.
    pub tick_duration_secs: u32,
}

impl Default for ReliefConfig {
    fn default() -> Self {
        Self {
            tolerance:               5.0,
            loading_time:            20,
            delivery_time:           15,
            approx_manifest_size:    100,
            num_drivers:             10,
            num_parcels:             10_000,
            num_bays:                10,
            prob_failed_delivery:    0.1,
            vehicle_speed:           10.0,
            seed:                    0,
            total_ticks:             1_000_000,
            snapshot_interval_ticks: 60,
            start_unix_secs:         0,
            tick_duration_secs:      60,
        }
    }
}

impl ReliefConfig {
    /// The tick at which the event loop stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs, self.tick_duration_secs)
    }

    /// Reject parameter combinations the model cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.tolerance > 0.0) {
            return Err(CoreError::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.approx_manifest_size == 0 {
            return Err(CoreError::Config("approx_manifest_size must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.prob_failed_delivery) {
            return Err(CoreError::Config(format!(
                "prob_failed_delivery must be in [0, 1], got {}",
                self.prob_failed_delivery
            )));
        }
        if !(self.vehicle_speed > 0.0) {
            return Err(CoreError::Config(format!(
                "vehicle_speed must be positive, got {}",
                self.vehicle_speed
            )));
        }
        if self.tick_duration_secs == 0 {
            return Err(CoreError::Config("tick_duration_secs must be non-zero".into()));
        }
        Ok(())
    }
}
