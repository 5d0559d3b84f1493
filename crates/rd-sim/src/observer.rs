//! Simulation observer trait for progress reporting and data collection.

use rd_cargo::{Delivery, ParcelStatus};
use rd_core::{DriverId, ParcelId, Point, RoundId, Tick};
use rd_depot::DepotSnapshot;

use crate::Event;

/// One delivery attempt, as reported to [`SimObserver::on_delivery`].
#[derive(Clone, Debug, PartialEq)]
pub struct DeliveryRecord {
    pub tick:    Tick,
    pub parcel:  ParcelId,
    pub label:   String,
    pub driver:  DriverId,
    pub round:   Option<RoundId>,
    /// Where the driver stood when it tried.
    pub at:      Point,
    pub outcome: Delivery,
    /// Parcel status after the attempt.
    pub status:  ParcelStatus,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// event loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — delivery counter
///
/// ```rust,ignore
/// struct Counter { delivered: usize }
///
/// impl SimObserver for Counter {
///     fn on_delivery(&mut self, record: &DeliveryRecord) {
///         if record.outcome.is_delivered() {
///             self.delivered += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before each event is dispatched.
    fn on_event(&mut self, _tick: Tick, _event: &Event) {}

    /// Called after every delivery attempt, successful or not.
    fn on_delivery(&mut self, _record: &DeliveryRecord) {}

    /// Called when a driver is back at its depot with a finished round.
    ///
    /// `returned` is the number of undelivered parcels handed back.
    fn on_round_end(&mut self, _tick: Tick, _driver: DriverId, _round: RoundId, _returned: usize) {}

    /// Called once per depot at every snapshot interval
    /// (`config.snapshot_interval_ticks`).
    fn on_snapshot(&mut self, _snapshot: &DepotSnapshot) {}

    /// Called once after the last event has been processed.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
