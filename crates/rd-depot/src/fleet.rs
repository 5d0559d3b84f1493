//! The `Fleet` trait — the driver protocol the depot calls into.

use rd_cargo::{Carrier, Round, Vehicle};
use rd_core::{DriverId, Tick};

/// Depot-initiated calls on drivers.
///
/// The depot never owns drivers; whoever does (normally the simulation
/// runner) implements this trait and hands it to depot operations through
/// [`DepotCtx`][crate::DepotCtx].  Reactivation ("step the driver") is not a
/// method here: the depot schedules [`DepotEvent::Activate`][crate::DepotEvent::Activate]
/// instead.
pub trait Fleet {
    /// The vehicle assigned to `driver`, if any.
    fn vehicle_mut(&mut self, driver: DriverId) -> Option<&mut Vehicle>;

    /// Fallback carrier used when `driver` has no vehicle: the driver's own
    /// hands.  `None` if the driver cannot carry anything.
    fn driver_carrier_mut(&mut self, driver: DriverId) -> Option<&mut dyn Carrier>;

    /// The driver's manifest changed: `round` is now on board.
    fn update_round(&mut self, driver: DriverId, round: &Round);

    /// The driver is leaving the depot with a round; start timing it.
    fn start_round_clock(&mut self, driver: DriverId, now: Tick);
}
