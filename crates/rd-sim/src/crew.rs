//! `Crew` — drivers and vehicles, and the depot-facing `Fleet` impl.

use rd_cargo::{Carrier, Round, Vehicle};
use rd_core::{DriverId, Tick};
use rd_depot::Fleet;
use tracing::debug;

use crate::Driver;

/// Every driver and vehicle in the run, indexed by their IDs.
///
/// Kept apart from the depots so a depot operation can borrow `&mut Depot`
/// and `&mut Crew` (as its [`Fleet`]) at the same time.
#[derive(Default)]
pub struct Crew {
    pub drivers:  Vec<Driver>,
    pub vehicles: Vec<Vehicle>,
}

impl Crew {
    pub fn driver(&self, id: DriverId) -> Option<&Driver> {
        self.drivers.get(id.index())
    }

    pub fn driver_mut(&mut self, id: DriverId) -> Option<&mut Driver> {
        self.drivers.get_mut(id.index())
    }

    /// Whatever is carrying `driver`'s round: its vehicle, or the driver
    /// itself when it has none.
    pub fn carrier_of(&mut self, driver: DriverId) -> Option<&mut dyn Carrier> {
        let d = self.drivers.get_mut(driver.index())?;
        match d.vehicle() {
            Some(v) => self.vehicles.get_mut(v.index()).map(|v| v as &mut dyn Carrier),
            None => Some(d as &mut dyn Carrier),
        }
    }

    /// Complete `driver`'s pending move, bringing its vehicle along.
    pub(crate) fn arrive(&mut self, driver: DriverId) {
        let Some(d) = self.drivers.get_mut(driver.index()) else { return };
        let Some(p) = d.arrive() else { return };
        if let Some(v) = d.vehicle().and_then(|v| self.vehicles.get_mut(v.index())) {
            v.set_position(p);
        }
    }

    /// Retire `driver` and park its vehicle where the driver stands.
    pub(crate) fn retire(&mut self, driver: DriverId) {
        let Some(d) = self.drivers.get_mut(driver.index()) else { return };
        d.retire();
        let at = d.position();
        if let Some(v) = d.vehicle().and_then(|v| self.vehicles.get_mut(v.index())) {
            v.set_stationary(Some(at));
        }
    }
}

impl Fleet for Crew {
    fn vehicle_mut(&mut self, driver: DriverId) -> Option<&mut Vehicle> {
        let v = self.drivers.get(driver.index())?.vehicle()?;
        self.vehicles.get_mut(v.index())
    }

    fn driver_carrier_mut(&mut self, driver: DriverId) -> Option<&mut dyn Carrier> {
        self.drivers.get_mut(driver.index()).map(|d| d as &mut dyn Carrier)
    }

    fn update_round(&mut self, driver: DriverId, round: &Round) {
        if let Some(d) = self.drivers.get_mut(driver.index()) {
            d.assign_round(round);
        }
    }

    fn start_round_clock(&mut self, driver: DriverId, now: Tick) {
        if let Some(d) = self.drivers.get_mut(driver.index()) {
            debug!(%driver, %now, parcels = d.manifest().len(), "round clock started");
            d.start_round(now);
        }
    }
}
