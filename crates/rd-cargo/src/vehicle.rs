//! `Vehicle` — the mobile carrier.

use rd_core::{DriverId, Point, VehicleId};

use crate::{Carrier, CarrierId, Hold};

/// A vehicle holding parcels, usually driven by one driver.
///
/// The vehicle's position is owned by the vehicle; the driver model moves
/// it with [`set_position`][Self::set_position] while travelling.
#[derive(Clone, Debug)]
pub struct Vehicle {
    id:       VehicleId,
    driver:   Option<DriverId>,
    position: Point,
    hold:     Hold,
}

impl Vehicle {
    pub fn new(id: VehicleId, position: Point, driver: Option<DriverId>) -> Self {
        Self { id, driver, position, hold: Hold::new() }
    }

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    #[inline]
    pub fn driver(&self) -> Option<DriverId> {
        self.driver
    }

    pub fn set_driver(&mut self, driver: DriverId) {
        self.driver = Some(driver);
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Park the vehicle: unbind it from its driver, leaving it where the
    /// driver last was (or where it already is when it has no driver).
    pub fn set_stationary(&mut self, driver_position: Option<Point>) {
        if self.driver.take().is_some() {
            if let Some(p) = driver_position {
                self.position = p;
            }
        }
    }
}

impl Carrier for Vehicle {
    #[inline]
    fn carrier_id(&self) -> CarrierId {
        CarrierId::Vehicle(self.id)
    }

    #[inline]
    fn location(&self) -> Point {
        self.position
    }

    fn hold(&self) -> &Hold {
        &self.hold
    }

    fn hold_mut(&mut self) -> &mut Hold {
        &mut self.hold
    }
}
