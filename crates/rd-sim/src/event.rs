//! The simulation's event type.

use rd_core::{DepotId, DriverId};
use rd_depot::DepotEvent;

/// One entry on the simulation's [`EventQueue`][rd_schedule::EventQueue].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Step the driver's state machine.
    Activate(DriverId),

    /// A driver's loading time in a bay of `depot` is over.
    LoadComplete { depot: DepotId, driver: DriverId },
}

impl Event {
    /// The driver this event concerns.
    pub fn driver(&self) -> DriverId {
        match *self {
            Event::Activate(d) | Event::LoadComplete { driver: d, .. } => d,
        }
    }
}

impl From<DepotEvent> for Event {
    fn from(e: DepotEvent) -> Self {
        match e {
            DepotEvent::Activate(driver)             => Event::Activate(driver),
            DepotEvent::LoadComplete { depot, driver } => Event::LoadComplete { depot, driver },
        }
    }
}
