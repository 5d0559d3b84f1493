use rd_cargo::CargoError;
use rd_core::{DepotId, DriverId};
use thiserror::Error;

/// Depot invariant violations.
///
/// Depot operations never return these: they log them and carry on.
/// [`Depot::check_invariants`][crate::Depot::check_invariants] reports them
/// for tests and debug assertions.
#[derive(Debug, Error)]
pub enum DepotError {
    #[error("{driver} is not occupying a bay at {depot}")]
    NotOccupying { depot: DepotId, driver: DriverId },

    #[error("{driver} is already occupying or waiting at {depot}")]
    AlreadyPresent { depot: DepotId, driver: DriverId },

    #[error("{depot} has {occupying} drivers in {num_bays} bays")]
    OverCapacity { depot: DepotId, occupying: usize, num_bays: usize },

    #[error("{driver} is both occupying and waiting at {depot}")]
    OccupyingAndWaiting { depot: DepotId, driver: DriverId },

    #[error("{driver} appears more than once in the queues of {depot}")]
    Duplicate { depot: DepotId, driver: DriverId },

    #[error("{0} has neither a vehicle nor a hand-carry hold")]
    NoCarrier(DriverId),

    #[error("round transfer failed: {0}")]
    Transfer(#[from] CargoError),
}
