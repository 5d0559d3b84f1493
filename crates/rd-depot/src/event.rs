//! Events the depot places on the scheduler.

use rd_core::{DepotId, DriverId};

/// Something the depot needs to happen later.
///
/// The simulation's own event type wraps these via `From<DepotEvent>`, so the
/// depot can schedule into any queue without knowing what else runs on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DepotEvent {
    /// Step the driver (its own next activation).
    Activate(DriverId),

    /// The driver's loading time in a bay is over.
    LoadComplete { depot: DepotId, driver: DriverId },
}
