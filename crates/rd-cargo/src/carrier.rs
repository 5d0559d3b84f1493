//! The `Carrier` capability and the ownership-transfer primitive.

use std::fmt;

use rustc_hash::FxHashSet;
use tracing::debug;

use rd_core::{DepotId, DriverId, ParcelId, Point, Tick, VehicleId};

use crate::{CargoError, CargoResult, Hold, ParcelEventKind, ParcelStatus, ParcelStore};

// ── CarrierId ─────────────────────────────────────────────────────────────────

/// Identity of whatever currently owns a parcel.
///
/// `Depot` and `Vehicle` are the two regular carriers.  `Driver` only
/// appears when a round is handed to a driver who has no vehicle assigned.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CarrierId {
    Depot(DepotId),
    Vehicle(VehicleId),
    Driver(DriverId),
}

impl CarrierId {
    /// `true` for carriers that move parcels towards their destination.
    #[inline]
    pub fn is_mobile(self) -> bool {
        !matches!(self, CarrierId::Depot(_))
    }
}

impl fmt::Display for CarrierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarrierId::Depot(id)   => write!(f, "{id}"),
            CarrierId::Vehicle(id) => write!(f, "{id}"),
            CarrierId::Driver(id)  => write!(f, "{id}"),
        }
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Something that holds parcels and has a position.
///
/// Implementors only provide identity, position and access to their
/// [`Hold`]; the collection operations and the transfer protocol are
/// provided methods so every carrier behaves identically.
///
/// The raw `add`/`remove` operations touch the hold only.  Use
/// [`transfer_to`][Self::transfer_to] to move parcels between carriers so
/// the parcel records follow.
pub trait Carrier {
    fn carrier_id(&self) -> CarrierId;

    fn location(&self) -> Point;

    fn hold(&self) -> &Hold;

    fn hold_mut(&mut self) -> &mut Hold;

    fn add(&mut self, parcel: ParcelId) {
        self.hold_mut().insert(parcel);
    }

    fn remove(&mut self, parcel: ParcelId) -> bool {
        self.hold_mut().remove(parcel)
    }

    fn add_all(&mut self, parcels: &[ParcelId]) {
        let hold = self.hold_mut();
        for &p in parcels {
            hold.insert(p);
        }
    }

    fn remove_all(&mut self, parcels: &[ParcelId]) -> bool {
        self.hold_mut().remove_many(parcels)
    }

    fn holds(&self, parcel: ParcelId) -> bool {
        self.hold().contains(parcel)
    }

    /// Move `items` from `self` to `destination`, all or nothing.
    ///
    /// Every item must exist, be held by `self`, and appear once.  If any
    /// check fails nothing is mutated on either side and the first offending
    /// item is reported.  On success each parcel leaves `self`, joins
    /// `destination`, records `destination` as its carrier, and logs the
    /// move in its history.
    fn transfer_to(
        &mut self,
        items:       &[ParcelId],
        destination: &mut dyn Carrier,
        parcels:     &mut ParcelStore,
        now:         Tick,
    ) -> CargoResult<()> {
        let from = self.carrier_id();
        let to = destination.carrier_id();
        if from == to {
            return Err(CargoError::SameCarrier(from));
        }

        // ── Pre-conditions (no mutation) ──────────────────────────────────
        let mut seen = FxHashSet::default();
        for &p in items {
            if !seen.insert(p) {
                return Err(CargoError::DuplicateItem(p));
            }
            let parcel = parcels.get(p).ok_or(CargoError::UnknownParcel(p))?;
            if !self.holds(p) || parcel.carrier != Some(from) {
                return Err(CargoError::NotHeld { parcel: p, carrier: from });
            }
        }

        // ── Commit ────────────────────────────────────────────────────────
        self.remove_all(items);
        destination.add_all(items);
        let at = destination.location();
        for &p in items {
            if let Some(parcel) = parcels.get_mut(p) {
                parcel.carrier = Some(to);
                parcel.last_point = at;
                parcel.status = status_after_move(parcel.status, to);
                parcel.log(now, ParcelEventKind::Transferred { from, to });
            }
        }
        debug!(%from, %to, count = items.len(), "parcels transferred");
        Ok(())
    }
}

/// Status a parcel takes on when it changes hands.
fn status_after_move(status: ParcelStatus, to: CarrierId) -> ParcelStatus {
    match (status, to.is_mobile()) {
        (ParcelStatus::Delivered, _)           => ParcelStatus::Delivered,
        (_, true)                              => ParcelStatus::OutForDelivery,
        (ParcelStatus::OutForDelivery, false)  => ParcelStatus::Undelivered,
        (other, false)                         => other,
    }
}
