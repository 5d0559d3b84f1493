//! `Round` — a delivery manifest.

use rd_core::{ParcelId, RoundId};

/// A batch of parcels dispatched together on one driver trip.
///
/// Immutable once formed: the parcel list can be read but never edited.
/// While queued at a depot the parcels are still owned by the depot; on
/// dispatch they move to a vehicle in a single transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    id:      RoundId,
    parcels: Vec<ParcelId>,
}

impl Round {
    pub fn new(id: RoundId, parcels: Vec<ParcelId>) -> Self {
        Self { id, parcels }
    }

    #[inline]
    pub fn id(&self) -> RoundId {
        self.id
    }

    #[inline]
    pub fn parcels(&self) -> &[ParcelId] {
        &self.parcels
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }
}
