//! `ParcelStore` — arena of every parcel in the run, and `deliver()`.

use tracing::debug;

use rd_core::{Metric, ParcelId, Tick};

use crate::{Carrier, CargoError, CargoResult, Parcel, ParcelEventKind, ParcelSpec, ParcelStatus};

/// Outcome of a single delivery attempt.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Delivery {
    /// Handed over; the parcel has left circulation.
    Delivered,
    /// Too far from the delivery point.  The parcel stays with its carrier.
    Missed { distance: f64 },
}

impl Delivery {
    #[inline]
    pub fn is_delivered(self) -> bool {
        matches!(self, Delivery::Delivered)
    }
}

/// Owns every [`Parcel`], indexed by [`ParcelId`].
#[derive(Clone, Debug, Default)]
pub struct ParcelStore {
    parcels: Vec<Parcel>,
}

impl ParcelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parcel and attach it to `carrier`.
    pub fn create(
        &mut self,
        spec:    ParcelSpec,
        label:   String,
        carrier: &mut dyn Carrier,
        now:     Tick,
    ) -> ParcelId {
        let id = ParcelId(self.parcels.len() as u32);
        let owner = carrier.carrier_id();
        let mut parcel = Parcel {
            id,
            label,
            carrier:           Some(owner),
            delivery_location: spec.delivery_location,
            last_point:        carrier.location(),
            status:            ParcelStatus::Undelivered,
            history:           Vec::new(),
            dims:              spec.dims,
            weight:            spec.weight,
        };
        parcel.log(now, ParcelEventKind::Created { carrier: owner });
        self.parcels.push(parcel);
        carrier.add(id);
        id
    }

    #[inline]
    pub fn get(&self, id: ParcelId) -> Option<&Parcel> {
        self.parcels.get(id.index())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: ParcelId) -> Option<&mut Parcel> {
        self.parcels.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parcel> {
        self.parcels.iter()
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    /// Parcel counts indexed by [`ParcelStatus::code`].
    pub fn status_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for p in &self.parcels {
            counts[p.status.code() as usize] += 1;
        }
        counts
    }

    /// Attempt to deliver `id`.
    ///
    /// `carrier` must be the parcel's current owner, or `None` when the
    /// parcel has no owner (its last recorded point is then used).  The
    /// effective location is compared with the delivery location under
    /// `metric`:
    ///
    /// - strictly closer than `tolerance` → the parcel is removed from its
    ///   carrier and becomes `Delivered`;
    /// - otherwise it becomes `FailedAttempt` and stays where it is.
    ///
    /// One check, no retries.  Delivering an already delivered parcel reports
    /// success without touching anything.
    pub fn deliver(
        &mut self,
        id:        ParcelId,
        carrier:   Option<&mut dyn Carrier>,
        metric:    &dyn Metric,
        tolerance: f64,
        now:       Tick,
    ) -> CargoResult<Delivery> {
        let parcel = self.parcels.get_mut(id.index()).ok_or(CargoError::UnknownParcel(id))?;
        if parcel.status == ParcelStatus::Delivered {
            return Ok(Delivery::Delivered);
        }

        let mut carrier = match (parcel.carrier, carrier) {
            (None, _) => None,
            (Some(owner), Some(c)) if c.carrier_id() == owner && c.holds(id) => Some(c),
            (owner, _) => return Err(CargoError::WrongCarrier { parcel: id, owner }),
        };

        let at = carrier.as_ref().map_or(parcel.last_point, |c| c.location());
        let distance = metric.distance(at, parcel.delivery_location);
        parcel.last_point = at;

        if distance < tolerance {
            if let Some(c) = carrier.as_mut() {
                c.remove(id);
            }
            parcel.carrier = None;
            parcel.status = ParcelStatus::Delivered;
            parcel.log(now, ParcelEventKind::Delivered { at });
            debug!(parcel = %id, %at, "parcel delivered");
            Ok(Delivery::Delivered)
        } else {
            parcel.status = ParcelStatus::FailedAttempt;
            parcel.log(now, ParcelEventKind::FailedAttempt { at, distance });
            debug!(parcel = %id, %at, distance, "delivery attempt missed");
            Ok(Delivery::Missed { distance })
        }
    }
}
