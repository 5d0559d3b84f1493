//! The parcel record and its delivery state machine.

use std::fmt;

use rd_core::{ParcelId, Point, Tick};

use crate::CarrierId;

// ── Status ────────────────────────────────────────────────────────────────────

/// Delivery status.
///
/// ```text
/// Undelivered ──load──▶ OutForDelivery ──deliver()──▶ Delivered
///                            │   ▲
///                     deliver() miss
///                            ▼   │ reload
///                       FailedAttempt
/// ```
///
/// The numeric codes are stable and used by output backends.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParcelStatus {
    #[default]
    Undelivered    = 0,
    FailedAttempt  = 1,
    OutForDelivery = 2,
    Delivered      = 3,
}

impl ParcelStatus {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self == ParcelStatus::Delivered
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParcelStatus::Undelivered    => "undelivered",
            ParcelStatus::FailedAttempt  => "failed_attempt",
            ParcelStatus::OutForDelivery => "out_for_delivery",
            ParcelStatus::Delivered      => "delivered",
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── History ───────────────────────────────────────────────────────────────────

/// One entry of a parcel's history log.
#[derive(Clone, Debug, PartialEq)]
pub struct ParcelEvent {
    pub tick: Tick,
    pub kind: ParcelEventKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParcelEventKind {
    /// Attached to its first carrier.
    Created { carrier: CarrierId },
    /// Ownership moved between carriers.
    Transferred { from: CarrierId, to: CarrierId },
    /// Handed over at the delivery point.
    Delivered { at: Point },
    /// Delivery attempted too far from the delivery point.
    FailedAttempt { at: Point, distance: f64 },
}

impl fmt::Display for ParcelEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParcelEventKind::Created { carrier } => write!(f, "created at {carrier}"),
            ParcelEventKind::Transferred { from, to } => write!(f, "{from} -> {to}"),
            ParcelEventKind::Delivered { at } => write!(f, "delivered at {at}"),
            ParcelEventKind::FailedAttempt { at, distance } => {
                write!(f, "failed attempt at {at} ({distance:.1} away)")
            }
        }
    }
}

// ── Spec ──────────────────────────────────────────────────────────────────────

/// Everything needed to create a parcel.  Physical attributes are carried
/// through for reporting and never interpreted by the core.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ParcelSpec {
    pub delivery_location: Point,
    /// Width, depth, height.
    pub dims:              [f64; 3],
    pub weight:            f64,
}

impl ParcelSpec {
    pub fn to(delivery_location: Point) -> Self {
        Self { delivery_location, ..Self::default() }
    }
}

// ── Parcel ────────────────────────────────────────────────────────────────────

/// A single aid parcel.
///
/// Fields are read-only from outside the crate: ownership and status change
/// only through the transfer protocol and [`ParcelStore::deliver`][crate::ParcelStore::deliver].
#[derive(Clone, Debug)]
pub struct Parcel {
    pub(crate) id:                ParcelId,
    pub(crate) label:             String,
    pub(crate) carrier:           Option<CarrierId>,
    pub(crate) delivery_location: Point,
    /// Where the parcel was last seen.  Becomes its effective location once
    /// it has no carrier.
    pub(crate) last_point:        Point,
    pub(crate) status:            ParcelStatus,
    pub(crate) history:           Vec<ParcelEvent>,
    pub(crate) dims:              [f64; 3],
    pub(crate) weight:            f64,
}

impl Parcel {
    #[inline]
    pub fn id(&self) -> ParcelId {
        self.id
    }

    /// Human-readable label, e.g. `"Parcel Q7ZK"`.
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn carrier(&self) -> Option<CarrierId> {
        self.carrier
    }

    #[inline]
    pub fn delivery_location(&self) -> Point {
        self.delivery_location
    }

    #[inline]
    pub fn last_point(&self) -> Point {
        self.last_point
    }

    #[inline]
    pub fn status(&self) -> ParcelStatus {
        self.status
    }

    pub fn history(&self) -> &[ParcelEvent] {
        &self.history
    }

    pub fn dims(&self) -> [f64; 3] {
        self.dims
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Number of failed delivery attempts recorded so far.
    pub fn failed_attempts(&self) -> usize {
        self.history
            .iter()
            .filter(|e| matches!(e.kind, ParcelEventKind::FailedAttempt { .. }))
            .count()
    }

    pub(crate) fn log(&mut self, tick: Tick, kind: ParcelEventKind) {
        self.history.push(ParcelEvent { tick, kind });
    }
}
