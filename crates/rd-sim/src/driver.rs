//! `Driver` — the mobile agent that consumes rounds.

use std::collections::VecDeque;
use std::fmt;

use rd_cargo::{Carrier, CarrierId, Hold, Round};
use rd_core::{AgentRng, DepotId, DriverId, ParcelId, Point, RoundId, Tick, VehicleId};

// ── Status ────────────────────────────────────────────────────────────────────

/// Where a driver is in its round cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DriverStatus {
    /// At the home depot, waiting for or loading a round.
    Replenishing,
    /// Travelling to the next delivery point, or about to.
    Outbound,
    /// At a delivery point, handing a parcel over.
    Distributing,
    /// Manifest empty, heading back to the depot.
    Inbound,
}

impl DriverStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DriverStatus::Replenishing => "REPLENISHING",
            DriverStatus::Outbound     => "OUTBOUND",
            DriverStatus::Distributing => "DISTRIBUTING",
            DriverStatus::Inbound      => "INBOUND",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Redelivery ────────────────────────────────────────────────────────────────

/// What a returning driver does with parcels it failed to deliver.
///
/// Either way the parcels are handed back to the home depot.  `deliver()`
/// itself never re-queues anything.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RedeliveryPolicy {
    /// Leave them in the depot's backlog; no new rounds are formed.
    Abandon,
    /// Plan them into fresh rounds at the tail of the depot's queue.
    #[default]
    ReturnToDepot,
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// A delivery driver.
///
/// A driver is also a [`Carrier`] (`CarrierId::Driver`): when it has no
/// vehicle, the depot loads rounds straight into its hands.
pub struct Driver {
    id:               DriverId,
    home:             DepotId,
    vehicle:          Option<VehicleId>,
    position:         Point,
    /// Where the driver will be when its next activation fires.
    heading:          Option<Point>,
    status:           DriverStatus,
    hold:             Hold,
    round:            Option<RoundId>,
    /// Parcels of the current round not yet attempted, in delivery order.
    manifest:         VecDeque<ParcelId>,
    target:           Option<ParcelId>,
    round_started:    Option<Tick>,
    rounds_completed: u32,
    retired:          bool,
    rng:              AgentRng,
}

impl Driver {
    pub fn new(
        id:       DriverId,
        home:     DepotId,
        position: Point,
        vehicle:  Option<VehicleId>,
        rng:      AgentRng,
    ) -> Self {
        Self {
            id,
            home,
            vehicle,
            position,
            heading:          None,
            status:           DriverStatus::Replenishing,
            hold:             Hold::new(),
            round:            None,
            manifest:         VecDeque::new(),
            target:           None,
            round_started:    None,
            rounds_completed: 0,
            retired:          false,
            rng,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> DriverId {
        self.id
    }

    #[inline]
    pub fn home(&self) -> DepotId {
        self.home
    }

    #[inline]
    pub fn vehicle(&self) -> Option<VehicleId> {
        self.vehicle
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn status(&self) -> DriverStatus {
        self.status
    }

    pub fn round(&self) -> Option<RoundId> {
        self.round
    }

    pub fn manifest(&self) -> impl ExactSizeIterator<Item = ParcelId> + '_ {
        self.manifest.iter().copied()
    }

    pub fn target(&self) -> Option<ParcelId> {
        self.target
    }

    pub fn round_started(&self) -> Option<Tick> {
        self.round_started
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    /// `true` once the home depot has told this driver it has nothing left.
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    // ── Transitions (driven by the sim and the depot) ─────────────────────

    pub(crate) fn set_status(&mut self, status: DriverStatus) {
        self.status = status;
    }

    pub(crate) fn rng_mut(&mut self) -> &mut AgentRng {
        &mut self.rng
    }

    /// `round` is on board; its parcels become the manifest.
    pub(crate) fn assign_round(&mut self, round: &Round) {
        self.round = Some(round.id());
        self.manifest = round.parcels().iter().copied().collect();
        self.target = None;
    }

    /// Leaving the depot with a round.
    pub(crate) fn start_round(&mut self, now: Tick) {
        self.round_started = Some(now);
        self.status = DriverStatus::Outbound;
    }

    /// Back at the depot.  Returns the finished round and how long it took.
    pub(crate) fn finish_round(&mut self, now: Tick) -> Option<(RoundId, u64)> {
        let round = self.round.take()?;
        let started = self.round_started.take().unwrap_or(now);
        self.manifest.clear();
        self.target = None;
        self.rounds_completed += 1;
        Some((round, now.since(started)))
    }

    /// Set off towards `point`; the driver is there at its next activation.
    pub(crate) fn head_to(&mut self, point: Point) {
        self.heading = Some(point);
    }

    /// Complete any pending move.  Returns the new position if it changed.
    pub(crate) fn arrive(&mut self) -> Option<Point> {
        let p = self.heading.take()?;
        self.position = p;
        Some(p)
    }

    pub(crate) fn next_parcel(&self) -> Option<ParcelId> {
        self.manifest.front().copied()
    }

    pub(crate) fn set_target(&mut self, parcel: ParcelId) {
        self.target = Some(parcel);
    }

    /// Take the parcel the driver is standing by and drop it from the
    /// manifest.
    pub(crate) fn take_target(&mut self) -> Option<ParcelId> {
        let parcel = self.target.take()?;
        if self.manifest.front() == Some(&parcel) {
            self.manifest.pop_front();
        } else {
            self.manifest.retain(|&p| p != parcel);
        }
        Some(parcel)
    }

    /// Skip the front of the manifest without attempting it.
    pub(crate) fn skip_parcel(&mut self) -> Option<ParcelId> {
        self.manifest.pop_front()
    }

    pub(crate) fn retire(&mut self) {
        self.retired = true;
        self.heading = None;
    }
}

impl Carrier for Driver {
    #[inline]
    fn carrier_id(&self) -> CarrierId {
        CarrierId::Driver(self.id)
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
