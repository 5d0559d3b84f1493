//! The `Depot` and its admission / dispatch operations.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use rd_cargo::{Carrier, CarrierId, Hold, Parcel, ParcelStore, Round};
use rd_core::{DepotId, DriverId, ParcelId, Point, RoundId, Tick};

use crate::{DepotCtx, DepotError, DepotEvent, RoundPlanner};

// ── Admission ─────────────────────────────────────────────────────────────────

/// What `enter_depot` tells the arriving driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The depot has no rounds left and will never reactivate this driver.
    /// Stop polling.
    Never,
    /// Admitted into a bay now; the round will be on board after
    /// `loading_time` ticks, at which point the depot reactivates the driver.
    Admitted { loading_time: u64 },
    /// All bays are busy.  The driver is queued and the depot will reactivate
    /// it once it has been promoted and loaded.
    Waiting,
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Point-in-time view of a depot, for observers and output writers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepotSnapshot {
    pub depot:         DepotId,
    pub tick:          Tick,
    pub num_bays:      usize,
    pub occupying:     usize,
    pub waiting:       usize,
    pub rounds_queued: usize,
    pub parcels_held:  usize,
}

// ── Depot ─────────────────────────────────────────────────────────────────────

/// A stationary carrier with `num_bays` loading bays.
#[derive(Debug)]
pub struct Depot {
    id:            DepotId,
    position:      Point,
    num_bays:      usize,
    loading_time:  u64,
    hold:          Hold,
    /// Undispatched rounds, oldest first.
    rounds:        VecDeque<Round>,
    /// Drivers in a bay, in admission order.
    occupying:     Vec<DriverId>,
    /// Drivers waiting for a bay, in arrival order.
    waiting:       VecDeque<DriverId>,
    next_round_id: u32,
}

impl Depot {
    pub fn new(id: DepotId, position: Point, num_bays: usize, loading_time: u64) -> Self {
        Self {
            id,
            position,
            num_bays,
            loading_time,
            hold:          Hold::new(),
            rounds:        VecDeque::new(),
            occupying:     Vec::new(),
            waiting:       VecDeque::new(),
            next_round_id: 0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> DepotId {
        self.id
    }

    #[inline]
    pub fn num_bays(&self) -> usize {
        self.num_bays
    }

    #[inline]
    pub fn loading_time(&self) -> u64 {
        self.loading_time
    }

    pub fn occupying(&self) -> &[DriverId] {
        &self.occupying
    }

    pub fn waiting(&self) -> impl ExactSizeIterator<Item = DriverId> + '_ {
        self.waiting.iter().copied()
    }

    pub fn rounds(&self) -> impl ExactSizeIterator<Item = &Round> {
        self.rounds.iter()
    }

    pub fn has_rounds(&self) -> bool {
        !self.rounds.is_empty()
    }

    pub fn is_occupying(&self, driver: DriverId) -> bool {
        self.occupying.contains(&driver)
    }

    pub fn is_waiting(&self, driver: DriverId) -> bool {
        self.waiting.contains(&driver)
    }

    pub fn snapshot(&self, tick: Tick) -> DepotSnapshot {
        DepotSnapshot {
            depot:         self.id,
            tick,
            num_bays:      self.num_bays,
            occupying:     self.occupying.len(),
            waiting:       self.waiting.len(),
            rounds_queued: self.rounds.len(),
            parcels_held:  self.hold.len(),
        }
    }

    // ── Admission ─────────────────────────────────────────────────────────

    /// A driver arrives at the depot asking for a round.
    ///
    /// - Already occupying or waiting → left where it is
    ///   ([`Admission::Waiting`]).
    /// - No rounds at all → [`Admission::Never`].
    /// - Every bay taken → the driver joins the tail of the waiting queue
    ///   ([`Admission::Waiting`]).
    /// - Otherwise the driver goes straight into a bay
    ///   ([`Admission::Admitted`]).
    pub fn enter_depot<E: From<DepotEvent>>(
        &mut self,
        driver: DriverId,
        ctx:    &mut DepotCtx<'_, E>,
    ) -> Admission {
        debug!(depot = %self.id, %driver, now = %ctx.now(), "driver entered depot");

        // Still owed a reactivation, so never `Never`.
        if self.is_occupying(driver) || self.is_waiting(driver) {
            warn!(
                "{}",
                DepotError::AlreadyPresent { depot: self.id, driver }
            );
            return Admission::Waiting;
        }
        if self.rounds.is_empty() {
            return Admission::Never;
        }
        if self.occupying.len() >= self.num_bays {
            self.waiting.push_back(driver);
            debug!(depot = %self.id, %driver, queue = self.waiting.len(), "all bays busy, driver waiting");
            return Admission::Waiting;
        }

        self.enter_bay(driver, ctx);
        Admission::Admitted { loading_time: self.loading_time }
    }

    /// Put `driver` into a bay and schedule the end of its loading time.
    ///
    /// The round is picked when loading completes, not now.  If the queue has
    /// drained by then the driver leaves empty-handed.
    fn enter_bay<E: From<DepotEvent>>(&mut self, driver: DriverId, ctx: &mut DepotCtx<'_, E>) {
        self.occupying.push(driver);
        if self.rounds.is_empty() {
            debug!(depot = %self.id, %driver, "driver occupies an empty bay");
        }
        ctx.schedule_after(
            self.loading_time,
            DepotEvent::LoadComplete { depot: self.id, driver },
        );
    }

    /// Loading time is over for `driver`.
    ///
    /// Pops the oldest round, transfers it to the driver's vehicle (or to the
    /// driver directly when no vehicle is assigned), notifies the driver,
    /// releases the bay and starts the driver's round clock.  Returns the
    /// dispatched round's id, or `None` if the driver left empty-handed.
    pub fn complete_load<E: From<DepotEvent>>(
        &mut self,
        driver: DriverId,
        ctx:    &mut DepotCtx<'_, E>,
    ) -> Option<RoundId> {
        if !self.is_occupying(driver) {
            warn!("{}", DepotError::NotOccupying { depot: self.id, driver });
            return None;
        }

        let round = loop {
            let Some(round) = self.rounds.pop_front() else {
                debug!(depot = %self.id, %driver, "no round left, driver leaves empty-handed");
                self.leave_depot(driver, ctx);
                return None;
            };
            let round = self.prune_round(round, ctx.parcels);
            if !round.is_empty() {
                break round;
            }
            warn!(depot = %self.id, round = %round.id(), "nothing left to load, round skipped");
        };

        let now = ctx.now();
        let loaded = match ctx.fleet.vehicle_mut(driver) {
            Some(vehicle) => self.transfer_to(round.parcels(), vehicle, ctx.parcels, now),
            None => match ctx.fleet.driver_carrier_mut(driver) {
                Some(hands) => self.transfer_to(round.parcels(), hands, ctx.parcels, now),
                None => {
                    warn!("{}", DepotError::NoCarrier(driver));
                    self.rounds.push_front(round);
                    self.leave_depot(driver, ctx);
                    return None;
                }
            },
        };
        if let Err(e) = loaded {
            warn!(depot = %self.id, %driver, "{}", DepotError::Transfer(e));
            self.rounds.push_front(round);
            self.leave_depot(driver, ctx);
            return None;
        }

        info!(depot = %self.id, %driver, round = %round.id(), parcels = round.len(), "round loaded");
        ctx.fleet.update_round(driver, &round);
        self.leave_depot(driver, ctx);
        ctx.fleet.start_round_clock(driver, now);
        Some(round.id())
    }

    /// `driver` leaves its bay.
    ///
    /// Schedules the driver's own next activation and, if anyone is waiting,
    /// promotes the front of the queue into the freed bay.  A driver that was
    /// not occupying a bay is logged and ignored.  Returns `false` in that
    /// case.
    pub fn leave_depot<E: From<DepotEvent>>(
        &mut self,
        driver: DriverId,
        ctx:    &mut DepotCtx<'_, E>,
    ) -> bool {
        let Some(pos) = self.occupying.iter().position(|&d| d == driver) else {
            warn!("{}", DepotError::NotOccupying { depot: self.id, driver });
            return false;
        };
        self.occupying.remove(pos);
        ctx.schedule_next_tick(DepotEvent::Activate(driver));
        debug!(depot = %self.id, %driver, "driver left depot");

        if let Some(next) = self.waiting.pop_front() {
            debug!(depot = %self.id, driver = %next, "promoted from waiting queue");
            self.enter_bay(next, ctx);
        }
        true
    }

    // ── Rounds ────────────────────────────────────────────────────────────

    /// Partition `parcels` into new rounds without queueing them.
    pub fn plan_rounds(
        &mut self,
        parcels: &[ParcelId],
        store:   &ParcelStore,
        planner: &RoundPlanner,
    ) -> Vec<Round> {
        let backlog: Vec<(ParcelId, Point)> = parcels
            .iter()
            .filter_map(|&p| store.get(p).map(|parcel| (p, parcel.delivery_location())))
            .collect();
        planner
            .plan(&backlog)
            .into_iter()
            .filter(|m| !m.is_empty())
            .map(|manifest| self.form_round(manifest))
            .collect()
    }

    /// Partition the depot's whole backlog and **replace** the round queue
    /// with the result.  Previously generated, undispatched rounds are
    /// discarded.  Returns the number of rounds now queued.
    pub fn generate_rounds(&mut self, store: &ParcelStore, planner: &RoundPlanner) -> usize {
        let backlog = self.hold.as_slice().to_vec();
        let rounds = self.plan_rounds(&backlog, store, planner);
        if !self.rounds.is_empty() {
            debug!(depot = %self.id, discarded = self.rounds.len(), "replacing queued rounds");
        }
        self.rounds = rounds.into();
        info!(depot = %self.id, rounds = self.rounds.len(), parcels = backlog.len(), "rounds generated");
        self.rounds.len()
    }

    /// Append `rounds` to the tail of the queue.
    pub fn add_rounds(&mut self, rounds: impl IntoIterator<Item = Round>) {
        self.rounds.extend(rounds);
    }

    /// Wrap a manifest in a `Round` with this depot's next sequence number.
    pub fn form_round(&mut self, parcels: Vec<ParcelId>) -> Round {
        let id = RoundId(self.next_round_id);
        self.next_round_id += 1;
        Round::new(id, parcels)
    }

    /// Drop parcels the depot can no longer hand over from a queued round:
    /// those missing from its hold or recorded under another carrier.
    fn prune_round(&self, round: Round, store: &ParcelStore) -> Round {
        let me = self.carrier_id();
        let loadable = |p: ParcelId| {
            self.hold.contains(p) && store.get(p).and_then(Parcel::carrier) == Some(me)
        };
        if round.parcels().iter().all(|&p| loadable(p)) {
            return round;
        }
        let kept: Vec<ParcelId> = round.parcels().iter().copied().filter(|&p| loadable(p)).collect();
        warn!(
            depot = %self.id,
            round = %round.id(),
            dropped = round.len() - kept.len(),
            "round lists parcels the depot cannot load"
        );
        Round::new(round.id(), kept)
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Verify the depot's structural invariants.
    pub fn check_invariants(&self) -> Result<(), DepotError> {
        if self.occupying.len() > self.num_bays {
            return Err(DepotError::OverCapacity {
                depot:     self.id,
                occupying: self.occupying.len(),
                num_bays:  self.num_bays,
            });
        }
        for (i, &d) in self.occupying.iter().enumerate() {
            if self.occupying[i + 1..].contains(&d) {
                return Err(DepotError::Duplicate { depot: self.id, driver: d });
            }
            if self.waiting.contains(&d) {
                return Err(DepotError::OccupyingAndWaiting { depot: self.id, driver: d });
            }
        }
        for (i, &d) in self.waiting.iter().enumerate() {
            if self.waiting.iter().skip(i + 1).any(|&o| o == d) {
                return Err(DepotError::Duplicate { depot: self.id, driver: d });
            }
        }
        Ok(())
    }
}

impl Carrier for Depot {
    #[inline]
    fn carrier_id(&self) -> CarrierId {
        CarrierId::Depot(self.id)
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

