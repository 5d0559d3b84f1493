//! The `Sim` struct and its event loop.

use tracing::{debug, info, warn};

use rd_cargo::{Carrier, CarrierId, Parcel, ParcelStatus, ParcelStore};
use rd_core::{DriverId, Metric, ParcelId, Point, ReliefConfig, SimClock, Tick};
use rd_depot::{Admission, Depot, DepotCtx, RoundPlanner};
use rd_schedule::EventQueue;

use crate::{Crew, DeliveryRecord, Driver, DriverStatus, Event, RedeliveryPolicy, SimObserver, SimResult};

// ── Summary ───────────────────────────────────────────────────────────────────

/// End-of-run totals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub final_tick:       Tick,
    pub events:           u64,
    pub parcels:          usize,
    pub delivered:        usize,
    pub failed_attempt:   usize,
    pub out_for_delivery: usize,
    pub undelivered:      usize,
    pub rounds_completed: u32,
    /// Rounds still waiting at depots.
    pub rounds_queued:    usize,
    pub retired_drivers:  usize,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// Owns the scheduler and every entity of the run, and processes events
/// strictly one at a time in non-decreasing tick order.  All depot mutation
/// happens inside [`Depot`] methods handed a [`DepotCtx`] built from the
/// fields below.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Model parameters (tolerance, timings, speeds, …).
    pub config: ReliefConfig,

    /// Maps ticks to wall-clock time for reporting.
    pub clock: SimClock,

    /// The event queue.  `events.now()` is the simulation's current time.
    pub events: EventQueue<Event>,

    /// Every parcel in the run.
    pub parcels: ParcelStore,

    /// Depots, indexed by `DepotId`.
    pub depots: Vec<Depot>,

    /// Drivers and vehicles.
    pub crew: Crew,

    /// Partitioner used to re-plan returned parcels.
    pub planner: RoundPlanner,

    /// Distance used for travel times and delivery checks.
    pub metric: Box<dyn Metric>,

    /// What returning drivers do with undelivered parcels.
    pub redelivery: RedeliveryPolicy,

    pub(crate) next_snapshot:    Tick,
    pub(crate) events_processed: u64,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until the event queue drains or `config.end_tick()` is reached.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            parcels = self.parcels.len(),
            drivers = self.crew.drivers.len(),
            depots = self.depots.len(),
            "simulation started"
        );
        self.run_until(self.config.end_tick(), observer)?;
        let end = self.events.now();
        observer.on_sim_end(end);

        let s = self.summary();
        let (days, hours, mins) = self.clock.elapsed_dhm(end);
        info!(
            final_tick = %end,
            elapsed = %format!("{days}d {hours:02}h {mins:02}m"),
            events = s.events,
            delivered = s.delivered,
            failed = s.failed_attempt,
            undelivered = s.undelivered,
            rounds = s.rounds_completed,
            "simulation finished"
        );
        Ok(())
    }

    /// Process every event due strictly before `end`.  Returns the number of
    /// events processed.
    pub fn run_until<O: SimObserver>(&mut self, end: Tick, observer: &mut O) -> SimResult<u64> {
        let mut n = 0;
        while let Some((tick, event)) = self.events.pop_before(end) {
            self.process(tick, event, observer)?;
            n += 1;
        }
        Ok(n)
    }

    /// Process the next event, if any.  Returns `false` once the queue is
    /// empty.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        match self.events.pop() {
            Some((tick, event)) => {
                self.process(tick, event, observer)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// `true` once nothing is left to happen.
    pub fn is_finished(&self) -> bool {
        self.events.is_empty()
    }

    pub fn summary(&self) -> RunSummary {
        let counts = self.parcels.status_counts();
        RunSummary {
            final_tick:       self.events.now(),
            events:           self.events_processed,
            parcels:          self.parcels.len(),
            delivered:        counts[ParcelStatus::Delivered.code() as usize],
            failed_attempt:   counts[ParcelStatus::FailedAttempt.code() as usize],
            out_for_delivery: counts[ParcelStatus::OutForDelivery.code() as usize],
            undelivered:      counts[ParcelStatus::Undelivered.code() as usize],
            rounds_completed: self.crew.drivers.iter().map(Driver::rounds_completed).sum(),
            rounds_queued:    self.depots.iter().map(|d| d.rounds().len()).sum(),
            retired_drivers:  self.crew.drivers.iter().filter(|d| d.is_retired()).count(),
        }
    }

    // ── Event dispatch ────────────────────────────────────────────────────

    fn process<O: SimObserver>(&mut self, tick: Tick, event: Event, observer: &mut O) -> SimResult<()> {
        self.emit_snapshots(tick, observer);
        observer.on_event(tick, &event);

        match event {
            Event::Activate(driver) => self.activate(driver, observer),
            Event::LoadComplete { depot, driver } => match self.depots.get_mut(depot.index()) {
                Some(d) => {
                    let mut ctx = DepotCtx::new(&mut self.events, &mut self.parcels, &mut self.crew);
                    d.complete_load(driver, &mut ctx);
                }
                None => warn!(%depot, %driver, "load completion for unknown depot"),
            },
        }
        self.events_processed += 1;

        for depot in &self.depots {
            depot.check_invariants()?;
        }
        Ok(())
    }

    /// Report every snapshot boundary up to and including `upto`.
    fn emit_snapshots<O: SimObserver>(&mut self, upto: Tick, observer: &mut O) {
        let every = self.config.snapshot_interval_ticks;
        if every == 0 {
            return;
        }
        while self.next_snapshot <= upto {
            for depot in &self.depots {
                observer.on_snapshot(&depot.snapshot(self.next_snapshot));
            }
            self.next_snapshot = self.next_snapshot + every;
        }
    }

    // ── Driver state machine ──────────────────────────────────────────────

    fn activate<O: SimObserver>(&mut self, driver: DriverId, observer: &mut O) {
        self.crew.arrive(driver);
        let Some(d) = self.crew.driver(driver) else {
            warn!(%driver, "activation for unknown driver");
            return;
        };
        if d.is_retired() {
            return;
        }
        match d.status() {
            DriverStatus::Replenishing => self.replenish(driver),
            DriverStatus::Outbound     => self.head_out(driver),
            DriverStatus::Distributing => self.distribute(driver, observer),
            DriverStatus::Inbound      => {
                self.return_home(driver, observer);
                self.replenish(driver);
            }
        }
    }

    /// At the depot with nothing on board: ask for a round.
    fn replenish(&mut self, driver: DriverId) {
        let Some(home) = self.crew.driver(driver).map(Driver::home) else { return };
        let Some(depot) = self.depots.get_mut(home.index()) else {
            warn!(%driver, depot = %home, "home depot does not exist");
            self.crew.retire(driver);
            return;
        };
        if depot.is_occupying(driver) || depot.is_waiting(driver) {
            return;
        }

        let mut ctx = DepotCtx::new(&mut self.events, &mut self.parcels, &mut self.crew);
        let now = ctx.now();
        match depot.enter_depot(driver, &mut ctx) {
            Admission::Never => {
                debug!(%driver, depot = %home, %now, "no rounds left, driver retires");
                self.crew.retire(driver);
            }
            Admission::Admitted { loading_time } => {
                debug!(%driver, depot = %home, ready = %(now + loading_time), "loading");
            }
            Admission::Waiting => {}
        }
    }

    /// Set off for the next parcel in the manifest, or home when none is left.
    fn head_out(&mut self, driver: DriverId) {
        let speed = self.config.vehicle_speed;
        let miss_gap = 2.0 * self.config.tolerance;
        let p_fail = self.config.prob_failed_delivery;

        let Some(d) = self.crew.drivers.get_mut(driver.index()) else { return };
        let from = d.position();

        while let Some(parcel) = d.next_parcel() {
            let dest = match self.parcels.get(parcel) {
                Some(p) if !p.status().is_terminal() => p.delivery_location(),
                _ => {
                    warn!(%driver, %parcel, "manifest lists a parcel that cannot be delivered, skipping");
                    d.skip_parcel();
                    continue;
                }
            };
            let stop = if d.rng_mut().gen_bool(p_fail) {
                wrong_address(from, dest, miss_gap)
            } else {
                dest
            };
            let ticks = travel_ticks(self.metric.distance(from, stop), speed);
            d.set_target(parcel);
            d.head_to(stop);
            d.set_status(DriverStatus::Distributing);
            self.events.push_after(ticks, Event::Activate(driver));
            return;
        }

        let home = self
            .depots
            .get(d.home().index())
            .map_or(from, |depot| depot.location());
        let ticks = travel_ticks(self.metric.distance(from, home), speed);
        d.head_to(home);
        d.set_status(DriverStatus::Inbound);
        self.events.push_after(ticks, Event::Activate(driver));
    }

    /// At a delivery point: attempt the target parcel.
    fn distribute<O: SimObserver>(&mut self, driver: DriverId, observer: &mut O) {
        let now = self.events.now();
        let Some(d) = self.crew.driver_mut(driver) else { return };
        let round = d.round();
        let at = d.position();
        let Some(parcel) = d.take_target() else {
            d.set_status(DriverStatus::Outbound);
            self.events.push_next_tick(Event::Activate(driver));
            return;
        };

        let owner = self.parcels.get(parcel).and_then(Parcel::carrier);
        let carrier = owner.and_then(|id| carrier_mut(&mut self.depots, &mut self.crew, id));
        match self.parcels.deliver(parcel, carrier, &*self.metric, self.config.tolerance, now) {
            Ok(outcome) => {
                if let Some(p) = self.parcels.get(parcel) {
                    observer.on_delivery(&DeliveryRecord {
                        tick: now,
                        parcel,
                        label: p.label().to_owned(),
                        driver,
                        round,
                        at,
                        outcome,
                        status: p.status(),
                    });
                }
            }
            Err(e) => warn!(%driver, %parcel, "delivery attempt rejected: {e}"),
        }

        if let Some(d) = self.crew.driver_mut(driver) {
            d.set_status(DriverStatus::Outbound);
        }
        self.events.push_after(self.config.delivery_time, Event::Activate(driver));
    }

    /// Back at the depot: close the round and hand back what is left on board.
    fn return_home<O: SimObserver>(&mut self, driver: DriverId, observer: &mut O) {
        let now = self.events.now();
        let Some(d) = self.crew.driver_mut(driver) else { return };
        let home = d.home();
        d.set_status(DriverStatus::Replenishing);
        let finished = d.finish_round(now);
        let Some(depot) = self.depots.get_mut(home.index()) else { return };

        let mut returned: Vec<ParcelId> = Vec::new();
        if let Some(carrier) = self.crew.carrier_of(driver) {
            let items = carrier.hold().as_slice().to_vec();
            if !items.is_empty() {
                match carrier.transfer_to(&items, &mut *depot, &mut self.parcels, now) {
                    Ok(()) => returned = items,
                    Err(e) => warn!(%driver, depot = %home, "could not hand parcels back: {e}"),
                }
            }
        }

        if !returned.is_empty() {
            match self.redelivery {
                RedeliveryPolicy::ReturnToDepot => {
                    let rounds = depot.plan_rounds(&returned, &self.parcels, &self.planner);
                    debug!(depot = %home, parcels = returned.len(), rounds = rounds.len(), "undelivered parcels re-queued");
                    depot.add_rounds(rounds);
                }
                RedeliveryPolicy::Abandon => {
                    debug!(depot = %home, parcels = returned.len(), "undelivered parcels left in backlog");
                }
            }
        }

        if let Some((round, took)) = finished {
            debug!(%driver, %round, ticks = took, returned = returned.len(), "round complete");
            observer.on_round_end(now, driver, round, returned.len());
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Ticks needed to cover `distance` at `speed` units per tick.
fn travel_ticks(distance: f64, speed: f64) -> u64 {
    (distance / speed).ceil() as u64
}

/// Where a driver ends up after a failed attempt: `gap` away from `dest`, on
/// the side it approached from.
pub(crate) fn wrong_address(from: Point, dest: Point, gap: f64) -> Point {
    let d = from.distance(dest);
    if d > 0.0 {
        Point::new(
            dest.x + (from.x - dest.x) / d * gap,
            dest.y + (from.y - dest.y) / d * gap,
        )
    } else {
        Point::new(dest.x + gap, dest.y)
    }
}

/// Resolve a `CarrierId` to the carrier itself.
fn carrier_mut<'a>(
    depots: &'a mut [Depot],
    crew:   &'a mut Crew,
    id:     CarrierId,
) -> Option<&'a mut dyn Carrier> {
    match id {
        CarrierId::Depot(d)   => depots.get_mut(d.index()).map(|d| d as &mut dyn Carrier),
        CarrierId::Vehicle(v) => crew.vehicles.get_mut(v.index()).map(|v| v as &mut dyn Carrier),
        CarrierId::Driver(d)  => crew.drivers.get_mut(d.index()).map(|d| d as &mut dyn Carrier),
    }
}
