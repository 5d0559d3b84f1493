//! Unit tests for rd-depot.

use rd_cargo::{Carrier, CarrierId, Hold, ParcelSpec, ParcelStatus, ParcelStore, Round, Vehicle};
use rd_core::{DepotId, DriverId, ParcelId, Point, RoundId, Tick, VehicleId};
use rd_schedule::EventQueue;

use crate::{
    Admission, ChunkPartitioner, Depot, DepotCtx, DepotEvent, Fleet, NearestPointPartitioner,
    RoundPartitioner, RoundPlanner,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const LOADING: u64 = 20;

/// A driver's hands, used when no vehicle is assigned.
struct Hands {
    driver: DriverId,
    hold:   Hold,
}

impl Carrier for Hands {
    fn carrier_id(&self) -> CarrierId {
        CarrierId::Driver(self.driver)
    }
    fn location(&self) -> Point {
        Point::new(0.0, 0.0)
    }
    fn hold(&self) -> &Hold {
        &self.hold
    }
    fn hold_mut(&mut self) -> &mut Hold {
        &mut self.hold
    }
}

/// Records every depot-initiated call.
struct StubFleet {
    vehicles:       Vec<Option<Vehicle>>,
    hands:          Vec<Hands>,
    updated:        Vec<(DriverId, RoundId)>,
    clocks_started: Vec<(DriverId, Tick)>,
}

impl StubFleet {
    fn with_vehicles(n: u32) -> Self {
        Self {
            vehicles: (0..n)
                .map(|i| Some(Vehicle::new(VehicleId(i), Point::new(0.0, 0.0), Some(DriverId(i)))))
                .collect(),
            hands: (0..n).map(|i| Hands { driver: DriverId(i), hold: Hold::new() }).collect(),
            updated: Vec::new(),
            clocks_started: Vec::new(),
        }
    }

    fn on_board(&self, driver: DriverId) -> &[ParcelId] {
        match &self.vehicles[driver.index()] {
            Some(v) => v.hold().as_slice(),
            None => self.hands[driver.index()].hold.as_slice(),
        }
    }
}

impl Fleet for StubFleet {
    fn vehicle_mut(&mut self, driver: DriverId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(driver.index())?.as_mut()
    }

    fn driver_carrier_mut(&mut self, driver: DriverId) -> Option<&mut dyn Carrier> {
        self.hands.get_mut(driver.index()).map(|h| h as &mut dyn Carrier)
    }

    fn update_round(&mut self, driver: DriverId, round: &Round) {
        self.updated.push((driver, round.id()));
    }

    fn start_round_clock(&mut self, driver: DriverId, now: Tick) {
        self.clocks_started.push((driver, now));
    }
}

struct World {
    depot:   Depot,
    events:  EventQueue<DepotEvent>,
    parcels: ParcelStore,
    fleet:   StubFleet,
    /// `(tick, driver)` of every Activate event processed.
    woken:   Vec<(Tick, DriverId)>,
}

impl World {
    /// Depot with `bays` bays, `rounds` rounds of `per_round` parcels each,
    /// and `drivers` drivers with vehicles.
    fn new(bays: usize, rounds: usize, per_round: usize, drivers: u32) -> Self {
        let mut depot = Depot::new(DepotId(0), Point::new(0.0, 0.0), bays, LOADING);
        let mut parcels = ParcelStore::new();
        for i in 0..rounds * per_round {
            parcels.create(
                ParcelSpec::to(Point::new(i as f64, 0.0)),
                format!("Parcel {i:04}"),
                &mut depot,
                Tick::ZERO,
            );
        }
        let planner = RoundPlanner::new(ChunkPartitioner, vec![], per_round.max(1));
        depot.generate_rounds(&parcels, &planner);
        Self {
            depot,
            events: EventQueue::new(),
            parcels,
            fleet: StubFleet::with_vehicles(drivers),
            woken: Vec::new(),
        }
    }

    fn enter(&mut self, driver: DriverId) -> Admission {
        let mut ctx = DepotCtx::new(&mut self.events, &mut self.parcels, &mut self.fleet);
        self.depot.enter_depot(driver, &mut ctx)
    }

    fn leave(&mut self, driver: DriverId) -> bool {
        let mut ctx = DepotCtx::new(&mut self.events, &mut self.parcels, &mut self.fleet);
        self.depot.leave_depot(driver, &mut ctx)
    }

    /// Process the next queued event, checking depot invariants after it.
    fn step(&mut self) -> bool {
        let Some((tick, event)) = self.events.pop() else { return false };
        match event {
            DepotEvent::LoadComplete { driver, .. } => {
                let mut ctx = DepotCtx::new(&mut self.events, &mut self.parcels, &mut self.fleet);
                self.depot.complete_load(driver, &mut ctx);
            }
            DepotEvent::Activate(driver) => self.woken.push((tick, driver)),
        }
        self.depot.check_invariants().unwrap();
        true
    }

    /// Process every queued event.
    fn run(&mut self) {
        while self.step() {}
    }
}

// ── Admission ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod admission {
    use super::*;

    #[test]
    fn no_rounds_means_never() {
        let mut w = World::new(2, 0, 1, 1);
        assert_eq!(w.enter(DriverId(0)), Admission::Never);
        assert!(w.depot.occupying().is_empty());
        assert!(w.events.is_empty());
    }

    #[test]
    fn free_bay_admits_immediately() {
        let mut w = World::new(2, 1, 3, 1);
        assert_eq!(w.enter(DriverId(0)), Admission::Admitted { loading_time: LOADING });
        assert_eq!(w.depot.occupying(), &[DriverId(0)]);
        assert_eq!(w.events.next_tick(), Some(Tick(LOADING)));
    }

    #[test]
    fn full_depot_queues_driver() {
        let mut w = World::new(1, 2, 1, 2);
        w.enter(DriverId(0));
        assert_eq!(w.enter(DriverId(1)), Admission::Waiting);
        assert_eq!(w.depot.waiting().collect::<Vec<_>>(), vec![DriverId(1)]);
        assert!(!w.depot.is_occupying(DriverId(1)));
        w.depot.check_invariants().unwrap();
    }

    #[test]
    fn zero_bays_queue_everyone() {
        let mut w = World::new(0, 1, 1, 2);
        assert_eq!(w.enter(DriverId(0)), Admission::Waiting);
        assert_eq!(w.enter(DriverId(1)), Admission::Waiting);
        assert!(w.depot.occupying().is_empty());
        assert!(w.events.is_empty());
    }

    #[test]
    fn reentry_is_not_double_counted() {
        let mut w = World::new(1, 2, 1, 2);
        w.enter(DriverId(0));
        w.enter(DriverId(1));
        assert_eq!(w.enter(DriverId(0)), Admission::Waiting);
        assert_eq!(w.enter(DriverId(1)), Admission::Waiting);
        assert_eq!(w.depot.occupying().len(), 1);
        assert_eq!(w.depot.waiting().len(), 1);
        w.depot.check_invariants().unwrap();
    }

    #[test]
    fn driver_in_bay_is_not_told_never() {
        // Two bays, one round: D0 takes it, D1 is still loading.
        let mut w = World::new(2, 1, 1, 2);
        w.enter(DriverId(0));
        w.enter(DriverId(1));
        assert!(w.step());
        assert!(!w.depot.has_rounds());
        assert!(w.depot.is_occupying(DriverId(1)));
        assert_eq!(w.enter(DriverId(1)), Admission::Waiting);
        assert_eq!(w.depot.occupying(), &[DriverId(1)]);
        // D0 has left, so it is told the truth.
        assert_eq!(w.enter(DriverId(0)), Admission::Never);
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch {
    use super::*;

    #[test]
    fn one_bay_two_drivers_scenario() {
        let mut w = World::new(1, 2, 3, 2);
        let rounds: Vec<Round> = w.depot.rounds().cloned().collect();

        assert_eq!(w.enter(DriverId(0)), Admission::Admitted { loading_time: LOADING });
        assert_eq!(w.enter(DriverId(1)), Admission::Waiting);
        w.run();

        // D1 loads at 20 and departs; D2 is promoted and loads at 40.
        assert_eq!(w.fleet.clocks_started, vec![(DriverId(0), Tick(20)), (DriverId(1), Tick(40))]);
        assert_eq!(w.woken, vec![(Tick(20), DriverId(0)), (Tick(40), DriverId(1))]);

        assert_eq!(w.fleet.on_board(DriverId(0)), rounds[0].parcels());
        assert_eq!(w.fleet.on_board(DriverId(1)), rounds[1].parcels());
        assert!(!w.depot.has_rounds());
        assert!(w.depot.occupying().is_empty());
        assert_eq!(w.depot.waiting().len(), 0);
        assert!(w.depot.hold().is_empty());
    }

    #[test]
    fn rounds_dispatch_oldest_first_across_bays() {
        let mut w = World::new(3, 3, 2, 3);
        let expected: Vec<RoundId> = w.depot.rounds().map(|r| r.id()).collect();
        // Admit in reverse driver order to decouple rounds from driver ids.
        for d in [2, 0, 1] {
            w.enter(DriverId(d));
        }
        w.run();
        let got: Vec<RoundId> = w.fleet.updated.iter().map(|&(_, r)| r).collect();
        assert_eq!(got, expected);
        assert_eq!(w.fleet.updated[0].0, DriverId(2));
    }

    #[test]
    fn waiting_queue_promotes_in_arrival_order() {
        let mut w = World::new(1, 4, 1, 4);
        for d in 0..4 {
            w.enter(DriverId(d));
        }
        w.run();
        let order: Vec<DriverId> = w.fleet.clocks_started.iter().map(|&(d, _)| d).collect();
        assert_eq!(order, vec![DriverId(0), DriverId(1), DriverId(2), DriverId(3)]);
        let ticks: Vec<Tick> = w.fleet.clocks_started.iter().map(|&(_, t)| t).collect();
        assert_eq!(ticks, vec![Tick(20), Tick(40), Tick(60), Tick(80)]);
    }

    #[test]
    fn loaded_parcels_change_owner() {
        let mut w = World::new(1, 1, 2, 1);
        w.enter(DriverId(0));
        w.run();
        for &p in w.fleet.on_board(DriverId(0)) {
            let parcel = w.parcels.get(p).unwrap();
            assert_eq!(parcel.carrier(), Some(CarrierId::Vehicle(VehicleId(0))));
            assert_eq!(parcel.status(), ParcelStatus::OutForDelivery);
        }
    }

    #[test]
    fn no_vehicle_falls_back_to_driver() {
        let mut w = World::new(1, 1, 2, 1);
        w.fleet.vehicles[0] = None;
        w.enter(DriverId(0));
        w.run();
        assert_eq!(w.fleet.hands[0].hold.len(), 2);
        let p = w.fleet.hands[0].hold.as_slice()[0];
        assert_eq!(w.parcels.get(p).unwrap().carrier(), Some(CarrierId::Driver(DriverId(0))));
    }

    #[test]
    fn drained_queue_leaves_empty_handed() {
        // Two bays, one round: both drivers get in, only the first loads.
        let mut w = World::new(2, 1, 2, 2);
        w.enter(DriverId(0));
        w.enter(DriverId(1));
        w.run();
        assert_eq!(w.fleet.on_board(DriverId(0)).len(), 2);
        assert!(w.fleet.on_board(DriverId(1)).is_empty());
        assert_eq!(w.fleet.clocks_started.len(), 1);
        // Both are released and reactivated.
        assert!(w.depot.occupying().is_empty());
        assert_eq!(w.woken.len(), 2);
        assert_eq!(w.enter(DriverId(1)), Admission::Never);
    }
}

// ── leave_depot ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod leave {
    use super::*;

    #[test]
    fn leaving_without_occupying_is_a_noop() {
        let mut w = World::new(1, 2, 1, 2);
        w.enter(DriverId(0));
        w.enter(DriverId(1));
        let events_before = w.events.len();
        assert!(!w.leave(DriverId(1)));
        assert!(!w.leave(DriverId(7)));
        assert_eq!(w.events.len(), events_before);
        assert_eq!(w.depot.occupying(), &[DriverId(0)]);
        assert_eq!(w.depot.waiting().collect::<Vec<_>>(), vec![DriverId(1)]);
    }

    #[test]
    fn leaving_promotes_front_of_queue() {
        let mut w = World::new(1, 3, 1, 3);
        w.enter(DriverId(0));
        w.enter(DriverId(1));
        w.enter(DriverId(2));
        assert!(w.leave(DriverId(0)));
        assert_eq!(w.depot.occupying(), &[DriverId(1)]);
        assert_eq!(w.depot.waiting().collect::<Vec<_>>(), vec![DriverId(2)]);
        w.depot.check_invariants().unwrap();
    }
}

// ── Round generation ──────────────────────────────────────────────────────────

#[cfg(test)]
mod rounds {
    use super::*;

    #[test]
    fn generate_replaces_queue() {
        let mut w = World::new(1, 3, 2, 1);
        assert_eq!(w.depot.rounds().len(), 3);
        let planner = RoundPlanner::new(ChunkPartitioner, vec![], 6);
        assert_eq!(w.depot.generate_rounds(&w.parcels, &planner), 1);
        assert_eq!(w.depot.rounds().len(), 1);
        assert_eq!(w.depot.rounds().next().unwrap().len(), 6);
    }

    #[test]
    fn add_rounds_appends() {
        let mut w = World::new(1, 2, 2, 1);
        let planner = RoundPlanner::new(ChunkPartitioner, vec![], 4);
        let held = w.depot.hold().as_slice().to_vec();
        let extra = w.depot.plan_rounds(&held, &w.parcels, &planner);
        let extra_id = extra[0].id();
        w.depot.add_rounds(extra);
        let ids: Vec<RoundId> = w.depot.rounds().map(|r| r.id()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[2], extra_id);
        assert!(ids[0] < ids[1] && ids[1] < ids[2]);
    }

    #[test]
    fn stale_round_is_pruned_on_load() {
        let mut w = World::new(1, 1, 3, 2);
        let round = w.depot.rounds().next().unwrap().clone();
        // Someone takes one parcel out of the depot behind the round's back.
        let mut other = Vehicle::new(VehicleId(9), Point::new(0.0, 0.0), None);
        w.depot
            .transfer_to(&round.parcels()[..1], &mut other, &mut w.parcels, Tick::ZERO)
            .unwrap();
        w.enter(DriverId(0));
        w.run();
        assert_eq!(w.fleet.on_board(DriverId(0)), &round.parcels()[1..]);
    }

    #[test]
    fn parcel_owned_elsewhere_does_not_strand_round() {
        let mut w = World::new(1, 1, 2, 1);
        let (a, b) = (ParcelId(0), ParcelId(1));
        // `x` sits in the depot's hold but its record names another vehicle.
        let mut other = Vehicle::new(VehicleId(9), Point::new(0.0, 0.0), None);
        let x = w.parcels.create(
            ParcelSpec::to(Point::new(5.0, 0.0)),
            "Parcel XXXX".into(),
            &mut other,
            Tick::ZERO,
        );
        w.depot.add(x);
        let planner = RoundPlanner::new(ChunkPartitioner, vec![], 3);
        assert_eq!(w.depot.generate_rounds(&w.parcels, &planner), 1);
        assert_eq!(w.depot.rounds().next().unwrap().parcels(), &[a, b, x]);

        w.enter(DriverId(0));
        w.run();
        assert_eq!(w.fleet.on_board(DriverId(0)), &[a, b]);
        assert_eq!(w.parcels.get(a).unwrap().carrier(), Some(CarrierId::Vehicle(VehicleId(0))));
        assert_eq!(w.parcels.get(x).unwrap().carrier(), Some(CarrierId::Vehicle(VehicleId(9))));
        assert!(!w.depot.has_rounds());
    }

    #[test]
    fn fully_pruned_round_is_skipped() {
        let mut w = World::new(1, 2, 1, 1);
        let rounds: Vec<Round> = w.depot.rounds().cloned().collect();
        let mut other = Vehicle::new(VehicleId(9), Point::new(0.0, 0.0), None);
        w.depot
            .transfer_to(rounds[0].parcels(), &mut other, &mut w.parcels, Tick::ZERO)
            .unwrap();
        w.enter(DriverId(0));
        w.run();
        assert_eq!(w.fleet.on_board(DriverId(0)), rounds[1].parcels());
        assert_eq!(w.fleet.updated, vec![(DriverId(0), rounds[1].id())]);
        assert!(!w.depot.has_rounds());
    }
}

// ── Partitioners ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod partition {
    use super::*;
    use crate::partition::balanced_chunks;

    fn backlog(points: &[(f64, f64)]) -> Vec<(ParcelId, Point)> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| (ParcelId(i as u32), Point::new(x, y)))
            .collect()
    }

    #[test]
    fn balanced_chunk_sizes() {
        let ids: Vec<ParcelId> = (0..10).map(ParcelId).collect();
        let sizes: Vec<usize> = balanced_chunks(&ids, 4).iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        assert!(balanced_chunks(&[], 4).is_empty());
        assert_eq!(balanced_chunks(&ids, 0).len(), 10);
    }

    #[test]
    fn chunk_preserves_backlog_order() {
        let parcels = backlog(&[(0.0, 0.0); 5]);
        let out = ChunkPartitioner.partition(&parcels, &[], 2);
        let flat: Vec<ParcelId> = out.into_iter().flatten().collect();
        assert_eq!(flat, (0..5).map(ParcelId).collect::<Vec<_>>());
    }

    #[test]
    fn nearest_point_groups_by_area() {
        let parcels = backlog(&[(0.0, 1.0), (100.0, 1.0), (1.0, 0.0), (99.0, 0.0)]);
        let points = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let out = NearestPointPartitioner.partition(&parcels, &points, 10);
        assert_eq!(out, vec![
            vec![ParcelId(0), ParcelId(2)],
            vec![ParcelId(1), ParcelId(3)],
        ]);
    }

    #[test]
    fn nearest_point_without_points_chunks() {
        let parcels = backlog(&[(0.0, 0.0); 3]);
        let out = NearestPointPartitioner.partition(&parcels, &[], 2);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn every_parcel_appears_once() {
        let coords: Vec<(f64, f64)> = (0..50).map(|i| ((i * 7 % 13) as f64, (i % 5) as f64)).collect();
        let parcels = backlog(&coords);
        let points = [Point::new(0.0, 0.0), Point::new(12.0, 4.0), Point::new(6.0, 2.0)];
        let mut flat: Vec<ParcelId> = NearestPointPartitioner
            .partition(&parcels, &points, 7)
            .into_iter()
            .flatten()
            .collect();
        flat.sort();
        assert_eq!(flat, (0..50).map(ParcelId).collect::<Vec<_>>());
    }
}
