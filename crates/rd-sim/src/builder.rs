//! Fluent builder for constructing a [`Sim`].

use tracing::info;

use rd_cargo::{ParcelSpec, ParcelStore, Vehicle};
use rd_core::{AgentRng, DepotId, DriverId, Euclidean, Metric, Point, ReliefConfig, SimRng, Tick, VehicleId};
use rd_depot::{Depot, NearestPointPartitioner, RoundPartitioner, RoundPlanner};
use rd_schedule::EventQueue;

use crate::{Crew, Driver, Event, RedeliveryPolicy, Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`ReliefConfig`] — timings, tolerance, fleet size, seed, …
/// - depot positions — one depot per entry, `DepotId` = index
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                                  |
/// |---------------------------|------------------------------------------|
/// | `.parcels(v)`             | No parcels                               |
/// | `.delivery_points(v)`     | None (partitioner falls back to chunks)  |
/// | `.partitioner(p)`         | `NearestPointPartitioner`                |
/// | `.metric(m)`              | `Euclidean`                              |
/// | `.driver_homes(v)`        | Drivers spread round-robin over depots   |
/// | `.driver_vehicles(v)`     | Every driver has a vehicle               |
/// | `.redelivery(p)`          | `RedeliveryPolicy::ReturnToDepot`        |
///
/// Each parcel is stocked at the depot nearest its delivery location.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, vec![Point::new(0.0, 0.0)])
///     .parcels(specs)
///     .delivery_points(points)
///     .redelivery(RedeliveryPolicy::Abandon)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:          ReliefConfig,
    depots:          Vec<Point>,
    parcels:         Vec<ParcelSpec>,
    delivery_points: Vec<Point>,
    partitioner:     Box<dyn RoundPartitioner>,
    metric:          Box<dyn Metric>,
    homes:           Option<Vec<DepotId>>,
    vehicles:        Option<Vec<bool>>,
    redelivery:      RedeliveryPolicy,
}

impl SimBuilder {
    pub fn new(config: ReliefConfig, depots: Vec<Point>) -> Self {
        Self {
            config,
            depots,
            parcels:         Vec::new(),
            delivery_points: Vec::new(),
            partitioner:     Box::new(NearestPointPartitioner),
            metric:          Box::new(Euclidean),
            homes:           None,
            vehicles:        None,
            redelivery:      RedeliveryPolicy::default(),
        }
    }

    /// Parcels to stock at the start of the run.
    pub fn parcels(mut self, parcels: Vec<ParcelSpec>) -> Self {
        self.parcels = parcels;
        self
    }

    /// Delivery points handed to the round partitioner.
    pub fn delivery_points(mut self, points: Vec<Point>) -> Self {
        self.delivery_points = points;
        self
    }

    pub fn partitioner(mut self, partitioner: impl RoundPartitioner + 'static) -> Self {
        self.partitioner = Box::new(partitioner);
        self
    }

    pub fn metric(mut self, metric: impl Metric + 'static) -> Self {
        self.metric = Box::new(metric);
        self
    }

    /// Home depot of each driver (must be length `config.num_drivers`).
    pub fn driver_homes(mut self, homes: Vec<DepotId>) -> Self {
        self.homes = Some(homes);
        self
    }

    /// Whether each driver gets a vehicle (must be length
    /// `config.num_drivers`).  Drivers without one carry rounds by hand.
    pub fn driver_vehicles(mut self, vehicles: Vec<bool>) -> Self {
        self.vehicles = Some(vehicles);
        self
    }

    pub fn redelivery(mut self, policy: RedeliveryPolicy) -> Self {
        self.redelivery = policy;
        self
    }

    /// Validate inputs, stock the depots, generate the initial rounds and
    /// schedule every driver's first activation.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        if self.depots.is_empty() {
            return Err(SimError::Config("at least one depot is required".into()));
        }
        if self.depots.len() > usize::from(u16::MAX) {
            return Err(SimError::Config(format!("too many depots: {}", self.depots.len())));
        }
        let n = self.config.num_drivers;

        // ── Validate and resolve optional inputs ──────────────────────────
        let homes = match self.homes {
            Some(h) => {
                if h.len() != n {
                    return Err(SimError::DriverCountMismatch {
                        expected: n,
                        got:      h.len(),
                        what:     "driver homes",
                    });
                }
                if let Some(bad) = h.iter().find(|d| d.index() >= self.depots.len()) {
                    return Err(SimError::Config(format!("driver home {bad} does not exist")));
                }
                h
            }
            None => (0..n).map(|i| DepotId((i % self.depots.len()) as u16)).collect(),
        };

        let has_vehicle = match self.vehicles {
            Some(v) => {
                if v.len() != n {
                    return Err(SimError::DriverCountMismatch {
                        expected: n,
                        got:      v.len(),
                        what:     "driver vehicles",
                    });
                }
                v
            }
            None => vec![true; n],
        };

        // ── Depots and their stock ────────────────────────────────────────
        let mut depots: Vec<Depot> = self
            .depots
            .iter()
            .enumerate()
            .map(|(i, &p)| Depot::new(DepotId(i as u16), p, self.config.num_bays, self.config.loading_time))
            .collect();

        let mut labels = SimRng::new(self.config.seed);
        let mut parcels = ParcelStore::new();
        for spec in self.parcels {
            let d = nearest(&self.depots, spec.delivery_location, &*self.metric);
            let label = format!("Parcel {}", labels.label(4));
            parcels.create(spec, label, &mut depots[d], Tick::ZERO);
        }

        let planner = RoundPlanner {
            partitioner:          self.partitioner,
            delivery_points:      self.delivery_points,
            approx_manifest_size: self.config.approx_manifest_size,
        };
        for depot in &mut depots {
            depot.generate_rounds(&parcels, &planner);
        }

        // ── Drivers, vehicles, first activations ──────────────────────────
        let mut crew = Crew::default();
        let mut events = EventQueue::new();
        for (i, (&home, &with_vehicle)) in homes.iter().zip(&has_vehicle).enumerate() {
            let id = DriverId(i as u32);
            let at = self.depots[home.index()];
            let vehicle = with_vehicle.then(|| {
                let v = VehicleId(crew.vehicles.len() as u32);
                crew.vehicles.push(Vehicle::new(v, at, Some(id)));
                v
            });
            crew.drivers.push(Driver::new(id, home, at, vehicle, AgentRng::new(self.config.seed, id)));
            events.push_at(Tick::ZERO, Event::Activate(id));
        }

        info!(
            depots = depots.len(),
            parcels = parcels.len(),
            drivers = crew.drivers.len(),
            vehicles = crew.vehicles.len(),
            rounds = depots.iter().map(|d| d.rounds().len()).sum::<usize>(),
            "simulation built"
        );

        Ok(Sim {
            clock:            self.config.make_clock(),
            config:           self.config,
            events,
            parcels,
            depots,
            crew,
            planner,
            metric:           self.metric,
            redelivery:       self.redelivery,
            next_snapshot:    Tick::ZERO,
            events_processed: 0,
        })
    }
}

/// Index of the point in `candidates` closest to `p`.  Ties go to the lower
/// index.
fn nearest(candidates: &[Point], p: Point, metric: &dyn Metric) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, &c) in candidates.iter().enumerate() {
        let d = metric.distance(c, p);
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    best
}
