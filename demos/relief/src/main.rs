//! relief — runnable demo for the relief_dt depot simulation.
//!
//! Three depots serve a synthetic 20 km × 20 km district.  Drivers queue for
//! loading bays, carry rounds out, and bring undelivered parcels back for
//! another attempt.
//!
//! ```text
//! relief [config.json] [parcels.csv] [delivery_points.csv]
//! ```
//!
//! Every argument is optional.  Without a config file the demo scenario
//! below is used; without CSV inputs parcels and delivery points are drawn
//! from the configured seed.  Set `RUST_LOG=debug` to follow each driver.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rd_cargo::{ParcelSpec, load_parcels_csv, load_points_csv};
use rd_core::{DriverId, Point, ReliefConfig, RoundId, SimRng, Tick};
use rd_depot::DepotSnapshot;
use rd_output::{OutputWriter, SimOutputObserver};
use rd_sim::{DeliveryRecord, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:      &str = "output/relief";
const DISTRICT_METRES: f64  = 20_000.0;
const DELIVERY_POINTS: usize = 40;

/// Depots on the edge of the district and one in the centre.
const DEPOTS: [(f64, f64); 3] = [(2_000.0, 2_000.0), (10_000.0, 10_000.0), (18_000.0, 6_000.0)];

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    delivery_rows: usize,
    snapshot_rows: usize,
    rounds:        usize,
    returned:      usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, delivery_rows: 0, snapshot_rows: 0, rounds: 0, returned: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_delivery(&mut self, record: &DeliveryRecord) {
        self.delivery_rows += 1;
        self.inner.on_delivery(record);
    }

    fn on_round_end(&mut self, tick: Tick, driver: DriverId, round: RoundId, returned: usize) {
        self.rounds += 1;
        self.returned += returned;
        self.inner.on_round_end(tick, driver, round, returned);
    }

    fn on_snapshot(&mut self, snapshot: &DepotSnapshot) {
        self.snapshot_rows += 1;
        self.inner.on_snapshot(snapshot);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

fn demo_config() -> ReliefConfig {
    ReliefConfig {
        num_drivers:          8,
        num_parcels:          600,
        num_bays:             2,
        approx_manifest_size: 25,
        vehicle_speed:        500.0, // 30 km/h with 1-minute ticks
        seed:                 42,
        total_ticks:          7 * 24 * 60,
        start_unix_secs:      1_700_000_000,
        ..ReliefConfig::default()
    }
}

fn load_config(path: Option<&Path>) -> Result<ReliefConfig> {
    let Some(path) = path else {
        return Ok(demo_config());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))
}

fn random_point(rng: &mut SimRng) -> Point {
    Point::new(rng.gen_range(0.0..DISTRICT_METRES), rng.gen_range(0.0..DISTRICT_METRES))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    // 1. Configuration.
    let config = load_config(args.first().map(PathBuf::as_path))?;
    println!("=== relief — relief_dt depot simulation ===");
    println!(
        "Drivers: {}  |  Bays/depot: {}  |  Manifest: ~{}  |  Seed: {}",
        config.num_drivers, config.num_bays, config.approx_manifest_size, config.seed
    );

    // 2. Parcels and delivery points.
    let mut rng = SimRng::new(config.seed).child(1);
    let parcels: Vec<ParcelSpec> = match args.get(1) {
        Some(path) => load_parcels_csv(path).with_context(|| format!("loading {}", path.display()))?,
        None => (0..config.num_parcels)
            .map(|_| ParcelSpec {
                delivery_location: random_point(&mut rng),
                dims:              [0.4, 0.3, 0.3],
                weight:            rng.gen_range(0.5..15.0),
            })
            .collect(),
    };
    let delivery_points: Vec<Point> = match args.get(2) {
        Some(path) => load_points_csv(path).with_context(|| format!("loading {}", path.display()))?,
        None => (0..DELIVERY_POINTS).map(|_| random_point(&mut rng)).collect(),
    };
    let depots: Vec<Point> = DEPOTS.iter().map(|&(x, y)| Point::new(x, y)).collect();
    println!(
        "Depots: {}  |  Parcels: {}  |  Delivery points: {}",
        depots.len(),
        parcels.len(),
        delivery_points.len()
    );
    println!();

    // 3. Build sim.
    let mut sim = SimBuilder::new(config.clone(), depots)
        .parcels(parcels)
        .delivery_points(delivery_points)
        .build()?;

    // 4. Set up output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    #[cfg(not(feature = "sqlite"))]
    let writer = rd_output::CsvWriter::new(Path::new(OUTPUT_DIR))?;
    #[cfg(feature = "sqlite")]
    let writer = rd_output::SqliteWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer, &config));

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    let summary = sim.summary();
    let (days, hours, minutes) = sim.clock.elapsed_dhm(summary.final_tick);
    info!(elapsed_ms = elapsed.as_millis() as u64, "demo finished");

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  simulated time     : {days}d {hours:02}h {minutes:02}m ({} ticks)", summary.final_tick.0);
    println!("  events processed   : {}", summary.events);
    println!("  rounds completed   : {} ({} parcels brought back)", obs.rounds, obs.returned);
    println!("  rounds still queued: {}", summary.rounds_queued);
    println!("  drivers retired    : {}", summary.retired_drivers);
    println!("  delivery rows      : {}", obs.delivery_rows);
    println!("  snapshot rows      : {}", obs.snapshot_rows);
    println!();

    println!("{:<18} {:>8}", "Status", "Parcels");
    println!("{}", "-".repeat(27));
    for (name, n) in [
        ("Delivered", summary.delivered),
        ("FailedAttempt", summary.failed_attempt),
        ("OutForDelivery", summary.out_for_delivery),
        ("Undelivered", summary.undelivered),
    ] {
        println!("{name:<18} {n:>8}");
    }

    Ok(())
}
