//! `rd-sim` — event loop and driver model for the relief_dt depot simulation.
//!
//! # Event loop
//!
//! ```text
//! while let Some((t, event)) = events.pop_before(end_tick):
//!   ① Snapshots  — emit a DepotSnapshot for every interval boundary <= t.
//!   ② Dispatch   — Activate(driver)          → step the driver state machine
//!                  LoadComplete{depot,driver} → Depot::complete_load
//!   ③ Check      — depot invariants must hold after every event.
//! ```
//!
//! # Driver state machine
//!
//! ```text
//! REPLENISHING ──round loaded──▶ OUTBOUND ──arrive──▶ DISTRIBUTING ──deliver──┐
//!      ▲                            ▲                                         │
//!      │                            └──────────── more parcels ◀──────────────┘
//!      └──── back at depot ──── INBOUND ◀──── manifest empty
//! ```
//!
//! A replenishing driver that gets [`Admission::Never`][rd_depot::Admission::Never]
//! retires and parks its vehicle.  The run ends when the queue drains or
//! `config.total_ticks` is reached.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | Forwards to `rd-depot/parallel` (parallel round partitioning). |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rd_core::{Point, ReliefConfig};
//! use rd_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(ReliefConfig::default(), vec![Point::new(0.0, 0.0)])
//!     .parcels(specs)
//!     .delivery_points(points)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("{:?}", sim.summary());
//! ```

pub mod builder;
pub mod crew;
pub mod driver;
pub mod error;
pub mod event;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use crew::Crew;
pub use driver::{Driver, DriverStatus, RedeliveryPolicy};
pub use error::{SimError, SimResult};
pub use event::Event;
pub use observer::{DeliveryRecord, NoopObserver, SimObserver};
pub use sim::{RunSummary, Sim};
