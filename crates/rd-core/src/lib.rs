//! `rd-core` — foundational types for the `relief_dt` depot simulation.
//!
//! This crate is a dependency of every other `rd-*` crate.  It has no `rd-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `ParcelId`, `DriverId`, `VehicleId`, `DepotId`, `RoundId` |
//! | [`geo`]         | `Point`, `Metric` trait, `Euclidean`                      |
//! | [`time`]        | `Tick`, `SimClock`                                        |
//! | [`config`]      | `ReliefConfig` — model parameters                         |
//! | [`rng`]         | `AgentRng` (per-driver), `SimRng` (global)                |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::ReliefConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{Euclidean, Metric, Point};
pub use ids::{DepotId, DriverId, ParcelId, RoundId, VehicleId};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, Tick};
