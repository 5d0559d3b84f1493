//! `rd-depot` — depot admission control and round dispatch.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`depot`]     | `Depot`, `Admission`, `DepotSnapshot`                         |
//! | [`context`]   | `DepotCtx` — everything a depot operation may touch           |
//! | [`fleet`]     | `Fleet` trait — the driver protocol the depot calls into      |
//! | [`event`]     | `DepotEvent` — events the depot schedules                     |
//! | [`partition`] | `RoundPartitioner` trait, `ChunkPartitioner`, `NearestPointPartitioner`, `RoundPlanner` |
//! | [`error`]     | `DepotError`                                                  |
//!
//! # Driver life cycle at one depot
//!
//! ```text
//! ARRIVING ──enter_depot──┬─ no rounds ─────────▶ Admission::Never
//!                         ├─ bay free ──────────▶ IN_BAY   (Admission::Admitted)
//!                         └─ all bays busy ─────▶ WAITING  (Admission::Waiting)
//! WAITING  ──another driver leaves──▶ IN_BAY      (front of the queue only)
//! IN_BAY   ──loading_time later─────▶ load round, DEPARTING (leave_depot)
//! ```
//!
//! A bay is freed only by `leave_depot`, and that is also the only place a
//! waiting driver is promoted, so promotion order equals arrival order and
//! `occupying.len() <= num_bays` holds after every event.
//!
//! All state of one depot sits behind `&mut Depot`; the borrow checker is the
//! critical section that makes check-and-admit atomic.

pub mod context;
pub mod depot;
pub mod error;
pub mod event;
pub mod fleet;
pub mod partition;

#[cfg(test)]
mod tests;

pub use context::DepotCtx;
pub use depot::{Admission, Depot, DepotSnapshot};
pub use error::DepotError;
pub use event::DepotEvent;
pub use fleet::Fleet;
pub use partition::{ChunkPartitioner, NearestPointPartitioner, RoundPartitioner, RoundPlanner};
