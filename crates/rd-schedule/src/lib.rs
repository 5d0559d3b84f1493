//! `rd-schedule` — the discrete-event scheduler.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`event_queue`] | `EventQueue<E>` (`BTreeMap<Tick, VecDeque<E>>`)         |
//!
//! # Execution model (summary)
//!
//! ```text
//! while let Some((t, event)) = queue.pop():
//!     now = t                 // never decreases
//!     handle(event)           // may push_at(t' >= now) or push_next_tick()
//! ```
//!
//! Events sharing a tick run in the order they were pushed.  An event pushed
//! for the current tick while that tick is being processed runs after every
//! event already queued for it, which is what "next tick" means here.

pub mod event_queue;

#[cfg(test)]
mod tests;

pub use event_queue::EventQueue;
