//! `EventQueue` — sparse time-ordered event queue.
//!
//! # Why a map of deques
//!
//! Depot fairness depends on equal-time events running in insertion order:
//! two drivers reaching a full depot on the same tick must be promoted in the
//! order they arrived.  A binary heap keyed on time alone gives no such
//! guarantee, so events are bucketed per tick and each bucket is a FIFO.
//!
//! `BTreeMap` gives O(log W) insert and pop where W = number of distinct
//! pending ticks, which stays small (one entry per driver at most, plus load
//! completions).

use std::collections::{BTreeMap, VecDeque};

use rd_core::Tick;

/// A priority queue mapping simulation ticks → events due at that tick.
#[derive(Debug)]
pub struct EventQueue<E> {
    inner: BTreeMap<Tick, VecDeque<E>>,
    /// Time of the most recently popped event.
    now:   Tick,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), now: Tick::ZERO, total: 0 }
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time: the tick of the last popped event.
    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Schedule `event` at `tick`.
    ///
    /// A tick in the past is clamped to `now()` — the queue never travels
    /// backwards.  Scheduling is additive: the same actor may appear many
    /// times, and nothing is deduplicated.
    pub fn push_at(&mut self, tick: Tick, event: E) {
        let tick = tick.max(self.now);
        self.inner.entry(tick).or_default().push_back(event);
        self.total += 1;
    }

    /// Schedule `event` `delay` ticks from now.
    #[inline]
    pub fn push_after(&mut self, delay: u64, event: E) {
        self.push_at(self.now + delay, event);
    }

    /// Schedule `event` at the current tick, behind everything already queued
    /// for it.
    #[inline]
    pub fn push_next_tick(&mut self, event: E) {
        self.push_at(self.now, event);
    }

    /// Remove and return the earliest event, advancing `now()` to its tick.
    pub fn pop(&mut self) -> Option<(Tick, E)> {
        let mut entry = self.inner.first_entry()?;
        let tick = *entry.key();
        let event = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        let event = event?;
        self.total -= 1;
        self.now = tick;
        Some((tick, event))
    }

    /// Pop the earliest event only if it is due strictly before `end`.
    pub fn pop_before(&mut self, end: Tick) -> Option<(Tick, E)> {
        match self.next_tick() {
            Some(t) if t < end => self.pop(),
            _ => None,
        }
    }

    /// The earliest tick with at least one queued event, or `None` if empty.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Events queued for exactly `tick`, in execution order.
    pub fn pending_at(&self, tick: Tick) -> impl Iterator<Item = &E> {
        self.inner.get(&tick).into_iter().flat_map(|q| q.iter())
    }

    /// Total number of queued events.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future ticks that have at least one queued event.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }
}
