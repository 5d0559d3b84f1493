//! `DepotCtx` — explicit context passed to every depot operation.

use rd_cargo::ParcelStore;
use rd_core::Tick;
use rd_schedule::EventQueue;

use crate::{DepotEvent, Fleet};

/// Everything a depot operation may read or mutate besides the depot itself.
///
/// Built by the caller for the duration of one operation; there is no global
/// simulation instance.  Tests build one from a bare `EventQueue`, a
/// `ParcelStore` and a stub `Fleet`.
pub struct DepotCtx<'a, E> {
    pub events:  &'a mut EventQueue<E>,
    pub parcels: &'a mut ParcelStore,
    pub fleet:   &'a mut dyn Fleet,
}

impl<'a, E: From<DepotEvent>> DepotCtx<'a, E> {
    pub fn new(
        events:  &'a mut EventQueue<E>,
        parcels: &'a mut ParcelStore,
        fleet:   &'a mut dyn Fleet,
    ) -> Self {
        Self { events, parcels, fleet }
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> Tick {
        self.events.now()
    }

    /// Schedule `event` `delay` ticks from now.
    #[inline]
    pub fn schedule_after(&mut self, delay: u64, event: DepotEvent) {
        self.events.push_after(delay, event.into());
    }

    /// Schedule `event` behind everything already due now.
    #[inline]
    pub fn schedule_next_tick(&mut self, event: DepotEvent) {
        self.events.push_next_tick(event.into());
    }
}
