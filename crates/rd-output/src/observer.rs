//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use rd_cargo::Delivery;
use rd_core::{ReliefConfig, SimClock, Tick};
use rd_depot::DepotSnapshot;
use rd_sim::{DeliveryRecord, SimObserver};

use crate::row::{DeliveryRow, DepotSnapshotRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Rows buffered per table before they are handed to the writer.
const BATCH: usize = 1024;

/// A [`SimObserver`] that writes delivery attempts and depot snapshots to any
/// [`OutputWriter`] backend (CSV, SQLite, …).
///
/// Rows are buffered and written in batches; everything left is flushed in
/// `on_sim_end`.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value.  After `sim.run()` returns,
/// check for errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    clock:      SimClock,
    deliveries: Vec<DeliveryRow>,
    snapshots:  Vec<DepotSnapshotRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for wall-clock
    /// conversion.
    pub fn new(writer: W, config: &ReliefConfig) -> Self {
        Self {
            writer,
            clock:      config.make_clock(),
            deliveries: Vec::with_capacity(BATCH),
            snapshots:  Vec::with_capacity(BATCH),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn flush_deliveries(&mut self) {
        if self.deliveries.is_empty() {
            return;
        }
        let result = self.writer.write_deliveries(&self.deliveries);
        self.deliveries.clear();
        self.store_err(result);
    }

    fn flush_snapshots(&mut self) {
        if self.snapshots.is_empty() {
            return;
        }
        let result = self.writer.write_depot_snapshots(&self.snapshots);
        self.snapshots.clear();
        self.store_err(result);
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_delivery(&mut self, record: &DeliveryRecord) {
        let (delivered, distance) = match record.outcome {
            Delivery::Delivered          => (true, 0.0),
            Delivery::Missed { distance } => (false, distance),
        };
        self.deliveries.push(DeliveryRow {
            tick:           record.tick.0,
            unix_time_secs: self.clock.unix_secs(record.tick),
            parcel_id:      record.parcel.0,
            label:          record.label.clone(),
            driver_id:      record.driver.0,
            round_id:       record.round.map_or(u32::MAX, |r| r.0),
            x:              record.at.x,
            y:              record.at.y,
            delivered,
            distance,
            status:         record.status.code(),
        });
        if self.deliveries.len() >= BATCH {
            self.flush_deliveries();
        }
    }

    fn on_snapshot(&mut self, snapshot: &DepotSnapshot) {
        self.snapshots.push(DepotSnapshotRow {
            depot_id:       snapshot.depot.0,
            tick:           snapshot.tick.0,
            unix_time_secs: self.clock.unix_secs(snapshot.tick),
            num_bays:       snapshot.num_bays as u32,
            occupying:      snapshot.occupying as u32,
            waiting:        snapshot.waiting as u32,
            rounds_queued:  snapshot.rounds_queued as u32,
            parcels_held:   snapshot.parcels_held as u32,
        });
        if self.snapshots.len() >= BATCH {
            self.flush_snapshots();
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        self.flush_deliveries();
        self.flush_snapshots();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
