//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `deliveries.csv`
//! - `depot_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{DeliveryRow, DepotSnapshotRow, OutputResult};
use crate::writer::OutputWriter;

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    deliveries: Writer<File>,
    snapshots:  Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut deliveries = Writer::from_path(dir.join("deliveries.csv"))?;
        deliveries.write_record([
            "tick", "unix_time_secs", "parcel_id", "label", "driver_id", "round_id",
            "x", "y", "delivered", "distance", "status",
        ])?;

        let mut snapshots = Writer::from_path(dir.join("depot_snapshots.csv"))?;
        snapshots.write_record([
            "depot_id", "tick", "unix_time_secs", "num_bays", "occupying", "waiting",
            "rounds_queued", "parcels_held",
        ])?;

        Ok(Self {
            deliveries,
            snapshots,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()> {
        for row in rows {
            self.deliveries.write_record(&[
                row.tick.to_string(),
                row.unix_time_secs.to_string(),
                row.parcel_id.to_string(),
                row.label.clone(),
                row.driver_id.to_string(),
                row.round_id.to_string(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
                (row.delivered as u8).to_string(),
                format!("{:.3}", row.distance),
                row.status.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_depot_snapshots(&mut self, rows: &[DepotSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.depot_id.to_string(),
                row.tick.to_string(),
                row.unix_time_secs.to_string(),
                row.num_bays.to_string(),
                row.occupying.to_string(),
                row.waiting.to_string(),
                row.rounds_queued.to_string(),
                row.parcels_held.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.deliveries.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
