//! The `OutputWriter` trait implemented by all backend writers.

use crate::{DeliveryRow, DepotSnapshotRow, OutputResult};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors are stored by the observer and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of delivery attempts.
    fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()>;

    /// Write a batch of depot snapshots.
    fn write_depot_snapshots(&mut self, rows: &[DepotSnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
