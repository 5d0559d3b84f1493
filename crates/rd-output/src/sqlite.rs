//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `deliveries` and `depot_snapshots`.

use std::path::Path;

use rusqlite::Connection;

use crate::{DeliveryRow, DepotSnapshotRow, OutputResult};
use crate::writer::OutputWriter;

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS deliveries (
                 tick           INTEGER NOT NULL,
                 unix_time_secs INTEGER NOT NULL,
                 parcel_id      INTEGER NOT NULL,
                 label          TEXT    NOT NULL,
                 driver_id      INTEGER NOT NULL,
                 round_id       INTEGER NOT NULL,
                 x              REAL    NOT NULL,
                 y              REAL    NOT NULL,
                 delivered      INTEGER NOT NULL,
                 distance       REAL    NOT NULL,
                 status         INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS depot_snapshots (
                 depot_id       INTEGER NOT NULL,
                 tick           INTEGER NOT NULL,
                 unix_time_secs INTEGER NOT NULL,
                 num_bays       INTEGER NOT NULL,
                 occupying      INTEGER NOT NULL,
                 waiting        INTEGER NOT NULL,
                 rounds_queued  INTEGER NOT NULL,
                 parcels_held   INTEGER NOT NULL,
                 PRIMARY KEY (depot_id, tick)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO deliveries \
                 (tick, unix_time_secs, parcel_id, label, driver_id, round_id, x, y, delivered, distance, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.unix_time_secs,
                    row.parcel_id,
                    row.label,
                    row.driver_id,
                    row.round_id,
                    row.x,
                    row.y,
                    row.delivered as i64,
                    row.distance,
                    row.status,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_depot_snapshots(&mut self, rows: &[DepotSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO depot_snapshots \
                 (depot_id, tick, unix_time_secs, num_bays, occupying, waiting, rounds_queued, parcels_held) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.depot_id,
                    row.tick as i64,
                    row.unix_time_secs,
                    row.num_bays,
                    row.occupying,
                    row.waiting,
                    row.rounds_queued,
                    row.parcels_held,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
