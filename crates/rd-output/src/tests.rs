//! Integration tests for rd-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{DeliveryRow, DepotSnapshotRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn delivery_row(parcel_id: u32, delivered: bool) -> DeliveryRow {
        DeliveryRow {
            tick:           30,
            unix_time_secs: 1800,
            parcel_id,
            label:          format!("Parcel {parcel_id:04}"),
            driver_id:      2,
            round_id:       1,
            x:              3.0,
            y:              4.0,
            delivered,
            distance:       if delivered { 0.0 } else { 5.0 },
            status:         if delivered { 3 } else { 1 },
        }
    }

    fn snapshot_row(tick: u64) -> DepotSnapshotRow {
        DepotSnapshotRow {
            depot_id:       0,
            tick,
            unix_time_secs: tick as i64 * 60,
            num_bays:       2,
            occupying:      1,
            waiting:        3,
            rounds_queued:  4,
            parcels_held:   40,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("deliveries.csv").exists());
        assert!(dir.path().join("depot_snapshots.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("deliveries.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, [
            "tick", "unix_time_secs", "parcel_id", "label", "driver_id", "round_id",
            "x", "y", "delivered", "distance", "status",
        ]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("depot_snapshots.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, [
            "depot_id", "tick", "unix_time_secs", "num_bays", "occupying", "waiting",
            "rounds_queued", "parcels_held",
        ]);
    }

    #[test]
    fn csv_delivery_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[delivery_row(7, true), delivery_row(8, false)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("deliveries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "7");           // parcel_id
        assert_eq!(&rows[0][3], "Parcel 0007"); // label
        assert_eq!(&rows[0][8], "1");           // delivered
        assert_eq!(&rows[1][8], "0");
        assert_eq!(&rows[1][9], "5.000");       // distance
        assert_eq!(&rows[1][10], "1");          // FAILED_ATTEMPT
    }

    #[test]
    fn csv_snapshot_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_depot_snapshots(&[snapshot_row(0), snapshot_row(60)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("depot_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][1], "60");   // tick
        assert_eq!(&rows[1][2], "3600"); // unix_time_secs
        assert_eq!(&rows[1][5], "3");    // waiting
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // second call should not panic
    }

    #[test]
    fn csv_empty_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[]).unwrap();
        w.write_depot_snapshots(&[]).unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use tempfile::TempDir;

    use rd_cargo::{Delivery, ParcelSpec, ParcelStatus};
    use rd_core::{DriverId, ParcelId, Point, ReliefConfig, RoundId, Tick};
    use rd_sim::{DeliveryRecord, SimBuilder, SimObserver};

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;
    use crate::row::{DeliveryRow, DepotSnapshotRow};
    use crate::writer::OutputWriter;
    use crate::OutputResult;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    /// Collects rows in memory.
    #[derive(Default)]
    struct MemWriter {
        deliveries: Vec<DeliveryRow>,
        snapshots:  Vec<DepotSnapshotRow>,
        batches:    usize,
        finished:   usize,
    }

    impl OutputWriter for MemWriter {
        fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()> {
            self.batches += 1;
            self.deliveries.extend_from_slice(rows);
            Ok(())
        }
        fn write_depot_snapshots(&mut self, rows: &[DepotSnapshotRow]) -> OutputResult<()> {
            self.snapshots.extend_from_slice(rows);
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    /// Fails every write.
    struct BrokenWriter;

    impl OutputWriter for BrokenWriter {
        fn write_deliveries(&mut self, _rows: &[DeliveryRow]) -> OutputResult<()> {
            Err(std::io::Error::other("disk full").into())
        }
        fn write_depot_snapshots(&mut self, _rows: &[DepotSnapshotRow]) -> OutputResult<()> {
            Err(std::io::Error::other("disk gone").into())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    fn record(tick: u64, outcome: Delivery) -> DeliveryRecord {
        DeliveryRecord {
            tick:    Tick(tick),
            parcel:  ParcelId(3),
            label:   "Parcel AB12".into(),
            driver:  DriverId(1),
            round:   Some(RoundId(2)),
            at:      Point::new(1.5, 2.5),
            outcome,
            status:  if outcome.is_delivered() { ParcelStatus::Delivered } else { ParcelStatus::FailedAttempt },
        }
    }

    #[test]
    fn rows_buffered_until_sim_end() {
        let config = ReliefConfig { start_unix_secs: 1_000, tick_duration_secs: 60, ..ReliefConfig::default() };
        let mut obs = SimOutputObserver::new(MemWriter::default(), &config);
        obs.on_delivery(&record(10, Delivery::Delivered));
        obs.on_delivery(&record(11, Delivery::Missed { distance: 7.5 }));
        obs.on_sim_end(Tick(11));
        assert!(obs.take_error().is_none());

        let w = obs.into_writer();
        assert_eq!(w.batches, 1);
        assert_eq!(w.finished, 1);
        assert_eq!(w.deliveries.len(), 2);
        assert_eq!(w.deliveries[0].unix_time_secs, 1_600);
        assert!(w.deliveries[0].delivered);
        assert_eq!(w.deliveries[0].status, 3);
        assert_eq!(w.deliveries[1].distance, 7.5);
        assert_eq!(w.deliveries[1].round_id, 2);
        assert_eq!(w.deliveries[1].x, 1.5);
    }

    #[test]
    fn first_error_is_kept() {
        let mut obs = SimOutputObserver::new(BrokenWriter, &ReliefConfig::default());
        obs.on_delivery(&record(1, Delivery::Delivered));
        obs.on_sim_end(Tick(1));
        let err = obs.take_error().expect("write error stored");
        assert!(err.to_string().contains("disk full"), "{err}");
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn integration_memory() {
        let config = ReliefConfig {
            num_drivers:             2,
            num_bays:                1,
            approx_manifest_size:    4,
            prob_failed_delivery:    0.0,
            snapshot_interval_ticks: 20,
            ..ReliefConfig::default()
        };
        let parcels = (0..8).map(|i| ParcelSpec::to(Point::new(30.0, i as f64 * 10.0))).collect();
        let mut sim = SimBuilder::new(config.clone(), vec![Point::new(0.0, 0.0)])
            .parcels(parcels)
            .build()
            .unwrap();

        let mut obs = SimOutputObserver::new(MemWriter::default(), &config);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let w = obs.into_writer();
        assert_eq!(w.deliveries.len(), 8);
        assert!(w.deliveries.iter().all(|r| r.delivered));
        assert!(!w.snapshots.is_empty());
        assert!(w.snapshots.iter().all(|s| s.tick % 20 == 0 && s.occupying <= s.num_bays));
        assert_eq!(w.snapshots[0].parcels_held, 8);
    }

    #[test]
    fn integration_csv() {
        let config = ReliefConfig {
            num_drivers:             3,
            num_bays:                2,
            approx_manifest_size:    5,
            prob_failed_delivery:    0.0,
            snapshot_interval_ticks: 0,
            ..ReliefConfig::default()
        };
        let parcels = (0..20).map(|i| ParcelSpec::to(Point::new(i as f64 * 5.0, 40.0))).collect();
        let mut sim = SimBuilder::new(config.clone(), vec![Point::new(0.0, 0.0)])
            .parcels(parcels)
            .build()
            .unwrap();

        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &config);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("deliveries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 20);
        assert!(rows.iter().all(|r| &r[8] == "1"));

        let mut rdr = csv::Reader::from_path(dir.path().join("depot_snapshots.csv")).unwrap();
        assert_eq!(rdr.records().count(), 0, "snapshots disabled");
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::{DeliveryRow, DepotSnapshotRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_delivery_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let rows: Vec<DeliveryRow> = (0..3)
            .map(|i| DeliveryRow {
                tick:           i,
                unix_time_secs: i as i64 * 60,
                parcel_id:      i as u32,
                label:          format!("Parcel {i:04}"),
                driver_id:      0,
                round_id:       0,
                x:              0.0,
                y:              0.0,
                delivered:      i != 1,
                distance:       if i == 1 { 12.0 } else { 0.0 },
                status:         if i == 1 { 1 } else { 3 },
            })
            .collect();
        w.write_deliveries(&rows).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM deliveries", [], |r| r.get(0)
        ).unwrap();
        assert_eq!(count, 3);
        let missed: i64 = conn.query_row(
            "SELECT COUNT(*) FROM deliveries WHERE delivered = 0", [], |r| r.get(0)
        ).unwrap();
        assert_eq!(missed, 1);
    }

    #[test]
    fn sqlite_no_round_sentinel_stored() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[DeliveryRow {
            tick: 0, unix_time_secs: 0, parcel_id: 9, label: "Parcel ZZZZ".into(), driver_id: 0,
            round_id: u32::MAX, x: 0.0, y: 0.0, delivered: true, distance: 0.0, status: 3,
        }]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        // SQLite INTEGER is signed 64-bit; u32::MAX fits without loss.
        let val: i64 = conn.query_row(
            "SELECT round_id FROM deliveries WHERE parcel_id = 9", [], |r| r.get(0)
        ).unwrap();
        assert_eq!(val, u32::MAX as i64);
    }

    #[test]
    fn sqlite_depot_snapshot() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_depot_snapshots(&[DepotSnapshotRow {
            depot_id: 1, tick: 7, unix_time_secs: 420, num_bays: 2,
            occupying: 2, waiting: 5, rounds_queued: 3, parcels_held: 30,
        }]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (occupying, waiting): (i64, i64) = conn.query_row(
            "SELECT occupying, waiting FROM depot_snapshots WHERE depot_id = 1 AND tick = 7",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        ).unwrap();
        assert_eq!(occupying, 2);
        assert_eq!(waiting, 5);
    }
}
