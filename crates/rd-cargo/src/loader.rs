//! CSV loaders for parcel and delivery-point files.
//!
//! # Parcel CSV
//!
//! One row per parcel.  `weight` and the three dimension columns are
//! optional and default to zero.
//!
//! ```csv
//! x,y,weight,dim_x,dim_y,dim_z
//! 382140.5,215433.0,2.5,0.4,0.3,0.3
//! 381022.0,214988.7,,,,
//! ```
//!
//! # Delivery-point CSV
//!
//! One row per delivery area centroid, used by the round partitioner.
//!
//! ```csv
//! x,y
//! 382100.0,215400.0
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rd_core::Point;

use crate::{CargoError, ParcelSpec};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ParcelRecord {
    x:      f64,
    y:      f64,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    dim_x:  Option<f64>,
    #[serde(default)]
    dim_y:  Option<f64>,
    #[serde(default)]
    dim_z:  Option<f64>,
}

#[derive(Deserialize)]
struct PointRecord {
    x: f64,
    y: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load parcel specs from a CSV file.
pub fn load_parcels_csv(path: &Path) -> Result<Vec<ParcelSpec>, CargoError> {
    let file = std::fs::File::open(path).map_err(CargoError::Io)?;
    load_parcels_reader(file)
}

/// Like [`load_parcels_csv`] but accepts any `Read` source.
pub fn load_parcels_reader<R: Read>(reader: R) -> Result<Vec<ParcelSpec>, CargoError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<ParcelRecord>()
        .enumerate()
        .map(|(row, result)| {
            let r = result.map_err(|e| CargoError::Parse(format!("row {}: {e}", row + 1)))?;
            let delivery_location = finite_point(r.x, r.y, row)?;
            Ok(ParcelSpec {
                delivery_location,
                dims:   [r.dim_x.unwrap_or(0.0), r.dim_y.unwrap_or(0.0), r.dim_z.unwrap_or(0.0)],
                weight: r.weight.unwrap_or(0.0),
            })
        })
        .collect()
}

/// Load delivery points from a CSV file.
pub fn load_points_csv(path: &Path) -> Result<Vec<Point>, CargoError> {
    let file = std::fs::File::open(path).map_err(CargoError::Io)?;
    load_points_reader(file)
}

/// Like [`load_points_csv`] but accepts any `Read` source.
pub fn load_points_reader<R: Read>(reader: R) -> Result<Vec<Point>, CargoError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<PointRecord>()
        .enumerate()
        .map(|(row, result)| {
            let r = result.map_err(|e| CargoError::Parse(format!("row {}: {e}", row + 1)))?;
            finite_point(r.x, r.y, row)
        })
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn finite_point(x: f64, y: f64, row: usize) -> Result<Point, CargoError> {
    if x.is_finite() && y.is_finite() {
        Ok(Point::new(x, y))
    } else {
        Err(CargoError::Parse(format!("row {}: non-finite coordinate ({x}, {y})", row + 1)))
    }
}
