//! Plain data row types written by output backends.

/// One delivery attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryRow {
    pub tick:           u64,
    pub unix_time_secs: i64,
    pub parcel_id:      u32,
    pub label:          String,
    pub driver_id:      u32,
    /// `u32::MAX` if the driver had no round (should not happen in practice).
    pub round_id:       u32,
    pub x:              f64,
    pub y:              f64,
    pub delivered:      bool,
    /// Distance to the delivery point on a miss; 0 when delivered.
    pub distance:       f64,
    /// `ParcelStatus` code after the attempt.
    pub status:         u8,
}

/// A depot's occupancy at a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepotSnapshotRow {
    pub depot_id:       u16,
    pub tick:           u64,
    pub unix_time_secs: i64,
    pub num_bays:       u32,
    pub occupying:      u32,
    pub waiting:        u32,
    pub rounds_queued:  u32,
    pub parcels_held:   u32,
}
