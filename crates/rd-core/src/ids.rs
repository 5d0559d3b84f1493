//! Strongly typed identifier wrappers.
//!
//! Every entity in the simulation lives in a `Vec` owned by the simulation
//! runner and is addressed by one of these IDs.  All IDs are
//! `Copy + Ord + Hash` so they can be used as map keys and queue entries
//! without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a parcel in the parcel store.
    pub struct ParcelId(u32);
}

typed_id! {
    /// Index of a delivery driver.
    pub struct DriverId(u32);
}

typed_id! {
    /// Index of a vehicle.  Vehicles are usually bound one-to-one to drivers
    /// but carry their own identity so they can be parked and re-assigned.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Index of a depot.  `u16` — a scenario never has more than a handful.
    pub struct DepotId(u16);
}

typed_id! {
    /// Sequence number of a round (manifest), unique per depot.
    pub struct RoundId(u32);
}
