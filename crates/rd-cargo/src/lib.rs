//! `rd-cargo` — parcels and the things that carry them.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`parcel`]  | `Parcel`, `ParcelStatus`, `ParcelEvent`, `ParcelSpec`          |
//! | [`hold`]    | `Hold` — insertion-ordered parcel set owned by a carrier       |
//! | [`carrier`] | `Carrier` trait, `CarrierId`, `transfer_to`                    |
//! | [`vehicle`] | `Vehicle` — the mobile carrier bound to a driver               |
//! | [`store`]   | `ParcelStore` — arena of parcels, `deliver()`                  |
//! | [`round`]   | `Round` — an immutable manifest of parcels                     |
//! | [`loader`]  | CSV loaders for parcel and delivery-point files                |
//! | [`error`]   | `CargoError`, `CargoResult<T>`                                 |
//!
//! # Ownership invariant
//!
//! Every live parcel is owned by exactly one carrier, and
//! `parcel.carrier() == Some(c)` iff `c`'s hold contains the parcel.  Only
//! three operations change ownership:
//!
//! 1. [`ParcelStore::create`] — attaches a new parcel to its first carrier.
//! 2. [`Carrier::transfer_to`] — moves a batch between carriers, all or
//!    nothing.
//! 3. [`ParcelStore::deliver`] — removes a delivered parcel from circulation.

pub mod carrier;
pub mod error;
pub mod hold;
pub mod loader;
pub mod parcel;
pub mod round;
pub mod store;
pub mod vehicle;


pub use carrier::{Carrier, CarrierId};
pub use error::{CargoError, CargoResult};
pub use hold::Hold;
pub use loader::{load_parcels_csv, load_parcels_reader, load_points_csv, load_points_reader};
pub use parcel::{Parcel, ParcelEvent, ParcelEventKind, ParcelSpec, ParcelStatus};
pub use round::Round;
pub use store::{Delivery, ParcelStore};
pub use vehicle::Vehicle;
