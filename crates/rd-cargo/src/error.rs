use rd_core::ParcelId;
use thiserror::Error;

use crate::CarrierId;

#[derive(Debug, Error)]
pub enum CargoError {
    #[error("{parcel} is not held by {carrier}")]
    NotHeld { parcel: ParcelId, carrier: CarrierId },

    #[error("{parcel} is owned by {owner:?}, not by the carrier attempting delivery")]
    WrongCarrier { parcel: ParcelId, owner: Option<CarrierId> },

    #[error("{0} requested more than once in a single transfer")]
    DuplicateItem(ParcelId),

    #[error("{0} does not exist")]
    UnknownParcel(ParcelId),

    #[error("cannot transfer from {0} to itself")]
    SameCarrier(CarrierId),

    #[error("parcel parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CargoResult<T> = Result<T, CargoError>;
