use rd_cargo::CargoError;
use rd_core::CoreError;
use rd_depot::DepotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{what} length {got} does not match driver count {expected}")]
    DriverCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("depot invariant broken: {0}")]
    Depot(#[from] DepotError),

    #[error("parcel error: {0}")]
    Cargo(#[from] CargoError),
}

pub type SimResult<T> = Result<T, SimError>;
