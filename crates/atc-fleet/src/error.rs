use atc_core::{AircraftId, AtcError};
use thiserror::Error;

use crate::RouteError;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("invalid route for {aircraft}: {source}")]
    InvalidRoute {
        aircraft: AircraftId,
        #[source]
        source:   RouteError,
    },

    #[error("route parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] AtcError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FleetResult<T> = Result<T, FleetError>;
