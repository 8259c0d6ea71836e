use atc_core::{AircraftId, AtcError, SectorId};
use thiserror::Error;

use crate::QueueFull;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    QueueFull(#[from] QueueFull),

    #[error("{what} length {got} does not match aircraft count {expected}")]
    AircraftCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("sector {sector} is already occupied by {owner}")]
    SectorOccupied { sector: SectorId, owner: AircraftId },

    #[error(transparent)]
    Core(#[from] AtcError),
}

pub type ControlResult<T> = Result<T, ControlError>;
