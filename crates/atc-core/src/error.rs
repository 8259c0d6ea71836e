//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `AtcError` as one
//! variant via `#[from]`, the same way `SimError` wraps `ControlError`.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::{AircraftId, SectorId};

/// The top-level error type for `atc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum AtcError {
    #[error("sector {0} not found")]
    SectorNotFound(SectorId),

    #[error("aircraft {0} not found")]
    AircraftNotFound(AircraftId),

    #[error("configuration error: {0}")]
    Config(String),

    /// Construction-time allocation failure.  `what` names the structure
    /// whose allocation failed so the caller can report the failing step.
    #[error("failed to allocate {what}: {source}")]
    Allocation {
        what:   &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `atc-*` crates.
pub type AtcResult<T> = Result<T, AtcError>;

/// Allocate an empty `Vec` with room for exactly `len` elements, reporting
/// allocation failure instead of aborting.
pub fn try_with_capacity<T>(len: usize, what: &'static str) -> AtcResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|source| AtcError::Allocation { what, source })?;
    Ok(v)
}
