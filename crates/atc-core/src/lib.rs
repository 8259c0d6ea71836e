//! `atc-core` — foundational types for the `rust_atc` sector-control
//! simulator.
//!
//! This crate is a dependency of every other `atc-*` crate.  It has no
//! `atc-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`ids`]    | `AircraftId`, `SectorId`, `Priority`                  |
//! | [`config`] | `ControlConfig` (timeouts, back-offs, dwell, seed)    |
//! | [`rng`]    | `AircraftRng` (per-aircraft), `SimRng` (global)       |
//! | [`error`]  | `AtcError`, `AtcResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ControlConfig, validate_counts};
pub use error::{AtcError, AtcResult, try_with_capacity};
pub use ids::{AircraftId, Priority, SectorId};
pub use rng::{AircraftRng, SimRng};
