//! `atc-fleet` — aircraft, routes, and fleet construction.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`route`]    | `Route` (validated sector sequence), `RouteError`         |
//! | [`aircraft`] | `Aircraft` (progress state), `FlightPhase`                |
//! | [`builder`]  | `FleetBuilder`, `FlightPlan`                              |
//! | [`loader`]   | `load_plans_csv`, `load_plans_reader`                     |
//! | [`error`]    | `FleetError`, `FleetResult<T>`                            |
//!
//! # Route model (summary)
//!
//! A route is the ordered list of ordinary sectors an aircraft must cross.
//! It is fixed at creation and validated once:
//!
//! ```text
//! route.len() ≥ 1
//! route[i] < num_sectors
//! route[i] != route[i + 1]
//! ```
//!
//! Because every sector id is checked here, the control layer never sees an
//! out-of-range sector mid-run.

pub mod aircraft;
pub mod builder;
pub mod error;
pub mod loader;
pub mod route;

#[cfg(test)]
mod tests;

pub use aircraft::{Aircraft, FlightPhase};
pub use builder::{FleetBuilder, FlightPlan};
pub use error::{FleetError, FleetResult};
pub use loader::{load_plans_csv, load_plans_reader};
pub use route::{Route, RouteError};
