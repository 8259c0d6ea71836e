//! `atc-sim` — pilot threads and the run orchestrator.
//!
//! # Threads of one run
//!
//! ```text
//! Sim::run
//!  ├─ controller thread   Controller::run      (arbitrates every request)
//!  ├─ pilot thread 0      Pilot::fly           (request → wait → claim → dwell → release)
//!  ├─ …
//!  └─ pilot thread M-1
//! ```
//!
//! All threads are scoped to the call, borrow the same `Airspace`, and are
//! joined before `run` returns.  The controller exits once every pilot has
//! finished and the request queue is drained.
//!
//! # Deadlock recovery
//!
//! A pilot whose grant does not arrive within `grant_timeout` assumes a
//! cycle.  If no recovery episode is running, it moves into its private
//! backup sector and releases the sector it held, breaking the cycle.  The
//! episode ends when the controller processes the release of that backup
//! sector.  See [`pilot`] for the exact protocol.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use atc_core::ControlConfig;
//! use atc_fleet::FleetBuilder;
//! use atc_sim::{NoopObserver, SimBuilder};
//!
//! let config = ControlConfig::default();
//! let (fleet, rngs) = FleetBuilder::new(4, config.seed).random_aircraft(8).build()?;
//! let mut sim = SimBuilder::new(config, 4, fleet, rngs).build()?;
//! let report = sim.run(&NoopObserver)?;
//! println!("mean wait {:?}", report.fleet_mean_wait());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod pilot;
pub mod report;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{FlightObserver, NoopObserver};
pub use pilot::Pilot;
pub use report::{FlightReport, SimReport};
pub use sim::Sim;
