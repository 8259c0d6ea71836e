//! `atc-output` — run output writers for the rust_atc simulator.
//!
//! | Backend | Files created                                  |
//! |---------|------------------------------------------------|
//! | CSV     | `sector_events.csv`, `flight_reports.csv`      |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`FlightLogObserver`], which implements `atc_sim::FlightObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use atc_output::{CsvWriter, FlightLogObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let obs = FlightLogObserver::new(writer);
//! sim.run(&obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::FlightLogObserver;
pub use row::{FlightRow, SectorEvent, SectorEventRow};
pub use writer::OutputWriter;
