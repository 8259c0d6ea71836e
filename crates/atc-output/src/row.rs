//! Plain data row types written by output backends.

use std::fmt;

use atc_sim::FlightReport;

/// What happened to a sector in a [`SectorEventRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorEvent {
    Entered,
    Left,
    /// The aircraft moved into its backup sector (the row's sector).
    Recovery,
}

impl fmt::Display for SectorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SectorEvent::Entered  => "entered",
            SectorEvent::Left     => "left",
            SectorEvent::Recovery => "recovery",
        })
    }
}

/// One sector transition, timestamped from the start of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorEventRow {
    pub elapsed_us:  u64,
    pub aircraft_id: u32,
    pub sector_id:   u32,
    pub event:       SectorEvent,
    /// Route position for `Entered`; `u32::MAX` otherwise.
    pub position:    u32,
}

/// End-of-flight summary of one aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightRow {
    pub aircraft_id:        u32,
    pub priority:           u32,
    pub route_len:          u32,
    pub cumulative_wait_us: u64,
    pub mean_wait_us:       u64,
    pub recoveries:         u32,
}

impl From<&FlightReport> for FlightRow {
    fn from(r: &FlightReport) -> Self {
        Self {
            aircraft_id:        r.aircraft.0,
            priority:           r.priority,
            route_len:          r.route_len as u32,
            cumulative_wait_us: r.cumulative_wait.as_micros() as u64,
            mean_wait_us:       r.mean_wait.as_micros() as u64,
            recoveries:         r.recoveries,
        }
    }
}
