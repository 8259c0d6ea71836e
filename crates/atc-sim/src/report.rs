//! End-of-flight and end-of-run summaries.

use std::time::Duration;

use atc_control::ControllerStats;
use atc_core::{AircraftId, Priority};
use atc_fleet::Aircraft;

/// What one aircraft experienced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightReport {
    pub aircraft:        AircraftId,
    pub priority:        Priority,
    pub route_len:       usize,
    /// Total time spent between requesting a route sector and being granted it.
    pub cumulative_wait: Duration,
    /// `cumulative_wait / route_len`.
    pub mean_wait:       Duration,
    /// Recovery episodes this aircraft started.
    pub recoveries:      u32,
}

impl FlightReport {
    pub fn from_aircraft(aircraft: &Aircraft) -> Self {
        Self {
            aircraft:        aircraft.id,
            priority:        aircraft.priority,
            route_len:       aircraft.route().len(),
            cumulative_wait: aircraft.cumulative_wait(),
            mean_wait:       aircraft.mean_wait(),
            recoveries:      aircraft.recoveries(),
        }
    }
}

/// What the whole run did.  `flights` is indexed by `AircraftId`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimReport {
    pub flights:           Vec<FlightReport>,
    /// Wall time from spawning the first thread to joining the last.
    pub elapsed:           Duration,
    pub recovery_episodes: u64,
    pub controller:        ControllerStats,
}

impl SimReport {
    /// Mean over aircraft of each aircraft's mean wait.
    pub fn fleet_mean_wait(&self) -> Duration {
        match self.flights.len() {
            0 => Duration::ZERO,
            n => self.flights.iter().map(|f| f.mean_wait).sum::<Duration>() / n as u32,
        }
    }

    pub fn total_route_len(&self) -> usize {
        self.flights.iter().map(|f| f.route_len).sum()
    }
}
