//! Per-aircraft progress state and the flight phase machine.
//!
//! An `Aircraft` is owned by exactly one thread at a time: the setup thread
//! while the fleet is built, then the aircraft's own pilot thread for the
//! whole flight.  Nothing here is synchronised; shared state lives in
//! `atc-control`.

use std::fmt;
use std::time::Duration;

use atc_core::{AircraftId, Priority, SectorId};

use crate::Route;

// ── FlightPhase ───────────────────────────────────────────────────────────────

/// Where an aircraft is in its request/wait/hold cycle.
///
/// ```text
/// NotStarted → Requesting → Waiting → Granted  → HoldingSector → Requesting → …
///                                   ↘ TimedOut ↗                ↘ Finished
///                                        ↺ Waiting
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlightPhase {
    #[default]
    NotStarted,
    /// Building and enqueueing the Acquire for the next route sector.
    Requesting,
    /// Parked on the grant signal.
    Waiting,
    /// Grant received; physically claiming the sector.
    Granted,
    /// The grant did not arrive in time; deadlock recovery runs from here.
    TimedOut,
    /// Inside a sector (route sector or backup).
    HoldingSector,
    Finished,
}

impl FlightPhase {
    /// Whether `self → next` is an edge of the phase machine.
    pub fn can_advance_to(self, next: FlightPhase) -> bool {
        use FlightPhase::*;
        matches!(
            (self, next),
            (NotStarted, Requesting)
                | (NotStarted, Finished)
                | (Requesting, Waiting)
                | (Waiting, Granted)
                | (Waiting, TimedOut)
                | (TimedOut, Waiting)
                | (TimedOut, Granted)
                | (Granted, HoldingSector)
                | (HoldingSector, Requesting)
                | (HoldingSector, Finished)
        )
    }
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlightPhase::NotStarted    => "not-started",
            FlightPhase::Requesting    => "requesting",
            FlightPhase::Waiting       => "waiting",
            FlightPhase::Granted       => "granted",
            FlightPhase::TimedOut      => "timed-out",
            FlightPhase::HoldingSector => "holding",
            FlightPhase::Finished      => "finished",
        };
        f.write_str(s)
    }
}

// ── Aircraft ──────────────────────────────────────────────────────────────────

/// One aircraft: identity, priority, its fixed route, and flight progress.
#[derive(Clone, Debug)]
pub struct Aircraft {
    pub id:       AircraftId,
    pub priority: Priority,
    route:           Route,
    /// Index of the next route entry to enter.  Never decreases.
    position:        usize,
    held:            Option<SectorId>,
    cumulative_wait: Duration,
    recoveries:      u32,
    phase:           FlightPhase,
}

impl Aircraft {
    pub fn new(id: AircraftId, priority: Priority, route: Route) -> Self {
        Self {
            id,
            priority,
            route,
            position:        0,
            held:            None,
            cumulative_wait: Duration::ZERO,
            recoveries:      0,
            phase:           FlightPhase::NotStarted,
        }
    }

    // ── Read accessors ────────────────────────────────────────────────────

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Route position (number of route sectors already entered).
    pub fn position(&self) -> usize {
        self.position
    }

    /// The route sector to request next, or `None` once the route is done.
    pub fn next_sector(&self) -> Option<SectorId> {
        self.route.get(self.position)
    }

    /// The sector currently physically held, if any.
    pub fn held(&self) -> Option<SectorId> {
        self.held
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn is_route_complete(&self) -> bool {
        self.position >= self.route.len()
    }

    pub fn cumulative_wait(&self) -> Duration {
        self.cumulative_wait
    }

    /// Number of recovery episodes this aircraft started.
    pub fn recoveries(&self) -> u32 {
        self.recoveries
    }

    /// Mean wait per route sector: `cumulative_wait / route_length`.
    pub fn mean_wait(&self) -> Duration {
        // Route length is ≥ 1 and bounded by the u32 sector-id space.
        self.cumulative_wait / self.route.len() as u32
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Move to `next`.  Illegal edges are a logic error in the pilot.
    pub fn set_phase(&mut self, next: FlightPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "{}: illegal phase change {} → {}",
            self.id,
            self.phase,
            next
        );
        self.phase = next;
    }

    /// Start the flight already inside `sector` without consuming a route
    /// entry.  Used to set up scenarios before the pilot thread starts.
    pub fn place(&mut self, sector: SectorId) {
        self.held = Some(sector);
    }

    /// Record a confirmed claim of the current route sector.
    ///
    /// Advances the route position and returns the previously held sector,
    /// which the caller must release.
    pub fn enter_route_sector(&mut self) -> Option<SectorId> {
        let sector = self.next_sector();
        debug_assert!(sector.is_some(), "{}: entered past end of route", self.id);
        self.position += 1;
        std::mem::replace(&mut self.held, sector)
    }

    /// Record a confirmed claim of the backup sector.  The route position is
    /// unchanged.  Returns the previously held sector.
    pub fn enter_backup(&mut self, backup: SectorId) -> Option<SectorId> {
        self.recoveries += 1;
        self.held.replace(backup)
    }

    /// Drop the held sector (end of flight).  Returns it for release.
    pub fn leave(&mut self) -> Option<SectorId> {
        self.held.take()
    }

    pub fn record_wait(&mut self, waited: Duration) {
        self.cumulative_wait += waited;
    }
}
