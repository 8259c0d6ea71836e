//! `Controller` — the single arbiter of sector ownership.
//!
//! # Arbitration rules
//!
//! | Request | Sector state               | Effect                                        |
//! |---------|----------------------------|-----------------------------------------------|
//! | Acquire | free                       | owner := requester, grant requester           |
//! | Acquire | owned by requester         | absorbed (nothing to do)                      |
//! | Acquire | owned by someone else      | park requester in the sector's wait queue     |
//! | Release | owned by requester, queue  | owner := front waiter, grant that waiter      |
//! | Release | owned by requester, empty  | sector vacated                                |
//! | Release | not owned by requester     | absorbed with a warning                       |
//!
//! Releasing a backup sector also closes the recovery episode its aircraft
//! is running, if any.
//!
//! A parked aircraft that is already in the queue is not inserted twice;
//! this happens when a recovering aircraft re-requests its target sector.
//!
//! # Loop
//!
//! [`Controller::run`] polls the request queue, sleeping
//! `poll_interval` whenever it is empty, and returns once every aircraft has
//! finished and the queue is drained, so the final releases are processed
//! and no sector is left marked occupied.

use std::thread;

use tracing::{debug, error, info, trace, warn};

use atc_core::{AircraftId, AtcError, Priority, SectorId};

use crate::{
    Airspace, ControlError, ControlResult, Insert, PriorityWaitQueue, Request, RequestKind,
};

// ── Arbitration ───────────────────────────────────────────────────────────────

/// What one call to [`Controller::control_priority`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arbitration {
    /// The sector was free and now belongs to the requester.
    Granted,
    /// The requester waits at this index of the sector's queue.
    Parked { position: usize },
    /// Ownership passed straight to the front waiter.
    HandedOff { to: AircraftId },
    /// The sector is free again.
    Vacated,
    /// Nothing changed.
    Absorbed,
}

/// Counters accumulated over one [`Controller::run`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerStats {
    pub processed: u64,
    pub grants:    u64,
    pub parked:    u64,
    pub handoffs:  u64,
    pub vacated:   u64,
    pub absorbed:  u64,
    /// Requests naming an unknown aircraft or sector.
    pub rejected:  u64,
}

impl ControllerStats {
    fn record(&mut self, outcome: Arbitration) {
        match outcome {
            Arbitration::Granted => self.grants += 1,
            Arbitration::Parked { .. } => self.parked += 1,
            Arbitration::HandedOff { .. } => self.handoffs += 1,
            Arbitration::Vacated => self.vacated += 1,
            Arbitration::Absorbed => self.absorbed += 1,
        }
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

pub struct Controller<'a> {
    airspace:    &'a Airspace,
    /// One queue per sector, ordinary and backup, indexed by `SectorId`.
    wait_queues: Vec<PriorityWaitQueue>,
    /// Priority of each aircraft, indexed by `AircraftId`.
    priorities:  Vec<Priority>,
    stats:       ControllerStats,
}

impl<'a> Controller<'a> {
    /// Build the controller for `airspace`.  `priorities[i]` is the priority
    /// of aircraft `i`; its length must equal the fleet size.
    pub fn new(airspace: &'a Airspace, priorities: Vec<Priority>) -> ControlResult<Self> {
        let expected = airspace.num_aircraft();
        if priorities.len() != expected {
            return Err(ControlError::AircraftCountMismatch {
                expected,
                got: priorities.len(),
                what: "priority list",
            });
        }

        let total = airspace.sectors().len();
        let mut wait_queues = atc_core::try_with_capacity(total, "wait queue table")?;
        for sector in airspace.sectors().iter() {
            wait_queues.push(PriorityWaitQueue::new(sector.id, expected)?);
        }

        Ok(Self { airspace, wait_queues, priorities, stats: ControllerStats::default() })
    }

    pub fn airspace(&self) -> &'a Airspace {
        self.airspace
    }

    /// The wait queue of `sector`, if the id is in range.
    pub fn wait_queue(&self, sector: SectorId) -> Option<&PriorityWaitQueue> {
        self.wait_queues.get(sector.index())
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    // ── Arbitration ───────────────────────────────────────────────────────

    /// Apply one request to the sector table.
    ///
    /// Fails only on an out-of-range aircraft or sector id; the airspace is
    /// untouched in that case.
    pub fn control_priority(&mut self, request: Request) -> ControlResult<Arbitration> {
        let Request { aircraft, sector: id, kind } = request;
        let airspace = self.airspace;
        let sector = airspace.sectors().get(id)?;
        let priority = *self
            .priorities
            .get(aircraft.index())
            .ok_or(AtcError::AircraftNotFound(aircraft))?;

        let outcome = match kind {
            RequestKind::Acquire => match sector.owner() {
                None => {
                    sector.assign(aircraft);
                    self.grant(aircraft, id);
                    Arbitration::Granted
                }
                Some(owner) if owner == aircraft => {
                    debug!(aircraft = %aircraft, sector = %id, "acquire of own sector absorbed");
                    Arbitration::Absorbed
                }
                Some(owner) => match self.wait_queues[id.index()].insert(aircraft, priority) {
                    Insert::Queued(position) => {
                        trace!(aircraft = %aircraft, sector = %id, owner = %owner, position,
                               "aircraft parked");
                        Arbitration::Parked { position }
                    }
                    Insert::Duplicate => {
                        debug!(aircraft = %aircraft, sector = %id, "already parked");
                        Arbitration::Absorbed
                    }
                    Insert::Full => {
                        error!(aircraft = %aircraft, sector = %id, "wait queue full, request dropped");
                        Arbitration::Absorbed
                    }
                },
            },
            RequestKind::Release => {
                if sector.owner() != Some(aircraft) {
                    warn!(aircraft = %aircraft, sector = %id, owner = ?sector.owner(),
                          "release from non-owner ignored");
                    return Ok(Arbitration::Absorbed);
                }
                let outcome = match self.wait_queues[id.index()].remove_front() {
                    Some(next) => {
                        sector.assign(next.aircraft);
                        self.grant(next.aircraft, id);
                        Arbitration::HandedOff { to: next.aircraft }
                    }
                    None => {
                        sector.vacate();
                        Arbitration::Vacated
                    }
                };
                let episode_over = sector.backup_of().is_some_and(|owner| airspace.recovery().end(owner));
                if episode_over {
                    info!(aircraft = %aircraft, sector = %id, "recovery episode closed");
                }
                outcome
            }
        };
        Ok(outcome)
    }

    fn grant(&self, aircraft: AircraftId, sector: SectorId) {
        match self.airspace.signal(aircraft) {
            Ok(signal) if signal.notify(sector) => {
                trace!(aircraft = %aircraft, sector = %sector, "grant signalled");
            }
            Ok(_) => error!(aircraft = %aircraft, sector = %sector, "grant channel saturated"),
            Err(e) => error!(error = %e, "grant to unknown aircraft"),
        }
    }

    // ── Main loop ─────────────────────────────────────────────────────────

    /// Serve requests until every aircraft has finished and the queue is
    /// empty.  Returns the accumulated counters.
    pub fn run(&mut self) -> ControllerStats {
        let poll = self.airspace.config().poll_interval;
        info!(aircraft = self.airspace.num_aircraft(),
              sectors = self.airspace.num_sectors(), "controller started");

        loop {
            let Some(request) = self.airspace.requests().dequeue() else {
                // Finished flags are set after the final release is enqueued,
                // so an empty queue observed after them is really drained.
                if self.airspace.all_finished() && self.airspace.requests().is_empty() {
                    break;
                }
                thread::sleep(poll);
                continue;
            };

            self.stats.processed += 1;
            match self.control_priority(request) {
                Ok(outcome) => self.stats.record(outcome),
                Err(e) => {
                    error!(error = %e, request = %request, "request rejected");
                    self.stats.rejected += 1;
                }
            }
        }

        info!(processed = self.stats.processed, grants = self.stats.grants,
              handoffs = self.stats.handoffs, "controller stopped");
        self.stats
    }
}
