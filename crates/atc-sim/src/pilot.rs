//! `Pilot` — the thread body of one aircraft.
//!
//! # Lifecycle
//!
//! ```text
//! for each route sector T:
//!     enqueue Acquire(T)
//!     wait on the grant signal ──timeout──► recovery (at most once per leg)
//!     claim T physically (retry with claim_backoff)
//!     release the previously held sector
//!     dwell
//! release the last sector, mark finished
//! ```
//!
//! The aircraft keeps holding its current sector while it waits for the next
//! one.  That is what makes cycles possible and recovery necessary.
//!
//! # Release order
//!
//! Leaving a sector is always *physical unclaim first, then* the Release
//! request.  The controller hands the sector to the next waiter only after
//! it sees the Release, so the next occupant's claim normally succeeds on the
//! first try.
//!
//! # Recovery
//!
//! On a grant timeout, while holding an ordinary sector:
//!
//! 1. take the recovery lock; if an episode is already running, drop the lock
//!    and keep waiting
//! 2. otherwise open an episode and request the private backup sector
//! 3. wait for the backup grant (a target grant that overtakes it is kept)
//! 4. claim the backup, release the held sector, drop the lock
//! 5. pause `recovery_settle`, re-issue the target Acquire, and go back to
//!    waiting for the target
//!
//! The first target request stays parked in its wait queue throughout, so
//! the re-issued one is absorbed by the controller.  The episode ends when
//! the backup is released, which happens as soon as the aircraft enters its
//! target.  A later timeout while sitting in the backup never starts a
//! second episode; it hands the running one back instead, because an
//! aircraft that holds only its backup cannot be part of the cycle.

use std::thread;
use std::time::Instant;

use tracing::{debug, info, info_span, trace, warn};

use atc_control::{Airspace, GrantSignal, GrantWait, Request};
use atc_core::{AircraftId, AircraftRng, SectorId};
use atc_fleet::{Aircraft, FlightPhase};

use crate::{FlightObserver, FlightReport, SimResult};

/// Marks the aircraft finished when dropped, including on unwind, so the
/// controller never waits for a pilot that is gone.
struct FinishGuard<'a> {
    airspace: &'a Airspace,
    aircraft: AircraftId,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.airspace.mark_finished(self.aircraft);
    }
}

pub struct Pilot<'a, O: FlightObserver + ?Sized> {
    airspace: &'a Airspace,
    aircraft: Aircraft,
    rng:      AircraftRng,
    observer: &'a O,
}

impl<'a, O: FlightObserver + ?Sized> Pilot<'a, O> {
    pub fn new(airspace: &'a Airspace, aircraft: Aircraft, rng: AircraftRng, observer: &'a O) -> Self {
        Self { airspace, aircraft, rng, observer }
    }

    /// Fly the whole route and return the aircraft's statistics.
    ///
    /// The aircraft is marked finished on every exit path.
    pub fn fly(mut self) -> SimResult<FlightReport> {
        let id = self.aircraft.id;
        let _span = info_span!("pilot", aircraft = %id).entered();
        let _finish = FinishGuard { airspace: self.airspace, aircraft: id };

        info!(priority = self.aircraft.priority, route_len = self.aircraft.route().len(),
              "flight started");

        let airspace = self.airspace;
        let signal = airspace.signal(id)?;
        while let Some(target) = self.aircraft.next_sector() {
            self.fly_leg(signal, target)?;
        }

        if let Some(last) = self.aircraft.leave() {
            self.release(last)?;
        }
        self.aircraft.set_phase(FlightPhase::Finished);

        let report = FlightReport::from_aircraft(&self.aircraft);
        info!(mean_wait = ?report.mean_wait, recoveries = report.recoveries, "flight finished");
        self.observer.on_finished(&report);
        Ok(report)
    }

    /// Request, wait for, and enter `target`.
    fn fly_leg(&mut self, signal: &GrantSignal, target: SectorId) -> SimResult<()> {
        let id = self.aircraft.id;
        let timeout = self.airspace.config().grant_timeout;

        self.aircraft.set_phase(FlightPhase::Requesting);
        let requested_at = Instant::now();
        self.submit(Request::acquire(id, target));
        self.aircraft.set_phase(FlightPhase::Waiting);

        loop {
            match signal.wait(timeout) {
                GrantWait::Granted(sector) if sector == target => break,
                GrantWait::Granted(other) => {
                    warn!(sector = %other, expected = %target, "unexpected grant ignored");
                }
                GrantWait::TimedOut => {
                    self.aircraft.set_phase(FlightPhase::TimedOut);
                    debug!(sector = %target, waited = ?requested_at.elapsed(), "grant timed out");
                    if self.can_recover() {
                        if self.recover(signal, target)? {
                            break;
                        }
                    } else if self.in_own_backup() {
                        self.hand_back_episode();
                    }
                    self.aircraft.set_phase(FlightPhase::Waiting);
                }
            }
        }

        self.aircraft.set_phase(FlightPhase::Granted);
        self.claim(target)?;
        // Waiting ends with the physical claim, not the grant message.
        self.aircraft.record_wait(requested_at.elapsed());
        let previous = self.aircraft.enter_route_sector();
        self.aircraft.set_phase(FlightPhase::HoldingSector);
        trace!(sector = %target, position = self.aircraft.position(), "sector entered");
        self.observer.on_sector_entered(id, target, self.aircraft.position() - 1);

        if let Some(previous) = previous {
            self.release(previous)?;
        }

        let dwell = self.rng.dwell(&self.airspace.config().dwell_ms);
        thread::sleep(dwell);
        Ok(())
    }

    /// Recovery only helps when the aircraft holds an ordinary sector that
    /// someone else may be waiting for.  An aircraft holding nothing keeps
    /// waiting through every timeout and never opens an episode: it cannot
    /// close a cycle, and opening one would only delay the aircraft that can.
    fn can_recover(&self) -> bool {
        self.aircraft
            .held()
            .is_some_and(|held| !self.airspace.sectors().is_backup(held))
    }

    fn in_own_backup(&self) -> bool {
        self.aircraft.held() == Some(self.airspace.backup_sector(self.aircraft.id))
    }

    /// Timed out again after recovering: the target is held by a cycle this
    /// aircraft is not part of.  Give the episode up so one of its members
    /// can recover.
    fn hand_back_episode(&self) {
        let guard = self.airspace.recovery().lock();
        if guard.relinquish(self.aircraft.id) {
            info!("still blocked in backup sector, recovery episode handed back");
        }
    }

    /// Run one recovery attempt.  Returns `true` if the target grant arrived
    /// while waiting for the backup.
    fn recover(&mut self, signal: &GrantSignal, target: SectorId) -> SimResult<bool> {
        let id = self.aircraft.id;
        let airspace = self.airspace;
        let guard = airspace.recovery().lock();
        if !guard.try_begin(id) {
            trace!("recovery already in progress, still waiting");
            return Ok(false);
        }

        let backup = airspace.backup_sector(id);
        let timeout = airspace.config().grant_timeout;
        info!(backup = %backup, waiting_for = %target, "deadlock suspected, recovering");

        self.submit(Request::acquire(id, backup));
        let mut target_granted = false;
        loop {
            match signal.wait(timeout) {
                GrantWait::Granted(sector) if sector == backup => break,
                GrantWait::Granted(sector) if sector == target => target_granted = true,
                GrantWait::Granted(other) => {
                    warn!(sector = %other, "unexpected grant during recovery ignored");
                }
                GrantWait::TimedOut => warn!(backup = %backup, "backup grant is late"),
            }
        }

        self.claim(backup)?;
        if let Some(abandoned) = self.aircraft.enter_backup(backup) {
            self.release(abandoned)?;
            self.observer.on_recovery(id, backup, abandoned);
        }
        drop(guard);

        thread::sleep(airspace.config().recovery_settle);
        if !target_granted {
            // Still parked from the first request, so the controller absorbs
            // this one.
            self.submit(Request::acquire(id, target));
        }
        Ok(target_granted)
    }

    // ── Primitives ────────────────────────────────────────────────────────

    /// Enqueue `request`, backing off while the queue is saturated.
    fn submit(&self, request: Request) {
        let retry = self.airspace.config().enqueue_retry;
        let mut pending = request;
        while let Err(full) = self.airspace.requests().enqueue(pending) {
            debug!(request = %full.request, capacity = full.capacity, "request queue full, retrying");
            pending = full.request;
            thread::sleep(retry);
        }
    }

    /// Physically enter `sector` once the controller has granted it.
    fn claim(&self, sector: SectorId) -> SimResult<()> {
        let id = self.aircraft.id;
        let s = self.airspace.sectors().get(sector)?;
        let backoff = self.airspace.config().claim_backoff;
        while !s.try_claim(id) {
            trace!(sector = %sector, claimant = ?s.claimant(), "sector still physically occupied");
            thread::sleep(backoff);
        }
        Ok(())
    }

    /// Leave `sector` physically, then tell the controller.
    fn release(&self, sector: SectorId) -> SimResult<()> {
        let id = self.aircraft.id;
        self.observer.on_sector_left(id, sector);
        if !self.airspace.sectors().get(sector)?.unclaim(id) {
            warn!(sector = %sector, "released a sector this aircraft did not occupy");
        }
        self.submit(Request::release(id, sector));
        Ok(())
    }
}
