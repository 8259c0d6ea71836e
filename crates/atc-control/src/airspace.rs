//! `Airspace` — everything the controller and the pilot threads share.
//!
//! Built once on the setup thread, then borrowed (`&Airspace`) by every
//! thread of a run through `std::thread::scope`.  Nothing in here needs
//! `&mut`: the request queue has its own lock, sectors use atomics, grant
//! signals are channels, and the recovery flag is atomic under its own lock.
//!
//! # Construction order
//!
//! 1. dimensions and config are validated
//! 2. sector table (`N` ordinary + `M` backup)
//! 3. request queue (capacity `M`)
//! 4. one grant signal per aircraft
//!
//! A failed allocation at any step is reported as
//! [`AtcError::Allocation`] naming the step; nothing is partially published.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::debug;

use atc_core::{
    AircraftId, AtcError, AtcResult, ControlConfig, SectorId, try_with_capacity, validate_counts,
};

use crate::{ControlError, ControlResult, GrantSignal, RecoveryState, RequestQueue, SectorTable};

pub struct Airspace {
    config:    ControlConfig,
    sectors:   SectorTable,
    requests:  RequestQueue,
    signals:   Box<[GrantSignal]>,
    recovery:  RecoveryState,
    finished:  Box<[AtomicBool]>,
    remaining: AtomicUsize,
}

impl Airspace {
    /// Allocate the shared state for `num_sectors` ordinary sectors and
    /// `num_aircraft` aircraft.
    pub fn new(
        num_sectors: usize,
        num_aircraft: usize,
        config: &ControlConfig,
    ) -> ControlResult<Self> {
        validate_counts(num_sectors, num_aircraft)?;
        config.validate()?;

        let sectors = SectorTable::new(num_sectors, num_aircraft)?;
        let requests = RequestQueue::new(num_aircraft)?;

        let mut signals = try_with_capacity(num_aircraft, "grant signals")?;
        signals.extend((0..num_aircraft).map(|_| GrantSignal::new()));

        let mut finished = try_with_capacity(num_aircraft, "completion flags")?;
        finished.extend((0..num_aircraft).map(|_| AtomicBool::new(false)));

        debug!(num_sectors, num_aircraft, "airspace allocated");

        Ok(Self {
            config: config.clone(),
            sectors,
            requests,
            signals: signals.into_boxed_slice(),
            recovery: RecoveryState::new(),
            finished: finished.into_boxed_slice(),
            remaining: AtomicUsize::new(num_aircraft),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn sectors(&self) -> &SectorTable {
        &self.sectors
    }

    pub fn requests(&self) -> &RequestQueue {
        &self.requests
    }

    pub fn recovery(&self) -> &RecoveryState {
        &self.recovery
    }

    /// The grant channel of `aircraft`.
    pub fn signal(&self, aircraft: AircraftId) -> AtcResult<&GrantSignal> {
        self.signals
            .get(aircraft.index())
            .ok_or(AtcError::AircraftNotFound(aircraft))
    }

    pub fn num_aircraft(&self) -> usize {
        self.signals.len()
    }

    /// Number of ordinary sectors (backups excluded).
    pub fn num_sectors(&self) -> usize {
        self.sectors.num_ordinary()
    }

    pub fn backup_sector(&self, aircraft: AircraftId) -> SectorId {
        self.sectors.backup_of(aircraft)
    }

    pub fn occupied_sectors(&self) -> Vec<SectorId> {
        self.sectors.occupied()
    }

    // ── Setup ─────────────────────────────────────────────────────────────

    /// Put `aircraft` inside `sector` before the run starts, both logically
    /// and physically.
    ///
    /// Must be called before the controller thread is spawned.
    pub fn place(&self, aircraft: AircraftId, sector: SectorId) -> ControlResult<()> {
        if aircraft.index() >= self.num_aircraft() {
            return Err(AtcError::AircraftNotFound(aircraft).into());
        }
        let s = self.sectors.get(sector)?;
        if let Some(owner) = s.owner().or(s.claimant()) {
            return Err(ControlError::SectorOccupied { sector, owner });
        }
        s.assign(aircraft);
        s.try_claim(aircraft);
        debug!(aircraft = %aircraft, sector = %sector, "aircraft placed");
        Ok(())
    }

    // ── Completion ────────────────────────────────────────────────────────

    /// Record that `aircraft` has finished its route and enqueued its last
    /// release.  Idempotent.
    pub fn mark_finished(&self, aircraft: AircraftId) {
        let Some(flag) = self.finished.get(aircraft.index()) else { return };
        if !flag.swap(true, Ordering::SeqCst) {
            self.remaining.fetch_sub(1, Ordering::SeqCst);
        }
    }

    pub fn is_finished(&self, aircraft: AircraftId) -> bool {
        self.finished
            .get(aircraft.index())
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// `true` once every aircraft has called [`Self::mark_finished`].
    pub fn all_finished(&self) -> bool {
        self.remaining.load(Ordering::SeqCst) == 0
    }
}
