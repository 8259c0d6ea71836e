//! Process-wide deadlock-recovery state.
//!
//! One word names the aircraft whose recovery episode is in flight; one lock
//! serialises the aircraft that want to start one.  At most one episode runs
//! at a time system-wide.  That caps recovery throughput at one aircraft per
//! episode, which is accepted in exchange for a simple argument: only one
//! backup sector is ever absorbing a cycle.
//!
//! # Episode lifecycle
//!
//! ```text
//! idle ──try_begin(a)──► owned by a ──controller sees a's backup released──► idle
//!                             │
//!                             └──relinquish(a): a timed out again in its backup──► idle
//! ```
//!
//! Recording the owner, not just a flag, means a backup release can only
//! close the episode that backup belongs to.  `relinquish` covers an aircraft
//! whose target is held by a cycle it is not part of: sitting in its backup
//! it holds no ordinary sector, so it hands the episode back and lets a
//! member of that cycle recover instead.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};

use atc_core::AircraftId;

const IDLE: u32 = AircraftId::INVALID.0;

pub struct RecoveryState {
    lock:     Mutex<()>,
    owner:    AtomicU32,
    episodes: AtomicU64,
}

/// Held while an aircraft decides whether to start an episode and, if it
/// does, while it moves into its backup sector.
pub struct RecoveryGuard<'a> {
    state:  &'a RecoveryState,
    _guard: MutexGuard<'a, ()>,
}

impl Default for RecoveryState {
    fn default() -> Self {
        Self {
            lock:     Mutex::new(()),
            owner:    AtomicU32::new(IDLE),
            episodes: AtomicU64::new(0),
        }
    }
}

impl RecoveryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recovery lock.  Blocks while another aircraft holds it.
    pub fn lock(&self) -> RecoveryGuard<'_> {
        RecoveryGuard { state: self, _guard: self.lock.lock() }
    }

    pub fn in_progress(&self) -> bool {
        self.owner.load(Ordering::Acquire) != IDLE
    }

    /// The aircraft running the current episode.
    pub fn owner(&self) -> Option<AircraftId> {
        let raw = self.owner.load(Ordering::Acquire);
        (raw != IDLE).then_some(AircraftId(raw))
    }

    /// Total episodes started since construction.
    pub fn episodes(&self) -> u64 {
        self.episodes.load(Ordering::Relaxed)
    }

    /// Close the episode of `aircraft`, if it is the running one.  Called by
    /// the controller when that aircraft's backup sector is released.
    pub(crate) fn end(&self, aircraft: AircraftId) -> bool {
        self.owner
            .compare_exchange(aircraft.0, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl RecoveryGuard<'_> {
    /// Open an episode for `aircraft` unless one is already running.  `true`
    /// if the caller now owns the episode.
    pub fn try_begin(&self, aircraft: AircraftId) -> bool {
        let started = self
            .state
            .owner
            .compare_exchange(IDLE, aircraft.0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if started {
            self.state.episodes.fetch_add(1, Ordering::Relaxed);
        }
        started
    }

    /// Give up the episode `aircraft` owns while it keeps waiting in its
    /// backup sector.  `false` if it was not the owner.
    pub fn relinquish(&self, aircraft: AircraftId) -> bool {
        self.state.end(aircraft)
    }
}
