//! `GrantSignal` — the per-aircraft wake-up channel.
//!
//! The controller wakes exactly one aircraft per grant by pushing the granted
//! `SectorId` into that aircraft's channel.  The aircraft blocks on
//! [`GrantSignal::wait`] with a timeout; an expired timeout is the deadlock
//! heuristic, not an error.
//!
//! # Slots
//!
//! An aircraft has at most two grants outstanding: its route sector (still
//! parked in a wait queue when it timed out) and its backup sector.  The
//! channel therefore holds [`GRANT_SLOTS`] entries, so the controller never
//! blocks and never drops a grant.

use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TrySendError};

use atc_core::SectorId;

/// Capacity of every grant channel.
pub const GRANT_SLOTS: usize = 2;

/// Outcome of waiting on a grant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GrantWait {
    Granted(SectorId),
    TimedOut,
}

pub struct GrantSignal {
    tx: Sender<SectorId>,
    rx: Receiver<SectorId>,
}

impl Default for GrantSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl GrantSignal {
    pub fn new() -> Self {
        let (tx, rx) = channel::bounded(GRANT_SLOTS);
        Self { tx, rx }
    }

    /// Post a grant for `sector`.  Never blocks; `false` means every slot was
    /// already taken, which the protocol rules out.
    pub fn notify(&self, sector: SectorId) -> bool {
        match self.tx.try_send(sector) {
            Ok(()) => true,
            // Both ends live in `self`, so the channel cannot disconnect.
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }

    /// Block until a grant arrives or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> GrantWait {
        match self.rx.recv_timeout(timeout) {
            Ok(sector) => GrantWait::Granted(sector),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => GrantWait::TimedOut,
        }
    }

    /// Take a pending grant without blocking.
    pub fn try_take(&self) -> Option<SectorId> {
        self.rx.try_recv().ok()
    }

    /// Number of grants posted but not yet taken.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}
