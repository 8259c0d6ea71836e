//! `PriorityWaitQueue` — per-sector list of aircraft parked on a busy sector.
//!
//! # Ordering
//!
//! Waiters are kept in descending priority.  A new waiter is placed before
//! the first entry with a *strictly* lower priority, so equal priorities are
//! served in arrival order:
//!
//! ```text
//! insert 5(a), 9(b), 5(c), 2(d)   →   [9(b), 5(a), 5(c), 2(d)]
//! ```
//!
//! # Threading
//!
//! There is no lock here.  Every wait queue is owned by the `Controller`
//! and only mutated through `&mut`, so a single thread ever touches it.

use std::collections::VecDeque;

use atc_core::{AircraftId, AtcResult, Priority, SectorId, try_with_capacity};

/// One parked aircraft.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Waiter {
    pub aircraft: AircraftId,
    pub priority: Priority,
}

/// Result of [`PriorityWaitQueue::insert`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Insert {
    /// Parked at this index (0 = served next).
    Queued(usize),
    /// The aircraft was already parked here; nothing changed.
    Duplicate,
    /// Every slot is taken.  Unreachable while capacity ≥ fleet size.
    Full,
}

pub struct PriorityWaitQueue {
    sector:   SectorId,
    waiters:  VecDeque<Waiter>,
    capacity: usize,
}

impl PriorityWaitQueue {
    /// Create an empty queue for `sector` with room for `capacity` waiters
    /// (the fleet size).
    pub fn new(sector: SectorId, capacity: usize) -> AtcResult<Self> {
        let waiters: VecDeque<Waiter> =
            try_with_capacity::<Waiter>(capacity, "sector wait queue")?.into();
        Ok(Self { sector, waiters, capacity })
    }

    pub fn sector(&self) -> SectorId {
        self.sector
    }

    /// Park `aircraft`, keeping descending-priority, FIFO-stable order.
    /// O(n).
    pub fn insert(&mut self, aircraft: AircraftId, priority: Priority) -> Insert {
        if self.contains(aircraft) {
            return Insert::Duplicate;
        }
        if self.is_full() {
            return Insert::Full;
        }
        let at = self
            .waiters
            .iter()
            .position(|w| w.priority < priority)
            .unwrap_or(self.waiters.len());
        self.waiters.insert(at, Waiter { aircraft, priority });
        Insert::Queued(at)
    }

    /// Pop the highest-priority (earliest among equals) waiter.
    pub fn remove_front(&mut self) -> Option<Waiter> {
        self.waiters.pop_front()
    }

    pub fn peek(&self) -> Option<&Waiter> {
        self.waiters.front()
    }

    pub fn contains(&self, aircraft: AircraftId) -> bool {
        self.waiters.iter().any(|w| w.aircraft == aircraft)
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.waiters.len() >= self.capacity
    }

    /// Waiters in service order.
    pub fn iter(&self) -> impl Iterator<Item = &Waiter> + '_ {
        self.waiters.iter()
    }
}
