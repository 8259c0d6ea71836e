//! `RequestQueue` — the bounded FIFO shared by every aircraft.
//!
//! # Capacity
//!
//! The ring is sized to the number of aircraft: in steady state each aircraft
//! has at most one request in flight.  Recovery can briefly put a second one
//! in flight (backup Acquire plus a Release), so a full queue is a normal
//! transient condition.  `enqueue` never overwrites; it hands the request back
//! inside [`QueueFull`] and the caller backs off and retries.
//!
//! `dequeue` never blocks.  The controller polls and sleeps on `None` so it
//! can also notice when every aircraft has finished.

use parking_lot::Mutex;
use thiserror::Error;
use tracing::trace;

use atc_core::AtcResult;
use atc_core::try_with_capacity;

use crate::Request;

/// Returned by [`RequestQueue::enqueue`] when the ring is saturated.
/// Carries the rejected request so the caller can resubmit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request queue full ({capacity} pending), rejected: {request}")]
pub struct QueueFull {
    pub request:  Request,
    pub capacity: usize,
}

struct Ring {
    slots: Vec<Request>,
    front: usize,
    rear:  usize,
    count: usize,
}

/// Fixed-capacity circular FIFO guarded by a single lock.
pub struct RequestQueue {
    ring: Mutex<Ring>,
}

impl RequestQueue {
    /// Allocate a ring of `capacity` slots.
    ///
    /// Allocation failure is reported rather than aborting so construction
    /// can name the failing step.
    pub fn new(capacity: usize) -> AtcResult<Self> {
        debug_assert!(capacity > 0, "request queue needs at least one slot");
        let mut slots = try_with_capacity(capacity, "request queue")?;
        slots.resize(capacity, Request::VACANT);
        Ok(Self {
            ring: Mutex::new(Ring { slots, front: 0, rear: 0, count: 0 }),
        })
    }

    /// Append `request` at the rear.  Returns the queue length after the
    /// push, or [`QueueFull`] without modifying the queue.
    pub fn enqueue(&self, request: Request) -> Result<usize, QueueFull> {
        let mut ring = self.ring.lock();
        let capacity = ring.slots.len();
        if ring.count >= capacity {
            return Err(QueueFull { request, capacity });
        }
        let rear = ring.rear;
        ring.slots[rear] = request;
        ring.rear = (rear + 1) % capacity;
        ring.count += 1;
        trace!(aircraft = %request.aircraft, sector = %request.sector, kind = ?request.kind,
               queued = ring.count, "request enqueued");
        Ok(ring.count)
    }

    /// Pop the oldest request, or `None` if the queue is empty.
    pub fn dequeue(&self) -> Option<Request> {
        let mut ring = self.ring.lock();
        if ring.count == 0 {
            return None;
        }
        let front = ring.front;
        let request = std::mem::replace(&mut ring.slots[front], Request::VACANT);
        ring.front = (front + 1) % ring.slots.len();
        ring.count -= 1;
        trace!(aircraft = %request.aircraft, sector = %request.sector, kind = ?request.kind,
               remaining = ring.count, "request dequeued");
        Some(request)
    }

    pub fn len(&self) -> usize {
        self.ring.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        let ring = self.ring.lock();
        ring.count == ring.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.ring.lock().slots.len()
    }
}
