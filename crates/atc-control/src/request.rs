//! The acquire/release intents aircraft send to the controller.

use std::fmt;

use atc_core::{AircraftId, SectorId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Acquire,
    Release,
}

/// One entry of the request queue.  Discarded once arbitrated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Request {
    pub aircraft: AircraftId,
    pub sector:   SectorId,
    pub kind:     RequestKind,
}

impl Request {
    pub fn acquire(aircraft: AircraftId, sector: SectorId) -> Self {
        Self { aircraft, sector, kind: RequestKind::Acquire }
    }

    pub fn release(aircraft: AircraftId, sector: SectorId) -> Self {
        Self { aircraft, sector, kind: RequestKind::Release }
    }

    /// Placeholder for unused ring-buffer slots.
    pub(crate) const VACANT: Request = Request {
        aircraft: AircraftId::INVALID,
        sector:   SectorId::INVALID,
        kind:     RequestKind::Release,
    };
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            RequestKind::Acquire => "enter",
            RequestKind::Release => "leave",
        };
        write!(f, "{} wants to {verb} {}", self.aircraft, self.sector)
    }
}
