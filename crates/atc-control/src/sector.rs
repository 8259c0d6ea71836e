//! Sectors and the sector table.
//!
//! # Two kinds of ownership
//!
//! Each sector carries two independent atomic words:
//!
//! | Word         | Written by                  | Meaning                                 |
//! |--------------|-----------------------------|-----------------------------------------|
//! | `owner`      | controller thread only      | logical grant (occupancy bookkeeping)   |
//! | `claimed_by` | the claiming aircraft only  | physical exclusive presence             |
//!
//! The controller grants first and the aircraft claims afterwards, so for a
//! short window the logical owner can lead the physical claimant.  The
//! claim is a compare-and-swap from "nobody" to the aircraft id; it fails
//! while the previous occupant is still inside, and the aircraft retries.
//!
//! Occupancy is derived from `owner`, so a free sector with an owner cannot
//! be represented.

use std::sync::atomic::{AtomicU32, Ordering};

use atc_core::{AircraftId, AtcError, AtcResult, SectorId, try_with_capacity};

const NOBODY: u32 = AircraftId::INVALID.0;

#[inline]
fn decode(raw: u32) -> Option<AircraftId> {
    (raw != NOBODY).then_some(AircraftId(raw))
}

// ── Sector ────────────────────────────────────────────────────────────────────

pub struct Sector {
    pub id:     SectorId,
    /// The aircraft this sector is reserved for, if it is a backup sector.
    backup_of:  Option<AircraftId>,
    owner:      AtomicU32,
    claimed_by: AtomicU32,
}

impl Sector {
    fn new(id: SectorId, backup_of: Option<AircraftId>) -> Self {
        Self {
            id,
            backup_of,
            owner:      AtomicU32::new(NOBODY),
            claimed_by: AtomicU32::new(NOBODY),
        }
    }

    pub fn is_backup(&self) -> bool {
        self.backup_of.is_some()
    }

    pub fn backup_of(&self) -> Option<AircraftId> {
        self.backup_of
    }

    // ── Logical occupancy (controller) ────────────────────────────────────

    pub fn is_occupied(&self) -> bool {
        self.owner.load(Ordering::Acquire) != NOBODY
    }

    /// The aircraft the controller last granted this sector to.
    pub fn owner(&self) -> Option<AircraftId> {
        decode(self.owner.load(Ordering::Acquire))
    }

    pub(crate) fn assign(&self, aircraft: AircraftId) {
        self.owner.store(aircraft.0, Ordering::Release);
    }

    pub(crate) fn vacate(&self) {
        self.owner.store(NOBODY, Ordering::Release);
    }

    // ── Physical claim (aircraft) ─────────────────────────────────────────

    /// Non-blocking single-owner claim.  `true` if `aircraft` is now inside.
    pub fn try_claim(&self, aircraft: AircraftId) -> bool {
        self.claimed_by
            .compare_exchange(NOBODY, aircraft.0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Leave the sector.  `false` if `aircraft` was not the claimant.
    pub fn unclaim(&self, aircraft: AircraftId) -> bool {
        self.claimed_by
            .compare_exchange(aircraft.0, NOBODY, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// The aircraft physically inside, if any.
    pub fn claimant(&self) -> Option<AircraftId> {
        decode(self.claimed_by.load(Ordering::Acquire))
    }
}

// ── SectorTable ───────────────────────────────────────────────────────────────

/// All `N` ordinary sectors followed by one backup sector per aircraft.
///
/// ```text
/// id:   0 … N-1        N … N+M-1
///       ordinary       backup of aircraft 0 … M-1
/// ```
pub struct SectorTable {
    sectors:      Vec<Sector>,
    num_ordinary: usize,
}

impl SectorTable {
    pub fn new(num_ordinary: usize, num_aircraft: usize) -> AtcResult<Self> {
        let total = num_ordinary + num_aircraft;
        let mut sectors = try_with_capacity(total, "sector table")?;
        sectors.extend((0..num_ordinary).map(|i| Sector::new(SectorId(i as u32), None)));
        sectors.extend((0..num_aircraft).map(|i| {
            Sector::new(SectorId((num_ordinary + i) as u32), Some(AircraftId(i as u32)))
        }));
        Ok(Self { sectors, num_ordinary })
    }

    /// Look up a sector, rejecting out-of-range ids.
    pub fn get(&self, id: SectorId) -> AtcResult<&Sector> {
        self.sectors.get(id.index()).ok_or(AtcError::SectorNotFound(id))
    }

    /// The dedicated backup sector of `aircraft`.
    pub fn backup_of(&self, aircraft: AircraftId) -> SectorId {
        SectorId((self.num_ordinary + aircraft.index()) as u32)
    }

    pub fn is_backup(&self, id: SectorId) -> bool {
        id.index() >= self.num_ordinary && id.index() < self.sectors.len()
    }

    pub fn num_ordinary(&self) -> usize {
        self.num_ordinary
    }

    /// Ordinary + backup.
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sector> + '_ {
        self.sectors.iter()
    }

    /// Ids of every sector currently marked occupied.
    pub fn occupied(&self) -> Vec<SectorId> {
        self.sectors.iter().filter(|s| s.is_occupied()).map(|s| s.id).collect()
    }
}
