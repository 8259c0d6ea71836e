//! `Route` — the immutable, validated sector sequence of one aircraft.

use atc_core::{SectorId, SimRng};
use thiserror::Error;

/// Why a sector sequence was rejected as a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route is empty")]
    Empty,

    #[error("sector {sector} repeats at position {position}")]
    RepeatedSector { position: usize, sector: SectorId },

    #[error("sector {sector} at position {position} is outside 0..{num_sectors}")]
    OutOfRange {
        position:    usize,
        sector:      SectorId,
        num_sectors: usize,
    },
}

/// Ordered list of ordinary sectors.  Non-empty; consecutive entries differ;
/// every entry is below the ordinary sector count it was validated against.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route(Vec<SectorId>);

impl Route {
    /// Validate `sectors` against an airspace of `num_sectors` ordinary sectors.
    pub fn new(sectors: Vec<SectorId>, num_sectors: usize) -> Result<Self, RouteError> {
        if sectors.is_empty() {
            return Err(RouteError::Empty);
        }
        for (position, &sector) in sectors.iter().enumerate() {
            if sector.index() >= num_sectors {
                return Err(RouteError::OutOfRange { position, sector, num_sectors });
            }
            if position > 0 && sectors[position - 1] == sector {
                return Err(RouteError::RepeatedSector { position, sector });
            }
        }
        Ok(Self(sectors))
    }

    /// Draw a random route of exactly `len` sectors.
    ///
    /// The first sector is uniform over the airspace; each following sector
    /// is uniform over the sectors different from its predecessor.  With a
    /// single sector only a length-1 route exists, so `len` is clamped.
    pub fn random(rng: &mut SimRng, num_sectors: usize, len: usize) -> Self {
        debug_assert!(num_sectors > 0 && len > 0);
        let len = if num_sectors == 1 { 1 } else { len };
        let mut sectors = Vec::with_capacity(len);
        let mut prev = rng.gen_range(0..num_sectors);
        sectors.push(SectorId(prev as u32));
        while sectors.len() < len {
            // Draw from the N-1 other sectors and skip over `prev`.
            let mut next = rng.gen_range(0..num_sectors - 1);
            if next >= prev {
                next += 1;
            }
            sectors.push(SectorId(next as u32));
            prev = next;
        }
        Self(sectors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a validated route; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sector at `position`, or `None` past the end.
    #[inline]
    pub fn get(&self, position: usize) -> Option<SectorId> {
        self.0.get(position).copied()
    }

    pub fn as_slice(&self) -> &[SectorId] {
        &self.0
    }
}
