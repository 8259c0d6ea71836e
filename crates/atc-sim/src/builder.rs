//! Fluent builder for constructing a [`Sim`].

use atc_control::Airspace;
use atc_core::{AircraftId, AircraftRng, ControlConfig, SectorId};
use atc_fleet::Aircraft;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`ControlConfig`] — timeouts, back-offs, dwell range, seed
/// - the number of ordinary sectors
/// - `Vec<Aircraft>` + `Vec<AircraftRng>` — from [`atc_fleet::FleetBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                          |
/// |--------------------------|----------------------------------|
/// | `.initial_positions(v)`  | every aircraft starts outside    |
///
/// # Example
///
/// ```rust,ignore
/// let (fleet, rngs) = FleetBuilder::new(2, 7)
///     .plan(10, vec![SectorId(1)])
///     .plan(10, vec![SectorId(0)])
///     .build()?;
/// let mut sim = SimBuilder::new(ControlConfig::fast(), 2, fleet, rngs)
///     .initial_positions(vec![Some(SectorId(0)), Some(SectorId(1))])
///     .build()?;
/// sim.run(&NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:      ControlConfig,
    num_sectors: usize,
    fleet:       Vec<Aircraft>,
    rngs:        Vec<AircraftRng>,
    positions:   Option<Vec<Option<SectorId>>>,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(
        config:      ControlConfig,
        num_sectors: usize,
        fleet:       Vec<Aircraft>,
        rngs:        Vec<AircraftRng>,
    ) -> Self {
        Self { config, num_sectors, fleet, rngs, positions: None }
    }

    /// Start some aircraft already inside a sector.
    ///
    /// Must be length `aircraft_count`.  A placed aircraft holds its sector
    /// without consuming a route entry, so its first route sector must differ
    /// from the placement.  Used to stage contention and deadlock scenarios.
    pub fn initial_positions(mut self, positions: Vec<Option<SectorId>>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Validate inputs, allocate the airspace, apply placements, and return
    /// a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        let count = self.fleet.len();

        // ── Validate inputs ───────────────────────────────────────────────
        if self.rngs.len() != count {
            return Err(SimError::AircraftCountMismatch {
                expected: count,
                got:      self.rngs.len(),
                what:     "aircraft RNGs",
            });
        }
        for (i, aircraft) in self.fleet.iter().enumerate() {
            if aircraft.id != AircraftId(i as u32) {
                return Err(SimError::Config(format!(
                    "aircraft at index {i} has id {}; ids must be dense and ordered",
                    aircraft.id
                )));
            }
            if let Some(bad) = aircraft
                .route()
                .as_slice()
                .iter()
                .find(|s| s.index() >= self.num_sectors)
            {
                return Err(SimError::Config(format!(
                    "{} routes through {bad} but only {} sectors exist",
                    aircraft.id, self.num_sectors
                )));
            }
        }

        let positions = match self.positions {
            Some(p) => {
                if p.len() != count {
                    return Err(SimError::AircraftCountMismatch {
                        expected: count,
                        got:      p.len(),
                        what:     "initial positions",
                    });
                }
                p
            }
            None => vec![None; count],
        };

        // ── Allocate shared state and place aircraft ──────────────────────
        let airspace = Airspace::new(self.num_sectors, count, &self.config)?;

        let mut fleet = self.fleet;
        for (aircraft, position) in fleet.iter_mut().zip(positions) {
            let Some(sector) = position else { continue };
            if sector.index() >= self.num_sectors {
                return Err(SimError::Config(format!(
                    "{} cannot start in {sector}: not an ordinary sector",
                    aircraft.id
                )));
            }
            if aircraft.next_sector() == Some(sector) {
                return Err(SimError::Config(format!(
                    "{} starts in {sector}, which is also its first route sector",
                    aircraft.id
                )));
            }
            airspace.place(aircraft.id, sector)?;
            aircraft.place(sector);
        }

        Ok(Sim::new(airspace, fleet, self.rngs))
    }
}
