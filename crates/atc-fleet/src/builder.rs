//! Fluent builder for constructing a fleet of aircraft + their RNGs in one
//! step.
//!
//! # Usage
//!
//! ```rust
//! use atc_fleet::FleetBuilder;
//!
//! let (fleet, rngs) = FleetBuilder::new(/*sectors=*/ 4, /*seed=*/ 42)
//!     .random_aircraft(3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(fleet.len(), 3);
//! assert_eq!(rngs.len(), 3);
//! ```

use atc_core::{AircraftId, AircraftRng, Priority, SectorId, SimRng, validate_counts};

use crate::{Aircraft, FleetError, FleetResult, Route};

/// Exclusive upper bound of randomly drawn priorities.
pub const DEFAULT_PRIORITY_CEILING: Priority = 1_000;

/// Externally supplied priority + route for one aircraft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlightPlan {
    pub priority: Priority,
    pub route:    Vec<SectorId>,
}

enum Slot {
    Random,
    Planned(FlightPlan),
}

/// Fluent builder for `Vec<Aircraft>` + `Vec<AircraftRng>`.
///
/// Aircraft ids are assigned in the order aircraft are added.  Random
/// aircraft draw their priority from `0..priority_ceiling` and their route
/// length from `1..=max_route_len` (default `2 × num_sectors`).
pub struct FleetBuilder {
    num_sectors:      usize,
    seed:             u64,
    max_route_len:    usize,
    priority_ceiling: Priority,
    slots:            Vec<Slot>,
}

impl FleetBuilder {
    /// Create a builder for an airspace of `num_sectors` ordinary sectors
    /// using `seed` as the global RNG seed.
    pub fn new(num_sectors: usize, seed: u64) -> Self {
        Self {
            num_sectors,
            seed,
            max_route_len:    (num_sectors * 2).max(1),
            priority_ceiling: DEFAULT_PRIORITY_CEILING,
            slots:            Vec::new(),
        }
    }

    /// Add `count` randomly generated aircraft.
    pub fn random_aircraft(mut self, count: usize) -> Self {
        self.slots.extend((0..count).map(|_| Slot::Random));
        self
    }

    /// Add one aircraft with an explicit priority and route.
    pub fn plan(mut self, priority: Priority, route: Vec<SectorId>) -> Self {
        self.slots.push(Slot::Planned(FlightPlan { priority, route }));
        self
    }

    /// Add aircraft from previously loaded plans (see [`crate::load_plans_csv`]).
    pub fn plans(mut self, plans: impl IntoIterator<Item = FlightPlan>) -> Self {
        self.slots.extend(plans.into_iter().map(Slot::Planned));
        self
    }

    /// Upper bound (inclusive) on randomly drawn route lengths.
    pub fn max_route_len(mut self, len: usize) -> Self {
        self.max_route_len = len.max(1);
        self
    }

    /// Exclusive upper bound on randomly drawn priorities.
    pub fn priority_ceiling(mut self, ceiling: Priority) -> Self {
        self.priority_ceiling = ceiling.max(1);
        self
    }

    /// Validate every route and construct the fleet.
    pub fn build(self) -> FleetResult<(Vec<Aircraft>, Vec<AircraftRng>)> {
        validate_counts(self.num_sectors, self.slots.len())?;

        let mut rng = SimRng::new(self.seed);
        let mut fleet = Vec::with_capacity(self.slots.len());

        for (i, slot) in self.slots.into_iter().enumerate() {
            let id = AircraftId(i as u32);
            let aircraft = match slot {
                Slot::Random => {
                    let priority = rng.gen_range(0..self.priority_ceiling);
                    let len = rng.gen_range(1..=self.max_route_len);
                    let route = Route::random(&mut rng, self.num_sectors, len);
                    Aircraft::new(id, priority, route)
                }
                Slot::Planned(plan) => {
                    let route = Route::new(plan.route, self.num_sectors)
                        .map_err(|source| FleetError::InvalidRoute { aircraft: id, source })?;
                    Aircraft::new(id, plan.priority, route)
                }
            };
            fleet.push(aircraft);
        }

        let rngs = fleet
            .iter()
            .map(|a| AircraftRng::new(self.seed, a.id))
            .collect();

        Ok((fleet, rngs))
    }
}
