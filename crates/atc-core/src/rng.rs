//! Seeded RNGs for fleet setup and per-aircraft dwell times.
//!
//! Aircraft `i` draws from its own `SmallRng` seeded with
//! `global_seed ^ (i * GOLDEN)`, so neighbouring aircraft get unrelated
//! streams and no RNG is ever shared between threads.  Thread interleaving is
//! still nondeterministic; only the fleet (routes, priorities, dwell
//! sequences) is reproducible from a seed.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AircraftId;

/// Fractional part of the golden ratio, as 64 bits.
const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

/// Dwell-time source owned by one aircraft thread.
#[derive(Debug)]
pub struct AircraftRng(SmallRng);

impl AircraftRng {
    pub fn new(global_seed: u64, aircraft: AircraftId) -> Self {
        let seed = global_seed ^ u64::from(aircraft.0).wrapping_mul(GOLDEN);
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Time to stay inside a sector, drawn from `millis`.  An empty range
    /// yields zero.
    pub fn dwell(&mut self, millis: &RangeInclusive<u64>) -> Duration {
        if millis.is_empty() {
            return Duration::ZERO;
        }
        Duration::from_millis(self.0.gen_range(millis.clone()))
    }
}

/// Setup-thread RNG that draws priorities and routes.
#[derive(Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
