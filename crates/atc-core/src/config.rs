//! Run configuration.
//!
//! # Design
//!
//! Every tunable of the control protocol lives in one `ControlConfig` so
//! tests can shrink timeouts without touching the algorithm.  Defaults: a
//! 1 s grant timeout before deadlock is suspected, 100 µs back-off between
//! physical-claim attempts and between controller polls, and a 1–5 ms dwell
//! inside each sector.

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::{AtcError, AtcResult};

/// Top-level control configuration.
///
/// Typically built by the application crate (CLI flags, TOML file) and passed
/// to `atc_control::Airspace::new` and `atc_sim::SimBuilder`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlConfig {
    /// How long an aircraft waits on its grant signal before it suspects a
    /// deadlock and enters recovery.
    pub grant_timeout: Duration,

    /// Sleep between failed physical-claim attempts after a grant.
    pub claim_backoff: Duration,

    /// Controller sleep when the request queue is empty.
    pub poll_interval: Duration,

    /// Back-off after an enqueue hits a full request queue.
    pub enqueue_retry: Duration,

    /// Pause after an aircraft has moved into its backup sector, letting the
    /// rest of the airspace drain before it retries its real target.
    pub recovery_settle: Duration,

    /// Inclusive range of milliseconds an aircraft stays in each sector.
    pub dwell_ms: RangeInclusive<u64>,

    /// Master RNG seed.  The same seed always produces the same fleet.
    pub seed: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            grant_timeout:   Duration::from_secs(1),
            claim_backoff:   Duration::from_micros(100),
            poll_interval:   Duration::from_micros(100),
            enqueue_retry:   Duration::from_secs(1),
            recovery_settle: Duration::from_micros(100),
            dwell_ms:        1..=5,
            seed:            42,
        }
    }
}

impl ControlConfig {
    /// A configuration with every wait shortened, for tests and quick demos.
    ///
    /// The grant timeout stays well above the dwell time so healthy runs do
    /// not trip recovery.
    pub fn fast() -> Self {
        Self {
            grant_timeout:   Duration::from_millis(200),
            claim_backoff:   Duration::from_micros(50),
            poll_interval:   Duration::from_micros(50),
            enqueue_retry:   Duration::from_millis(5),
            recovery_settle: Duration::from_micros(100),
            dwell_ms:        1..=2,
            seed:            42,
        }
    }

    /// Builder-style override of the grant timeout.
    pub fn with_grant_timeout(mut self, timeout: Duration) -> Self {
        self.grant_timeout = timeout;
        self
    }

    /// Builder-style override of the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject configurations the protocol cannot run with.
    pub fn validate(&self) -> AtcResult<()> {
        if self.grant_timeout.is_zero() {
            return Err(AtcError::Config("grant_timeout must be non-zero".into()));
        }
        if self.enqueue_retry.is_zero() {
            return Err(AtcError::Config("enqueue_retry must be non-zero".into()));
        }
        if self.dwell_ms.is_empty() {
            return Err(AtcError::Config(format!(
                "dwell_ms range {:?} is empty",
                self.dwell_ms
            )));
        }
        Ok(())
    }
}

/// Validate the fleet dimensions shared by every constructor.
pub fn validate_counts(num_sectors: usize, num_aircraft: usize) -> AtcResult<()> {
    if num_sectors == 0 {
        return Err(AtcError::Config("at least one sector is required".into()));
    }
    if num_aircraft == 0 {
        return Err(AtcError::Config("at least one aircraft is required".into()));
    }
    // Backup sectors share the id space, so N + M must fit a SectorId.
    if num_sectors
        .checked_add(num_aircraft)
        .is_none_or(|total| total >= u32::MAX as usize)
    {
        return Err(AtcError::Config(format!(
            "{num_sectors} sectors + {num_aircraft} aircraft overflow the sector id space"
        )));
    }
    Ok(())
}
