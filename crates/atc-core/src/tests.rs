//! Unit tests for atc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AircraftId, SectorId};

    #[test]
    fn index_roundtrip() {
        let id = AircraftId(42);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn ordering() {
        assert!(AircraftId(0) < AircraftId(1));
        assert!(SectorId(100) > SectorId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AircraftId::INVALID.0, u32::MAX);
        assert_eq!(SectorId::INVALID.0, u32::MAX);
        assert_eq!(SectorId::default(), SectorId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AircraftId(7).to_string(), "AircraftId(7)");
        assert_eq!(SectorId(3).to_string(), "SectorId(3)");
    }
}

#[cfg(test)]
mod config {
    use std::time::Duration;

    use crate::config::validate_counts;
    use crate::{AtcError, ControlConfig};

    #[test]
    fn default_timings() {
        let cfg = ControlConfig::default();
        assert_eq!(cfg.grant_timeout, Duration::from_secs(1));
        assert_eq!(cfg.claim_backoff, Duration::from_micros(100));
        assert_eq!(cfg.dwell_ms, 1..=5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn fast_config_is_valid() {
        assert!(ControlConfig::fast().validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let cfg = ControlConfig::default().with_grant_timeout(Duration::ZERO);
        assert!(matches!(cfg.validate(), Err(AtcError::Config(_))));
    }

    #[test]
    fn empty_dwell_rejected() {
        let cfg = ControlConfig { dwell_ms: 5..=1, ..ControlConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn counts_must_be_positive() {
        assert!(validate_counts(0, 3).is_err());
        assert!(validate_counts(3, 0).is_err());
        assert!(validate_counts(3, 3).is_ok());
        assert!(validate_counts(usize::MAX, 1).is_err());
    }
}

#[cfg(test)]
mod error {
    use crate::error::try_with_capacity;
    use crate::AtcError;

    #[test]
    fn small_allocation_succeeds() {
        let v: Vec<u64> = try_with_capacity(16, "test buffer").unwrap();
        assert!(v.capacity() >= 16);
        assert!(v.is_empty());
    }

    #[test]
    fn absurd_allocation_reports_step() {
        let err = try_with_capacity::<u64>(usize::MAX, "request queue").unwrap_err();
        match err {
            AtcError::Allocation { what, .. } => assert_eq!(what, "request queue"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}

#[cfg(test)]
mod rng {
    use std::time::Duration;

    use crate::{AircraftId, AircraftRng, SimRng};

    fn dwells(rng: &mut AircraftRng, n: usize) -> Vec<Duration> {
        (0..n).map(|_| rng.dwell(&(1..=1000))).collect()
    }

    #[test]
    fn same_seed_same_dwells() {
        let mut r1 = AircraftRng::new(12345, AircraftId(0));
        let mut r2 = AircraftRng::new(12345, AircraftId(0));
        assert_eq!(dwells(&mut r1, 100), dwells(&mut r2, 100));
    }

    #[test]
    fn different_aircraft_differ() {
        let mut r0 = AircraftRng::new(1, AircraftId(0));
        let mut r1 = AircraftRng::new(1, AircraftId(1));
        assert_ne!(dwells(&mut r0, 16), dwells(&mut r1, 16));
    }

    #[test]
    fn dwell_in_bounds() {
        let mut rng = AircraftRng::new(0, AircraftId(0));
        for _ in 0..200 {
            let d = rng.dwell(&(1..=5));
            assert!(d >= Duration::from_millis(1) && d <= Duration::from_millis(5));
        }
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn empty_dwell_is_zero() {
        let mut rng = AircraftRng::new(0, AircraftId(0));
        assert_eq!(rng.dwell(&(5..=1)), Duration::ZERO);
    }

    #[test]
    fn sim_rng_is_seeded() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        let x: Vec<u32> = (0..8).map(|_| a.gen_range(0..1_000_000)).collect();
        let y: Vec<u32> = (0..8).map(|_| b.gen_range(0..1_000_000)).collect();
        assert_eq!(x, y);
    }

    #[test]
    fn aircraft_rng_is_debug() {
        let rng = AircraftRng::new(0, AircraftId(3));
        assert!(format!("{rng:?}").starts_with("AircraftRng"));
    }
}
