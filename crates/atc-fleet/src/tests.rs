//! Unit tests for atc-fleet.

use atc_core::{AircraftId, SectorId};

use crate::{Aircraft, FlightPhase, Route};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn sectors(ids: &[u32]) -> Vec<SectorId> {
    ids.iter().map(|&i| SectorId(i)).collect()
}

fn aircraft(route: &[u32]) -> Aircraft {
    Aircraft::new(AircraftId(0), 10, Route::new(sectors(route), 8).unwrap())
}

// ── Route ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod route {
    use atc_core::SimRng;

    use super::*;
    use crate::RouteError;

    #[test]
    fn valid_route_accepted() {
        let r = Route::new(sectors(&[0, 2, 1, 2]), 3).unwrap();
        assert_eq!(r.len(), 4);
        assert_eq!(r.get(1), Some(SectorId(2)));
        assert_eq!(r.get(4), None);
    }

    #[test]
    fn empty_route_rejected() {
        assert_eq!(Route::new(vec![], 3), Err(RouteError::Empty));
    }

    #[test]
    fn consecutive_repeat_rejected() {
        let err = Route::new(sectors(&[0, 1, 1]), 3).unwrap_err();
        assert_eq!(err, RouteError::RepeatedSector { position: 2, sector: SectorId(1) });
    }

    #[test]
    fn non_consecutive_repeat_allowed() {
        assert!(Route::new(sectors(&[0, 1, 0]), 2).is_ok());
    }

    #[test]
    fn out_of_range_rejected() {
        let err = Route::new(sectors(&[0, 3]), 3).unwrap_err();
        assert!(matches!(err, RouteError::OutOfRange { position: 1, num_sectors: 3, .. }));
    }

    #[test]
    fn random_routes_are_valid() {
        let mut rng = SimRng::new(9);
        for len in 1..20 {
            let r = Route::random(&mut rng, 4, len);
            assert_eq!(r.len(), len);
            assert!(Route::new(r.as_slice().to_vec(), 4).is_ok(), "invalid: {r:?}");
        }
    }

    #[test]
    fn random_route_with_one_sector_is_single_entry() {
        let mut rng = SimRng::new(1);
        let r = Route::random(&mut rng, 1, 10);
        assert_eq!(r.as_slice(), &[SectorId(0)]);
    }

    #[test]
    fn random_routes_with_two_sectors_alternate() {
        let mut rng = SimRng::new(5);
        let r = Route::random(&mut rng, 2, 6);
        for pair in r.as_slice().windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }
}

// ── Aircraft ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod aircraft_state {
    use std::time::Duration;

    use super::*;

    #[test]
    fn starts_unplaced() {
        let a = aircraft(&[3, 4]);
        assert_eq!(a.position(), 0);
        assert_eq!(a.held(), None);
        assert_eq!(a.next_sector(), Some(SectorId(3)));
        assert_eq!(a.phase(), FlightPhase::NotStarted);
        assert!(!a.is_route_complete());
    }

    #[test]
    fn entering_route_sectors_advances_and_returns_previous() {
        let mut a = aircraft(&[3, 4]);
        assert_eq!(a.enter_route_sector(), None);
        assert_eq!(a.held(), Some(SectorId(3)));
        assert_eq!(a.position(), 1);

        assert_eq!(a.enter_route_sector(), Some(SectorId(3)));
        assert_eq!(a.held(), Some(SectorId(4)));
        assert!(a.is_route_complete());
        assert_eq!(a.next_sector(), None);
    }

    #[test]
    fn backup_does_not_consume_route() {
        let mut a = aircraft(&[3, 4]);
        a.enter_route_sector();
        let prev = a.enter_backup(SectorId(100));
        assert_eq!(prev, Some(SectorId(3)));
        assert_eq!(a.position(), 1);
        assert_eq!(a.recoveries(), 1);
        assert_eq!(a.next_sector(), Some(SectorId(4)));
        assert_eq!(a.enter_route_sector(), Some(SectorId(100)));
    }

    #[test]
    fn placement_holds_without_advancing() {
        let mut a = aircraft(&[1]);
        a.place(SectorId(0));
        assert_eq!(a.held(), Some(SectorId(0)));
        assert_eq!(a.position(), 0);
        assert_eq!(a.leave(), Some(SectorId(0)));
        assert_eq!(a.held(), None);
    }

    #[test]
    fn mean_wait_divides_by_route_length() {
        let mut a = aircraft(&[1, 2, 1, 2]);
        a.record_wait(Duration::from_millis(10));
        a.record_wait(Duration::from_millis(30));
        assert_eq!(a.cumulative_wait(), Duration::from_millis(40));
        assert_eq!(a.mean_wait(), Duration::from_millis(10));
    }

    #[test]
    fn phase_machine_edges() {
        use FlightPhase::*;
        assert!(NotStarted.can_advance_to(Requesting));
        assert!(Waiting.can_advance_to(TimedOut));
        assert!(TimedOut.can_advance_to(Waiting));
        assert!(HoldingSector.can_advance_to(Finished));
        assert!(!Waiting.can_advance_to(HoldingSector));
        assert!(!Finished.can_advance_to(Requesting));
    }

    #[test]
    fn full_cycle_of_phases() {
        let mut a = aircraft(&[1]);
        for next in [
            FlightPhase::Requesting,
            FlightPhase::Waiting,
            FlightPhase::TimedOut,
            FlightPhase::Waiting,
            FlightPhase::Granted,
            FlightPhase::HoldingSector,
            FlightPhase::Finished,
        ] {
            a.set_phase(next);
        }
        assert_eq!(a.phase(), FlightPhase::Finished);
    }
}

// ── FleetBuilder ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;
    use crate::{FleetBuilder, FleetError, RouteError};

    #[test]
    fn random_fleet_is_deterministic() {
        let (a, _) = FleetBuilder::new(5, 7).random_aircraft(6).build().unwrap();
        let (b, _) = FleetBuilder::new(5, 7).random_aircraft(6).build().unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.priority, y.priority);
            assert_eq!(x.route(), y.route());
        }
    }

    #[test]
    fn random_fleet_respects_bounds() {
        let (fleet, rngs) = FleetBuilder::new(3, 1)
            .random_aircraft(50)
            .max_route_len(4)
            .priority_ceiling(10)
            .build()
            .unwrap();
        assert_eq!(fleet.len(), 50);
        assert_eq!(rngs.len(), 50);
        for (i, a) in fleet.iter().enumerate() {
            assert_eq!(a.id, AircraftId(i as u32));
            assert!(a.priority < 10);
            assert!((1..=4).contains(&a.route().len()));
        }
    }

    #[test]
    fn explicit_plans_keep_order_and_priority() {
        let (fleet, _) = FleetBuilder::new(3, 0)
            .plan(5, sectors(&[0, 1]))
            .plan(9, sectors(&[2]))
            .build()
            .unwrap();
        assert_eq!(fleet[0].priority, 5);
        assert_eq!(fleet[1].route().as_slice(), &[SectorId(2)]);
    }

    #[test]
    fn invalid_plan_reports_aircraft() {
        let err = FleetBuilder::new(2, 0)
            .plan(1, sectors(&[0]))
            .plan(1, sectors(&[0, 5]))
            .build()
            .unwrap_err();
        match err {
            FleetError::InvalidRoute { aircraft, source } => {
                assert_eq!(aircraft, AircraftId(1));
                assert!(matches!(source, RouteError::OutOfRange { .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_fleet_rejected() {
        assert!(matches!(FleetBuilder::new(2, 0).build(), Err(FleetError::Core(_))));
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::{FleetError, load_plans_reader};

    const CSV: &str = "\
aircraft_id,priority,sector\n\
0,500,2\n\
0,500,0\n\
1,17,1\n\
0,500,1\n\
";

    #[test]
    fn rows_grouped_in_order() {
        let plans = load_plans_reader(Cursor::new(CSV), 2).unwrap();
        assert_eq!(plans[0].priority, 500);
        assert_eq!(plans[0].route, sectors(&[2, 0, 1]));
        assert_eq!(plans[1].route, sectors(&[1]));
    }

    #[test]
    fn missing_aircraft_is_an_error() {
        let err = load_plans_reader(Cursor::new(CSV), 3).unwrap_err();
        assert!(matches!(err, FleetError::Parse(msg) if msg.contains("aircraft 2")));
    }

    #[test]
    fn aircraft_outside_fleet_is_an_error() {
        assert!(load_plans_reader(Cursor::new(CSV), 1).is_err());
    }

    #[test]
    fn conflicting_priority_is_an_error() {
        let csv = "aircraft_id,priority,sector\n0,1,0\n0,2,1\n";
        assert!(load_plans_reader(Cursor::new(csv), 1).is_err());
    }

    #[test]
    fn malformed_row_is_a_parse_error() {
        let csv = "aircraft_id,priority,sector\n0,high,0\n";
        assert!(matches!(load_plans_reader(Cursor::new(csv), 1), Err(FleetError::Parse(_))));
    }
}
