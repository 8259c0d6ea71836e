//! Integration tests for atc-sim.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use atc_core::{AircraftId, ControlConfig, SectorId};
use atc_fleet::FleetBuilder;

use crate::{FlightObserver, FlightReport, NoopObserver, Sim, SimBuilder, SimError};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn sectors(ids: &[u32]) -> Vec<SectorId> {
    ids.iter().map(|&i| SectorId(i)).collect()
}

fn config() -> ControlConfig {
    ControlConfig::fast()
}

/// Build a sim from explicit `(priority, route)` plans.
fn planned_sim(num_sectors: usize, plans: &[(u32, &[u32])], config: ControlConfig) -> SimBuilder {
    let mut fleet = FleetBuilder::new(num_sectors, config.seed);
    for &(priority, route) in plans {
        fleet = fleet.plan(priority, sectors(route));
    }
    let (fleet, rngs) = fleet.build().unwrap();
    SimBuilder::new(config, num_sectors, fleet, rngs)
}

fn assert_airspace_clear(sim: &Sim) {
    let airspace = sim.airspace();
    assert!(airspace.occupied_sectors().is_empty(), "left occupied: {:?}", airspace.occupied_sectors());
    assert!(airspace.sectors().iter().all(|s| s.claimant().is_none()));
    assert!(airspace.requests().is_empty());
    assert!(airspace.all_finished());
    assert!(!airspace.recovery().in_progress());
}

/// Records every entry and checks, at each entry, that no other aircraft is
/// inside the same sector and that route positions only move forward.
#[derive(Default)]
struct Audit {
    inside:    Mutex<HashMap<SectorId, AircraftId>>,
    positions: Mutex<HashMap<AircraftId, Vec<(usize, SectorId)>>>,
    overlaps:  AtomicUsize,
    finished:  AtomicUsize,
    recovered: AtomicUsize,
}

impl FlightObserver for Audit {
    fn on_sector_entered(&self, aircraft: AircraftId, sector: SectorId, position: usize) {
        if self.inside.lock().unwrap().insert(sector, aircraft).is_some() {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        self.positions.lock().unwrap().entry(aircraft).or_default().push((position, sector));
    }

    fn on_sector_left(&self, aircraft: AircraftId, sector: SectorId) {
        let mut inside = self.inside.lock().unwrap();
        if inside.get(&sector) == Some(&aircraft) {
            inside.remove(&sector);
        }
    }

    fn on_recovery(&self, _aircraft: AircraftId, _backup: SectorId, _abandoned: SectorId) {
        self.recovered.fetch_add(1, Ordering::SeqCst);
    }

    fn on_finished(&self, _report: &FlightReport) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let sim = planned_sim(2, &[(1, &[0, 1]), (2, &[1])], config()).build().unwrap();
        assert_eq!(sim.fleet().len(), 2);
        assert_eq!(sim.airspace().num_sectors(), 2);
        assert_eq!(sim.airspace().sectors().len(), 4);
    }

    #[test]
    fn rng_count_mismatch_errors() {
        let (fleet, mut rngs) = FleetBuilder::new(2, 1).random_aircraft(3).build().unwrap();
        rngs.pop();
        let result = SimBuilder::new(config(), 2, fleet, rngs).build();
        assert!(matches!(result, Err(SimError::AircraftCountMismatch { expected: 3, got: 2, .. })));
    }

    #[test]
    fn position_count_mismatch_errors() {
        let result = planned_sim(2, &[(1, &[0])], config())
            .initial_positions(vec![None, None])
            .build();
        assert!(matches!(result, Err(SimError::AircraftCountMismatch { .. })));
    }

    #[test]
    fn route_beyond_airspace_errors() {
        let (fleet, rngs) = FleetBuilder::new(5, 1).plan(1, sectors(&[4])).build().unwrap();
        assert!(matches!(SimBuilder::new(config(), 2, fleet, rngs).build(), Err(SimError::Config(_))));
    }

    #[test]
    fn placement_on_first_route_sector_errors() {
        let result = planned_sim(2, &[(1, &[0, 1])], config())
            .initial_positions(vec![Some(SectorId(0))])
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn placement_on_backup_sector_errors() {
        let result = planned_sim(2, &[(1, &[0])], config())
            .initial_positions(vec![Some(SectorId(2))])
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn shared_placement_errors() {
        let result = planned_sim(3, &[(1, &[0]), (1, &[1])], config())
            .initial_positions(vec![Some(SectorId(2)), Some(SectorId(2))])
            .build();
        assert!(matches!(result, Err(SimError::Control(_))));
    }

    #[test]
    fn placement_occupies_sector() {
        let sim = planned_sim(2, &[(1, &[0])], config())
            .initial_positions(vec![Some(SectorId(1))])
            .build()
            .unwrap();
        let sector = sim.airspace().sectors().get(SectorId(1)).unwrap();
        assert_eq!(sector.owner(), Some(AircraftId(0)));
        assert_eq!(sim.fleet()[0].held(), Some(SectorId(1)));
    }
}

// ── End-to-end runs ───────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn single_aircraft_single_sector() {
        let mut sim = planned_sim(1, &[(5, &[0])], config()).build().unwrap();
        let report = sim.run(&NoopObserver).unwrap();

        assert_eq!(report.flights.len(), 1);
        let flight = &report.flights[0];
        assert_eq!(flight.route_len, 1);
        assert_eq!(flight.mean_wait, flight.cumulative_wait);
        assert!(flight.cumulative_wait < Duration::from_secs(1));
        assert_eq!(report.controller.grants, 1);
        assert_eq!(report.controller.vacated, 1);
        assert_airspace_clear(&sim);
    }

    #[test]
    fn three_aircraft_three_sectors_no_cycle() {
        // Every route climbs in sector id, so no wait-for cycle can form.
        let mut sim = planned_sim(3, &[(1, &[0, 1]), (2, &[1, 2]), (3, &[0, 2])], config())
            .build()
            .unwrap();
        let audit = Audit::default();
        let report = sim.run(&audit).unwrap();

        assert_eq!(report.flights.len(), 3);
        assert_eq!(report.total_route_len(), 6);
        assert_eq!(audit.finished.load(Ordering::SeqCst), 3);
        assert_eq!(audit.overlaps.load(Ordering::SeqCst), 0);
        assert_airspace_clear(&sim);
    }

    #[test]
    fn positions_advance_along_the_route() {
        let mut sim = planned_sim(3, &[(1, &[0, 1, 2, 0]), (1, &[2, 1, 0])], config())
            .build()
            .unwrap();
        let audit = Audit::default();
        sim.run(&audit).unwrap();

        let positions = audit.positions.lock().unwrap();
        assert_eq!(
            positions[&AircraftId(0)],
            vec![(0, SectorId(0)), (1, SectorId(1)), (2, SectorId(2)), (3, SectorId(0))]
        );
        assert_eq!(positions[&AircraftId(1)], vec![(0, SectorId(2)), (1, SectorId(1)), (2, SectorId(0))]);
    }

    #[test]
    fn random_fleet_completes_without_overlap() {
        let config = config();
        let (fleet, rngs) = FleetBuilder::new(4, config.seed)
            .random_aircraft(8)
            .max_route_len(4)
            .build()
            .unwrap();
        let route_len: usize = fleet.iter().map(|a| a.route().len()).sum();
        let mut sim = SimBuilder::new(config, 4, fleet, rngs).build().unwrap();
        let audit = Audit::default();
        let report = sim.run(&audit).unwrap();

        assert_eq!(report.total_route_len(), route_len);
        assert_eq!(audit.overlaps.load(Ordering::SeqCst), 0);
        for (i, flight) in report.flights.iter().enumerate() {
            assert_eq!(flight.aircraft, AircraftId(i as u32));
            assert_eq!(flight.mean_wait, flight.cumulative_wait / flight.route_len as u32);
        }
        assert_airspace_clear(&sim);
    }

    #[test]
    fn a_sim_flies_once() {
        let mut sim = planned_sim(1, &[(1, &[0])], config()).build().unwrap();
        sim.run(&NoopObserver).unwrap();
        assert!(matches!(sim.run(&NoopObserver), Err(SimError::Config(_))));
    }
}

// ── Deadlock recovery ─────────────────────────────────────────────────────────

#[cfg(test)]
mod recovery_tests {
    use super::*;

    /// Two aircraft, each sitting in the sector the other wants next.
    fn crossed_pair() -> Sim {
        let config = config().with_grant_timeout(Duration::from_millis(50));
        planned_sim(2, &[(1, &[1]), (1, &[0])], config)
            .initial_positions(vec![Some(SectorId(0)), Some(SectorId(1))])
            .build()
            .unwrap()
    }

    #[test]
    fn crossed_pair_recovers_and_finishes() {
        let mut sim = crossed_pair();
        let audit = Audit::default();
        let report = sim.run(&audit).unwrap();

        assert!(report.recovery_episodes >= 1);
        assert!(audit.recovered.load(Ordering::SeqCst) >= 1);
        assert_eq!(
            report.flights.iter().map(|f| f.recoveries as u64).sum::<u64>(),
            report.recovery_episodes
        );
        assert_eq!(audit.finished.load(Ordering::SeqCst), 2);
        assert_eq!(audit.overlaps.load(Ordering::SeqCst), 0);
        assert_airspace_clear(&sim);
    }

    #[test]
    fn recovery_wait_counts_toward_mean_wait() {
        let mut sim = crossed_pair();
        let report = sim.run(&NoopObserver).unwrap();
        // The aircraft that recovered waited at least one full timeout.
        let recovered = report.flights.iter().find(|f| f.recoveries > 0).unwrap();
        assert!(recovered.cumulative_wait >= Duration::from_millis(50));
    }

    #[test]
    fn three_way_cycle_recovers() {
        let config = config().with_grant_timeout(Duration::from_millis(50));
        let mut sim = planned_sim(3, &[(1, &[1, 2]), (2, &[2, 0]), (3, &[0, 1])], config)
            .initial_positions(vec![Some(SectorId(0)), Some(SectorId(1)), Some(SectorId(2))])
            .build()
            .unwrap();
        let report = sim.run(&NoopObserver).unwrap();
        assert!(report.recovery_episodes >= 1);
        assert_airspace_clear(&sim);
    }
}

// ── Hand-back of a recovery episode ───────────────────────────────────────────

#[cfg(test)]
mod hand_back_tests {
    use std::thread;
    use std::time::Instant;

    use atc_control::{Airspace, Controller, Request};
    use atc_core::AircraftRng;
    use atc_fleet::{Aircraft, Route};

    use super::*;
    use crate::Pilot;

    /// A waits for a sector held by a two-aircraft cycle it is not part of.
    #[test]
    fn bystander_of_a_cycle_does_not_block_recovery() {
        let config = config().with_grant_timeout(Duration::from_millis(40));
        for _ in 0..3 {
            let mut sim = planned_sim(3, &[(1, &[1]), (1, &[2]), (1, &[1])], config.clone())
                .initial_positions(vec![Some(SectorId(0)), Some(SectorId(1)), Some(SectorId(2))])
                .build()
                .unwrap();
            let audit = Audit::default();
            let report = sim.run(&audit).unwrap();

            assert!(report.recovery_episodes >= 1);
            assert_eq!(audit.finished.load(Ordering::SeqCst), 3);
            assert_eq!(audit.overlaps.load(Ordering::SeqCst), 0);
            assert_airspace_clear(&sim);
        }
    }

    /// Only A has a pilot.  B and C sit still in sectors 1 and 2, so after
    /// recovering into its backup A times out again and must give the
    /// episode up while it keeps waiting.
    #[test]
    fn blocked_in_backup_hands_episode_back() {
        let config = config().with_grant_timeout(Duration::from_millis(30));
        let airspace = Airspace::new(3, 3, &config).unwrap();
        let (a, b, c) = (AircraftId(0), AircraftId(1), AircraftId(2));
        airspace.place(a, SectorId(0)).unwrap();
        airspace.place(b, SectorId(1)).unwrap();
        airspace.place(c, SectorId(2)).unwrap();

        let mut aircraft = Aircraft::new(a, 1, Route::new(sectors(&[1]), 3).unwrap());
        aircraft.place(SectorId(0));
        let mut controller = Controller::new(&airspace, vec![1, 1, 1]).unwrap();

        let report = thread::scope(|scope| {
            let control = scope.spawn(move || controller.run());
            let pilot = Pilot::new(&airspace, aircraft, AircraftRng::new(0, a), &NoopObserver);
            let flight = scope.spawn(move || pilot.fly());

            let deadline = Instant::now() + Duration::from_secs(5);
            let handed_back = loop {
                let recovery = airspace.recovery();
                if recovery.episodes() > 0 && !recovery.in_progress() {
                    break true;
                }
                if Instant::now() >= deadline {
                    break false;
                }
                thread::sleep(Duration::from_millis(1));
            };
            let backup = airspace.sectors().get(airspace.backup_sector(a)).unwrap();
            let in_backup = backup.claimant() == Some(a) && !airspace.is_finished(a);

            // Unblock A whatever happened so the scope can join.
            for (holder, sector) in [(b, SectorId(1)), (c, SectorId(2))] {
                airspace.sectors().get(sector).unwrap().unclaim(holder);
                airspace.requests().enqueue(Request::release(holder, sector)).unwrap();
                airspace.mark_finished(holder);
            }
            let report = flight.join().unwrap().unwrap();
            control.join().unwrap();
            assert!(handed_back, "episode never handed back");
            assert!(in_backup, "A was not waiting in its backup sector");
            report
        });

        assert_eq!(report.recoveries, 1);
        assert_eq!(airspace.recovery().episodes(), 1);
        assert!(!airspace.recovery().in_progress());
        assert!(airspace.occupied_sectors().is_empty());
        assert!(airspace.sectors().iter().all(|s| s.claimant().is_none()));
    }
}

// ── Recovery needs a held sector ──────────────────────────────────────────────

#[cfg(test)]
mod no_hold_tests {
    use std::thread;

    use atc_control::{Airspace, Controller, Request};
    use atc_core::AircraftRng;
    use atc_fleet::{Aircraft, Route};

    use super::*;
    use crate::Pilot;

    /// An aircraft that holds nothing keeps timing out on a busy sector
    /// without ever opening an episode.
    #[test]
    fn aircraft_holding_nothing_never_recovers() {
        let config = config().with_grant_timeout(Duration::from_millis(20));
        let airspace = Airspace::new(1, 2, &config).unwrap();
        let (a, holder) = (AircraftId(0), AircraftId(1));
        airspace.place(holder, SectorId(0)).unwrap();

        let aircraft = Aircraft::new(a, 1, Route::new(sectors(&[0]), 1).unwrap());
        let mut controller = Controller::new(&airspace, vec![1, 1]).unwrap();

        let (report, episodes_while_blocked) = thread::scope(|scope| {
            let control = scope.spawn(move || controller.run());
            let pilot = Pilot::new(&airspace, aircraft, AircraftRng::new(0, a), &NoopObserver);
            let flight = scope.spawn(move || pilot.fly());

            // Several timeouts' worth of waiting.
            thread::sleep(Duration::from_millis(120));
            let episodes = airspace.recovery().episodes();

            airspace.sectors().get(SectorId(0)).unwrap().unclaim(holder);
            airspace.requests().enqueue(Request::release(holder, SectorId(0))).unwrap();
            airspace.mark_finished(holder);
            let report = flight.join().unwrap().unwrap();
            control.join().unwrap();
            (report, episodes)
        });

        assert_eq!(episodes_while_blocked, 0);
        assert_eq!(report.recoveries, 0);
        assert!(airspace.occupied_sectors().is_empty());
    }
}

// ── Wait accounting ───────────────────────────────────────────────────────────

#[cfg(test)]
mod wait_tests {
    use std::thread;

    use atc_control::{Airspace, Controller};
    use atc_core::AircraftRng;
    use atc_fleet::{Aircraft, Route};

    use super::*;
    use crate::Pilot;

    /// The grant arrives at once but the sector is still physically occupied;
    /// the time spent retrying the claim is part of the wait.
    #[test]
    fn claim_retries_count_as_waiting() {
        let config = config();
        let airspace = Airspace::new(1, 2, &config).unwrap();
        let (a, ghost) = (AircraftId(0), AircraftId(1));
        let sector = airspace.sectors().get(SectorId(0)).unwrap();
        assert!(sector.try_claim(ghost));
        airspace.mark_finished(ghost);

        let aircraft = Aircraft::new(a, 1, Route::new(sectors(&[0]), 1).unwrap());
        let mut controller = Controller::new(&airspace, vec![1, 1]).unwrap();

        let report = thread::scope(|scope| {
            let control = scope.spawn(move || controller.run());
            let pilot = Pilot::new(&airspace, aircraft, AircraftRng::new(0, a), &NoopObserver);
            let flight = scope.spawn(move || pilot.fly());

            thread::sleep(Duration::from_millis(40));
            sector.unclaim(ghost);

            let report = flight.join().unwrap().unwrap();
            let stats = control.join().unwrap();
            assert_eq!(stats.grants, 1);
            report
        });

        assert!(report.cumulative_wait >= Duration::from_millis(40), "{:?}", report.cumulative_wait);
    }
}
