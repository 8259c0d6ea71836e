//! The `Sim` struct and its thread orchestration.

use std::thread;
use std::time::Instant;

use tracing::{error, info};

use atc_control::{Airspace, Controller};
use atc_core::AircraftRng;
use atc_fleet::Aircraft;

use crate::{FlightObserver, FlightReport, Pilot, SimError, SimReport, SimResult};

/// One configured run: the shared airspace plus the fleet waiting to fly.
///
/// Create via [`SimBuilder`][crate::SimBuilder].  A `Sim` flies once; the
/// airspace stays readable afterwards for inspection.
pub struct Sim {
    airspace: Airspace,
    fleet:    Vec<Aircraft>,
    rngs:     Vec<AircraftRng>,
    flown:    bool,
}

impl Sim {
    pub(crate) fn new(airspace: Airspace, fleet: Vec<Aircraft>, rngs: Vec<AircraftRng>) -> Self {
        Self { airspace, fleet, rngs, flown: false }
    }

    pub fn airspace(&self) -> &Airspace {
        &self.airspace
    }

    /// The fleet as built.  Empty after [`Sim::run`], which moves every
    /// aircraft into its pilot thread.
    pub fn fleet(&self) -> &[Aircraft] {
        &self.fleet
    }

    /// Spawn the controller and one pilot per aircraft, wait for all of them,
    /// and return the run summary.
    ///
    /// Observer callbacks arrive from the pilot threads, except
    /// [`FlightObserver::on_run_end`], which runs on the caller's thread.
    pub fn run<O: FlightObserver>(&mut self, observer: &O) -> SimResult<SimReport> {
        if self.flown {
            return Err(SimError::Config("this fleet has already flown".into()));
        }
        self.flown = true;

        let fleet = std::mem::take(&mut self.fleet);
        let rngs = std::mem::take(&mut self.rngs);
        let airspace = &self.airspace;
        let priorities = fleet.iter().map(|a| a.priority).collect();
        let mut controller = Controller::new(airspace, priorities)?;

        info!(aircraft = fleet.len(), sectors = airspace.num_sectors(), "run started");
        let started = Instant::now();

        let (controller_stats, outcomes) = thread::scope(|scope| -> SimResult<_> {
            let control = thread::Builder::new()
                .name("controller".into())
                .spawn_scoped(scope, move || controller.run())
                .map_err(|source| SimError::Spawn { what: "controller".into(), source })?;

            let mut pilots = Vec::with_capacity(fleet.len());
            let mut spawn_error = None;
            for (aircraft, rng) in fleet.into_iter().zip(rngs) {
                let id = aircraft.id;
                let name = format!("pilot-{}", id.0);
                let spawned = thread::Builder::new()
                    .name(name.clone())
                    .spawn_scoped(scope, move || Pilot::new(airspace, aircraft, rng, observer).fly());
                match spawned {
                    Ok(handle) => pilots.push((name, handle)),
                    Err(source) => {
                        error!(aircraft = %id, error = %source, "pilot thread failed to start");
                        // Unblock the controller; this aircraft never flies.
                        airspace.mark_finished(id);
                        spawn_error.get_or_insert(SimError::Spawn { what: name, source });
                    }
                }
            }

            let outcomes: Vec<SimResult<FlightReport>> = pilots
                .into_iter()
                .map(|(name, handle)| {
                    handle.join().unwrap_or_else(|_| Err(SimError::ThreadPanicked(name)))
                })
                .collect();
            let stats = control
                .join()
                .map_err(|_| SimError::ThreadPanicked("controller".into()))?;
            match spawn_error {
                Some(e) => Err(e),
                None => Ok((stats, outcomes)),
            }
        })?;

        let flights = outcomes.into_iter().collect::<SimResult<Vec<_>>>()?;
        let report = SimReport {
            flights,
            elapsed: started.elapsed(),
            recovery_episodes: airspace.recovery().episodes(),
            controller: controller_stats,
        };
        info!(elapsed = ?report.elapsed, recoveries = report.recovery_episodes,
              mean_wait = ?report.fleet_mean_wait(), "run finished");
        observer.on_run_end(&report);
        Ok(report)
    }
}
