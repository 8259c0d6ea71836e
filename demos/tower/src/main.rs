//! tower — command-line driver for the rust_atc sector controller.
//!
//! Generates (or loads) a fleet, flies it through the airspace with one
//! thread per aircraft plus the controller, and prints per-aircraft wait
//! statistics.
//!
//! ```text
//! tower 4 8                                          # 4 sectors, 8 random aircraft
//! tower 3 3 --routes demos/tower/data/crossing.csv   # routes from CSV
//! tower 4 8 --output out/ --json                     # CSV logs in out/, JSON summary
//! RUST_LOG=atc_control=trace tower 2 2
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use atc_core::ControlConfig;
use atc_fleet::{FleetBuilder, load_plans_csv};
use atc_output::{CsvWriter, FlightLogObserver};
use atc_sim::{FlightObserver, NoopObserver, Sim, SimBuilder, SimReport};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tower")]
#[command(about = "Fly a fleet of aircraft through a sector-controlled airspace", long_about = None)]
struct Args {
    /// Number of ordinary sectors
    sectors: usize,

    /// Number of aircraft
    aircraft: usize,

    /// Master seed for fleet generation and dwell times
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Grant timeout in milliseconds before deadlock recovery is attempted
    #[arg(short, long, default_value = "1000")]
    timeout_ms: u64,

    /// Load routes from a CSV file instead of generating them
    #[arg(short, long)]
    routes: Option<PathBuf>,

    /// Write sector_events.csv and flight_reports.csv into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .init();

    let config = ControlConfig::default()
        .with_seed(args.seed)
        .with_grant_timeout(Duration::from_millis(args.timeout_ms));

    // 1. Fleet: random, or from CSV.
    let fleet = FleetBuilder::new(args.sectors, config.seed);
    let fleet = match &args.routes {
        Some(path) => {
            let plans = load_plans_csv(path, args.aircraft)
                .with_context(|| format!("loading routes from {}", path.display()))?;
            info!(path = %path.display(), "routes loaded");
            fleet.plans(plans)
        }
        None => fleet.random_aircraft(args.aircraft),
    };
    let (fleet, rngs) = fleet.build().context("building fleet")?;

    // 2. Airspace and controller.
    let mut sim = SimBuilder::new(config, args.sectors, fleet, rngs)
        .build()
        .context("allocating airspace")?;

    // 3. Fly.
    let report = match &args.output {
        Some(dir) => {
            let writer = CsvWriter::new(dir)
                .with_context(|| format!("creating output in {}", dir.display()))?;
            let observer = FlightLogObserver::new(writer);
            let report = fly(&mut sim, &observer)?;
            if let Some(e) = observer.take_error() {
                warn!(error = %e, "output incomplete");
            }
            report
        }
        None => fly(&mut sim, &NoopObserver)?,
    };

    // 4. Summary.
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }
    Ok(())
}

fn fly<O: FlightObserver>(sim: &mut Sim, observer: &O) -> Result<SimReport> {
    sim.run(observer).context("running simulation")
}

fn print_table(report: &SimReport) {
    println!("{:<10} {:>8} {:>6} {:>14} {:>12} {:>10}",
             "Aircraft", "Priority", "Route", "Total wait", "Mean wait", "Recovered");
    println!("{}", "-".repeat(66));
    for f in &report.flights {
        println!(
            "{:<10} {:>8} {:>6} {:>14.3?} {:>12.3?} {:>10}",
            f.aircraft.0, f.priority, f.route_len, f.cumulative_wait, f.mean_wait, f.recoveries,
        );
    }
    println!();
    println!("Run time            : {:.3?}", report.elapsed);
    println!("Fleet mean wait     : {:.3?}", report.fleet_mean_wait());
    println!("Recovery episodes   : {}", report.recovery_episodes);
    println!("Requests arbitrated : {}", report.controller.processed);
}
