//! CSV flight-plan loader.
//!
//! # CSV format
//!
//! One row per route entry.  Rows for the same aircraft appear in route
//! order and must all carry the same `priority`.
//!
//! ```csv
//! aircraft_id,priority,sector
//! 0,500,2
//! 0,500,0
//! 0,500,1
//! 1,17,1
//! 1,17,2
//! ```
//!
//! Every aircraft in `0..aircraft_count` must have at least one row, since
//! empty routes are not flyable.  Sector ids are range-checked later, when
//! the plans are handed to [`crate::FleetBuilder`].

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use atc_core::{Priority, SectorId};

use crate::{FleetError, FlightPlan};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    aircraft_id: u32,
    priority:    Priority,
    sector:      u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load per-aircraft `FlightPlan`s from a CSV file.
///
/// Returns a `Vec` of length `aircraft_count`, indexed by `AircraftId`.
pub fn load_plans_csv(path: &Path, aircraft_count: usize) -> Result<Vec<FlightPlan>, FleetError> {
    let file = std::fs::File::open(path).map_err(FleetError::Io)?;
    load_plans_reader(file, aircraft_count)
}

/// Like [`load_plans_csv`] but accepts any `Read` source.
pub fn load_plans_reader<R: Read>(
    reader: R,
    aircraft_count: usize,
) -> Result<Vec<FlightPlan>, FleetError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_aircraft: HashMap<u32, FlightPlan> = HashMap::with_capacity(aircraft_count);

    for result in csv_reader.deserialize::<RouteRecord>() {
        let row = result.map_err(|e| FleetError::Parse(e.to_string()))?;
        if row.aircraft_id as usize >= aircraft_count {
            return Err(FleetError::Parse(format!(
                "aircraft_id {} is outside 0..{aircraft_count}",
                row.aircraft_id
            )));
        }
        let plan = by_aircraft.entry(row.aircraft_id).or_insert_with(|| FlightPlan {
            priority: row.priority,
            route:    Vec::new(),
        });
        if plan.priority != row.priority {
            return Err(FleetError::Parse(format!(
                "aircraft {} has conflicting priorities {} and {}",
                row.aircraft_id, plan.priority, row.priority
            )));
        }
        plan.route.push(SectorId(row.sector));
    }

    (0..aircraft_count as u32)
        .map(|i| {
            by_aircraft
                .remove(&i)
                .ok_or_else(|| FleetError::Parse(format!("aircraft {i} has no route rows")))
        })
        .collect()
}
