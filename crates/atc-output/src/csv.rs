//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `sector_events.csv`
//! - `flight_reports.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{FlightRow, OutputResult, SectorEventRow};

/// Writes run output to two CSV files.
pub struct CsvWriter {
    events:   Writer<File>,
    flights:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut events = Writer::from_path(dir.join("sector_events.csv"))?;
        events.write_record(["elapsed_us", "aircraft_id", "sector_id", "event", "position"])?;

        let mut flights = Writer::from_path(dir.join("flight_reports.csv"))?;
        flights.write_record([
            "aircraft_id",
            "priority",
            "route_len",
            "cumulative_wait_us",
            "mean_wait_us",
            "recoveries",
        ])?;

        Ok(Self { events, flights, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_sector_events(&mut self, rows: &[SectorEventRow]) -> OutputResult<()> {
        for row in rows {
            let position = if row.position == u32::MAX {
                String::new()
            } else {
                row.position.to_string()
            };
            self.events.write_record(&[
                row.elapsed_us.to_string(),
                row.aircraft_id.to_string(),
                row.sector_id.to_string(),
                row.event.to_string(),
                position,
            ])?;
        }
        Ok(())
    }

    fn write_flights(&mut self, rows: &[FlightRow]) -> OutputResult<()> {
        for row in rows {
            self.flights.write_record(&[
                row.aircraft_id.to_string(),
                row.priority.to_string(),
                row.route_len.to_string(),
                row.cumulative_wait_us.to_string(),
                row.mean_wait_us.to_string(),
                row.recoveries.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.flights.flush()?;
        Ok(())
    }
}
