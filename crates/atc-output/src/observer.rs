//! `FlightLogObserver<W>` — bridges `FlightObserver` to an `OutputWriter`.

use std::time::Instant;

use parking_lot::Mutex;

use atc_core::{AircraftId, SectorId};
use atc_sim::{FlightObserver, SimReport};

use crate::row::{FlightRow, SectorEvent, SectorEventRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`FlightObserver`] that logs every sector transition and the final
/// flight summaries to any [`OutputWriter`] backend.
///
/// Pilot threads call in concurrently; the writer sits behind a lock, and
/// timestamps are taken under it so event rows come out in time order.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct FlightLogObserver<W: OutputWriter> {
    writer:     Mutex<W>,
    started:    Instant,
    last_error: Mutex<Option<OutputError>>,
}

impl<W: OutputWriter> FlightLogObserver<W> {
    /// Create an observer backed by `writer`.  Event times are measured from
    /// this call.
    pub fn new(writer: W) -> Self {
        Self {
            writer:     Mutex::new(writer),
            started:    Instant::now(),
            last_error: Mutex::new(None),
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&self) -> Option<OutputError> {
        self.last_error.lock().take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }

    fn record(&self, aircraft: AircraftId, sector: SectorId, event: SectorEvent, position: u32) {
        let mut writer = self.writer.lock();
        let row = SectorEventRow {
            elapsed_us:  self.started.elapsed().as_micros() as u64,
            aircraft_id: aircraft.0,
            sector_id:   sector.0,
            event,
            position,
        };
        let result = writer.write_sector_events(&[row]);
        drop(writer);
        self.store_err(result);
    }

    fn store_err(&self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            self.last_error.lock().get_or_insert(e);
        }
    }
}

impl<W: OutputWriter> FlightObserver for FlightLogObserver<W> {
    fn on_sector_entered(&self, aircraft: AircraftId, sector: SectorId, position: usize) {
        self.record(aircraft, sector, SectorEvent::Entered, position as u32);
    }

    fn on_sector_left(&self, aircraft: AircraftId, sector: SectorId) {
        self.record(aircraft, sector, SectorEvent::Left, u32::MAX);
    }

    fn on_recovery(&self, aircraft: AircraftId, backup: SectorId, _abandoned: SectorId) {
        self.record(aircraft, backup, SectorEvent::Recovery, u32::MAX);
    }

    fn on_run_end(&self, report: &SimReport) {
        let rows: Vec<FlightRow> = report.flights.iter().map(FlightRow::from).collect();
        let mut writer = self.writer.lock();
        let result = writer.write_flights(&rows).and_then(|()| writer.finish());
        drop(writer);
        self.store_err(result);
    }
}
