//! The `OutputWriter` trait implemented by all backend writers.

use crate::{FlightRow, OutputResult, SectorEventRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`FlightLogObserver::take_error`][crate::FlightLogObserver::take_error].
pub trait OutputWriter: Send {
    /// Write a batch of sector events.
    fn write_sector_events(&mut self, rows: &[SectorEventRow]) -> OutputResult<()>;

    /// Write the per-aircraft flight summaries.
    fn write_flights(&mut self, rows: &[FlightRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
