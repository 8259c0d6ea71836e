//! Flight observer trait for progress reporting and data collection.

use atc_core::{AircraftId, SectorId};

use crate::{FlightReport, SimReport};

/// Callbacks invoked from the pilot threads during [`Sim::run`][crate::Sim::run].
///
/// The same observer is shared by every pilot thread, so methods take `&self`
/// and implementors synchronise their own state.  All methods have default
/// no-op implementations.
///
/// # Example — entry counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct EntryCounter(AtomicUsize);
///
/// impl FlightObserver for EntryCounter {
///     fn on_sector_entered(&self, _: AircraftId, _: SectorId, _: usize) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait FlightObserver: Sync {
    /// `aircraft` has physically claimed route sector `sector`, which is entry
    /// `position` of its route (0-based).  Called before the previously held
    /// sector is released.
    fn on_sector_entered(&self, _aircraft: AircraftId, _sector: SectorId, _position: usize) {}

    /// `aircraft` is about to leave `sector`.  Called while the aircraft is
    /// still physically inside, so an observer that pairs entries and exits
    /// never sees two occupants at once.
    fn on_sector_left(&self, _aircraft: AircraftId, _sector: SectorId) {}

    /// `aircraft` moved into its backup sector and gave up `abandoned`.
    fn on_recovery(&self, _aircraft: AircraftId, _backup: SectorId, _abandoned: SectorId) {}

    /// `aircraft` released its last sector.
    fn on_finished(&self, _report: &FlightReport) {}

    /// Called once on the calling thread after every thread has been joined.
    fn on_run_end(&self, _report: &SimReport) {}
}

/// A [`FlightObserver`] that does nothing.
pub struct NoopObserver;

impl FlightObserver for NoopObserver {}
