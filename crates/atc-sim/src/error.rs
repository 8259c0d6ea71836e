use atc_control::ControlError;
use atc_core::AtcError;
use atc_fleet::FleetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match aircraft count {expected}")]
    AircraftCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("control error: {0}")]
    Control(#[from] ControlError),

    #[error("fleet error: {0}")]
    Fleet(#[from] FleetError),

    #[error("failed to spawn {what} thread: {source}")]
    Spawn {
        what:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} thread panicked")]
    ThreadPanicked(String),
}

impl From<AtcError> for SimError {
    fn from(e: AtcError) -> Self {
        SimError::Control(ControlError::Core(e))
    }
}

pub type SimResult<T> = Result<T, SimError>;
