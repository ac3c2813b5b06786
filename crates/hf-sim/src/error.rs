//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while orchestrating a coupled run.
#[derive(Error, Debug)]
pub enum SimError {
    /// Contradictory or incomplete run setup, detected at initialization.
    /// Fatal and non-recoverable; the caller decides exit behavior.
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Lookup beyond a waveform table's domain. Propagated, never swallowed.
    #[error("Out of range: {what}")]
    OutOfRange { what: String },

    /// Opaque failure inside the wrapped numerical solver. Propagates
    /// unchanged; the orchestrator never retries a step.
    #[error("Solver error: {message}")]
    Solver { message: String },

    #[error("Numeric error: {message}")]
    Numeric { message: String },

    /// Failure while persisting results through a sink.
    #[error("Result sink error: {message}")]
    Sink { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<hf_boundary::BoundaryError> for SimError {
    fn from(e: hf_boundary::BoundaryError) -> Self {
        match e {
            hf_boundary::BoundaryError::OutOfRange { .. } => SimError::OutOfRange {
                what: e.to_string(),
            },
            other => SimError::Configuration {
                what: other.to_string(),
            },
        }
    }
}

impl From<hf_core::HfError> for SimError {
    fn from(e: hf_core::HfError) -> Self {
        SimError::Numeric {
            message: e.to_string(),
        }
    }
}
