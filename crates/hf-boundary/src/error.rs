//! Error types for boundary-condition operations.

use thiserror::Error;

/// Result type for boundary-condition operations.
pub type BoundaryResult<T> = Result<T, BoundaryError>;

/// Errors that can occur while building or evaluating inlet boundaries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoundaryError {
    /// Invalid argument provided to a boundary function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Waveform lookup beyond the table domain. Never swallowed; callers
    /// guard with modulo-cycle wrapping instead of extrapolating.
    #[error("Waveform lookup out of range: t={time} outside [{t_start}, {t_end}]")]
    OutOfRange { time: f64, t_start: f64, t_end: f64 },

    /// Malformed waveform table (empty, non-monotone, non-finite).
    #[error("Invalid waveform table: {what}")]
    InvalidTable { what: &'static str },

    /// No inlet node carries the fixed flag matching the configured mode.
    #[error("No fixed inlet nodes found for {mode} inlet")]
    NoFixedInletNodes { mode: &'static str },

    /// A node is fixed in both flow and pressure; the inlet mode would be
    /// ambiguous for the whole run.
    #[error("Ambiguous inlet boundary at node {node}: both flow and pressure fixed")]
    AmbiguousInletNode { node: u32 },
}
