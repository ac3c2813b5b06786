//! Inlet boundary machinery for hemoflow.
//!
//! This crate provides the time-varying boundary condition applied to the
//! inlet nodes of the 1D arterial network. It is pure math: the driver
//! computes values, the orchestrator applies them to the network through
//! the solver traits.
//!
//! # Architecture
//!
//! - Profiles are scalar `f64` waveforms over time
//! - `WaveformTable` is a monotone time->value lookup with no extrapolation
//! - Pressure-driven inlets convert pressure to cross-sectional area via an
//!   elastic tube law plus a fixed-form extrapolation update
//! - Inlet node records are built once at initialization and validated for
//!   mode exclusivity

pub mod error;
pub mod inlet;
pub mod profile;
pub mod table;
pub mod tube_law;

pub use error::{BoundaryError, BoundaryResult};
pub use inlet::{InletDriver, InletMode, NodeBoundaryRecord};
pub use profile::BoundaryProfile;
pub use table::WaveformTable;
pub use tube_law::{ElasticTubeLaw, extrapolate_area};
