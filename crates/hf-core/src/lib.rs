//! hf-core: stable foundation for hemoflow.
//!
//! Contains:
//! - units (mmHg <-> Pa conversion via uom for clinical pressures)
//! - numeric (Real + finiteness guard)
//! - ids (stable compact IDs for 1D network nodes)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HfError, HfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
