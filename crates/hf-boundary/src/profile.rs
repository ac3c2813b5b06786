//! Inlet waveform profiles.

use crate::error::{BoundaryError, BoundaryResult};
use crate::table::WaveformTable;
use serde::{Deserialize, Serialize};

/// Time-varying inlet waveform, immutable once constructed.
///
/// The variant makes the profile policy explicit instead of threading
/// flag booleans through the step loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryProfile {
    /// `p2*t^2 + p1*t + p3`.
    Parabolic { p1: f64, p2: f64, p3: f64 },
    /// `p1 + p2*cos(2*pi*t/period)`.
    Cosine { p1: f64, p2: f64, period_s: f64 },
    /// Interpolated lookup in a measured waveform trace.
    Tabulated { table: WaveformTable },
}

impl BoundaryProfile {
    /// Cosine profile with validated period.
    pub fn cosine(p1: f64, p2: f64, period_s: f64) -> BoundaryResult<Self> {
        if !(period_s > 0.0) || !period_s.is_finite() {
            return Err(BoundaryError::InvalidArg {
                what: "cosine period must be positive and finite",
            });
        }
        Ok(Self::Cosine { p1, p2, period_s })
    }

    /// Evaluate the profile at time `t`.
    ///
    /// Tabulated profiles error out of range beyond the table span. The
    /// inlet driver wraps tabulated queries modulo the cardiac cycle and
    /// re-derives the cosine period from the current cycle length before
    /// calling in (see [`crate::InletDriver::value_at`]).
    pub fn value_at(&self, t: f64) -> BoundaryResult<f64> {
        match self {
            Self::Parabolic { p1, p2, p3 } => Ok(p2 * t * t + p1 * t + p3),
            Self::Cosine { p1, p2, period_s } => {
                Ok(p1 + p2 * (2.0 * std::f64::consts::PI * t / period_s).cos())
            }
            Self::Tabulated { table } => table.value_at(t),
        }
    }
}
