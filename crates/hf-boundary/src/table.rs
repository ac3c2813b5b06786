//! Monotone time->value waveform table with linear interpolation.
//!
//! Tabulated inlet waveforms (measured flow or pressure traces) are looked
//! up here. The table never extrapolates: a query outside the sampled span
//! is an error, and periodic driving code wraps the query time modulo the
//! cardiac cycle instead.

use crate::error::{BoundaryError, BoundaryResult};
use serde::{Deserialize, Serialize};

/// Sampled waveform, strictly increasing in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformTable {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl WaveformTable {
    /// Build a table from `(time, value)` samples.
    ///
    /// Requires at least two samples, strictly increasing times, and finite
    /// values throughout.
    pub fn new(points: &[(f64, f64)]) -> BoundaryResult<Self> {
        if points.len() < 2 {
            return Err(BoundaryError::InvalidTable {
                what: "at least two samples required",
            });
        }
        for (t, v) in points {
            if !t.is_finite() || !v.is_finite() {
                return Err(BoundaryError::InvalidTable {
                    what: "non-finite sample",
                });
            }
        }
        for pair in points.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(BoundaryError::InvalidTable {
                    what: "times must be strictly increasing",
                });
            }
        }
        Ok(Self {
            times: points.iter().map(|p| p.0).collect(),
            values: points.iter().map(|p| p.1).collect(),
        })
    }

    /// First sampled time.
    pub fn t_start(&self) -> f64 {
        self.times[0]
    }

    /// Last sampled time.
    pub fn t_end(&self) -> f64 {
        *self.times.last().expect("table is non-empty")
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false by construction; kept for API completeness.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Linear interpolation at `t`. Errors if `t` lies outside the sampled
    /// span; no extrapolation is ever performed.
    pub fn value_at(&self, t: f64) -> BoundaryResult<f64> {
        if !t.is_finite() || t < self.t_start() || t > self.t_end() {
            return Err(BoundaryError::OutOfRange {
                time: t,
                t_start: self.t_start(),
                t_end: self.t_end(),
            });
        }

        // Index of the first sample time > t; t lives in [i-1, i].
        let i = self.times.partition_point(|&ti| ti <= t);
        if i == self.times.len() {
            return Ok(*self.values.last().expect("table is non-empty"));
        }
        if i == 0 {
            return Ok(self.values[0]);
        }

        let (t0, t1) = (self.times[i - 1], self.times[i]);
        let (v0, v1) = (self.values[i - 1], self.values[i]);
        let frac = (t - t0) / (t1 - t0);
        Ok(v0 + frac * (v1 - v0))
    }

    /// Lookup with the query time wrapped modulo `cycle_length`.
    ///
    /// This is the guard the inlet driver uses for periodic waveforms: the
    /// simulation time grows without bound, but the table spans one cardiac
    /// cycle. A table shorter than the cycle still errors out of range.
    pub fn value_at_cyclic(&self, t: f64, cycle_length: f64) -> BoundaryResult<f64> {
        if !(cycle_length > 0.0) {
            return Err(BoundaryError::InvalidArg {
                what: "cycle_length must be positive",
            });
        }
        self.value_at(t.rem_euclid(cycle_length))
    }
}
