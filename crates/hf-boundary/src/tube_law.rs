//! Nonlinear elastic tube law for pressure-driven inlets.
//!
//! A pressure-driven inlet cannot set pressure directly on the 1D solver;
//! it prescribes the inlet cross-sectional area instead. The tube law maps
//! instantaneous pressure to a target area, and a fixed-form extrapolation
//! blends it with the previous step's area.

use crate::error::{BoundaryError, BoundaryResult};
use serde::{Deserialize, Serialize};

/// Elastic tube law parameters for one inlet vessel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElasticTubeLaw {
    /// Reference (diastolic) cross-sectional area, m^2.
    pub a0_m2: f64,
    /// Vessel wall stiffness coefficient, Pa*m.
    pub beta: f64,
    /// Diastolic pressure at which the area equals `a0_m2`, Pa.
    pub p_diastolic_pa: f64,
}

impl ElasticTubeLaw {
    pub fn new(a0_m2: f64, beta: f64, p_diastolic_pa: f64) -> BoundaryResult<Self> {
        if !a0_m2.is_finite() || a0_m2 <= 0.0 {
            return Err(BoundaryError::InvalidArg {
                what: "tube law a0 must be positive and finite",
            });
        }
        if !beta.is_finite() || beta <= 0.0 {
            return Err(BoundaryError::InvalidArg {
                what: "tube law beta must be positive and finite",
            });
        }
        if !p_diastolic_pa.is_finite() {
            return Err(BoundaryError::InvalidArg {
                what: "tube law diastolic pressure must be finite",
            });
        }
        Ok(Self {
            a0_m2,
            beta,
            p_diastolic_pa,
        })
    }

    /// Target area for an instantaneous pressure:
    /// `(sqrt(a0) + (p - p_dia) * a0 / beta)^2`.
    pub fn area_from_pressure(&self, p_pa: f64) -> f64 {
        let root = self.a0_m2.sqrt() + (p_pa - self.p_diastolic_pa) * self.a0_m2 / self.beta;
        root * root
    }
}

/// Finite-difference area extrapolation `(2*a^0.25 - a_prev^0.25)^4`.
///
/// Custom stabilization update applied between the tube-law target and the
/// area actually written to the inlet node; damps overshoot across steps.
/// The quarter-power form is intentional and must not be replaced by a
/// plain blend: when `a < a_prev` the base can go negative and the fourth
/// power recovers a positive area along the original numeric path.
#[inline]
pub fn extrapolate_area(a: f64, a_prev: f64) -> f64 {
    let base = 2.0 * a.powf(0.25) - a_prev.powf(0.25);
    base.powi(4)
}
