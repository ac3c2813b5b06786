//! Sub-step counter gating the 3D domain advance.
//!
//! The 1D network is cheap and steps every timestep; the 3D domain only
//! advances once per `period` 1D steps. The counter stays in
//! `[0, period)` between calls.

use crate::error::{SimError, SimResult};

#[derive(Clone, Debug)]
pub struct SubStepCounter {
    count: usize,
    period: usize,
}

impl SubStepCounter {
    pub fn new(period: usize) -> SimResult<Self> {
        if period == 0 {
            return Err(SimError::InvalidArg {
                what: "sub-step period must be at least 1",
            });
        }
        Ok(Self { count: 0, period })
    }

    /// Register one 1D step. Returns true exactly when the period is
    /// reached, resetting the counter.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.period {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
