//! Simulation clock with cardiac-cycle rollover.
//!
//! The clock is owned exclusively by the orchestrator and mutated once per
//! step. `current_time` is the phase within the running cardiac cycle;
//! `total_time` grows without bound.

use crate::error::{SimError, SimResult};
use crate::solvers::ArterialNetwork;

/// Timestep selection policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepPolicy {
    /// Configured fixed step, returned unchanged regardless of mesh input.
    Fixed { dt_s: f64 },
    /// CFL-like estimate delegated to the 1D network's minimum element
    /// length and wave speed.
    Adaptive { cfl: f64 },
}

/// Emitted when `current_time` crosses the cycle length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleBoundary {
    /// 1-based index of the cycle that just completed.
    pub completed_cycle: u32,
    /// Index of the cycle now starting.
    pub new_cycle: u32,
}

#[derive(Clone, Debug)]
pub struct SimulationClock {
    current_time: f64,
    total_time: f64,
    step_index: usize,
    dt: f64,
    cycle_index: u32,
    cycle_length: f64,
}

impl SimulationClock {
    pub fn new(dt_s: f64, cycle_length_s: f64) -> SimResult<Self> {
        if !dt_s.is_finite() || dt_s <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !cycle_length_s.is_finite() || cycle_length_s <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "cycle length must be positive",
            });
        }
        Ok(Self {
            current_time: 0.0,
            total_time: 0.0,
            step_index: 0,
            dt: dt_s,
            cycle_index: 1,
            cycle_length: cycle_length_s,
        })
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// 1-based cardiac cycle index.
    pub fn cycle_index(&self) -> u32 {
        self.cycle_index
    }

    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    /// Convergence detection may shorten or stretch subsequent cycles.
    pub fn set_cycle_length(&mut self, cycle_length_s: f64) -> SimResult<()> {
        if !cycle_length_s.is_finite() || cycle_length_s <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "cycle length must be positive",
            });
        }
        self.cycle_length = cycle_length_s;
        Ok(())
    }

    /// Pick the timestep for the upcoming step and store it.
    pub fn estimate_dt<N: ArterialNetwork>(&mut self, policy: &StepPolicy, network: &N) -> f64 {
        self.dt = match *policy {
            StepPolicy::Fixed { dt_s } => dt_s,
            StepPolicy::Adaptive { cfl } => {
                network.estimate_delta_time(cfl, network.min_element_length())
            }
        };
        self.dt
    }

    /// Advance by the stored dt; once per step.
    pub fn advance(&mut self) {
        self.current_time += self.dt;
        self.total_time += self.dt;
        self.step_index += 1;
    }

    /// Cycle rollover by subtraction (not modulo) so an adjusted cycle
    /// length keeps phase exactly.
    pub fn roll_cycle(&mut self) -> Option<CycleBoundary> {
        if self.current_time >= self.cycle_length {
            self.current_time -= self.cycle_length;
            let completed = self.cycle_index;
            self.cycle_index += 1;
            Some(CycleBoundary {
                completed_cycle: completed,
                new_cycle: self.cycle_index,
            })
        } else {
            None
        }
    }
}
