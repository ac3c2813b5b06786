//! Cardiac cycle convergence monitor.
//!
//! Detects when the periodic solution has stabilized across cycles. The
//! numerical detection itself belongs to the external 1D solver; this is
//! the enable/disable wrapper around it.

use crate::error::SimResult;
use crate::solvers::ArterialNetwork;

#[derive(Clone, Copy, Debug)]
pub struct CycleConvergenceMonitor {
    enabled: bool,
}

impl CycleConvergenceMonitor {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the cycle length to use for subsequent cycles. Identity
    /// when disabled; otherwise delegated to the network.
    pub fn check<N: ArterialNetwork>(
        &self,
        network: &mut N,
        cycle_length_s: f64,
    ) -> SimResult<f64> {
        if !self.enabled {
            return Ok(cycle_length_s);
        }
        network.check_cardiac_convergence(cycle_length_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surrogate::SurrogateNetwork;

    #[test]
    fn disabled_monitor_keeps_cycle_length() {
        let monitor = CycleConvergenceMonitor::new(false);
        let mut network = SurrogateNetwork::flow_inlet(4, 1e-3);
        let len = monitor.check(&mut network, 0.8).unwrap();
        assert_eq!(len, 0.8);
    }

    #[test]
    fn enabled_monitor_delegates() {
        let monitor = CycleConvergenceMonitor::new(true);
        let mut network = SurrogateNetwork::flow_inlet(4, 1e-3);
        let len = monitor.check(&mut network, 0.8).unwrap();
        // The surrogate reports the length unchanged.
        assert_eq!(len, 0.8);
    }
}
