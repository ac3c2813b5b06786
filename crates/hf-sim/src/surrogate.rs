//! Lumped-parameter surrogate backend.
//!
//! Cheap algebraic stand-ins for the external 1D and 3D solvers, used by
//! the CLI dry-run path and the test suite. A proximal resistance sets the
//! inlet pressure, a stenosis resistance drops it toward the outlet, and
//! the outlet flow relaxes toward the inlet flow. No finite elements, no
//! linear algebra.

use crate::error::{SimError, SimResult};
use crate::solvers::{ArterialNetwork, PerfusionDomain};
use hf_boundary::NodeBoundaryRecord;
use hf_core::NodeId;

/// Baseline diastolic-ish pressure of the surrogate, Pa.
const BASE_PRESSURE_PA: f64 = 10_000.0;
/// Reference inlet cross-section, m^2.
const BASE_AREA_M2: f64 = 1.0e-5;
/// Typical pulse wave speed, m/s.
const WAVE_SPEED_M_S: f64 = 6.0;

#[derive(Clone, Debug)]
pub struct SurrogateNetwork {
    records: Vec<NodeBoundaryRecord>,
    areas: Vec<f64>,
    prev_areas: Vec<f64>,
    inlet_flow: f64,
    outlet_flow: f64,
    raw_inlet_pressure: f64,
    raw_outlet_pressure: f64,
    inlet_pressure: f64,
    outlet_pressure: f64,
    min_length: f64,
    resistance: f64,
    stenosis_resistance: f64,
    feedback_count: u64,
    initialized: bool,
}

impl SurrogateNetwork {
    fn with_records(records: Vec<NodeBoundaryRecord>, min_length_m: f64) -> Self {
        let n = records.len();
        Self {
            records,
            areas: vec![BASE_AREA_M2; n],
            prev_areas: vec![BASE_AREA_M2; n],
            inlet_flow: 0.0,
            outlet_flow: 0.0,
            raw_inlet_pressure: BASE_PRESSURE_PA,
            raw_outlet_pressure: BASE_PRESSURE_PA,
            inlet_pressure: BASE_PRESSURE_PA,
            outlet_pressure: BASE_PRESSURE_PA,
            min_length: min_length_m,
            resistance: 1.0e8,
            stenosis_resistance: 2.0e8,
            feedback_count: 0,
            initialized: false,
        }
    }

    /// Surrogate with a flow-fixed inlet at node 0.
    pub fn flow_inlet(nodes: usize, min_length_m: f64) -> Self {
        let records = (0..nodes)
            .map(|i| NodeBoundaryRecord {
                id: NodeId::from_index(i as u32),
                fixed_flow: i == 0,
                fixed_pressure: false,
            })
            .collect();
        Self::with_records(records, min_length_m)
    }

    /// Surrogate with a pressure-fixed inlet at node 0.
    pub fn pressure_inlet(nodes: usize, min_length_m: f64) -> Self {
        let records = (0..nodes)
            .map(|i| NodeBoundaryRecord {
                id: NodeId::from_index(i as u32),
                fixed_flow: false,
                fixed_pressure: i == 0,
            })
            .collect();
        Self::with_records(records, min_length_m)
    }

    /// Number of cross-feedback prescriptions received from the 3D side.
    pub fn outlet_feedback_count(&self) -> u64 {
        self.feedback_count
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn node_index(&self, node: NodeId) -> SimResult<usize> {
        let idx = node.index() as usize;
        if idx >= self.areas.len() {
            return Err(SimError::Solver {
                message: format!("surrogate network has no node {node}"),
            });
        }
        Ok(idx)
    }
}

impl ArterialNetwork for SurrogateNetwork {
    fn initialize(&mut self) -> SimResult<()> {
        self.initialized = true;
        Ok(())
    }

    fn solve_step(&mut self, _time_s: f64) -> SimResult<()> {
        self.prev_areas.copy_from_slice(&self.areas);
        // Outlet flow relaxes toward the prescribed inlet flow.
        self.outlet_flow += 0.5 * (self.inlet_flow - self.outlet_flow);
        self.raw_inlet_pressure = BASE_PRESSURE_PA + self.resistance * self.inlet_flow;
        self.raw_outlet_pressure =
            self.raw_inlet_pressure - self.stenosis_resistance * self.outlet_flow.abs();
        self.inlet_pressure = self.raw_inlet_pressure;
        self.outlet_pressure = self.raw_outlet_pressure;
        Ok(())
    }

    fn compute_pressure(&mut self, reference_pressure_pa: f64) -> SimResult<()> {
        self.inlet_pressure = self.raw_inlet_pressure + reference_pressure_pa;
        self.outlet_pressure = self.raw_outlet_pressure + reference_pressure_pa;
        Ok(())
    }

    fn min_element_length(&self) -> f64 {
        self.min_length
    }

    fn estimate_delta_time(&self, cfl: f64, min_length_m: f64) -> f64 {
        cfl * min_length_m / WAVE_SPEED_M_S
    }

    fn check_cardiac_convergence(&mut self, cycle_length_s: f64) -> SimResult<f64> {
        Ok(cycle_length_s)
    }

    fn inlet_records(&self) -> Vec<NodeBoundaryRecord> {
        self.records.clone()
    }

    fn set_inlet_flow(&mut self, node: NodeId, flow_m3_s: f64) -> SimResult<()> {
        let idx = self.node_index(node)?;
        if !self.records[idx].fixed_flow {
            return Err(SimError::Solver {
                message: format!("node {node} is not flow-fixed"),
            });
        }
        self.inlet_flow = flow_m3_s;
        Ok(())
    }

    fn inlet_area(&self, node: NodeId) -> SimResult<f64> {
        Ok(self.areas[self.node_index(node)?])
    }

    fn previous_inlet_area(&self, node: NodeId) -> SimResult<f64> {
        Ok(self.prev_areas[self.node_index(node)?])
    }

    fn set_inlet_area(&mut self, node: NodeId, area_m2: f64) -> SimResult<()> {
        let idx = self.node_index(node)?;
        if !self.records[idx].fixed_pressure {
            return Err(SimError::Solver {
                message: format!("node {node} is not pressure-fixed"),
            });
        }
        self.areas[idx] = area_m2;
        // A widened inlet admits more flow; crude but monotone.
        self.inlet_flow = (area_m2 - BASE_AREA_M2) * 1.0;
        Ok(())
    }

    fn inlet_pressure(&self) -> f64 {
        self.inlet_pressure
    }

    fn outlet_pressure(&self) -> f64 {
        self.outlet_pressure
    }

    fn outlet_flow(&self) -> f64 {
        self.outlet_flow
    }

    fn set_outlet_flow(&mut self, flow_m3_s: f64) -> SimResult<()> {
        self.outlet_flow = flow_m3_s;
        self.feedback_count += 1;
        Ok(())
    }
}

/// Surrogate 3D perfusion domain: a single resistance between the applied
/// inlet pressure and the venous bed.
#[derive(Clone, Debug)]
pub struct SurrogateDomain {
    resistance: f64,
    inlet_pressure: f64,
    flow: f64,
    solve_count: usize,
    initialized: bool,
}

impl SurrogateDomain {
    pub fn new(resistance_pa_s_m3: f64) -> Self {
        Self {
            resistance: resistance_pa_s_m3,
            inlet_pressure: 0.0,
            flow: 0.0,
            solve_count: 0,
            initialized: false,
        }
    }

    pub fn solve_count(&self) -> usize {
        self.solve_count
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl PerfusionDomain for SurrogateDomain {
    fn initialize(&mut self) -> SimResult<()> {
        self.initialized = true;
        Ok(())
    }

    fn solve(&mut self, _time_s: f64) -> SimResult<()> {
        self.flow = self.inlet_pressure / self.resistance;
        self.solve_count += 1;
        Ok(())
    }

    fn apply_inlet_pressure(&mut self, pressure_pa: f64) -> SimResult<()> {
        self.inlet_pressure = pressure_pa;
        Ok(())
    }

    fn inlet_flow(&self) -> f64 {
        self.flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_drops_across_stenosis() {
        let mut network = SurrogateNetwork::flow_inlet(4, 1e-3);
        network.initialize().unwrap();
        network
            .set_inlet_flow(NodeId::from_index(0), 8e-6)
            .unwrap();
        for _ in 0..20 {
            network.solve_step(0.0).unwrap();
        }
        assert!(network.inlet_pressure() > network.outlet_pressure());
        assert!(network.outlet_pressure() > 0.0);
    }

    #[test]
    fn compute_pressure_adds_reference() {
        let mut network = SurrogateNetwork::flow_inlet(2, 1e-3);
        network.solve_step(0.0).unwrap();
        let before = network.inlet_pressure();
        network.compute_pressure(666.0).unwrap();
        assert!((network.inlet_pressure() - before - 666.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_flow_on_unfixed_node() {
        let mut network = SurrogateNetwork::flow_inlet(4, 1e-3);
        assert!(network.set_inlet_flow(NodeId::from_index(1), 1e-6).is_err());
    }

    #[test]
    fn area_buffers_shift_on_solve() {
        let mut network = SurrogateNetwork::pressure_inlet(2, 1e-3);
        let node = NodeId::from_index(0);
        network.set_inlet_area(node, 2e-5).unwrap();
        assert_eq!(network.previous_inlet_area(node).unwrap(), BASE_AREA_M2);
        network.solve_step(0.0).unwrap();
        assert_eq!(network.previous_inlet_area(node).unwrap(), 2e-5);
    }

    #[test]
    fn domain_obeys_ohms_law() {
        let mut domain = SurrogateDomain::new(2.0e8);
        domain.apply_inlet_pressure(10_000.0).unwrap();
        domain.solve(0.0).unwrap();
        assert!((domain.inlet_flow() - 5e-5).abs() < 1e-12);
        assert_eq!(domain.solve_count(), 1);
    }
}
