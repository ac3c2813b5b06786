//! External solver contracts.
//!
//! The finite-element work (assembly, meshing, linear solves, time
//! integration) lives in the wrapped solver library. The orchestrator only
//! sequences calls through these traits; any failure inside a solver is
//! opaque (`SimError::Solver`) and propagates unchanged.

use crate::error::SimResult;
use hf_boundary::NodeBoundaryRecord;
use hf_core::NodeId;

/// One-dimensional arterial/venous network solver.
///
/// All quantities are SI: pressures in Pa, flows in m^3/s, lengths in m,
/// areas in m^2.
pub trait ArterialNetwork {
    fn initialize(&mut self) -> SimResult<()>;

    /// Advance the network by one timestep.
    fn solve_step(&mut self, time_s: f64) -> SimResult<()>;

    /// Pressure recovery after a step, offset by the venous reference
    /// pressure.
    fn compute_pressure(&mut self, reference_pressure_pa: f64) -> SimResult<()>;

    /// Minimum element length of the 1D mesh.
    fn min_element_length(&self) -> f64;

    /// CFL-like timestep estimate from the mesh.
    fn estimate_delta_time(&self, cfl: f64, min_length_m: f64) -> f64;

    /// Periodic-solution convergence detection; returns the (possibly
    /// adjusted) cycle length.
    fn check_cardiac_convergence(&mut self, cycle_length_s: f64) -> SimResult<f64>;

    /// Fixed-flag records of the inlet nodes, read once at initialization.
    fn inlet_records(&self) -> Vec<NodeBoundaryRecord>;

    fn set_inlet_flow(&mut self, node: NodeId, flow_m3_s: f64) -> SimResult<()>;

    fn inlet_area(&self, node: NodeId) -> SimResult<f64>;

    /// Area one solution-step buffer back, for the area extrapolation.
    fn previous_inlet_area(&self, node: NodeId) -> SimResult<f64>;

    fn set_inlet_area(&mut self, node: NodeId, area_m2: f64) -> SimResult<()>;

    /// Proximal (inlet-side) pressure of the simulated segment.
    fn inlet_pressure(&self) -> f64;

    /// Distal (outlet-side) pressure of the simulated segment.
    fn outlet_pressure(&self) -> f64;

    fn outlet_flow(&self) -> f64;

    /// Cross-feedback from the 3D domain: prescribe the outlet flow.
    fn set_outlet_flow(&mut self, flow_m3_s: f64) -> SimResult<()>;
}

/// Three-dimensional incompressible-flow domain.
pub trait PerfusionDomain {
    fn initialize(&mut self) -> SimResult<()>;

    /// Advance the domain by one (sub-stepped) timestep.
    fn solve(&mut self, time_s: f64) -> SimResult<()>;

    /// Boundary condition handed over from the 1D outlet.
    fn apply_inlet_pressure(&mut self, pressure_pa: f64) -> SimResult<()>;

    /// Flow through the domain inlet after the last solve.
    fn inlet_flow(&self) -> f64;
}
