//! Inlet boundary driver.
//!
//! Built once at initialization from the fixed-flag records of the 1D
//! network's inlet nodes, then queried every step. Exactly one inlet mode
//! is active per node for the whole run; mixing is rejected up front.

use crate::error::{BoundaryError, BoundaryResult};
use crate::profile::BoundaryProfile;
use crate::tube_law::{ElasticTubeLaw, extrapolate_area};
use hf_core::NodeId;
use serde::{Deserialize, Serialize};

/// Which nodal quantity the inlet waveform drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InletMode {
    Flow,
    Pressure,
}

impl InletMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Flow => "flow",
            Self::Pressure => "pressure",
        }
    }
}

/// Per-inlet-node fixed flags, read from the network at initialization and
/// read-only afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeBoundaryRecord {
    pub id: NodeId,
    pub fixed_flow: bool,
    pub fixed_pressure: bool,
}

/// Computes the inlet boundary value for each step.
///
/// The driver never touches the network itself; the orchestrator applies
/// the returned values through the solver traits.
#[derive(Debug, Clone)]
pub struct InletDriver {
    mode: InletMode,
    profile: BoundaryProfile,
    tube_law: Option<ElasticTubeLaw>,
    nodes: Vec<NodeId>,
}

impl InletDriver {
    /// Validate records against the configured mode and build the driver.
    ///
    /// Fails fast on an ambiguous node (both flags set) or when no node
    /// carries the flag the mode needs. Pressure mode additionally requires
    /// a tube law to convert pressure into inlet area.
    pub fn new(
        mode: InletMode,
        profile: BoundaryProfile,
        tube_law: Option<ElasticTubeLaw>,
        records: &[NodeBoundaryRecord],
    ) -> BoundaryResult<Self> {
        for record in records {
            if record.fixed_flow && record.fixed_pressure {
                return Err(BoundaryError::AmbiguousInletNode {
                    node: record.id.index(),
                });
            }
        }

        let nodes: Vec<NodeId> = records
            .iter()
            .filter(|r| match mode {
                InletMode::Flow => r.fixed_flow,
                InletMode::Pressure => r.fixed_pressure,
            })
            .map(|r| r.id)
            .collect();

        if nodes.is_empty() {
            return Err(BoundaryError::NoFixedInletNodes {
                mode: mode.label(),
            });
        }

        if mode == InletMode::Pressure && tube_law.is_none() {
            return Err(BoundaryError::InvalidArg {
                what: "pressure inlet requires a tube law",
            });
        }

        Ok(Self {
            mode,
            profile,
            tube_law,
            nodes,
        })
    }

    pub fn mode(&self) -> InletMode {
        self.mode
    }

    /// Inlet nodes driven by this waveform.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Waveform value at time `t`.
    ///
    /// Periodic profiles track the current cycle length: tabulated profiles
    /// are queried modulo `cycle_length`, and the cosine period is re-derived
    /// from it so an adaptively shortened or lengthened cycle keeps the
    /// waveform in phase.
    pub fn value_at(&self, t: f64, cycle_length: f64) -> BoundaryResult<f64> {
        match &self.profile {
            BoundaryProfile::Tabulated { table } => table.value_at_cyclic(t, cycle_length),
            BoundaryProfile::Cosine { p1, p2, .. } => {
                if !(cycle_length > 0.0) || !cycle_length.is_finite() {
                    return Err(BoundaryError::InvalidArg {
                        what: "cycle length must be positive and finite",
                    });
                }
                Ok(p1 + p2 * (2.0 * std::f64::consts::PI * t / cycle_length).cos())
            }
            other => other.value_at(t),
        }
    }

    /// New inlet area for a pressure-driven inlet: tube-law target area for
    /// the instantaneous pressure, stabilized against the previous step's
    /// area with the quarter-power extrapolation.
    pub fn area_update(&self, pressure_pa: f64, area_prev_m2: f64) -> BoundaryResult<f64> {
        let law = self.tube_law.as_ref().ok_or(BoundaryError::InvalidArg {
            what: "area update requires a pressure inlet with a tube law",
        })?;
        Ok(extrapolate_area(
            law.area_from_pressure(pressure_pa),
            area_prev_m2,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow_node(index: u32) -> NodeBoundaryRecord {
        NodeBoundaryRecord {
            id: NodeId::from_index(index),
            fixed_flow: true,
            fixed_pressure: false,
        }
    }

    fn pressure_node(index: u32) -> NodeBoundaryRecord {
        NodeBoundaryRecord {
            id: NodeId::from_index(index),
            fixed_flow: false,
            fixed_pressure: true,
        }
    }

    fn cosine() -> BoundaryProfile {
        BoundaryProfile::cosine(100.0, 20.0, 1.0).unwrap()
    }

    #[test]
    fn flow_inlet_selects_flow_fixed_nodes() {
        let records = [flow_node(0), pressure_node(1)];
        let driver = InletDriver::new(InletMode::Flow, cosine(), None, &records).unwrap();
        assert_eq!(driver.nodes(), &[NodeId::from_index(0)]);
    }

    #[test]
    fn no_fixed_nodes_is_fatal() {
        let records = [pressure_node(0)];
        let err = InletDriver::new(InletMode::Flow, cosine(), None, &records).unwrap_err();
        assert!(matches!(err, BoundaryError::NoFixedInletNodes { mode: "flow" }));
    }

    #[test]
    fn ambiguous_node_is_rejected() {
        let records = [NodeBoundaryRecord {
            id: NodeId::from_index(3),
            fixed_flow: true,
            fixed_pressure: true,
        }];
        let err = InletDriver::new(InletMode::Flow, cosine(), None, &records).unwrap_err();
        assert!(matches!(err, BoundaryError::AmbiguousInletNode { node: 3 }));
    }

    #[test]
    fn pressure_inlet_requires_tube_law() {
        let records = [pressure_node(0)];
        let err =
            InletDriver::new(InletMode::Pressure, cosine(), None, &records).unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidArg { .. }));
    }

    #[test]
    fn pressure_inlet_area_update_is_stable_at_diastole() {
        let law = ElasticTubeLaw::new(1.0e-5, 50.0, 10_000.0).unwrap();
        let records = [pressure_node(0)];
        let driver =
            InletDriver::new(InletMode::Pressure, cosine(), Some(law), &records).unwrap();
        // At diastolic pressure the tube-law target is a0; starting from a0
        // the extrapolation keeps it there.
        let a = driver.area_update(10_000.0, 1.0e-5).unwrap();
        assert!((a - 1.0e-5).abs() < 1e-17);
    }

    #[test]
    fn cosine_period_follows_the_cycle_length() {
        let records = [flow_node(0)];
        let driver = InletDriver::new(InletMode::Flow, cosine(), None, &records).unwrap();
        // Profile built with a 1.0 s period; a 0.5 s cycle re-derives it,
        // so mid-cycle hits the trough and the boundary returns to the peak.
        let trough = driver.value_at(0.25, 0.5).unwrap();
        assert!((trough - 80.0).abs() < 1e-12);
        let peak = driver.value_at(0.5, 0.5).unwrap();
        assert!((peak - 120.0).abs() < 1e-12);
    }

    #[test]
    fn tabulated_profile_wraps_modulo_cycle() {
        let table = crate::WaveformTable::new(&[(0.0, 1.0), (0.5, 3.0), (1.0, 1.0)]).unwrap();
        let records = [flow_node(0)];
        let driver = InletDriver::new(
            InletMode::Flow,
            BoundaryProfile::Tabulated { table },
            None,
            &records,
        )
        .unwrap();
        let v0 = driver.value_at(0.5, 1.0).unwrap();
        let v1 = driver.value_at(2.5, 1.0).unwrap();
        assert_eq!(v0, v1);
    }
}
