//! Run configuration schema definitions.
//!
//! Scalar fields carry their unit in the name (`_s`, `_m2`, `_mmhg`);
//! clinical pressures are configured in mmHg and converted to SI where the
//! solvers need them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub version: u32,
    pub name: String,
    pub artery: ArteryDef,
    pub cardiac: CardiacDef,
    pub stepping: SteppingDef,
    #[serde(default)]
    pub coupling: CouplingDef,
    pub inlet: InletDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catheter: Option<CatheterDef>,
    #[serde(default)]
    pub output: OutputDef,
}

/// Which vessel segment of the full network this run simulates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArteryDef {
    pub kind: ArteryKind,
    /// First node ID of the segment within the network mesh.
    pub first_node_id: u32,
    /// Last node ID of the segment (inclusive).
    pub last_node_id: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArteryKind {
    Coronary,
    Aorta,
    Femoral,
    Carotid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardiacDef {
    /// Number of cardiac cycles to simulate.
    pub cycles: u32,
    /// Nominal cycle length in seconds; may be adjusted by convergence
    /// detection when `adjust_cycle_length` is set.
    pub cycle_length_s: f64,
    pub systolic_mmhg: f64,
    pub diastolic_mmhg: f64,
    /// Venous reference pressure added back during 1D pressure recovery.
    #[serde(default)]
    pub venous_mmhg: f64,
    #[serde(default)]
    pub adjust_cycle_length: bool,
}

impl CardiacDef {
    pub fn systolic_pa(&self) -> f64 {
        hf_core::units::mmhg_to_pa(self.systolic_mmhg)
    }

    pub fn diastolic_pa(&self) -> f64 {
        hf_core::units::mmhg_to_pa(self.diastolic_mmhg)
    }

    pub fn venous_pa(&self) -> f64 {
        hf_core::units::mmhg_to_pa(self.venous_mmhg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SteppingDef {
    /// Fixed timestep, also the fallback when step size control is off.
    pub dt_s: f64,
    /// Adaptive timestep estimation from the 1D mesh (CFL-like).
    #[serde(default)]
    pub step_size_control: bool,
    #[serde(default = "default_cfl")]
    pub cfl: f64,
    /// 1D steps per 3D advance.
    #[serde(default = "default_sub_step_period")]
    pub sub_step_period: usize,
    /// Safety limit on total steps.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouplingDef {
    /// Couple a 3D perfusion domain to the 1D network.
    pub enable_3d: bool,
    /// Cardiac cycle index (1-based) at which cross-feedback begins; the
    /// earlier cycles let the pure-1D flow stabilize.
    #[serde(default = "default_couple_after_cycle")]
    pub couple_after_cycle: u32,
}

impl Default for CouplingDef {
    fn default() -> Self {
        Self {
            enable_3d: false,
            couple_after_cycle: default_couple_after_cycle(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InletDef {
    pub mode: InletModeDef,
    pub profile: ProfileDef,
    /// Required for pressure-driven inlets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tube_law: Option<TubeLawDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InletModeDef {
    Flow,
    Pressure,
}

/// Inlet waveform selection. The cosine period is the cardiac cycle
/// length; it is not repeated here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ProfileDef {
    Parabolic { p1: f64, p2: f64, p3: f64 },
    Cosine { p1: f64, p2: f64 },
    Tabulated { points: Vec<(f64, f64)> },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TubeLawDef {
    pub a0_m2: f64,
    pub beta: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatheterDef {
    pub enabled: bool,
    /// Centerline geometry the catheter is swept along.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centerline_path: Option<PathBuf>,
    #[serde(default = "default_catheter_diameter")]
    pub diameter_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputDef {
    /// Tabular text results when true, binary mesh-format results when
    /// false (written through the external mesh writer).
    #[serde(default = "default_true")]
    pub ascii: bool,
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    /// Write every N-th step (decimation).
    #[serde(default = "default_write_every")]
    pub write_every: usize,
}

impl Default for OutputDef {
    fn default() -> Self {
        Self {
            ascii: default_true(),
            directory: default_output_dir(),
            write_every: default_write_every(),
        }
    }
}

fn default_cfl() -> f64 {
    0.9
}

fn default_sub_step_period() -> usize {
    3
}

fn default_max_steps() -> usize {
    1_000_000
}

fn default_couple_after_cycle() -> u32 {
    1
}

fn default_catheter_diameter() -> f64 {
    6e-4
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_write_every() -> usize {
    10
}

impl RunConfig {
    /// Small coronary run used by tests and the CLI documentation.
    pub fn example() -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: "coronary-demo".to_string(),
            artery: ArteryDef {
                kind: ArteryKind::Coronary,
                first_node_id: 0,
                last_node_id: 24,
            },
            cardiac: CardiacDef {
                cycles: 4,
                cycle_length_s: 0.8,
                systolic_mmhg: 120.0,
                diastolic_mmhg: 80.0,
                venous_mmhg: 5.0,
                adjust_cycle_length: false,
            },
            stepping: SteppingDef {
                dt_s: 1e-4,
                step_size_control: false,
                cfl: default_cfl(),
                sub_step_period: default_sub_step_period(),
                max_steps: default_max_steps(),
            },
            coupling: CouplingDef {
                enable_3d: true,
                couple_after_cycle: 2,
            },
            inlet: InletDef {
                mode: InletModeDef::Flow,
                profile: ProfileDef::Cosine { p1: 8e-6, p2: 4e-6 },
                tube_law: None,
            },
            catheter: None,
            output: OutputDef::default(),
        }
    }
}
