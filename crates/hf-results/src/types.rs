//! Result data types.

use hf_sim::{CycleReport, FfrSummary};
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    /// Name of the run configuration this run was produced from.
    pub config_name: String,
    pub timestamp: String,
    pub solver_version: String,
    pub coupled: bool,
    pub cycles: u32,
    pub steps: usize,
    pub aborted: bool,
}

/// One cardiac cycle as persisted to the JSONL record stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle: u32,
    pub cycle_length_s: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffr: Option<FfrRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FfrRecord {
    pub mean_flow_m3_s: f64,
    pub mean_proximal_pressure_pa: f64,
    pub mean_distal_pressure_pa: f64,
    pub ffr: f64,
}

impl From<FfrSummary> for FfrRecord {
    fn from(s: FfrSummary) -> Self {
        Self {
            mean_flow_m3_s: s.mean_flow_m3_s,
            mean_proximal_pressure_pa: s.mean_proximal_pressure_pa,
            mean_distal_pressure_pa: s.mean_distal_pressure_pa,
            ffr: s.ffr,
        }
    }
}

impl From<&CycleReport> for CycleRecord {
    fn from(r: &CycleReport) -> Self {
        Self {
            cycle: r.cycle,
            cycle_length_s: r.cycle_length_s,
            ffr: r.ffr.map(FfrRecord::from),
        }
    }
}
