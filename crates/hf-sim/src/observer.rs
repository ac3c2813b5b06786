//! Observer and sink seams for the step loop.
//!
//! The loop itself returns pure values; printing, progress bars and file
//! output are injected through these traits.

use crate::coupling::{CouplingMode, FfrSummary};
use crate::error::SimResult;
use hf_core::NodeId;

/// Pure per-step outcome handed to the observer.
#[derive(Clone, Copy, Debug)]
pub struct StepResult {
    pub time_s: f64,
    pub total_time_s: f64,
    pub dt_s: f64,
    /// Step counter after the advance.
    pub step: usize,
    pub cycle: u32,
    /// Inlet waveform value applied this step (flow or pressure).
    pub inlet_value: f64,
    pub mode: CouplingMode,
    /// Whether the 3D domain was advanced this step.
    pub domain_solved: bool,
}

/// Pure per-cycle outcome handed to the observer.
#[derive(Clone, Copy, Debug)]
pub struct CycleReport {
    pub cycle: u32,
    /// Cycle length in effect for the next cycle.
    pub cycle_length_s: f64,
    /// Present while actively coupled.
    pub ffr: Option<FfrSummary>,
}

/// Final outcome of a run.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunSummary {
    pub steps: usize,
    pub cycles_completed: u32,
    pub final_cycle_length_s: f64,
    pub last_ffr: Option<FfrSummary>,
    pub aborted: bool,
}

/// Injected observer; all methods default to no-ops.
pub trait StepObserver {
    fn on_step(&mut self, _result: &StepResult) {}
    fn on_cycle(&mut self, _report: &CycleReport) {}
}

/// Observer that ignores everything.
pub struct NullObserver;

impl StepObserver for NullObserver {}

/// One sampled inlet node in a snapshot.
#[derive(Clone, Copy, Debug)]
pub struct NodeSample {
    pub node: NodeId,
    pub area_m2: f64,
}

/// Per-step result snapshot persisted by a sink.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub time_s: f64,
    pub step: usize,
    pub cycle: u32,
    pub inlet_value: f64,
    pub inlet_pressure_pa: f64,
    pub outlet_pressure_pa: f64,
    pub outlet_flow_m3_s: f64,
    pub inlet_nodes: Vec<NodeSample>,
}

/// Opaque result sink; tabular text and mesh-format writers both satisfy
/// this, and the loop never depends on which is active.
pub trait ResultSink {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> SimResult<()>;
}

/// Sink that drops everything (dry runs).
pub struct NullSink;

impl ResultSink for NullSink {
    fn write_snapshot(&mut self, _snapshot: &Snapshot) -> SimResult<()> {
        Ok(())
    }
}
