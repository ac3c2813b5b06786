//! Coupled 1D-3D time-stepping core for hemoflow.
//!
//! Provides:
//! - Simulation clock with cardiac-cycle rollover and adaptive/fixed dt
//! - Sub-step counter gating the expensive 3D domain advance
//! - Three-mode coupling engine (uncoupled / staging / actively coupled)
//!   with per-cycle FFR statistics
//! - Cardiac cycle convergence monitor
//! - External solver traits (the 1D network and 3D perfusion domain are
//!   collaborators, not reimplemented here)
//! - The `run_coupled` step loop with injected observer and result sink
//! - A lumped-parameter surrogate backend for dry runs and tests

pub mod clock;
pub mod convergence;
pub mod coupling;
pub mod error;
pub mod observer;
pub mod runner;
pub mod solvers;
pub mod substep;
pub mod surrogate;

// Re-exports for public API
pub use clock::{CycleBoundary, SimulationClock, StepPolicy};
pub use convergence::CycleConvergenceMonitor;
pub use coupling::{CouplingEngine, CouplingMode, CouplingStats, FfrSummary};
pub use error::{SimError, SimResult};
pub use observer::{
    CycleReport, NodeSample, NullObserver, NullSink, ResultSink, RunSummary, Snapshot,
    StepObserver, StepResult,
};
pub use runner::{RunOptions, SimulationContext, run_coupled};
pub use solvers::{ArterialNetwork, PerfusionDomain};
pub use substep::SubStepCounter;
pub use surrogate::{SurrogateDomain, SurrogateNetwork};
