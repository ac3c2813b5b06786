//! Pure-1D runs: the 3D domain must never be touched.

use hf_boundary::{BoundaryProfile, InletDriver, InletMode};
use hf_sim::{
    ArterialNetwork, CouplingEngine, CycleConvergenceMonitor, NullObserver, ResultSink,
    RunOptions, SimResult, SimulationClock, SimulationContext, Snapshot, StepObserver,
    StepPolicy, StepResult, SurrogateDomain, SurrogateNetwork, run_coupled,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// Dyadic timestep so per-cycle step counts are exact.
const DT: f64 = 1.0 / 1024.0;

struct CountingSink {
    snapshots: Vec<Snapshot>,
}

impl ResultSink for CountingSink {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> SimResult<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }
}

struct StepRecorder {
    steps: Vec<StepResult>,
}

impl StepObserver for StepRecorder {
    fn on_step(&mut self, result: &StepResult) {
        self.steps.push(*result);
    }
}

fn uncoupled_context(cycle_length_s: f64) -> SimulationContext<SurrogateNetwork, SurrogateDomain> {
    let network = SurrogateNetwork::flow_inlet(4, 1e-3);
    let inlet = InletDriver::new(
        InletMode::Flow,
        BoundaryProfile::cosine(8e-6, 4e-6, cycle_length_s).unwrap(),
        None,
        &network.inlet_records(),
    )
    .unwrap();
    SimulationContext {
        clock: SimulationClock::new(DT, cycle_length_s).unwrap(),
        inlet,
        engine: CouplingEngine::new(false, 3, 1).unwrap(),
        monitor: CycleConvergenceMonitor::new(false),
        network,
        domain: SurrogateDomain::new(1.2e8),
    }
}

#[test]
fn ten_uncoupled_steps_never_solve_the_domain() {
    // One cycle of 10 fixed steps.
    let mut ctx = uncoupled_context(10.0 * DT);
    let opts = RunOptions {
        cycles: 1,
        policy: StepPolicy::Fixed { dt_s: DT },
        write_every: 10,
        ..RunOptions::default()
    };

    let mut sink = CountingSink { snapshots: vec![] };
    let summary = run_coupled(&mut ctx, &opts, &mut sink, &mut NullObserver).unwrap();

    assert_eq!(summary.steps, 10);
    assert_eq!(summary.cycles_completed, 1);
    assert_eq!(ctx.domain.solve_count(), 0);
    assert!(summary.last_ffr.is_none());
}

#[test]
fn snapshots_are_decimated() {
    let mut ctx = uncoupled_context(10.0 * DT);
    let opts = RunOptions {
        cycles: 1,
        policy: StepPolicy::Fixed { dt_s: DT },
        write_every: 5,
        ..RunOptions::default()
    };

    let mut sink = CountingSink { snapshots: vec![] };
    run_coupled(&mut ctx, &opts, &mut sink, &mut NullObserver).unwrap();

    assert_eq!(sink.snapshots.len(), 2);
    assert_eq!(sink.snapshots[0].step, 5);
    assert_eq!(sink.snapshots[1].step, 10);
}

#[test]
fn cosine_inlet_starts_at_peak() {
    let mut ctx = uncoupled_context(10.0 * DT);
    let opts = RunOptions {
        cycles: 1,
        policy: StepPolicy::Fixed { dt_s: DT },
        ..RunOptions::default()
    };

    let mut recorder = StepRecorder { steps: vec![] };
    let mut sink = CountingSink { snapshots: vec![] };
    run_coupled(&mut ctx, &opts, &mut sink, &mut recorder).unwrap();

    // First step sees t = 0, where the cosine is p1 + p2.
    assert!((recorder.steps[0].inlet_value - 1.2e-5).abs() < 1e-18);
}

#[test]
fn abort_flag_stops_the_run_cleanly() {
    let mut ctx = uncoupled_context(0.8);
    let abort = Arc::new(AtomicBool::new(false));
    abort.store(true, Ordering::Relaxed);
    let opts = RunOptions {
        cycles: 4,
        policy: StepPolicy::Fixed { dt_s: DT },
        abort: Some(abort),
        ..RunOptions::default()
    };

    let mut sink = CountingSink { snapshots: vec![] };
    let summary = run_coupled(&mut ctx, &opts, &mut sink, &mut NullObserver).unwrap();

    assert!(summary.aborted);
    assert_eq!(summary.steps, 0);
}

#[test]
fn max_steps_is_a_hard_limit() {
    let mut ctx = uncoupled_context(0.8);
    let opts = RunOptions {
        cycles: 4,
        policy: StepPolicy::Fixed { dt_s: DT },
        max_steps: 25,
        ..RunOptions::default()
    };

    let mut sink = CountingSink { snapshots: vec![] };
    let summary = run_coupled(&mut ctx, &opts, &mut sink, &mut NullObserver).unwrap();

    assert_eq!(summary.steps, 25);
    assert_eq!(summary.cycles_completed, 0);
}
