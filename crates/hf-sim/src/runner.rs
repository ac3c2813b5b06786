//! The coupled time-marching loop.
//!
//! Single-threaded, synchronous, step-driven. Each step runs strictly in
//! sequence: abort check, inlet update, 1D solve + pressure recovery,
//! conditional 3D advance with boundary exchange, result write, cycle
//! boundary handling, timestep re-estimate. No step is ever retried; a
//! failed step aborts the whole run so cycle statistics stay consistent.

use crate::clock::{SimulationClock, StepPolicy};
use crate::convergence::CycleConvergenceMonitor;
use crate::coupling::CouplingEngine;
use crate::error::{SimError, SimResult};
use crate::observer::{CycleReport, NodeSample, ResultSink, RunSummary, Snapshot, StepObserver,
                      StepResult};
use crate::solvers::{ArterialNetwork, PerfusionDomain};
use hf_boundary::{InletDriver, InletMode};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Options for a coupled run.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Cardiac cycles to simulate.
    pub cycles: u32,
    pub policy: StepPolicy,
    /// Write a snapshot every N-th step (decimation).
    pub write_every: usize,
    /// Safety limit on total steps.
    pub max_steps: usize,
    /// Venous reference pressure for 1D pressure recovery, Pa.
    pub reference_pressure_pa: f64,
    /// Checked once at the top of every step; set by the caller for
    /// graceful early termination.
    pub abort: Option<Arc<AtomicBool>>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            cycles: 1,
            policy: StepPolicy::Fixed { dt_s: 1e-4 },
            write_every: 10,
            max_steps: 1_000_000,
            reference_pressure_pa: 0.0,
            abort: None,
        }
    }
}

/// All per-run state, owned explicitly and passed through the loop.
/// No process-wide singletons.
pub struct SimulationContext<N, D> {
    pub clock: SimulationClock,
    pub inlet: InletDriver,
    pub engine: CouplingEngine,
    pub monitor: CycleConvergenceMonitor,
    pub network: N,
    pub domain: D,
}

/// Run the coupled simulation to completion.
///
/// The observer receives pure per-step and per-cycle values; the sink
/// receives decimated snapshots. Both are injected so the loop itself
/// stays free of I/O.
pub fn run_coupled<N: ArterialNetwork, D: PerfusionDomain>(
    ctx: &mut SimulationContext<N, D>,
    opts: &RunOptions,
    sink: &mut dyn ResultSink,
    observer: &mut dyn StepObserver,
) -> SimResult<RunSummary> {
    if opts.cycles == 0 {
        return Err(SimError::InvalidArg {
            what: "cycles must be at least 1",
        });
    }
    if opts.write_every == 0 {
        return Err(SimError::InvalidArg {
            what: "write_every must be at least 1",
        });
    }
    if opts.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }

    ctx.network.initialize()?;
    if ctx.engine.is_coupled() {
        ctx.domain.initialize()?;
    }
    ctx.engine.on_cycle_start(ctx.clock.cycle_index());

    tracing::info!(
        cycles = opts.cycles,
        coupled = ctx.engine.is_coupled(),
        cycle_length_s = ctx.clock.cycle_length(),
        "starting coupled run"
    );

    let mut summary = RunSummary::default();

    while ctx.clock.cycle_index() <= opts.cycles {
        // Single checked abort point per step.
        if let Some(flag) = &opts.abort
            && flag.load(Ordering::Relaxed)
        {
            tracing::info!(step = ctx.clock.step_index(), "run aborted by caller");
            summary.aborted = true;
            break;
        }

        if ctx.clock.step_index() >= opts.max_steps {
            tracing::warn!(max_steps = opts.max_steps, "step limit reached");
            break;
        }

        let dt = ctx.clock.estimate_dt(&opts.policy, &ctx.network);
        let t = ctx.clock.current_time();

        // Inlet boundary update.
        let inlet_value = ctx.inlet.value_at(t, ctx.clock.cycle_length())?;
        hf_core::ensure_finite(inlet_value, "inlet boundary value")?;
        apply_inlet(ctx, inlet_value)?;

        // 1D advance and pressure recovery.
        ctx.network.solve_step(t)?;
        ctx.network.compute_pressure(opts.reference_pressure_pa)?;

        // Conditional 3D advance with boundary exchange.
        let domain_solved =
            ctx.engine
                .step(ctx.clock.step_index(), t, &mut ctx.network, &mut ctx.domain)?;

        ctx.clock.advance();
        summary.steps = ctx.clock.step_index();

        observer.on_step(&StepResult {
            time_s: ctx.clock.current_time(),
            total_time_s: ctx.clock.total_time(),
            dt_s: dt,
            step: ctx.clock.step_index(),
            cycle: ctx.clock.cycle_index(),
            inlet_value,
            mode: ctx.engine.mode(),
            domain_solved,
        });

        if ctx.clock.step_index() % opts.write_every == 0 {
            let snapshot = build_snapshot(ctx, inlet_value)?;
            sink.write_snapshot(&snapshot)?;
        }

        if let Some(boundary) = ctx.clock.roll_cycle() {
            let ffr = ctx.engine.on_cycle_boundary(boundary.completed_cycle);
            let new_length = ctx
                .monitor
                .check(&mut ctx.network, ctx.clock.cycle_length())?;
            ctx.clock.set_cycle_length(new_length)?;
            ctx.engine.on_cycle_start(boundary.new_cycle);

            if let Some(ffr) = &ffr {
                tracing::info!(
                    cycle = boundary.completed_cycle,
                    ffr = ffr.ffr,
                    mean_flow_m3_s = ffr.mean_flow_m3_s,
                    "cardiac cycle completed"
                );
            } else {
                tracing::info!(cycle = boundary.completed_cycle, "cardiac cycle completed");
            }

            observer.on_cycle(&CycleReport {
                cycle: boundary.completed_cycle,
                cycle_length_s: new_length,
                ffr,
            });

            summary.cycles_completed = boundary.completed_cycle;
            if ffr.is_some() {
                summary.last_ffr = ffr;
            }
        }
    }

    summary.final_cycle_length_s = ctx.clock.cycle_length();
    Ok(summary)
}

fn apply_inlet<N: ArterialNetwork, D: PerfusionDomain>(
    ctx: &mut SimulationContext<N, D>,
    inlet_value: f64,
) -> SimResult<()> {
    match ctx.inlet.mode() {
        InletMode::Flow => {
            for &node in ctx.inlet.nodes() {
                ctx.network.set_inlet_flow(node, inlet_value)?;
            }
        }
        InletMode::Pressure => {
            for &node in ctx.inlet.nodes() {
                let area_prev = ctx.network.previous_inlet_area(node)?;
                let area = ctx.inlet.area_update(inlet_value, area_prev)?;
                ctx.network.set_inlet_area(node, area)?;
            }
        }
    }
    Ok(())
}

fn build_snapshot<N: ArterialNetwork, D: PerfusionDomain>(
    ctx: &SimulationContext<N, D>,
    inlet_value: f64,
) -> SimResult<Snapshot> {
    let mut inlet_nodes = Vec::with_capacity(ctx.inlet.nodes().len());
    for &node in ctx.inlet.nodes() {
        inlet_nodes.push(NodeSample {
            node,
            area_m2: ctx.network.inlet_area(node)?,
        });
    }
    Ok(Snapshot {
        time_s: ctx.clock.current_time(),
        step: ctx.clock.step_index(),
        cycle: ctx.clock.cycle_index(),
        inlet_value,
        inlet_pressure_pa: ctx.network.inlet_pressure(),
        outlet_pressure_pa: ctx.network.outlet_pressure(),
        outlet_flow_m3_s: ctx.network.outlet_flow(),
        inlet_nodes,
    })
}
