use clap::{Parser, Subcommand};
use hf_boundary::{BoundaryProfile, ElasticTubeLaw, InletDriver, InletMode, WaveformTable};
use hf_config::schema::{InletModeDef, ProfileDef, RunConfig};
use hf_results::{
    CycleRecord, RunManifest, RunStore, SummaryLog, TabularSink, compute_run_id,
};
use hf_sim::{
    ArterialNetwork, CouplingEngine, CycleConvergenceMonitor, CycleReport, NullSink, RunOptions,
    RunSummary,
    SimulationClock, SimulationContext, StepObserver, StepPolicy, StepResult, SurrogateDomain,
    SurrogateNetwork, run_coupled,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Version tag of the bundled surrogate backend, hashed into run IDs.
const SOLVER_VERSION: &str = "surrogate-0.1.0";
/// Minimum element length the surrogate reports for CFL estimates.
const SURROGATE_MIN_LENGTH_M: f64 = 1e-3;
/// Lumped resistance of the surrogate perfusion bed, Pa·s/m³.
const DOMAIN_RESISTANCE: f64 = 1.2e8;

#[derive(Parser)]
#[command(name = "hf-cli")]
#[command(about = "hemoflow CLI - 1D-3D coupled cardiovascular flow simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a run configuration file
    Validate {
        /// Path to the run configuration YAML file
        config_path: PathBuf,
    },
    /// Run a coupled simulation with the surrogate backend
    Run {
        /// Path to the run configuration YAML file
        config_path: PathBuf,
        /// Do not record the run in the run store
        #[arg(long)]
        no_store: bool,
    },
    /// List stored runs for a configuration
    Runs {
        /// Path to the run configuration YAML file
        config_path: PathBuf,
    },
    /// Show details of a stored run
    ShowRun {
        /// Path to the run configuration YAML file
        config_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export per-cycle records from a stored run as CSV
    Export {
        /// Path to the run configuration YAML file
        config_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a stored run
    DeleteRun {
        /// Path to the run configuration YAML file
        config_path: PathBuf,
        /// Run ID to delete
        run_id: String,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] hf_config::ConfigError),

    #[error(transparent)]
    Boundary(#[from] hf_boundary::BoundaryError),

    #[error(transparent)]
    Sim(#[from] hf_sim::SimError),

    #[error(transparent)]
    Results(#[from] hf_results::ResultsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Run {
            config_path,
            no_store,
        } => cmd_run(&config_path, !no_store),
        Commands::Runs { config_path } => cmd_runs(&config_path),
        Commands::ShowRun {
            config_path,
            run_id,
        } => cmd_show_run(&config_path, &run_id),
        Commands::Export {
            config_path,
            run_id,
            output,
        } => cmd_export(&config_path, &run_id, output.as_deref()),
        Commands::DeleteRun {
            config_path,
            run_id,
        } => cmd_delete_run(&config_path, &run_id),
    }
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = hf_config::load_yaml(config_path)?;
    println!("✓ Configuration is valid");
    println!(
        "  {} - {:?} artery, {} cycles of {:.3} s, {}",
        config.name,
        config.artery.kind,
        config.cardiac.cycles,
        config.cardiac.cycle_length_s,
        if config.coupling.enable_3d {
            "1D-3D coupled"
        } else {
            "1D only"
        }
    );
    Ok(())
}

/// Textual progress bar, re-rendered in place on the terminal.
struct CliProgress {
    total_time_s: f64,
    started: Instant,
    last_emit: Instant,
    last_fraction: f64,
    cycles: Vec<CycleReport>,
}

impl CliProgress {
    fn new(total_time_s: f64) -> Self {
        let now = Instant::now();
        Self {
            total_time_s,
            started: now,
            last_emit: now,
            last_fraction: -1.0,
            cycles: Vec::new(),
        }
    }
}

impl StepObserver for CliProgress {
    fn on_step(&mut self, result: &StepResult) {
        let fraction = (result.total_time_s / self.total_time_s).min(1.0);
        let emit_now = (fraction - self.last_fraction).abs() >= 0.005
            || self.last_emit.elapsed().as_millis() >= 100;
        if emit_now {
            let width = 28usize;
            let filled = ((fraction * width as f64).round() as usize).min(width);
            print!(
                "\r[{}{}] {:>6.2}%  cycle={}  step={}  t={:.3}s  elapsed={:.1}s",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled)),
                fraction * 100.0,
                result.cycle,
                result.step,
                result.total_time_s,
                self.started.elapsed().as_secs_f64()
            );
            let _ = io::stdout().flush();
            self.last_fraction = fraction;
            self.last_emit = Instant::now();
        }
    }

    fn on_cycle(&mut self, report: &CycleReport) {
        self.cycles.push(*report);
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn build_profile(config: &RunConfig) -> CliResult<BoundaryProfile> {
    Ok(match &config.inlet.profile {
        ProfileDef::Parabolic { p1, p2, p3 } => BoundaryProfile::Parabolic {
            p1: *p1,
            p2: *p2,
            p3: *p3,
        },
        ProfileDef::Cosine { p1, p2 } => {
            BoundaryProfile::cosine(*p1, *p2, config.cardiac.cycle_length_s)?
        }
        ProfileDef::Tabulated { points } => BoundaryProfile::Tabulated {
            table: WaveformTable::new(points)?,
        },
    })
}

fn build_context(
    config: &RunConfig,
) -> CliResult<SimulationContext<SurrogateNetwork, SurrogateDomain>> {
    let node_count = (config.artery.last_node_id - config.artery.first_node_id + 1) as usize;
    let network = match config.inlet.mode {
        InletModeDef::Flow => SurrogateNetwork::flow_inlet(node_count, SURROGATE_MIN_LENGTH_M),
        InletModeDef::Pressure => {
            SurrogateNetwork::pressure_inlet(node_count, SURROGATE_MIN_LENGTH_M)
        }
    };

    let tube_law = match &config.inlet.tube_law {
        Some(def) => Some(ElasticTubeLaw::new(
            def.a0_m2,
            def.beta,
            config.cardiac.diastolic_pa(),
        )?),
        None => None,
    };
    let mode = match config.inlet.mode {
        InletModeDef::Flow => InletMode::Flow,
        InletModeDef::Pressure => InletMode::Pressure,
    };
    let inlet = InletDriver::new(mode, build_profile(config)?, tube_law, &network.inlet_records())?;

    Ok(SimulationContext {
        clock: SimulationClock::new(config.stepping.dt_s, config.cardiac.cycle_length_s)?,
        inlet,
        engine: CouplingEngine::new(
            config.coupling.enable_3d,
            config.stepping.sub_step_period,
            config.coupling.couple_after_cycle,
        )?,
        monitor: CycleConvergenceMonitor::new(config.cardiac.adjust_cycle_length),
        network,
        domain: SurrogateDomain::new(DOMAIN_RESISTANCE),
    })
}

/// Validate the parsed configuration and wire up the simulation context.
///
/// Any rejection is appended to the summary log before it is returned, so
/// a run that never starts still leaves a trace next to its outputs.
fn start_context(
    config: &RunConfig,
    summary_log: &mut SummaryLog,
) -> CliResult<SimulationContext<SurrogateNetwork, SurrogateDomain>> {
    let checked = hf_config::validate_config(config)
        .map_err(hf_config::ConfigError::from)
        .map_err(CliError::from)
        .and_then(|()| build_context(config));
    match checked {
        Ok(ctx) => Ok(ctx),
        Err(e) => {
            summary_log.failure(&e.to_string())?;
            Err(e)
        }
    }
}

fn cmd_run(config_path: &Path, store_run: bool) -> CliResult<()> {
    let config = hf_config::read_yaml(config_path)?;
    println!("Running simulation: {}", config.name);
    println!(
        "  {} cycles of {:.3} s, dt = {:.1e} s, {}",
        config.cardiac.cycles,
        config.cardiac.cycle_length_s,
        config.stepping.dt_s,
        if config.coupling.enable_3d {
            format!(
                "3D coupled from cycle {}",
                config.coupling.couple_after_cycle
            )
        } else {
            "1D only".to_string()
        }
    );

    // The summary log is opened before validation so a rejected
    // configuration still leaves a persisted failure record.
    std::fs::create_dir_all(&config.output.directory)?;
    let summary_path = config
        .output
        .directory
        .join(format!("{}_summary.txt", config.name));
    let mut summary_log = SummaryLog::create(&summary_path)?;

    let mut ctx = match start_context(&config, &mut summary_log) {
        Ok(ctx) => ctx,
        Err(e) => {
            summary_log.finish()?;
            eprintln!("✗ {e}");
            eprintln!("  Run summary: {}", summary_path.display());
            return Err(e);
        }
    };
    let policy = if config.stepping.step_size_control {
        StepPolicy::Adaptive {
            cfl: config.stepping.cfl,
        }
    } else {
        StepPolicy::Fixed {
            dt_s: config.stepping.dt_s,
        }
    };
    let opts = RunOptions {
        cycles: config.cardiac.cycles,
        policy,
        write_every: config.output.write_every,
        max_steps: config.stepping.max_steps,
        reference_pressure_pa: config.cardiac.venous_pa(),
        abort: None,
    };

    let run_id = compute_run_id(&config, SOLVER_VERSION);
    summary_log.header(
        &config.name,
        &run_id,
        config.cardiac.cycles,
        config.coupling.enable_3d,
    )?;

    let total_time_s = config.cardiac.cycles as f64 * config.cardiac.cycle_length_s;
    let mut progress = CliProgress::new(total_time_s);

    let run_result = if config.output.ascii {
        let tabular_path = config
            .output
            .directory
            .join(format!("{}.cvpr", config.name));
        let mut sink = TabularSink::create(&tabular_path)?;
        let result = run_coupled(&mut ctx, &opts, &mut sink, &mut progress);
        sink.finish()?;
        clear_progress_line();
        println!("  Tabular results: {}", tabular_path.display());
        result
    } else {
        tracing::warn!(
            "mesh output requires an embedding mesh writer; snapshots are not persisted"
        );
        let result = run_coupled(&mut ctx, &opts, &mut NullSink, &mut progress);
        clear_progress_line();
        result
    };

    let summary = match run_result {
        Ok(summary) => summary,
        Err(e) => {
            summary_log.failure(&e.to_string())?;
            summary_log.finish()?;
            return Err(e.into());
        }
    };

    let records: Vec<CycleRecord> = progress.cycles.iter().map(CycleRecord::from).collect();
    for record in &records {
        summary_log.cycle(record)?;
    }
    summary_log.footer(&summary)?;
    summary_log.finish()?;
    println!("  Run summary:     {}", summary_path.display());

    if store_run {
        let store = RunStore::for_config(config_path)?;
        if store.has_run(&run_id) {
            println!("  Replacing stored run {run_id}");
        }
        store.save_run(&manifest_for(&config, &run_id, &summary), &records)?;
    }

    println!("✓ Simulation completed: {run_id}");
    print_run_outcome(&summary);
    Ok(())
}

fn manifest_for(config: &RunConfig, run_id: &str, summary: &RunSummary) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        config_name: config.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        solver_version: SOLVER_VERSION.to_string(),
        coupled: config.coupling.enable_3d,
        cycles: summary.cycles_completed,
        steps: summary.steps,
        aborted: summary.aborted,
    }
}

fn print_run_outcome(summary: &RunSummary) {
    println!(
        "  Cycles: {}  Steps: {}",
        summary.cycles_completed, summary.steps
    );
    if summary.aborted {
        println!("  Run was aborted before completion");
    }
    if let Some(ffr) = &summary.last_ffr {
        println!("  Final FFR: {:.3}", ffr.ffr);
    }
}

fn cmd_runs(config_path: &Path) -> CliResult<()> {
    let config = hf_config::load_yaml(config_path)?;
    let store = RunStore::for_config(config_path)?;
    let runs = store.list_runs(&config.name)?;

    if runs.is_empty() {
        println!("No stored runs found for configuration: {}", config.name);
    } else {
        println!("Stored runs for '{}':", config.name);
        for manifest in runs {
            println!(
                "  {} ({}, {} cycles)",
                manifest.run_id, manifest.timestamp, manifest.cycles
            );
        }
    }
    Ok(())
}

fn cmd_show_run(config_path: &Path, run_id: &str) -> CliResult<()> {
    let store = RunStore::for_config(config_path)?;
    let manifest = store.load_manifest(run_id)?;
    let records = store.load_cycles(run_id)?;

    println!("Run {}", manifest.run_id);
    println!("  Config:    {}", manifest.config_name);
    println!("  Timestamp: {}", manifest.timestamp);
    println!("  Solver:    {}", manifest.solver_version);
    println!(
        "  Mode:      {}",
        if manifest.coupled {
            "1D-3D coupled"
        } else {
            "1D only"
        }
    );
    println!("  Cycles: {}  Steps: {}", manifest.cycles, manifest.steps);

    println!("\nPer-cycle records:");
    for record in records {
        match record.ffr {
            Some(ffr) => println!(
                "  cycle {:>3}  length {:.4} s  FFR {:.3}",
                record.cycle, record.cycle_length_s, ffr.ffr
            ),
            None => println!(
                "  cycle {:>3}  length {:.4} s  (not actively coupled)",
                record.cycle, record.cycle_length_s
            ),
        }
    }
    Ok(())
}

fn cmd_export(config_path: &Path, run_id: &str, output: Option<&Path>) -> CliResult<()> {
    let store = RunStore::for_config(config_path)?;
    let records = store.load_cycles(run_id)?;

    let mut csv = String::from(
        "cycle,cycle_length_s,mean_flow_m3_s,mean_proximal_pressure_pa,\
         mean_distal_pressure_pa,ffr\n",
    );
    for record in &records {
        match &record.ffr {
            Some(ffr) => csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                record.cycle,
                record.cycle_length_s,
                ffr.mean_flow_m3_s,
                ffr.mean_proximal_pressure_pa,
                ffr.mean_distal_pressure_pa,
                ffr.ffr
            )),
            None => csv.push_str(&format!(
                "{},{},,,,\n",
                record.cycle, record.cycle_length_s
            )),
        }
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} cycle records to {}",
            records.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn cmd_delete_run(config_path: &Path, run_id: &str) -> CliResult<()> {
    let store = RunStore::for_config(config_path)?;
    if !store.has_run(run_id) {
        return Err(hf_results::ResultsError::RunNotFound {
            run_id: run_id.to_string(),
        }
        .into());
    }
    store.delete_run(run_id)?;
    println!("✓ Deleted run {run_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_config_leaves_a_failure_record() {
        let mut config = RunConfig::example();
        config.stepping.dt_s = -1.0;

        let path = std::env::temp_dir().join("hf_cli_rejected_config_summary.txt");
        let mut log = SummaryLog::create(&path).unwrap();
        assert!(start_context(&config, &mut log).is_err());
        log.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("run failed"));
        assert!(content.contains("stepping.dt_s"));
    }

    #[test]
    fn coupling_that_never_activates_is_also_recorded() {
        let mut config = RunConfig::example();
        config.coupling.couple_after_cycle = config.cardiac.cycles + 1;

        let path = std::env::temp_dir().join("hf_cli_rejected_coupling_summary.txt");
        let mut log = SummaryLog::create(&path).unwrap();
        assert!(start_context(&config, &mut log).is_err());
        log.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("run failed"));
    }
}
