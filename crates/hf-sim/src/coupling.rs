//! Coupling transfer engine.
//!
//! State machine over three modes:
//! - `Uncoupled`: pure 1D, the engine is a no-op
//! - `StagingCoupled`: 1D and 3D both stepping, statistics accumulating,
//!   no cross-feedback yet (warm-up)
//! - `ActivelyCoupled`: full staggered exchange every sub-step cycle
//!
//! Statistics reset atomically at each cardiac-cycle boundary while
//! actively coupled; they must never leak across cycles.

use crate::error::SimResult;
use crate::solvers::{ArterialNetwork, PerfusionDomain};
use crate::substep::SubStepCounter;

/// How the 1D and 3D domains exchange boundary data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CouplingMode {
    Uncoupled,
    StagingCoupled,
    ActivelyCoupled,
}

/// Running accumulators over one cardiac cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CouplingStats {
    flow_sum: f64,
    proximal_pressure_sum: f64,
    distal_pressure_sum: f64,
    sample_count: u64,
}

impl CouplingStats {
    fn accumulate(&mut self, flow_m3_s: f64, proximal_pa: f64, distal_pa: f64) {
        self.flow_sum += flow_m3_s;
        self.proximal_pressure_sum += proximal_pa;
        self.distal_pressure_sum += distal_pa;
        self.sample_count += 1;
    }

    /// All accumulators back to exactly zero, together.
    fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn mean_flow(&self) -> f64 {
        if self.sample_count == 0 {
            0.0
        } else {
            self.flow_sum / self.sample_count as f64
        }
    }

    pub fn mean_proximal_pressure(&self) -> f64 {
        if self.sample_count == 0 {
            0.0
        } else {
            self.proximal_pressure_sum / self.sample_count as f64
        }
    }

    pub fn mean_distal_pressure(&self) -> f64 {
        if self.sample_count == 0 {
            0.0
        } else {
            self.distal_pressure_sum / self.sample_count as f64
        }
    }
}

/// Per-cycle aggregate diagnostics computed at the cycle boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FfrSummary {
    pub cycle: u32,
    pub mean_flow_m3_s: f64,
    pub mean_proximal_pressure_pa: f64,
    pub mean_distal_pressure_pa: f64,
    /// Fractional flow reserve: mean distal over mean proximal pressure.
    pub ffr: f64,
}

/// The staggered coupler between the 1D network and the 3D domain.
#[derive(Clone, Debug)]
pub struct CouplingEngine {
    mode: CouplingMode,
    stats: CouplingStats,
    sub_steps: SubStepCounter,
    cycle_to_couple: bool,
    couple_after_cycle: u32,
    transfers: u64,
}

/// Number of warm-up steps before staging can hand over to active
/// coupling; the first few 1D steps are not trustworthy boundary data.
const STAGING_WARMUP_STEPS: usize = 3;

impl CouplingEngine {
    /// `coupled` selects staging (later active) versus pure-1D operation.
    /// `couple_after_cycle` is the 1-based cycle index at which
    /// cross-feedback may begin.
    pub fn new(
        coupled: bool,
        sub_step_period: usize,
        couple_after_cycle: u32,
    ) -> SimResult<Self> {
        Ok(Self {
            mode: if coupled {
                CouplingMode::StagingCoupled
            } else {
                CouplingMode::Uncoupled
            },
            stats: CouplingStats::default(),
            sub_steps: SubStepCounter::new(sub_step_period)?,
            cycle_to_couple: false,
            couple_after_cycle,
            transfers: 0,
        })
    }

    pub fn mode(&self) -> CouplingMode {
        self.mode
    }

    pub fn is_coupled(&self) -> bool {
        self.mode != CouplingMode::Uncoupled
    }

    pub fn stats(&self) -> &CouplingStats {
        &self.stats
    }

    /// Total cross-feedback exchanges performed so far.
    pub fn transfers(&self) -> u64 {
        self.transfers
    }

    /// Called when a cycle starts (including the first). Arms active
    /// coupling once the configured warm-up cycles have passed.
    pub fn on_cycle_start(&mut self, cycle_index: u32) {
        if self.is_coupled() && cycle_index >= self.couple_after_cycle {
            self.cycle_to_couple = true;
        }
    }

    /// Per-step protocol. Returns true when the 3D domain was advanced.
    ///
    /// `step_index` is the pre-advance step counter of the clock.
    pub fn step<N: ArterialNetwork, D: PerfusionDomain>(
        &mut self,
        step_index: usize,
        time_s: f64,
        network: &mut N,
        domain: &mut D,
    ) -> SimResult<bool> {
        if self.mode == CouplingMode::Uncoupled {
            return Ok(false);
        }

        if self.mode == CouplingMode::StagingCoupled
            && self.cycle_to_couple
            && step_index >= STAGING_WARMUP_STEPS
        {
            tracing::debug!(step_index, "coupling engine entering active mode");
            self.mode = CouplingMode::ActivelyCoupled;
        }

        self.stats.accumulate(
            network.outlet_flow(),
            network.inlet_pressure(),
            network.outlet_pressure(),
        );

        if !self.sub_steps.tick() {
            return Ok(false);
        }

        if self.mode == CouplingMode::ActivelyCoupled {
            // Staggered exchange: 1D outlet pressure drives the 3D inlet,
            // the resulting 3D inlet flow is fed back to the 1D outlet.
            domain.apply_inlet_pressure(network.outlet_pressure())?;
            domain.solve(time_s)?;
            network.set_outlet_flow(domain.inlet_flow())?;
            self.transfers += 1;
        } else {
            // Staging: the 3D domain keeps stepping on cadence so its flow
            // field is developed when feedback starts, but nothing crosses.
            domain.solve(time_s)?;
        }
        Ok(true)
    }

    /// Cardiac-cycle boundary. While actively coupled, computes the FFR
    /// aggregates and resets the accumulators to exactly zero.
    pub fn on_cycle_boundary(&mut self, completed_cycle: u32) -> Option<FfrSummary> {
        if self.mode != CouplingMode::ActivelyCoupled {
            return None;
        }
        let summary = self.compute_ffr_health_values(completed_cycle);
        self.stats.reset();
        Some(summary)
    }

    fn compute_ffr_health_values(&self, cycle: u32) -> FfrSummary {
        let proximal = self.stats.mean_proximal_pressure();
        let distal = self.stats.mean_distal_pressure();
        let ffr = if proximal != 0.0 { distal / proximal } else { 0.0 };
        FfrSummary {
            cycle,
            mean_flow_m3_s: self.stats.mean_flow(),
            mean_proximal_pressure_pa: proximal,
            mean_distal_pressure_pa: distal,
            ffr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surrogate::{SurrogateDomain, SurrogateNetwork};

    fn parts() -> (SurrogateNetwork, SurrogateDomain) {
        let mut network = SurrogateNetwork::flow_inlet(4, 1e-3);
        network.set_inlet_flow(hf_core::NodeId::from_index(0), 8e-6).unwrap();
        network.solve_step(0.0).unwrap();
        (network, SurrogateDomain::new(1.2e8))
    }

    #[test]
    fn uncoupled_never_touches_domain() {
        let (mut network, mut domain) = parts();
        let mut engine = CouplingEngine::new(false, 3, 1).unwrap();
        engine.on_cycle_start(1);
        for step in 0..10 {
            let solved = engine.step(step, 0.0, &mut network, &mut domain).unwrap();
            assert!(!solved);
        }
        assert_eq!(domain.solve_count(), 0);
        assert_eq!(engine.stats().sample_count(), 0);
    }

    #[test]
    fn staging_becomes_active_at_warmup_step() {
        let (mut network, mut domain) = parts();
        let mut engine = CouplingEngine::new(true, 3, 1).unwrap();
        engine.on_cycle_start(1);
        for step in 0..3 {
            engine.step(step, 0.0, &mut network, &mut domain).unwrap();
            if step < 2 {
                assert_eq!(engine.mode(), CouplingMode::StagingCoupled);
            }
        }
        // No cross-feedback happened during staging.
        assert_eq!(network.outlet_feedback_count(), 0);
        engine.step(3, 0.0, &mut network, &mut domain).unwrap();
        assert_eq!(engine.mode(), CouplingMode::ActivelyCoupled);
    }

    #[test]
    fn staging_waits_for_target_cycle() {
        let (mut network, mut domain) = parts();
        let mut engine = CouplingEngine::new(true, 3, 2).unwrap();
        engine.on_cycle_start(1);
        for step in 0..20 {
            engine.step(step, 0.0, &mut network, &mut domain).unwrap();
        }
        assert_eq!(engine.mode(), CouplingMode::StagingCoupled);
        // 3D still stepped on cadence during staging
        assert_eq!(domain.solve_count(), 6);

        engine.on_cycle_start(2);
        engine.step(20, 0.0, &mut network, &mut domain).unwrap();
        assert_eq!(engine.mode(), CouplingMode::ActivelyCoupled);
    }

    #[test]
    fn domain_advances_once_per_period() {
        let (mut network, mut domain) = parts();
        let mut engine = CouplingEngine::new(true, 3, 1).unwrap();
        engine.on_cycle_start(1);
        let mut solved = 0;
        for step in 0..9 {
            if engine.step(step, 0.0, &mut network, &mut domain).unwrap() {
                solved += 1;
            }
        }
        assert_eq!(solved, 3);
        assert_eq!(domain.solve_count(), 3);
    }

    #[test]
    fn stats_reset_at_every_active_cycle_boundary() {
        let (mut network, mut domain) = parts();
        let mut engine = CouplingEngine::new(true, 3, 1).unwrap();
        engine.on_cycle_start(1);
        for cycle in 1..=3u32 {
            for step in 0..7 {
                engine
                    .step(cycle as usize * 10 + step, 0.0, &mut network, &mut domain)
                    .unwrap();
            }
            assert!(engine.stats().sample_count() > 0);
            let summary = engine.on_cycle_boundary(cycle);
            assert!(summary.is_some(), "cycle {cycle} should report FFR");
            assert_eq!(engine.stats().sample_count(), 0);
            assert_eq!(engine.stats(), &CouplingStats::default());
            engine.on_cycle_start(cycle + 1);
        }
    }

    #[test]
    fn boundary_before_activation_reports_nothing() {
        let (mut network, mut domain) = parts();
        let mut engine = CouplingEngine::new(true, 3, 5).unwrap();
        engine.on_cycle_start(1);
        for step in 0..5 {
            engine.step(step, 0.0, &mut network, &mut domain).unwrap();
        }
        assert!(engine.on_cycle_boundary(1).is_none());
    }

    #[test]
    fn ffr_is_distal_over_proximal() {
        let (mut network, mut domain) = parts();
        let mut engine = CouplingEngine::new(true, 1, 1).unwrap();
        engine.on_cycle_start(1);
        for step in 3..40 {
            network.solve_step(0.0).unwrap();
            engine.step(step, 0.0, &mut network, &mut domain).unwrap();
        }
        let summary = engine.on_cycle_boundary(1).expect("active by now");
        assert!(summary.ffr > 0.0 && summary.ffr <= 1.0);
        let expected =
            summary.mean_distal_pressure_pa / summary.mean_proximal_pressure_pa;
        assert!((summary.ffr - expected).abs() < 1e-12);
    }
}
