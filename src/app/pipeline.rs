//! Shared run logic behind the CLI subcommands.
//!
//! Keeping this separate from `app` keeps the workflows testable without
//! touching stdout or the process environment:
//! load curves -> simulate / reverse -> (sweep) aggregate statistics

use std::path::Path;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::data::{ScenarioConfig, default_base_curve, generate_scenarios};
use crate::domain::{Curve, DistortionParameters, Reversal, format_tenor};
use crate::error::AppError;
use crate::fit::{ReverseOptions, reverse_with};
use crate::io::load_curve;
use crate::models::{pivot_distance, simulate};

/// Outputs of a single simulation.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub base: Curve,
    pub simulated: Curve,
}

/// Outputs of a single reversal.
#[derive(Debug, Clone)]
pub struct ReversalRun {
    pub base: Curve,
    pub distorted: Curve,
    pub reversal: Reversal,
}

/// Aggregated round-trip statistics from a scenario sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub pivot: f64,
    pub seed: u64,
    pub scenarios: usize,
    /// Scenarios where no cap clamped any tenor.
    pub uncapped: usize,
    /// Uncapped scenarios the reverser nonetheless flagged as capped.
    pub false_plateaus: usize,
    /// Scenarios where at least one cap clamped a tenor.
    pub capped: usize,
    /// Capped scenarios the reverser flagged as capped.
    pub detected: usize,
    /// Capped scenarios with at least two clamped tenors on a clamped wing
    /// but no plateau reported.
    pub missed: usize,
    /// Capped scenarios where some clamped wing has a single clamped tenor.
    /// Such a clamp looks like a linear wing and cannot be recovered.
    pub unidentifiable: usize,
    /// Largest absolute factor error over uncapped scenarios.
    pub max_factor_error_uncapped: f64,
    /// Largest re-simulation error over uncapped and recoverable scenarios.
    pub max_resim_error: f64,
}

/// Load the base curve from `path`, or fall back to the built-in curve.
pub fn load_base_curve(path: Option<&Path>) -> Result<Curve, AppError> {
    match path {
        Some(p) => {
            info!(path = %p.display(), "loading base curve");
            load_curve(p)
        }
        None => {
            info!("using built-in base curve");
            Ok(default_base_curve()?)
        }
    }
}

pub fn run_simulation(
    base: Curve,
    pivot: f64,
    params: &DistortionParameters,
) -> Result<SimulationRun, AppError> {
    info!(
        pivot = %format_tenor(pivot),
        short_factor = params.short_factor,
        long_factor = params.long_factor,
        "simulating curve"
    );
    let simulated = simulate(&base, pivot, params)?;
    Ok(SimulationRun { base, simulated })
}

pub fn run_reversal(
    base: Curve,
    distorted: Curve,
    pivot: f64,
    options: &ReverseOptions,
) -> Result<ReversalRun, AppError> {
    info!(pivot = %format_tenor(pivot), points = base.len(), "reversing curve");
    let reversal = reverse_with(&base, &distorted, pivot, options)?;
    if reversal.capped {
        warn!(
            short_cap = ?reversal.params.short_cap,
            long_cap = ?reversal.params.long_cap,
            "cap plateau detected; factors only valid outside the capped region"
        );
    }
    Ok(ReversalRun {
        base,
        distorted,
        reversal,
    })
}

/// Per-scenario outcome used to build the summary.
struct ScenarioOutcome {
    clamped: (usize, usize),
    detected: bool,
    factor_error: f64,
    resim_error: f64,
}

/// Simulate and reverse random scenarios in parallel.
pub fn run_sweep(
    base: &Curve,
    pivot: f64,
    config: &ScenarioConfig,
    options: &ReverseOptions,
) -> Result<SweepSummary, AppError> {
    let scenarios = generate_scenarios(base, pivot, config)?;
    info!(count = scenarios.len(), seed = config.seed, "running sweep");

    let outcomes: Vec<ScenarioOutcome> = scenarios
        .par_iter()
        .map(|params| -> Result<ScenarioOutcome, AppError> {
            let distorted = simulate(base, pivot, params)?;
            let r = reverse_with(base, &distorted, pivot, options)?;
            let factor_error = (r.params.short_factor - params.short_factor)
                .abs()
                .max((r.params.long_factor - params.long_factor).abs());
            Ok(ScenarioOutcome {
                clamped: clamped_counts(base, pivot, params),
                detected: r.capped,
                factor_error,
                resim_error: r.max_abs_error,
            })
        })
        .collect::<Result<_, _>>()?;

    let summary = summarize(pivot, config.seed, &outcomes);
    if summary.missed > 0 {
        warn!(missed = summary.missed, "some active caps were not recovered");
    }
    if summary.false_plateaus > 0 {
        warn!(
            false_plateaus = summary.false_plateaus,
            "caps reported on uncapped scenarios"
        );
    }

    Ok(summary)
}

fn summarize(pivot: f64, seed: u64, outcomes: &[ScenarioOutcome]) -> SweepSummary {
    let mut summary = SweepSummary {
        pivot,
        seed,
        scenarios: outcomes.len(),
        uncapped: 0,
        false_plateaus: 0,
        capped: 0,
        detected: 0,
        missed: 0,
        unidentifiable: 0,
        max_factor_error_uncapped: 0.0,
        max_resim_error: 0.0,
    };

    for o in outcomes {
        let (short, long) = o.clamped;
        if short + long == 0 {
            summary.uncapped += 1;
            if o.detected {
                summary.false_plateaus += 1;
            }
            summary.max_factor_error_uncapped = summary.max_factor_error_uncapped.max(o.factor_error);
            summary.max_resim_error = summary.max_resim_error.max(o.resim_error);
            continue;
        }

        summary.capped += 1;
        if o.detected {
            summary.detected += 1;
        } else if short >= 2 || long >= 2 {
            summary.missed += 1;
        }
        if short == 1 || long == 1 {
            summary.unidentifiable += 1;
        } else {
            summary.max_resim_error = summary.max_resim_error.max(o.resim_error);
        }
    }

    summary
}

/// Number of strictly clamped tenors on the (short, long) wings.
fn clamped_counts(base: &Curve, pivot: f64, params: &DistortionParameters) -> (usize, usize) {
    let mut short = 0;
    let mut long = 0;
    for t in base.tenors() {
        let raw_short = pivot_distance(t, pivot) * params.short_factor;
        let raw_long = pivot_distance(t, pivot) * params.long_factor;
        if t < pivot && params.short_cap.is_some_and(|c| raw_short.abs() > c) {
            short += 1;
        } else if t > pivot && params.long_cap.is_some_and(|c| raw_long.abs() > c) {
            long += 1;
        }
    }
    (short, long)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_uses_builtin_curve() {
        let base = load_base_curve(None).unwrap();
        let params = DistortionParameters::new(0.002, 0.003).with_long_cap(0.0015);
        let run = run_simulation(base, 2.0, &params).unwrap();

        // 3Y: +0.003 capped at 0.0015.
        let r3 = run.simulated.rate_at(3.0).unwrap();
        assert!((r3 - (0.036 + 0.0015)).abs() < 1e-12);
        // 3M: +1.75 * 0.002.
        let r3m = run.simulated.rate_at(0.25).unwrap();
        assert!((r3m - (0.030 + 0.0035)).abs() < 1e-12);
        assert_eq!(run.simulated.rate_at(2.0), Some(0.034));
    }

    #[test]
    fn reversal_round_trips_simulation() {
        let base = load_base_curve(None).unwrap();
        let params = DistortionParameters::new(-0.0015, 0.0025);
        let sim = run_simulation(base.clone(), 1.0, &params).unwrap();
        let run = run_reversal(base, sim.simulated, 1.0, &ReverseOptions::default()).unwrap();
        assert!((run.reversal.params.short_factor + 0.0015).abs() < 1e-12);
        assert!((run.reversal.params.long_factor - 0.0025).abs() < 1e-12);
        assert!(!run.reversal.capped);
    }

    #[test]
    fn sweep_recovers_uncapped_factors_and_detects_caps() {
        let base = load_base_curve(None).unwrap();
        let config = ScenarioConfig {
            count: 200,
            seed: 42,
            factor_scale: 0.002,
            cap_prob: 0.4,
        };
        let summary = run_sweep(&base, 2.0, &config, &ReverseOptions::default()).unwrap();

        assert_eq!(summary.scenarios, 200);
        assert_eq!(summary.uncapped + summary.capped, 200);
        assert!(summary.uncapped > 0);
        assert!(summary.capped > 0);
        assert!(summary.max_factor_error_uncapped < 1e-10);
        assert!(summary.max_resim_error < 1e-10);
        assert_eq!(summary.missed, 0);
        assert_eq!(summary.false_plateaus, 0);
    }

    #[test]
    fn sweep_with_small_factors_reports_no_caps() {
        let base = load_base_curve(None).unwrap();
        let config = ScenarioConfig {
            count: 200,
            seed: 7,
            factor_scale: 1e-8,
            cap_prob: 0.0,
        };
        let summary = run_sweep(&base, 2.0, &config, &ReverseOptions::default()).unwrap();

        assert_eq!(summary.uncapped, 200);
        assert_eq!(summary.false_plateaus, 0);
        assert!(summary.max_factor_error_uncapped < 1e-14);
    }

    #[test]
    fn summary_counts_caps_on_uncapped_scenarios() {
        let outcome = |clamped, detected| ScenarioOutcome {
            clamped,
            detected,
            factor_error: 0.0,
            resim_error: 0.0,
        };
        let outcomes = [
            outcome((0, 0), false),
            outcome((0, 0), true),
            outcome((0, 2), true),
            outcome((0, 1), false),
        ];
        let summary = summarize(2.0, 1, &outcomes);

        assert_eq!(summary.uncapped, 2);
        assert_eq!(summary.false_plateaus, 1);
        assert_eq!(summary.capped, 2);
        assert_eq!(summary.detected, 1);
        assert_eq!(summary.missed, 0);
        assert_eq!(summary.unidentifiable, 1);
    }

    #[test]
    fn sweep_rejects_unknown_pivot() {
        let base = load_base_curve(None).unwrap();
        let config = ScenarioConfig {
            count: 10,
            seed: 1,
            factor_scale: 0.002,
            cap_prob: 0.4,
        };
        let err = run_sweep(&base, 6.0, &config, &ReverseOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
