//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initializes logging
//! - loads curves, runs the simulator / reverser / sweep
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{Command, ReverseArgs, SimulateArgs, SweepArgs};
use crate::data::ScenarioConfig;
use crate::domain::DistortionParameters;
use crate::error::AppError;
use crate::fit::ReverseOptions;

pub mod pipeline;

/// Entry point for the `pivot` binary.
pub fn run() -> Result<(), AppError> {
    // Environment fallbacks for clap (`PIVOT_TENOR`, `PIVOT_BASE_CURVE`) may
    // come from a local `.env`.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Simulate(args) => handle_simulate(args),
        Command::Reverse(args) => handle_reverse(args),
        Command::Sweep(args) => handle_sweep(args),
    }
}

/// Install the global `tracing` subscriber (stderr, `RUST_LOG` aware).
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second initialization (e.g. from an embedding test harness) is harmless.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let params = params_from_args(&args);
    let base = pipeline::load_base_curve(args.curve.base.as_deref())?;
    let run = pipeline::run_simulation(base, args.curve.pivot, &params)?;

    println!(
        "{}",
        crate::report::format_simulation(&run.base, &run.simulated, args.curve.pivot, &params, args.asof)
    );

    if let Some(path) = &args.export {
        crate::io::export::write_comparison_csv(path, &run.base, &run.simulated)?;
    }
    if let Some(path) = &args.export_curve {
        crate::io::curve::write_curve_json(
            path,
            &run.simulated,
            Some(args.curve.pivot),
            Some(&params),
            args.asof,
        )?;
    }

    Ok(())
}

fn handle_reverse(args: ReverseArgs) -> Result<(), AppError> {
    let base = pipeline::load_base_curve(args.curve.base.as_deref())?;
    let distorted = crate::io::load_curve(&args.distorted)?;
    let options = ReverseOptions {
        plateau_tol: args.plateau_tol,
    };
    let run = pipeline::run_reversal(base, distorted, args.curve.pivot, &options)?;

    println!(
        "{}",
        crate::report::format_reversal(&run.base, &run.distorted, &run.reversal)
    );

    if let Some(path) = &args.export_params {
        crate::io::curve::write_reversal_json(path, &run.reversal)?;
    }

    Ok(())
}

fn handle_sweep(args: SweepArgs) -> Result<(), AppError> {
    let base = pipeline::load_base_curve(args.curve.base.as_deref())?;
    let config = ScenarioConfig {
        count: args.count,
        seed: args.seed,
        factor_scale: args.factor_scale,
        cap_prob: args.cap_prob,
    };
    let options = ReverseOptions {
        plateau_tol: args.plateau_tol,
    };
    let summary = pipeline::run_sweep(&base, args.curve.pivot, &config, &options)?;

    println!("{}", crate::report::format_sweep(&summary));
    Ok(())
}

pub fn params_from_args(args: &SimulateArgs) -> DistortionParameters {
    DistortionParameters {
        short_factor: args.short_factor,
        long_factor: args.long_factor,
        short_cap: args.short_cap,
        long_cap: args.long_cap,
    }
}
