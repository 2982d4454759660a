//! Command-line parsing for the pivot curve tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the model/reversal code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::parse_tenor;
use crate::fit::DEFAULT_PLATEAU_TOL;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pivot", version, about = "Pivot-tenor yield curve distortion simulator")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG when set).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Distort a base curve around a pivot tenor.
    Simulate(SimulateArgs),
    /// Recover distortion parameters from a base and a distorted curve.
    Reverse(ReverseArgs),
    /// Simulate and reverse random scenarios, reporting round-trip errors.
    Sweep(SweepArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    /// Pivot tenor (label such as `2Y`/`6M`, or years).
    #[arg(short, long, env = "PIVOT_TENOR", value_parser = parse_tenor_arg)]
    pub pivot: f64,

    /// Base curve file (CSV with tenor,rate columns, or curve JSON).
    /// Defaults to the built-in 3M..7Y curve.
    #[arg(short, long, env = "PIVOT_BASE_CURVE", value_name = "FILE")]
    pub base: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Shift per year of distance for tenors below the pivot.
    #[arg(long, default_value_t = 0.002, allow_negative_numbers = true)]
    pub short_factor: f64,

    /// Shift per year of distance for tenors above the pivot.
    #[arg(long, default_value_t = 0.003, allow_negative_numbers = true)]
    pub long_factor: f64,

    /// Maximum absolute shift on the short end.
    #[arg(long)]
    pub short_cap: Option<f64>,

    /// Maximum absolute shift on the long end.
    #[arg(long)]
    pub long_cap: Option<f64>,

    /// As-of date recorded in the exported curve (YYYY-MM-DD).
    #[arg(long)]
    pub asof: Option<NaiveDate>,

    /// Export the base/simulated comparison to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the simulated curve (with parameters) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ReverseArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Distorted curve file (CSV or curve JSON) on the same tenors as the base.
    #[arg(short, long, value_name = "FILE")]
    pub distorted: PathBuf,

    /// Relative tolerance for treating two shift magnitudes as a cap plateau.
    #[arg(long, default_value_t = DEFAULT_PLATEAU_TOL)]
    pub plateau_tol: f64,

    /// Export recovered parameters and diagnostics to JSON.
    #[arg(long = "export-params")]
    pub export_params: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SweepArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Number of random scenarios.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of the random factors.
    #[arg(long, default_value_t = 0.002)]
    pub factor_scale: f64,

    /// Probability that each wing gets a cap.
    #[arg(long, default_value_t = 0.3)]
    pub cap_prob: f64,

    /// Relative tolerance for treating two shift magnitudes as a cap plateau.
    #[arg(long, default_value_t = DEFAULT_PLATEAU_TOL)]
    pub plateau_tol: f64,
}

fn parse_tenor_arg(s: &str) -> Result<f64, String> {
    parse_tenor(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simulate_with_label_pivot() {
        let cli = Cli::parse_from([
            "pivot",
            "simulate",
            "--pivot",
            "2Y",
            "--short-factor",
            "-0.001",
            "--long-cap",
            "0.0015",
        ]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.curve.pivot, 2.0);
        assert_eq!(args.short_factor, -0.001);
        assert_eq!(args.long_factor, 0.003);
        assert_eq!(args.long_cap, Some(0.0015));
        assert_eq!(args.short_cap, None);
    }

    #[test]
    fn rejects_bad_pivot_label() {
        let res = Cli::try_parse_from(["pivot", "simulate", "--pivot", "2Q"]);
        assert!(res.is_err());
    }

    #[test]
    fn reverse_requires_distorted_curve() {
        assert!(Cli::try_parse_from(["pivot", "reverse", "--pivot", "6M"]).is_err());
        let cli = Cli::try_parse_from(["pivot", "reverse", "--pivot", "6M", "-d", "d.csv"]).unwrap();
        let Command::Reverse(args) = cli.command else {
            panic!("expected reverse");
        };
        assert_eq!(args.curve.pivot, 0.5);
        assert_eq!(args.plateau_tol, DEFAULT_PLATEAU_TOL);
    }
}
