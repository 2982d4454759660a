//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the model/reversal code stays clean and testable
//! - output changes are localized

use chrono::NaiveDate;

use crate::app::pipeline::SweepSummary;
use crate::domain::{Curve, DistortionParameters, Reversal, SideFit, format_tenor};

/// Format a simulation run: parameters plus a base/simulated comparison table.
pub fn format_simulation(
    base: &Curve,
    simulated: &Curve,
    pivot: f64,
    params: &DistortionParameters,
    asof_date: Option<NaiveDate>,
) -> String {
    let mut out = String::new();

    out.push_str("=== pivot - Curve Simulation ===\n");
    if let Some(date) = asof_date {
        out.push_str(&format!("As-of: {date}\n"));
    }
    out.push_str(&format!("Pivot: {}\n", format_tenor(pivot)));
    out.push_str(&format!(
        "Short end: factor={:.6} cap={}\n",
        params.short_factor,
        fmt_cap(params.short_cap, "none")
    ));
    out.push_str(&format!(
        "Long end : factor={:.6} cap={}\n",
        params.long_factor,
        fmt_cap(params.long_cap, "none")
    ));
    out.push('\n');
    out.push_str(&format_comparison(base, simulated, pivot, "Simulated"));

    out
}

/// Format recovered parameters and validation diagnostics.
pub fn format_reversal(base: &Curve, distorted: &Curve, reversal: &Reversal) -> String {
    let mut out = String::new();
    let p = &reversal.params;

    out.push_str("=== pivot - Reverse Engineered Factors ===\n");
    out.push_str(&format!("Pivot: {}\n", format_tenor(reversal.pivot)));
    out.push_str(&format!(
        "Short end: factor={:.6} cap={} {}\n",
        p.short_factor,
        fmt_cap(p.short_cap, "unknown"),
        fmt_side(&reversal.short)
    ));
    out.push_str(&format!(
        "Long end : factor={:.6} cap={} {}\n",
        p.long_factor,
        fmt_cap(p.long_cap, "unknown"),
        fmt_side(&reversal.long)
    ));
    out.push_str(&format!("Capped: {}\n", reversal.capped));
    if reversal.capped {
        out.push_str("  (factors are only reliable outside the capped region)\n");
    }
    if reversal.pivot_shift != 0.0 {
        out.push_str(&format!(
            "Pivot moved by {:.6}; the model keeps the pivot fixed.\n",
            reversal.pivot_shift
        ));
    }
    out.push_str(&format!(
        "Re-simulation: RMSE={:.6e} max|err|={:.6e}\n",
        reversal.rmse, reversal.max_abs_error
    ));
    out.push('\n');
    out.push_str(&format_comparison(base, distorted, reversal.pivot, "Distorted"));

    out
}

/// Format round-trip statistics from a scenario sweep.
pub fn format_sweep(summary: &SweepSummary) -> String {
    let mut out = String::new();

    out.push_str("=== pivot - Round-trip Sweep ===\n");
    out.push_str(&format!(
        "Pivot: {} | scenarios={} | seed={}\n",
        format_tenor(summary.pivot),
        summary.scenarios,
        summary.seed
    ));
    out.push_str(&format!(
        "Uncapped: n={} | max factor error={:.3e} | false plateaus={}\n",
        summary.uncapped,
        summary.max_factor_error_uncapped,
        summary.false_plateaus
    ));
    out.push_str(&format!(
        "Capped  : n={} | plateau detected={} | cap missed={} | single-tenor clamp={}\n",
        summary.capped, summary.detected, summary.missed, summary.unidentifiable
    ));
    out.push_str(&format!(
        "Re-simulation: max|err|={:.3e}\n",
        summary.max_resim_error
    ));

    out
}

fn format_comparison(base: &Curve, other: &Curve, pivot: f64, label: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:>12} {:>12} {:>12}\n",
        "Tenor", "Base", label, "Change"
    ));
    for (b, o) in base.points().iter().zip(other.points()) {
        let marker = if (b.tenor - pivot).abs() <= crate::domain::TENOR_EPS { "*" } else { " " };
        out.push_str(&format!(
            "{:<6} {:>12.6} {:>12.6} {:>12.6}{marker}\n",
            format_tenor(b.tenor),
            b.rate,
            o.rate,
            o.rate - b.rate,
        ));
    }
    out
}

fn fmt_cap(cap: Option<f64>, missing: &str) -> String {
    cap.map(|c| format!("{c:.6}")).unwrap_or_else(|| missing.to_string())
}

fn fmt_side(side: &SideFit) -> String {
    if side.capped {
        format!("(n={}, {} on cap plateau)", side.points, side.capped_points)
    } else {
        format!("(n={})", side.points)
    }
}
