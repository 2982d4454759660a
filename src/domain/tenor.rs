//! Tenor labels (`3M`, `7Y`, ...) and their year-fraction values.
//!
//! Labels use simple calendar fractions, which is what curve screens quote:
//!
//! | unit | meaning | years      |
//! |------|---------|------------|
//! | `D`  | days    | `n / 365`  |
//! | `W`  | weeks   | `n / 52`   |
//! | `M`  | months  | `n / 12`   |
//! | `Y`  | years   | `n`        |
//!
//! A bare number is read as years.

use crate::error::CurveError;

/// Absolute tolerance (years) used whenever two tenors are compared.
pub const TENOR_EPS: f64 = 1e-9;

/// Tenors at or above this many years always print as decimal years.
const MAX_LABEL_YEARS: f64 = 1e6;

/// Parse a tenor label or a plain number of years.
pub fn parse_tenor(input: &str) -> Result<f64, CurveError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(CurveError::invalid("empty tenor"));
    }

    let upper = s.to_ascii_uppercase();
    let (number, divisor) = match upper.chars().last() {
        Some('D') => (&upper[..upper.len() - 1], 365.0),
        Some('W') => (&upper[..upper.len() - 1], 52.0),
        Some('M') => (&upper[..upper.len() - 1], 12.0),
        Some('Y') => (&upper[..upper.len() - 1], 1.0),
        _ => (upper.as_str(), 1.0),
    };

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| CurveError::invalid(format!("unrecognized tenor '{s}'")))?;
    let years = value / divisor;

    if !(years.is_finite() && years > 0.0) {
        return Err(CurveError::invalid(format!(
            "tenor '{s}' must be positive and finite"
        )));
    }
    Ok(years)
}

/// Format a tenor for display.
///
/// Whole months print as `nM` (below one year or off the year grid), whole
/// years as `nY`; anything else (including very long tenors) falls back to
/// decimal years.
pub fn format_tenor(years: f64) -> String {
    if !(years.is_finite() && years < MAX_LABEL_YEARS) {
        return format!("{years}Y");
    }
    let months = years * 12.0;
    let whole_months = months.round();
    if whole_months >= 1.0 && (months - whole_months).abs() < 1e-6 {
        let m = whole_months as u64;
        if m % 12 == 0 {
            return format!("{}Y", m / 12);
        }
        return format!("{m}M");
    }
    format!("{years}Y")
}
