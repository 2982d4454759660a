//! Distortion parameters and reversal outputs.
//!
//! These types are kept small and serializable so they can be printed,
//! exported to JSON and read back for a later comparison.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::curve::Curve;
use crate::error::CurveError;

/// Which side of the pivot a tenor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wing {
    Short,
    Long,
}

impl Wing {
    /// `None` for the pivot itself.
    pub fn of(tenor: f64, pivot: f64) -> Option<Wing> {
        if tenor < pivot {
            Some(Wing::Short)
        } else if tenor > pivot {
            Some(Wing::Long)
        } else {
            None
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Wing::Short => "short end",
            Wing::Long => "long end",
        }
    }
}

/// Parameters of the pivot distortion.
///
/// For a tenor `t` on the short wing the shift is `(pivot - t) * short_factor`,
/// on the long wing `(t - pivot) * long_factor`. A cap bounds the absolute
/// shift on its wing; `None` means unbounded (or, for reversal output,
/// unknown).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DistortionParameters {
    pub short_factor: f64,
    pub long_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_cap: Option<f64>,
}

impl DistortionParameters {
    pub fn new(short_factor: f64, long_factor: f64) -> Self {
        Self {
            short_factor,
            long_factor,
            short_cap: None,
            long_cap: None,
        }
    }

    pub fn with_short_cap(mut self, cap: f64) -> Self {
        self.short_cap = Some(cap);
        self
    }

    pub fn with_long_cap(mut self, cap: f64) -> Self {
        self.long_cap = Some(cap);
        self
    }

    pub fn factor(&self, wing: Wing) -> f64 {
        match wing {
            Wing::Short => self.short_factor,
            Wing::Long => self.long_factor,
        }
    }

    pub fn cap(&self, wing: Wing) -> Option<f64> {
        match wing {
            Wing::Short => self.short_cap,
            Wing::Long => self.long_cap,
        }
    }

    /// Factors must be finite; caps finite and non-negative.
    pub fn validate(&self) -> Result<(), CurveError> {
        for wing in [Wing::Short, Wing::Long] {
            let factor = self.factor(wing);
            if !factor.is_finite() {
                return Err(CurveError::invalid(format!(
                    "{} factor is not finite ({factor})",
                    wing.display_name()
                )));
            }
            if let Some(cap) = self.cap(wing) {
                if !cap.is_finite() {
                    return Err(CurveError::invalid(format!(
                        "{} cap is not finite ({cap})",
                        wing.display_name()
                    )));
                }
                if cap < 0.0 {
                    return Err(CurveError::invalid(format!(
                        "{} cap must be non-negative, got {cap}",
                        wing.display_name()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Per-wing diagnostics from a reversal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SideFit {
    /// Tenors on this wing (pivot excluded).
    pub points: usize,
    /// Tenors sitting on the detected cap plateau.
    pub capped_points: usize,
    /// Whether a plateau was detected.
    pub capped: bool,
}

/// Parameters recovered from a baseline/distorted curve pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reversal {
    pub pivot: f64,
    pub params: DistortionParameters,
    /// True if either wing showed a cap plateau; factors are then only
    /// reliable outside the clamped region.
    pub capped: bool,
    pub short: SideFit,
    pub long: SideFit,
    /// Observed `distorted - baseline` at the pivot (zero for a pure distortion).
    pub pivot_shift: f64,
    /// RMSE between the re-simulated curve and the observed distorted curve.
    pub rmse: f64,
    /// Largest absolute error between the re-simulated and observed curves.
    pub max_abs_error: f64,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asof_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<DistortionParameters>,
    pub points: Curve,
}
