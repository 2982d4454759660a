//! Validated curve container.
//!
//! A `Curve` can only be built through `Curve::new` (or deserialization, which
//! goes through the same checks), so every curve handed to the simulator or
//! the reverser already satisfies:
//!
//! - at least one point
//! - tenors positive, finite and strictly increasing (no duplicates)
//! - rates finite

use serde::{Deserialize, Serialize};

use crate::domain::tenor::{TENOR_EPS, format_tenor};
use crate::error::CurveError;

/// A single `(tenor, rate)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Time to maturity in years.
    pub tenor: f64,
    /// Rate at that tenor (any consistent unit, e.g. decimal yield).
    pub rate: f64,
}

impl CurvePoint {
    pub fn new(tenor: f64, rate: f64) -> Self {
        Self { tenor, rate }
    }
}

/// An ordered tenor -> rate mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CurvePoint>", into = "Vec<CurvePoint>")]
pub struct Curve {
    points: Vec<CurvePoint>,
}

impl Curve {
    /// Validate and wrap `points`.
    ///
    /// Tenors must be positive, finite and strictly increasing with a gap of
    /// more than [`TENOR_EPS`] between neighbours. Tenors closer than that
    /// would be the same tenor for pivot lookup and tenor-set comparison.
    pub fn new(points: Vec<CurvePoint>) -> Result<Self, CurveError> {
        if points.is_empty() {
            return Err(CurveError::invalid("curve has no points"));
        }

        for (i, p) in points.iter().enumerate() {
            if !(p.tenor.is_finite() && p.tenor > 0.0) {
                return Err(CurveError::invalid(format!(
                    "tenor at position {i} must be positive and finite, got {}",
                    p.tenor
                )));
            }
            if !p.rate.is_finite() {
                return Err(CurveError::invalid(format!(
                    "rate at tenor {} is not finite",
                    format_tenor(p.tenor)
                )));
            }
        }

        for pair in points.windows(2) {
            if pair[1].tenor <= pair[0].tenor + TENOR_EPS {
                return Err(CurveError::invalid(format!(
                    "tenors must be strictly increasing (more than {TENOR_EPS}y apart): {} followed by {}",
                    format_tenor(pair[0].tenor),
                    format_tenor(pair[1].tenor)
                )));
            }
        }

        Ok(Self { points })
    }

    /// Build a curve from `(tenor, rate)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, CurveError> {
        Self::new(pairs.iter().map(|&(t, r)| CurvePoint::new(t, r)).collect())
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn tenors(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.tenor)
    }

    pub fn rates(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.rate)
    }

    /// Index of the point whose tenor matches `tenor` (within `TENOR_EPS`).
    pub fn position(&self, tenor: f64) -> Option<usize> {
        self.points
            .iter()
            .position(|p| (p.tenor - tenor).abs() <= TENOR_EPS)
    }

    pub fn rate_at(&self, tenor: f64) -> Option<f64> {
        self.position(tenor).map(|i| self.points[i].rate)
    }

    /// Locate the pivot, failing with `InvalidInput` if it is not a curve tenor.
    pub fn pivot_index(&self, pivot: f64) -> Result<usize, CurveError> {
        if !pivot.is_finite() {
            return Err(CurveError::invalid("pivot tenor is not finite"));
        }
        self.position(pivot).ok_or_else(|| {
            CurveError::invalid(format!(
                "pivot tenor {} is not a tenor of the curve",
                format_tenor(pivot)
            ))
        })
    }

    /// True when both curves have the same tenor set.
    pub fn same_tenors(&self, other: &Curve) -> bool {
        self.len() == other.len()
            && self
                .tenors()
                .zip(other.tenors())
                .all(|(a, b)| (a - b).abs() <= TENOR_EPS)
    }

    /// Return a curve with the same tenors and new rates.
    pub(crate) fn with_rates(&self, rates: Vec<f64>) -> Result<Self, CurveError> {
        if rates.len() != self.len() {
            return Err(CurveError::invalid("rate count does not match tenor count"));
        }
        let points = self
            .points
            .iter()
            .zip(rates)
            .map(|(p, rate)| CurvePoint::new(p.tenor, rate))
            .collect();
        Self::new(points)
    }
}

impl TryFrom<Vec<CurvePoint>> for Curve {
    type Error = CurveError;

    fn try_from(points: Vec<CurvePoint>) -> Result<Self, Self::Error> {
        Curve::new(points)
    }
}

impl From<Curve> for Vec<CurvePoint> {
    fn from(curve: Curve) -> Self {
        curve.points
    }
}
