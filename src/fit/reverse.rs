//! Recover distortion parameters from a baseline/distorted curve pair.
//!
//! For each wing we observe `d = distorted - baseline` against the distance
//! `x = |t - pivot|` and:
//!
//! 1. look for a cap plateau at the far end of the wing (`fit::plateau`)
//! 2. regress `d = f · x` through the origin on the unclamped points
//! 3. if every point is clamped, report the smallest factor that reproduces
//!    the observation (`cap / x_nearest`, signed)
//!
//! The candidate parameters are then pushed back through `simulate` and the
//! residual against the observed curve is reported alongside them.

use tracing::debug;

use crate::domain::{Curve, DistortionParameters, Reversal, SideFit, Wing};
use crate::error::CurveError;
use crate::fit::plateau::{detect_plateau, rounding_floor};
use crate::math::slope_through_origin;
use crate::models::{pivot_distance, simulate};

/// Default relative tolerance for treating two distortion magnitudes as equal.
pub const DEFAULT_PLATEAU_TOL: f64 = 1e-8;

/// Options that affect how a reversal is carried out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseOptions {
    /// Relative tolerance used by plateau (cap) detection, on top of the
    /// rounding floor of the observed rates.
    pub plateau_tol: f64,
}

impl Default for ReverseOptions {
    fn default() -> Self {
        Self {
            plateau_tol: DEFAULT_PLATEAU_TOL,
        }
    }
}

/// Estimate for a single wing.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WingEstimate {
    factor: f64,
    cap: Option<f64>,
    fit: SideFit,
}

/// Reverse with default options.
pub fn reverse(baseline: &Curve, distorted: &Curve, pivot: f64) -> Result<Reversal, CurveError> {
    reverse_with(baseline, distorted, pivot, &ReverseOptions::default())
}

/// Reverse with explicit options.
pub fn reverse_with(
    baseline: &Curve,
    distorted: &Curve,
    pivot: f64,
    options: &ReverseOptions,
) -> Result<Reversal, CurveError> {
    if !(options.plateau_tol.is_finite() && options.plateau_tol >= 0.0) {
        return Err(CurveError::invalid(format!(
            "plateau tolerance must be finite and non-negative, got {}",
            options.plateau_tol
        )));
    }
    if !baseline.same_tenors(distorted) {
        return Err(CurveError::invalid(
            "baseline and distorted curves do not share the same tenors",
        ));
    }

    let pivot_idx = baseline.pivot_index(pivot)?;
    let pivot = baseline.points()[pivot_idx].tenor;
    let pivot_shift = distorted.points()[pivot_idx].rate - baseline.points()[pivot_idx].rate;

    // (distance, observed distortion), nearest to the pivot first.
    let observe = |i: usize| {
        let b = baseline.points()[i];
        let d = distorted.points()[i];
        (pivot_distance(b.tenor, pivot), d.rate - b.rate)
    };
    let short_obs: Vec<(f64, f64)> = (0..pivot_idx).rev().map(observe).collect();
    let long_obs: Vec<(f64, f64)> = (pivot_idx + 1..baseline.len()).map(observe).collect();

    // Largest |rate| on each wing bounds the rounding in `distorted - baseline`.
    let rate_scale = |range: std::ops::Range<usize>| {
        range
            .flat_map(|i| [baseline.points()[i].rate, distorted.points()[i].rate])
            .fold(0.0_f64, |acc, r| acc.max(r.abs()))
    };
    let short_floor = rounding_floor(rate_scale(0..pivot_idx));
    let long_floor = rounding_floor(rate_scale(pivot_idx + 1..baseline.len()));

    let short = fit_wing(Wing::Short, &short_obs, options.plateau_tol, short_floor)?;
    let long = fit_wing(Wing::Long, &long_obs, options.plateau_tol, long_floor)?;

    let params = DistortionParameters {
        short_factor: short.factor,
        long_factor: long.factor,
        short_cap: short.cap,
        long_cap: long.cap,
    };

    let resimulated = simulate(baseline, pivot, &params)?;
    let (rmse, max_abs_error) = compare_rates(&resimulated, distorted);

    Ok(Reversal {
        pivot,
        params,
        capped: short.fit.capped || long.fit.capped,
        short: short.fit,
        long: long.fit,
        pivot_shift,
        rmse,
        max_abs_error,
    })
}

fn fit_wing(
    wing: Wing,
    obs: &[(f64, f64)],
    rel_tol: f64,
    floor: f64,
) -> Result<WingEstimate, CurveError> {
    if obs.is_empty() {
        debug!(wing = wing.display_name(), "no tenors on wing; factor reported as 0");
        return Ok(WingEstimate {
            factor: 0.0,
            cap: None,
            fit: SideFit::default(),
        });
    }

    let magnitudes: Vec<f64> = obs.iter().map(|&(_, d)| d.abs()).collect();
    let plateau = detect_plateau(&magnitudes, rel_tol, floor);
    let capped_points = plateau.map_or(0, |p| p.len);
    let free = obs.len() - capped_points;

    let factor = match plateau {
        Some(p) if free == 0 => {
            let (x_near, d_near) = obs[0];
            d_near.signum() * p.cap / x_near
        }
        _ => {
            let (x, d): (Vec<f64>, Vec<f64>) = obs[..free].iter().copied().unzip();
            slope_through_origin(&x, &d).ok_or_else(|| {
                CurveError::invalid(format!(
                    "could not fit {} factor (degenerate distances)",
                    wing.display_name()
                ))
            })?
        }
    };

    debug!(
        wing = wing.display_name(),
        points = obs.len(),
        capped_points,
        factor,
        cap = ?plateau.map(|p| p.cap),
        "wing fitted"
    );

    Ok(WingEstimate {
        factor,
        cap: plateau.map(|p| p.cap),
        fit: SideFit {
            points: obs.len(),
            capped_points,
            capped: plateau.is_some(),
        },
    })
}

/// RMSE and max absolute difference between two curves on the same tenors.
fn compare_rates(a: &Curve, b: &Curve) -> (f64, f64) {
    let n = a.len().max(1) as f64;
    let (sse, max_abs) = a
        .rates()
        .zip(b.rates())
        .map(|(x, y)| (x - y).abs())
        .fold((0.0, 0.0_f64), |(sse, max), e| (sse + e * e, max.max(e)));
    ((sse / n).sqrt(), max_abs)
}


#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;
    use crate::domain::CurvePoint;

    /// Strictly increasing tenors (steps down to 0.01y) with finite rates.
    fn tenors_and_rates(len: std::ops::Range<usize>) -> impl Strategy<Value = Curve> {
        (
            0.25f64..1.0,
            prop::collection::vec((0.01f64..3.0, -0.01f64..0.1), len),
        )
            .prop_map(|(start, steps)| {
                let mut tenor = start;
                let points: Vec<CurvePoint> = steps
                    .iter()
                    .map(|&(step, rate)| {
                        let p = CurvePoint::new(tenor, rate);
                        tenor += step;
                        p
                    })
                    .collect();
                Curve::new(points).unwrap()
            })
    }

    fn curve_and_pivot() -> impl Strategy<Value = (Curve, usize)> {
        (tenors_and_rates(2..10), any::<prop::sample::Index>())
            .prop_map(|(curve, pivot)| {
                let n = curve.len();
                (curve, pivot.index(n))
            })
    }

    /// Signed factor with magnitude log-uniform in `[10^lo, 10^hi]`.
    fn factor(lo: f64, hi: f64) -> impl Strategy<Value = f64> {
        (lo..hi, any::<bool>()).prop_map(|(e, neg)| {
            let m = 10f64.powf(e);
            if neg { -m } else { m }
        })
    }

    fn close(got: f64, want: f64) -> bool {
        (got - want).abs() <= 1e-9 * want.abs() + 1e-13
    }

    proptest! {
        #[test]
        fn uncapped_round_trip_recovers_factors(
            (curve, idx) in curve_and_pivot(),
            short in factor(-12.0, -0.3),
            long in factor(-12.0, -0.3),
        ) {
            let pivot = curve.points()[idx].tenor;
            let params = DistortionParameters::new(short, long);
            let distorted = simulate(&curve, pivot, &params).unwrap();
            let r = reverse(&curve, &distorted, pivot).unwrap();

            prop_assert!(!r.capped, "{:?}", r);
            prop_assert_eq!(r.params.short_cap, None);
            prop_assert_eq!(r.params.long_cap, None);
            if r.short.points > 0 {
                prop_assert!(close(r.params.short_factor, short), "{} vs {}", r.params.short_factor, short);
            }
            if r.long.points > 0 {
                prop_assert!(close(r.params.long_factor, long), "{} vs {}", r.params.long_factor, long);
            }
            prop_assert!(r.max_abs_error < 1e-9);
        }

        #[test]
        fn two_clamped_tenors_report_the_cap(
            curve in tenors_and_rates(3..10),
            pivot in any::<prop::sample::Index>(),
            short in factor(-12.0, -0.3),
            long in factor(-4.0, -0.3),
            frac in 0.05f64..0.95,
        ) {
            // Pivot leaves at least two tenors on the long wing.
            let idx = pivot.index(curve.len() - 2);
            let pivot = curve.points()[idx].tenor;
            let tenors: Vec<f64> = curve.tenors().collect();
            // Below the shift at the second farthest tenor, so the last two clamp.
            let second_far = tenors[tenors.len() - 2] - pivot;
            let cap = long.abs() * second_far * frac;

            let params = DistortionParameters::new(short, long).with_long_cap(cap);
            let distorted = simulate(&curve, pivot, &params).unwrap();
            let r = reverse(&curve, &distorted, pivot).unwrap();

            prop_assert!(r.capped);
            prop_assert!(r.long.capped);
            prop_assert!(r.long.capped_points >= 2);
            let got = r.params.long_cap.unwrap();
            prop_assert!(close(got, cap), "cap {} vs {}", got, cap);
            if r.long.capped_points < r.long.points {
                prop_assert!(close(r.params.long_factor, long), "{} vs {}", r.params.long_factor, long);
            }
            prop_assert!(r.max_abs_error < 1e-9);
        }

        #[test]
        fn mismatched_tenors_always_fail(
            (curve, _idx) in curve_and_pivot(),
            bump in 0.01f64..0.2,
        ) {
            let pivot = curve.points()[0].tenor;
            let last = curve.len() - 1;
            let moved: Vec<CurvePoint> = curve
                .points()
                .iter()
                .enumerate()
                .map(|(i, p)| if i == last { CurvePoint::new(p.tenor + bump, p.rate) } else { *p })
                .collect();
            let other = Curve::new(moved).unwrap();
            prop_assert!(matches!(reverse(&curve, &other, pivot), Err(CurveError::InvalidInput(_))));
        }
    }
}
