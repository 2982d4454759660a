//! The pivot distortion model (forward direction).
//!
//! Every tenor is shifted by a linear function of its distance from the pivot,
//! with a separate slope and optional cap per wing. The pivot itself is the
//! fixed point of the transformation.

use rayon::prelude::*;

use crate::domain::{Curve, DistortionParameters, Wing};
use crate::error::CurveError;

/// Distance from the pivot used as the regressor on each wing (always `>= 0`).
pub fn pivot_distance(tenor: f64, pivot: f64) -> f64 {
    (tenor - pivot).abs()
}

/// Shift applied at `tenor`, before adding the baseline rate.
///
/// Returns `0.0` at the pivot.
pub fn distortion_at(tenor: f64, pivot: f64, params: &DistortionParameters) -> f64 {
    let Some(wing) = Wing::of(tenor, pivot) else {
        return 0.0;
    };
    let raw = pivot_distance(tenor, pivot) * params.factor(wing);
    match params.cap(wing) {
        Some(cap) => raw.clamp(-cap, cap),
        None => raw,
    }
}

/// Apply the distortion to `baseline`.
///
/// Fails with `InvalidInput` if `pivot` is not a tenor of the baseline or the
/// parameters contain non-finite values (or negative caps).
pub fn simulate(
    baseline: &Curve,
    pivot: f64,
    params: &DistortionParameters,
) -> Result<Curve, CurveError> {
    params.validate()?;
    let pivot_idx = baseline.pivot_index(pivot)?;
    // Use the curve's own tenor so distances are exact.
    let pivot = baseline.points()[pivot_idx].tenor;

    let rates = baseline
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if i == pivot_idx {
                p.rate
            } else {
                p.rate + distortion_at(p.tenor, pivot, params)
            }
        })
        .collect();

    baseline.with_rates(rates)
}

/// Simulate several independent parameter sets against one baseline.
///
/// Scenarios are evaluated in parallel; the output order matches `scenarios`.
pub fn simulate_many(
    baseline: &Curve,
    pivot: f64,
    scenarios: &[DistortionParameters],
) -> Result<Vec<Curve>, CurveError> {
    baseline.pivot_index(pivot)?;
    scenarios
        .par_iter()
        .map(|params| simulate(baseline, pivot, params))
        .collect()
}


#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;
    use crate::domain::CurvePoint;

    /// Strictly increasing tenors with finite rates, plus a pivot index.
    fn curve_and_pivot() -> impl Strategy<Value = (Curve, usize)> {
        (
            0.25f64..1.0,
            prop::collection::vec((0.25f64..5.0, -0.01f64..0.1), 1..10),
            any::<prop::sample::Index>(),
        )
            .prop_map(|(start, steps, pivot)| {
                let mut tenor = start;
                let points: Vec<CurvePoint> = steps
                    .iter()
                    .map(|&(step, rate)| {
                        let p = CurvePoint::new(tenor, rate);
                        tenor += step;
                        p
                    })
                    .collect();
                let n = points.len();
                (Curve::new(points).unwrap(), pivot.index(n))
            })
    }

    fn cap() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![Just(None), (0.0f64..1.0).prop_map(Some)]
    }

    proptest! {
        #[test]
        fn pivot_rate_is_unchanged(
            (curve, idx) in curve_and_pivot(),
            short in -1.0f64..1.0,
            long in -1.0f64..1.0,
            short_cap in cap(),
            long_cap in cap(),
        ) {
            let pivot = curve.points()[idx].tenor;
            let params = DistortionParameters { short_factor: short, long_factor: long, short_cap, long_cap };
            let out = simulate(&curve, pivot, &params).unwrap();
            prop_assert_eq!(out.points()[idx].rate, curve.points()[idx].rate);
            prop_assert!(out.same_tenors(&curve));
        }

        #[test]
        fn larger_short_factor_never_shrinks_short_distortion(
            (curve, idx) in curve_and_pivot(),
            a in 0.0f64..1.0,
            bump in 0.0f64..1.0,
            short_cap in cap(),
        ) {
            let pivot = curve.points()[idx].tenor;
            let lo = DistortionParameters { short_factor: a, long_factor: 0.0, short_cap, long_cap: None };
            let hi = DistortionParameters { short_factor: a + bump, ..lo };
            for t in curve.tenors().filter(|&t| t < pivot) {
                let d_lo = distortion_at(t, pivot, &lo).abs();
                let d_hi = distortion_at(t, pivot, &hi).abs();
                prop_assert!(d_hi >= d_lo, "t={} lo={} hi={}", t, d_lo, d_hi);
            }
        }

        #[test]
        fn clamped_distortion_equals_cap(
            (curve, idx) in curve_and_pivot(),
            short in -1.0f64..1.0,
            long in -1.0f64..1.0,
            short_cap in 0.0f64..0.5,
            long_cap in 0.0f64..0.5,
        ) {
            let pivot = curve.points()[idx].tenor;
            let params = DistortionParameters::new(short, long)
                .with_short_cap(short_cap)
                .with_long_cap(long_cap);
            let out = simulate(&curve, pivot, &params).unwrap();
            for (b, o) in curve.points().iter().zip(out.points()) {
                let Some(wing) = Wing::of(b.tenor, pivot) else { continue };
                let cap = params.cap(wing).unwrap();
                let raw = pivot_distance(b.tenor, pivot) * params.factor(wing);
                if raw.abs() > cap {
                    prop_assert_eq!(distortion_at(b.tenor, pivot, &params).abs(), cap);
                    prop_assert!(((o.rate - b.rate).abs() - cap).abs() < 1e-12);
                } else {
                    prop_assert!((o.rate - b.rate - raw).abs() < 1e-12);
                }
            }
        }
    }
}
