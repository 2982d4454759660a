//! Built-in base curve and seeded random distortion scenarios.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Curve, CurvePoint, DistortionParameters, Wing};
use crate::error::{AppError, CurveError};
use crate::models::pivot_distance;

/// Default base curve (tenor years, decimal yield) used when no curve file is
/// supplied.
const DEFAULT_BASE: [(f64, f64); 8] = [
    (0.25, 0.030),
    (0.5, 0.031),
    (1.0, 0.032),
    (2.0, 0.034),
    (3.0, 0.036),
    (4.0, 0.038),
    (5.0, 0.041),
    (7.0, 0.045),
];

/// The built-in 3M..7Y base curve.
pub fn default_base_curve() -> Result<Curve, CurveError> {
    let points = DEFAULT_BASE
        .iter()
        .map(|&(tenor, rate)| CurvePoint::new(tenor, rate))
        .collect();
    Curve::new(points)
}

/// Settings for random scenario generation.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub count: usize,
    pub seed: u64,
    /// Standard deviation of the normally distributed factors.
    pub factor_scale: f64,
    /// Probability that a wing gets a cap.
    pub cap_prob: f64,
}

/// Generate `config.count` parameter sets for `baseline` around `pivot`.
///
/// When a wing is capped, the cap is drawn between 25% and 75% of the largest
/// uncapped shift on that wing, so it always clamps at least the farthest
/// tenor.
pub fn generate_scenarios(
    baseline: &Curve,
    pivot: f64,
    config: &ScenarioConfig,
) -> Result<Vec<DistortionParameters>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(2, "Scenario count must be > 0."));
    }
    if !(config.factor_scale.is_finite() && config.factor_scale > 0.0) {
        return Err(AppError::new(2, "Factor scale must be positive and finite."));
    }
    if !(0.0..=1.0).contains(&config.cap_prob) {
        return Err(AppError::new(2, "Cap probability must be within [0, 1]."));
    }

    let pivot_idx = baseline.pivot_index(pivot)?;
    let pivot = baseline.points()[pivot_idx].tenor;
    let reach = |wing: Wing| {
        baseline
            .tenors()
            .filter(|&t| Wing::of(t, pivot) == Some(wing))
            .map(|t| pivot_distance(t, pivot))
            .fold(0.0_f64, f64::max)
    };
    let short_reach = reach(Wing::Short);
    let long_reach = reach(Wing::Long);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.factor_scale)
        .map_err(|e| AppError::new(4, format!("Factor distribution error: {e}")))?;

    let draw_cap = |rng: &mut StdRng, factor: f64, reach: f64| -> Option<f64> {
        let max_shift = (factor * reach).abs();
        if max_shift > 0.0 && rng.gen_bool(config.cap_prob) {
            Some(max_shift * rng.gen_range(0.25..0.75))
        } else {
            None
        }
    };

    let mut out = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let short_factor = normal.sample(&mut rng);
        let long_factor = normal.sample(&mut rng);
        let short_cap = draw_cap(&mut rng, short_factor, short_reach);
        let long_cap = draw_cap(&mut rng, long_factor, long_reach);
        out.push(DistortionParameters {
            short_factor,
            long_factor,
            short_cap,
            long_cap,
        });
    }

    Ok(out)
}
