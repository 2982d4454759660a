//! Cap detection.
//!
//! Under a cap the absolute distortion on a wing grows linearly with distance
//! from the pivot and then stays flat at the cap value. Observed from the
//! outside, the signature is a run of (nearly) equal maximal magnitudes at
//! the far end of the wing. One point at the maximum is not enough: a single
//! farthest tenor is always the maximum of a linear wing.

/// A detected plateau at the far end of a wing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plateau {
    /// Plateau magnitude, reported as the recovered cap.
    pub cap: f64,
    /// Number of trailing points on the plateau (always `>= 2`).
    pub len: usize,
}

/// Rounding floor for distortions observed as `distorted - baseline` on rates
/// of magnitude up to `rate_scale`.
///
/// Differences below this are indistinguishable from floating-point noise.
pub fn rounding_floor(rate_scale: f64) -> f64 {
    16.0 * f64::EPSILON * rate_scale.abs()
}

/// Find a trailing plateau in `magnitudes`.
///
/// `magnitudes` must be `|distortion|` values ordered by increasing distance
/// from the pivot. A value counts as equal to the maximum when it lies within
/// `rel_tol * max + floor` of it, where `floor` is the absolute rounding
/// floor of the observations (see [`rounding_floor`]). A maximum at or below
/// the floor never forms a plateau (a flat wing is a zero factor, not a zero
/// cap).
pub fn detect_plateau(magnitudes: &[f64], rel_tol: f64, floor: f64) -> Option<Plateau> {
    let max = magnitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max.is_finite() && max > floor) {
        return None;
    }

    let band = rel_tol * max + floor;
    let len = magnitudes
        .iter()
        .rev()
        .take_while(|&&m| max - m <= band)
        .count();

    (len >= 2).then_some(Plateau { cap: max, len })
}
