//! Envelope sampling helpers: value plus a finite-difference slope estimate.
//!
//! The slope is measured on the evaluated curve, so it reflects extrapolation
//! behaviors and Bezier2D time inversion exactly as evaluation does.

use crate::config::EvalConfig;
use crate::envelope::Envelope;

/// Default half-width (seconds) of the symmetric difference window.
pub const DEFAULT_DERIVATIVE_EPSILON: f32 = 1e-3;

fn sanitize_epsilon(eps: f32) -> f32 {
    if eps.is_finite() && eps > 0.0 {
        eps
    } else {
        DEFAULT_DERIVATIVE_EPSILON
    }
}

/// Estimate `d(value)/d(time)` at `time` with a symmetric difference.
pub fn slope_at(envelope: &Envelope, time: f32, eps: f32) -> f32 {
    slope_at_with(envelope, time, eps, &EvalConfig::default())
}

pub fn slope_at_with(envelope: &Envelope, time: f32, eps: f32, cfg: &EvalConfig) -> f32 {
    let eps = sanitize_epsilon(eps);
    let forward = envelope.eval_with(time + eps, cfg);
    let backward = envelope.eval_with(time - eps, cfg);
    (forward - backward) / (2.0 * eps)
}

/// Sample the value at `time` together with its slope.
pub fn sample_with_slope(envelope: &Envelope, time: f32, eps: f32, cfg: &EvalConfig) -> (f32, f32) {
    (
        envelope.eval_with(time, cfg),
        slope_at_with(envelope, time, eps, cfg),
    )
}
