//! Evaluation configuration for lws-envelope-core.

use serde::{Deserialize, Serialize};

/// Default absolute tolerance for Bezier2D time inversion.
pub const DEFAULT_BEZIER_TOLERANCE: f32 = 1e-4;

/// Default cap on bisection steps when inverting Bezier2D time.
pub const DEFAULT_BEZIER_MAX_ITERATIONS: u32 = 64;

/// Numeric knobs for envelope evaluation.
/// Keep this minimal; the defaults reproduce LightWave's own results.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Bisection stops once the Bezier time curve is within this distance of the target.
    pub bezier_tolerance: f32,
    /// Hard bound on bisection steps; the last midpoint is used when exhausted.
    pub bezier_max_iterations: u32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            bezier_tolerance: DEFAULT_BEZIER_TOLERANCE,
            bezier_max_iterations: DEFAULT_BEZIER_MAX_ITERATIONS,
        }
    }
}
