//! Interpolation kernels:
//! - hermite_basis (cubic Hermite weights)
//! - bezier / bezier_time (cubic Bezier evaluation and bounded inversion)
//! - bezier2_value (Bezier2D span evaluation)
//! - outgoing_tangent / incoming_tangent (per-shape key tangents)

use crate::config::EvalConfig;
use crate::keyframe::{Keyframe, Shape};

/// Handle offsets at or below this magnitude are treated as zero-length.
const HANDLE_EPSILON: f32 = 1e-5;
/// Substitute slope multiplier for zero-length Bezier2D handles.
const HANDLE_CLAMP: f32 = 1e5;

/// Cubic Hermite basis weights `(h1, h2, h3, h4)` for start value, end value,
/// start tangent and end tangent.
#[inline]
pub fn hermite_basis(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t * t2;
    let h2 = 3.0 * t2 - t3 - t3;
    let h1 = 1.0 - h2;
    let h4 = t3 - t2;
    let h3 = h4 - t2 + t;
    (h1, h2, h3, h4)
}

/// Cubic Bezier in polynomial form.
#[inline]
pub fn bezier(x0: f32, x1: f32, x2: f32, x3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let c = 3.0 * (x1 - x0);
    let b = 3.0 * (x2 - x1) - c;
    let a = x3 - x0 - c - b;
    a * t3 + b * t2 + c * t + x0
}

/// Find the parameter in `[t0, t1]` where the Bezier `(x0..x3)` reaches
/// `target`, by bisection.
///
/// Assumes the curve increases across the bracket. Stops once within
/// `cfg.bezier_tolerance`, or after `cfg.bezier_max_iterations` halvings, in
/// which case the last midpoint is returned.
#[allow(clippy::too_many_arguments)]
pub fn bezier_time(
    x0: f32,
    x1: f32,
    x2: f32,
    x3: f32,
    target: f32,
    mut t0: f32,
    mut t1: f32,
    cfg: &EvalConfig,
) -> f32 {
    let mut t = t0 + (t1 - t0) * 0.5;
    for _ in 0..cfg.bezier_max_iterations.max(1) {
        t = t0 + (t1 - t0) * 0.5;
        let v = bezier(x0, x1, x2, x3, t);
        if (target - v).abs() <= cfg.bezier_tolerance {
            return t;
        }
        if v > target {
            t1 = t;
        } else {
            t0 = t;
        }
    }
    log::debug!(
        "bezier time inversion for {target} stopped after {} iterations at t={t}",
        cfg.bezier_max_iterations
    );
    t
}

/// Evaluate a Bezier2D span at `time`.
///
/// The span's time and value curves share a parameter; time is inverted
/// first, then the value curve is sampled at that parameter. A `key0` that is
/// not itself Bezier2D contributes a handle at one third of the span, sloped
/// by its stored outgoing tangent.
pub fn bezier2_value(key0: &Keyframe, key1: &Keyframe, time: f32, cfg: &EvalConfig) -> f32 {
    let (in_dt, in_dv) = key1.incoming_handle();

    let (x, y) = if key0.shape == Shape::Bezier2D {
        let (out_dt, out_dv) = key0.outgoing_handle();
        (key0.time + out_dt, key0.value + out_dv)
    } else {
        (
            key0.time + (key1.time - key0.time) / 3.0,
            key0.value + key0.outgoing_tangent() / 3.0,
        )
    };

    let t = bezier_time(key0.time, x, key1.time + in_dt, key1.time, time, 0.0, 1.0, cfg);
    bezier(key0.value, y, key1.value + in_dv, key1.value, t)
}

/// Ratio of the span `[key0, key1]` to the double span reaching the neighbour.
#[inline]
fn span_ratio(span: f32, double_span: f32) -> f32 {
    span / double_span
}

/// Tangent leaving `key0` toward `key1`, shaped by `key0`.
///
/// `prev` is the key before `key0`, absent at the start of the envelope.
pub fn outgoing_tangent(prev: Option<&Keyframe>, key0: &Keyframe, key1: &Keyframe) -> f32 {
    let d = key1.value - key0.value;
    match key0.shape {
        Shape::Tcb => {
            let a = (1.0 - key0.tension()) * (1.0 + key0.continuity()) * (1.0 + key0.bias());
            let b = (1.0 - key0.tension()) * (1.0 - key0.continuity()) * (1.0 - key0.bias());
            match prev {
                Some(p) => {
                    let ratio = span_ratio(key1.time - key0.time, key1.time - p.time);
                    ratio * (a * (key0.value - p.value) + b * d)
                }
                None => b * d,
            }
        }
        Shape::Linear => match prev {
            Some(p) => {
                let ratio = span_ratio(key1.time - key0.time, key1.time - p.time);
                ratio * (key0.value - p.value + d)
            }
            None => d,
        },
        Shape::Hermite | Shape::Bezier1D => {
            let out = key0.outgoing_tangent();
            match prev {
                Some(p) => out * span_ratio(key1.time - key0.time, key1.time - p.time),
                None => out,
            }
        }
        Shape::Bezier2D => {
            let (dt, dv) = key0.outgoing_handle();
            handle_slope(dv * (key1.time - key0.time), dt)
        }
        Shape::Stepped => 0.0,
    }
}

/// Tangent arriving at `key1` from `key0`, shaped by `key1`.
///
/// `next` is the key after `key1`, absent at the end of the envelope.
pub fn incoming_tangent(key0: &Keyframe, key1: &Keyframe, next: Option<&Keyframe>) -> f32 {
    let d = key1.value - key0.value;
    match key1.shape {
        Shape::Tcb => {
            let a = (1.0 - key1.tension()) * (1.0 - key1.continuity()) * (1.0 + key1.bias());
            let b = (1.0 - key1.tension()) * (1.0 + key1.continuity()) * (1.0 - key1.bias());
            match next {
                Some(n) => {
                    let ratio = span_ratio(key1.time - key0.time, n.time - key0.time);
                    ratio * (b * (n.value - key1.value) + a * d)
                }
                None => a * d,
            }
        }
        Shape::Linear => match next {
            Some(n) => {
                let ratio = span_ratio(key1.time - key0.time, n.time - key0.time);
                ratio * (n.value - key1.value + d)
            }
            None => d,
        },
        Shape::Hermite | Shape::Bezier1D => {
            let inc = key1.incoming_tangent();
            match next {
                Some(n) => inc * span_ratio(key1.time - key0.time, n.time - key0.time),
                None => inc,
            }
        }
        Shape::Bezier2D => {
            let (dt, dv) = key1.incoming_handle();
            handle_slope(dv * (key1.time - key0.time), dt)
        }
        Shape::Stepped => 0.0,
    }
}

#[inline]
fn handle_slope(scaled: f32, handle_dt: f32) -> f32 {
    if handle_dt.abs() > HANDLE_EPSILON {
        scaled / handle_dt
    } else {
        scaled * HANDLE_CLAMP
    }
}
