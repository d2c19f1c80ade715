//! Baking API: sample envelopes and motions at a fixed frame rate over a time window.

use serde::{Deserialize, Serialize};

use crate::config::EvalConfig;
use crate::envelope::Envelope;
use crate::error::EnvelopeError;
use crate::motion::{Motion, MotionSample};
use crate::sampling::{slope_at_with, DEFAULT_DERIVATIVE_EPSILON};

const DEFAULT_FRAME_RATE: f32 = 60.0;

/// Upper bound on frames produced by a single bake.
pub const MAX_BAKE_FRAMES: usize = 1 << 24;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BakingConfig {
    /// Target frame rate (Hz) for baked samples.
    pub frame_rate: f32,
    /// Start time (seconds); if None, uses the first key time.
    pub start_time: Option<f32>,
    /// End time (seconds); if None, uses the last key time.
    pub end_time: Option<f32>,
    /// Optional override for the finite-difference epsilon used when estimating slopes.
    pub derivative_epsilon: Option<f32>,
    pub eval: EvalConfig,
}

impl Default for BakingConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            start_time: None,
            end_time: None,
            derivative_epsilon: None,
            eval: EvalConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedEnvelope {
    pub frame_rate: f32,
    pub start_time: f32,
    pub end_time: f32,
    /// Sampled values at each frame, inclusive of both window ends.
    pub values: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedMotion {
    pub frame_rate: f32,
    pub start_time: f32,
    pub end_time: f32,
    pub samples: Vec<MotionSample>,
}

/// Resolved sampling window.
#[derive(Clone, Copy, Debug)]
struct Window {
    rate: f32,
    start: f32,
    end: f32,
    frames: usize,
}

impl Window {
    fn resolve(cfg: &BakingConfig, keyed: Option<(f32, f32)>) -> Result<Self, EnvelopeError> {
        let rate = if cfg.frame_rate.is_finite() && cfg.frame_rate > 0.0 {
            cfg.frame_rate
        } else {
            DEFAULT_FRAME_RATE
        };
        let (key_start, key_end) = keyed.unwrap_or((0.0, 0.0));
        let start = cfg.start_time.filter(|t| t.is_finite()).unwrap_or(key_start);
        let end = cfg.end_time.filter(|t| t.is_finite()).unwrap_or(key_end);
        if end < start {
            return Err(EnvelopeError::InvalidWindow { start, end });
        }
        if end == start {
            log::debug!("bake window collapsed to a single frame at {start}");
        }
        let span_frames = ((f64::from(end) - f64::from(start)) * f64::from(rate)).ceil();
        if !span_frames.is_finite() || span_frames >= MAX_BAKE_FRAMES as f64 {
            return Err(EnvelopeError::WindowTooLarge {
                start,
                end,
                max_frames: MAX_BAKE_FRAMES,
            });
        }
        let frames = span_frames as usize + 1;
        Ok(Self {
            rate,
            start,
            end,
            frames,
        })
    }

    #[inline]
    fn time(&self, frame: usize) -> f32 {
        (self.start + frame as f32 / self.rate).min(self.end)
    }
}

/// Bake a single envelope using the provided config.
pub fn bake_envelope(envelope: &Envelope, cfg: &BakingConfig) -> Result<BakedEnvelope, EnvelopeError> {
    let w = Window::resolve(cfg, envelope.time_range())?;
    let values = (0..w.frames)
        .map(|f| envelope.eval_with(w.time(f), &cfg.eval))
        .collect();
    Ok(BakedEnvelope {
        frame_rate: w.rate,
        start_time: w.start,
        end_time: w.end,
        values,
    })
}

/// Bake envelope values and slopes simultaneously.
pub fn bake_envelope_with_derivatives(
    envelope: &Envelope,
    cfg: &BakingConfig,
) -> Result<(BakedEnvelope, BakedEnvelope), EnvelopeError> {
    let w = Window::resolve(cfg, envelope.time_range())?;
    let eps = cfg
        .derivative_epsilon
        .filter(|eps| eps.is_finite() && *eps > 0.0)
        .unwrap_or(DEFAULT_DERIVATIVE_EPSILON);

    let mut values = Vec::with_capacity(w.frames);
    let mut slopes = Vec::with_capacity(w.frames);
    for f in 0..w.frames {
        let t = w.time(f);
        values.push(envelope.eval_with(t, &cfg.eval));
        slopes.push(slope_at_with(envelope, t, eps, &cfg.eval));
    }

    let baked = |values| BakedEnvelope {
        frame_rate: w.rate,
        start_time: w.start,
        end_time: w.end,
        values,
    };
    Ok((baked(values), baked(slopes)))
}

/// Bake all channels of a motion over a shared window.
pub fn bake_motion(motion: &Motion, cfg: &BakingConfig) -> Result<BakedMotion, EnvelopeError> {
    let w = Window::resolve(cfg, motion.time_range())?;
    let samples = (0..w.frames)
        .map(|f| motion.eval_with(w.time(f), &cfg.eval))
        .collect();
    Ok(BakedMotion {
        frame_rate: w.rate,
        start_time: w.start,
        end_time: w.end,
        samples,
    })
}

/// Export baked data as serde_json::Value (stable schema for FFI/serialization).
pub fn export_baked_json(baked: &BakedEnvelope) -> serde_json::Value {
    serde_json::to_value(baked).unwrap_or(serde_json::Value::Null)
}

/// Export baked values and slopes as serde_json::Value.
pub fn export_baked_with_derivatives_json(
    baked: &BakedEnvelope,
    derivatives: &BakedEnvelope,
) -> serde_json::Value {
    serde_json::json!({
        "values": baked,
        "derivatives": derivatives,
    })
}
