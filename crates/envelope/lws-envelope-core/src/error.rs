//! Error types for envelope construction, loading and baking.
//!
//! Evaluation itself never fails; these errors only surface at the fallible
//! boundaries (checked insertion, JSON interchange, numeric code conversion).

use thiserror::Error;

/// Errors produced while building, loading or baking envelopes.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EnvelopeError {
    /// A shape code outside the LightWave range 0..=5.
    #[error("unknown key shape code {0}")]
    UnknownShape(u32),

    /// A shape name that does not match any known shape.
    #[error("unknown key shape name '{0}'")]
    UnknownShapeName(String),

    /// A behavior code outside the LightWave range 0..=5.
    #[error("unknown envelope behavior code {0}")]
    UnknownBehavior(u32),

    /// A behavior name that does not match any known behavior.
    #[error("unknown envelope behavior name '{0}'")]
    UnknownBehaviorName(String),

    /// A motion channel index outside 0..=8.
    #[error("unknown motion channel {0}")]
    UnknownChannel(u32),

    /// Key value, time or parameter is NaN or infinite.
    #[error("key {index} has a non-finite {field}")]
    NonFiniteKey { index: usize, field: &'static str },

    /// Key time does not strictly follow the previous key.
    #[error("key {index} at time {time} does not follow previous key at time {previous}")]
    UnsortedKey {
        index: usize,
        time: f32,
        previous: f32,
    },

    /// Too many parameters were supplied for a key.
    #[error("key {index} has {count} parameters (at most 6 allowed)")]
    TooManyParams { index: usize, count: usize },

    /// The same motion channel was given twice.
    #[error("motion channel {0} defined more than once")]
    DuplicateChannel(u32),

    /// Baking window end precedes start.
    #[error("bake window end {end} precedes start {start}")]
    InvalidWindow { start: f32, end: f32 },

    /// Baking window holds more frames than a single bake may produce.
    #[error("bake window {start}..{end} exceeds {max_frames} frames")]
    WindowTooLarge {
        start: f32,
        end: f32,
        max_frames: usize,
    },

    /// Malformed JSON input.
    #[error("envelope json parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for EnvelopeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
