//! LightWave envelope evaluation (engine-agnostic)
//!
//! An envelope is a scalar animation curve: ascending keyframes, each tagged
//! with an interpolation shape (TCB, Hermite, Bezier, Bezier2D, linear,
//! stepped), plus pre/post behaviors that decide what happens outside the
//! keyed span (reset, constant, repeat, oscillate, offset repeat, linear).
//!
//! [`Envelope::eval`] is a pure function of the stored keys. Callers that
//! re-sample one instant repeatedly can wrap an envelope in
//! [`CachedEnvelope`]. Nine envelopes together form an item [`Motion`].

pub mod baking;
pub mod behavior;
pub mod cache;
pub mod config;
pub mod envelope;
pub mod error;
pub mod interp;
pub mod keyframe;
pub mod motion;
pub mod sampling;
pub mod stored_envelope;

// Re-exports for consumers (adapters)
pub use baking::{
    bake_envelope, bake_envelope_with_derivatives, bake_motion, BakedEnvelope, BakedMotion,
    BakingConfig, MAX_BAKE_FRAMES,
};
pub use behavior::{range, Behavior};
pub use cache::CachedEnvelope;
pub use config::EvalConfig;
pub use envelope::Envelope;
pub use error::EnvelopeError;
pub use keyframe::{Keyframe, Shape};
pub use motion::{Channel, Motion, MotionSample};
pub use sampling::slope_at;
pub use stored_envelope::{
    export_envelope_json, export_motion_json, parse_envelope_json, parse_motion_json,
};
