//! Envelope: ordered keys plus pre/post behaviors, evaluated as a continuous
//! function of time.
//!
//! Evaluation is pure. Memoization lives in [`crate::cache::CachedEnvelope`].

use std::cmp::Ordering;

use serde::Serialize;

use crate::behavior::{range, Behavior};
use crate::config::EvalConfig;
use crate::error::EnvelopeError;
use crate::interp::functions::{
    bezier2_value, hermite_basis, incoming_tangent, outgoing_tangent,
};
use crate::keyframe::{Keyframe, Shape};

/// A scalar animation curve.
///
/// Keys are kept in the order they were inserted and must ascend in time.
/// A new envelope has no keys and `Reset` on both ends.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Envelope {
    keys: Vec<Keyframe>,
    pre: Behavior,
    post: Behavior,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an envelope from a complete key list, checking the ordering invariant.
    pub fn from_keys(
        keys: Vec<Keyframe>,
        pre: Behavior,
        post: Behavior,
    ) -> Result<Self, EnvelopeError> {
        let env = Self { keys, pre, post };
        env.validate()?;
        Ok(env)
    }

    /// Append a key. The caller guarantees ascending time order; a key that
    /// breaks the order is still stored but logged.
    pub fn insert(&mut self, key: Keyframe) {
        if let Some(last) = self.keys.last() {
            if key.time.partial_cmp(&last.time) != Some(Ordering::Greater) {
                log::warn!(
                    "envelope key {} at time {} does not follow key at time {}",
                    self.keys.len(),
                    key.time,
                    last.time
                );
            }
        }
        self.keys.push(key);
    }

    /// Append a key, rejecting non-finite data and out-of-order times.
    pub fn try_insert(&mut self, key: Keyframe) -> Result<(), EnvelopeError> {
        let index = self.keys.len();
        if let Some(field) = key.non_finite_field() {
            return Err(EnvelopeError::NonFiniteKey { index, field });
        }
        if let Some(last) = self.keys.last() {
            if key.time <= last.time {
                return Err(EnvelopeError::UnsortedKey {
                    index,
                    time: key.time,
                    previous: last.time,
                });
            }
        }
        self.keys.push(key);
        Ok(())
    }

    pub fn set_behaviors(&mut self, pre: Behavior, post: Behavior) {
        self.pre = pre;
        self.post = post;
    }

    /// Check that every key is finite and strictly follows its predecessor.
    pub fn validate(&self) -> Result<(), EnvelopeError> {
        let mut previous: Option<f32> = None;
        for (index, key) in self.keys.iter().enumerate() {
            if let Some(field) = key.non_finite_field() {
                return Err(EnvelopeError::NonFiniteKey { index, field });
            }
            if let Some(previous) = previous {
                if key.time <= previous {
                    return Err(EnvelopeError::UnsortedKey {
                        index,
                        time: key.time,
                        previous,
                    });
                }
            }
            previous = Some(key.time);
        }
        Ok(())
    }

    #[inline]
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    #[inline]
    pub fn pre(&self) -> Behavior {
        self.pre
    }

    #[inline]
    pub fn post(&self) -> Behavior {
        self.post
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Times of the first and last key, if any.
    pub fn time_range(&self) -> Option<(f32, f32)> {
        match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        }
    }

    /// Evaluate the curve at `time` with default numeric settings.
    #[inline]
    pub fn eval(&self, time: f32) -> f32 {
        self.eval_with(time, &EvalConfig::default())
    }

    /// Evaluate the curve at `time`.
    ///
    /// - No keys: 0.
    /// - One key: that key's value everywhere.
    /// - Outside the keyed span the pre/post behavior applies; periodic
    ///   behaviors fold time back into the span before interpolating.
    pub fn eval_with(&self, time: f32, cfg: &EvalConfig) -> f32 {
        let (first, last) = match self.keys.as_slice() {
            [] => return 0.0,
            [only] => return only.value,
            [first, .., last] => (first, last),
        };

        let mut time = time;
        let mut offset = 0.0;

        if time < first.time {
            match self.pre {
                Behavior::Reset => return 0.0,
                Behavior::Constant => return first.value,
                Behavior::Linear => return self.extend_before(time),
                periodic => (time, offset) = fold(periodic, time, first, last),
            }
        } else if time > last.time {
            match self.post {
                Behavior::Reset => return 0.0,
                Behavior::Constant => return last.value,
                Behavior::Linear => return self.extend_after(time),
                periodic => (time, offset) = fold(periodic, time, first, last),
            }
        }

        self.interpolate(time, offset, cfg)
    }

    /// Straight-line continuation before the first key, along its outgoing tangent.
    fn extend_before(&self, time: f32) -> f32 {
        debug_assert!(self.keys.len() >= 2, "linear extrapolation needs two keys");
        let first = &self.keys[0];
        let second = &self.keys[1];
        let slope = outgoing_tangent(None, first, second) / (second.time - first.time);
        first.value + slope * (time - first.time)
    }

    /// Straight-line continuation after the last key, along its incoming tangent.
    fn extend_after(&self, time: f32) -> f32 {
        debug_assert!(self.keys.len() >= 2, "linear extrapolation needs two keys");
        let n = self.keys.len();
        let prev = &self.keys[n - 2];
        let last = &self.keys[n - 1];
        let slope = incoming_tangent(prev, last, None) / (last.time - prev.time);
        last.value + slope * (time - last.time)
    }

    fn interpolate(&self, time: f32, offset: f32, cfg: &EvalConfig) -> f32 {
        if time.is_nan() {
            return f32::NAN;
        }

        let i = self
            .keys
            .windows(2)
            .position(|w| w[0].time <= time && time <= w[1].time)
            .unwrap_or_else(|| {
                panic!("envelope keys must be finite and ascending; no span contains time {time}")
            });
        let key0 = &self.keys[i];
        let key1 = &self.keys[i + 1];
        let prev = i.checked_sub(1).map(|j| &self.keys[j]);
        let next = self.keys.get(i + 2);

        // exact key hits also keep the division below away from zero-length spans
        if time == key0.time {
            return key0.value + offset;
        }
        if time == key1.time {
            return key1.value + offset;
        }

        let t = (time - key0.time) / (key1.time - key0.time);

        match key1.shape {
            Shape::Tcb | Shape::Hermite | Shape::Bezier1D => {
                let out = outgoing_tangent(prev, key0, key1);
                let inc = incoming_tangent(key0, key1, next);
                let (h1, h2, h3, h4) = hermite_basis(t);
                h1 * key0.value + h2 * key1.value + h3 * out + h4 * inc + offset
            }
            Shape::Bezier2D => bezier2_value(key0, key1, time, cfg) + offset,
            Shape::Linear => key0.value + t * (key1.value - key0.value) + offset,
            Shape::Stepped => key0.value + offset,
        }
    }
}

/// Fold an out-of-span time for a periodic behavior.
/// Returns the in-span time and the value offset to add to the result.
fn fold(behavior: Behavior, time: f32, first: &Keyframe, last: &Keyframe) -> (f32, f32) {
    let (folded, cycles) = range(time, first.time, last.time);
    match behavior {
        // mirrored about the span midpoint rather than about zero, so keys
        // starting after t=0 still fold back inside the span
        Behavior::Oscillate if cycles % 2 != 0 => (first.time + last.time - folded, 0.0),
        Behavior::OffsetRepeat => (folded, cycles as f32 * (last.value - first.value)),
        _ => (folded, 0.0),
    }
}

impl Extend<Keyframe> for Envelope {
    fn extend<I: IntoIterator<Item = Keyframe>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
