//! One-entry memoization around envelope evaluation.
//!
//! Players that sample the same envelope repeatedly at one instant (several
//! consumers per frame) skip re-evaluation. The cache never changes results.

use crate::config::EvalConfig;
use crate::envelope::Envelope;

/// An [`Envelope`] with the most recent `(time, value)` pair remembered.
///
/// The cache is keyed on the requested time, never on a time folded by a
/// periodic behavior.
#[derive(Clone, Debug, Default)]
pub struct CachedEnvelope {
    envelope: Envelope,
    config: EvalConfig,
    last: Option<(f32, f32)>,
}

impl CachedEnvelope {
    pub fn new(envelope: Envelope) -> Self {
        Self::with_config(envelope, EvalConfig::default())
    }

    pub fn with_config(envelope: Envelope, config: EvalConfig) -> Self {
        Self {
            envelope,
            config,
            last: None,
        }
    }

    pub fn eval(&mut self, time: f32) -> f32 {
        if let Some((last_time, last_value)) = self.last {
            if last_time == time {
                return last_value;
            }
        }
        let value = self.envelope.eval_with(time, &self.config);
        self.last = Some((time, value));
        value
    }

    /// Most recent `(time, value)` evaluation, if any.
    #[inline]
    pub fn last_eval(&self) -> Option<(f32, f32)> {
        self.last
    }

    #[inline]
    pub fn clear(&mut self) {
        self.last = None;
    }

    #[inline]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    #[inline]
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn into_inner(self) -> Envelope {
        self.envelope
    }
}

impl From<Envelope> for CachedEnvelope {
    fn from(envelope: Envelope) -> Self {
        Self::new(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Behavior;
    use crate::keyframe::Keyframe;

    fn wave() -> Envelope {
        let mut env = Envelope::new();
        env.insert(Keyframe::tcb(0.0, 0.0, 0.0, 0.0, 0.0));
        env.insert(Keyframe::tcb(1.0, 0.5, 0.0, 0.0, 0.0));
        env.insert(Keyframe::tcb(-1.0, 1.5, 0.0, 0.0, 0.0));
        env.insert(Keyframe::tcb(2.0, 2.0, 0.0, 0.0, 0.0));
        env.set_behaviors(Behavior::Repeat, Behavior::OffsetRepeat);
        env
    }

    #[test]
    fn starts_empty() {
        let cached = CachedEnvelope::new(wave());
        assert_eq!(cached.last_eval(), None);
    }

    #[test]
    fn repeated_eval_is_bit_identical() {
        let env = wave();
        let mut cached = CachedEnvelope::from(env.clone());
        for t in [-3.3, 0.7, 0.7, 2.9, 2.9, 5.0] {
            let a = cached.eval(t);
            let b = cached.eval(t);
            assert_eq!(a.to_bits(), b.to_bits());
            assert_eq!(a.to_bits(), env.eval(t).to_bits());
        }
    }

    #[test]
    fn remembers_requested_time_not_folded_time() {
        let mut cached = CachedEnvelope::new(wave());
        let v = cached.eval(4.25);
        assert_eq!(cached.last_eval(), Some((4.25, v)));
        // 0.25 folds to the same span position but lacks the offset
        let folded = cached.eval(0.25);
        assert_ne!(folded, v);
    }

    #[test]
    fn infinite_time_is_not_served_from_an_empty_cache() {
        let mut env = Envelope::new();
        env.insert(Keyframe::linear(1.0, 0.0));
        env.insert(Keyframe::linear(3.0, 1.0));
        env.set_behaviors(Behavior::Constant, Behavior::Constant);
        let mut cached = CachedEnvelope::new(env);
        assert_eq!(cached.eval(f32::INFINITY), 3.0);
        cached.clear();
        assert_eq!(cached.last_eval(), None);
    }
}
