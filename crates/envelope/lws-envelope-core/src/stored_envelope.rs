use serde::Deserialize;
use serde_json::json;

use crate::behavior::Behavior;
use crate::envelope::Envelope;
use crate::error::EnvelopeError;
use crate::keyframe::{Keyframe, Shape};
use crate::motion::{Channel, Motion};

/// Public API: parse envelope JSON into a validated [`Envelope`].
///
/// Notes:
/// - `shape`, `pre` and `post` accept either the scene-file integer code or a
///   name (`"tcb"`, `"bezier2"`, `"offset_repeat"`, ...).
/// - `params` may list fewer than six values; missing slots are zero.
/// - Omitted behaviors default to `reset`, omitted shapes to `tcb`.
/// - Keys must be finite and strictly ascending in time.
pub fn parse_envelope_json(s: &str) -> Result<Envelope, EnvelopeError> {
    let raw: StoredEnvelope = serde_json::from_str(s)?;
    raw.into_envelope()
}

/// Public API: parse motion JSON (a list of channel envelopes) into a [`Motion`].
pub fn parse_motion_json(s: &str) -> Result<Motion, EnvelopeError> {
    let raw: StoredMotion = serde_json::from_str(s)?;
    let mut motion = Motion::new();
    for entry in raw.channels {
        let channel = entry.channel.to_channel()?;
        let envelope = entry.envelope.into_envelope()?;
        if motion.set_channel(channel, envelope).is_some() {
            return Err(EnvelopeError::DuplicateChannel(channel.index() as u32));
        }
    }
    Ok(motion)
}

/// Export an envelope in the same schema [`parse_envelope_json`] reads.
pub fn export_envelope_json(envelope: &Envelope) -> serde_json::Value {
    serde_json::to_value(envelope).unwrap_or(serde_json::Value::Null)
}

/// Export a motion in the same schema [`parse_motion_json`] reads.
pub fn export_motion_json(motion: &Motion) -> serde_json::Value {
    let channels: Vec<serde_json::Value> = motion
        .channels()
        .map(|(channel, env)| {
            json!({
                "channel": channel,
                "envelope": export_envelope_json(env),
            })
        })
        .collect();
    json!({ "channels": channels })
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct StoredEnvelope {
    #[serde(default)]
    keys: Vec<StoredKey>,
    #[serde(default)]
    pre: Option<RawCode>,
    #[serde(default)]
    post: Option<RawCode>,
}

impl StoredEnvelope {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        let pre = self
            .pre
            .map(|c| c.to_behavior())
            .transpose()?
            .unwrap_or_default();
        let post = self
            .post
            .map(|c| c.to_behavior())
            .transpose()?
            .unwrap_or_default();

        let mut keys = Vec::with_capacity(self.keys.len());
        for (index, k) in self.keys.into_iter().enumerate() {
            keys.push(k.to_keyframe(index)?);
        }
        Envelope::from_keys(keys, pre, post)
    }
}

#[derive(Debug, Deserialize)]
struct StoredKey {
    value: f32,
    time: f32,
    #[serde(default)]
    shape: Option<RawCode>,
    #[serde(default)]
    params: Vec<f32>,
}

impl StoredKey {
    fn to_keyframe(&self, index: usize) -> Result<Keyframe, EnvelopeError> {
        if self.params.len() > 6 {
            return Err(EnvelopeError::TooManyParams {
                index,
                count: self.params.len(),
            });
        }
        let shape = match &self.shape {
            Some(code) => code.to_shape()?,
            None => Shape::default(),
        };
        let mut params = [0.0; 6];
        params[..self.params.len()].copy_from_slice(&self.params);
        Ok(Keyframe::new(self.value, self.time, shape).with_params(params))
    }
}

#[derive(Debug, Deserialize)]
struct StoredMotion {
    channels: Vec<StoredChannel>,
}

#[derive(Debug, Deserialize)]
struct StoredChannel {
    channel: RawCode,
    envelope: StoredEnvelope,
}

/// Scene-file integer code or symbolic name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCode {
    Code(u32),
    Name(String),
}

impl RawCode {
    fn to_shape(&self) -> Result<Shape, EnvelopeError> {
        match self {
            RawCode::Code(c) => Shape::try_from(*c),
            RawCode::Name(n) => n.parse(),
        }
    }

    fn to_behavior(&self) -> Result<Behavior, EnvelopeError> {
        match self {
            RawCode::Code(c) => Behavior::try_from(*c),
            RawCode::Name(n) => n.parse(),
        }
    }

    fn to_channel(&self) -> Result<Channel, EnvelopeError> {
        match self {
            RawCode::Code(c) => Channel::try_from(*c),
            RawCode::Name(n) => serde_json::from_value(serde_json::Value::String(n.clone()))
                .map_err(|_| EnvelopeError::Parse(format!("unknown motion channel '{n}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names() {
        let env = parse_envelope_json(
            r#"{
                "pre": 1,
                "post": "offset_repeat",
                "keys": [
                    { "value": 0, "time": 0, "shape": 3 },
                    { "value": 2, "time": 1, "shape": "hermite", "params": [0, 0, 0, 1.5, -0.5] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(env.pre(), Behavior::Constant);
        assert_eq!(env.post(), Behavior::OffsetRepeat);
        assert_eq!(env.keys()[0].shape, Shape::Linear);
        assert_eq!(env.keys()[1].incoming_tangent(), 1.5);
        assert_eq!(env.keys()[1].outgoing_tangent(), -0.5);
        assert_eq!(env.keys()[1].params[5], 0.0);
    }

    #[test]
    fn defaults_apply_when_omitted() {
        let env = parse_envelope_json(r#"{ "keys": [ { "value": 3, "time": 0 } ] }"#).unwrap();
        assert_eq!(env.pre(), Behavior::Reset);
        assert_eq!(env.post(), Behavior::Reset);
        assert_eq!(env.keys()[0].shape, Shape::Tcb);
        assert_eq!(env.eval(10.0), 3.0);
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = parse_envelope_json(r#"{ "keys": [ { "value": 0, "time": 0, "shape": 7 } ] }"#)
            .unwrap_err();
        assert_eq!(err, EnvelopeError::UnknownShape(7));

        let err = parse_envelope_json(r#"{ "pre": "bounce", "keys": [] }"#).unwrap_err();
        assert_eq!(err, EnvelopeError::UnknownBehaviorName("bounce".into()));
    }

    #[test]
    fn rejects_unsorted_and_oversized_keys() {
        let err = parse_envelope_json(
            r#"{ "keys": [ { "value": 0, "time": 1 }, { "value": 0, "time": 0.5 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, EnvelopeError::UnsortedKey { index: 1, .. }));

        let err = parse_envelope_json(
            r#"{ "keys": [ { "value": 0, "time": 0, "params": [0, 0, 0, 0, 0, 0, 0] } ] }"#,
        )
        .unwrap_err();
        assert_eq!(err, EnvelopeError::TooManyParams { index: 0, count: 7 });
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            parse_envelope_json("{ keys: "),
            Err(EnvelopeError::Parse(_))
        ));
    }

    #[test]
    fn export_reads_back() {
        let mut env = Envelope::new();
        env.insert(Keyframe::bezier2d(0.0, 0.0, (0.0, 0.0), (0.3, 0.1)));
        env.insert(Keyframe::tcb(1.0, 1.0, 0.2, -0.1, 0.4));
        env.set_behaviors(Behavior::Oscillate, Behavior::Linear);
        let text = export_envelope_json(&env).to_string();
        assert_eq!(parse_envelope_json(&text).unwrap(), env);
    }

    #[test]
    fn motion_channels_by_index_or_name() {
        let motion = parse_motion_json(
            r#"{ "channels": [
                { "channel": 1, "envelope": { "keys": [ { "value": 5, "time": 0 } ] } },
                { "channel": "scale_x", "envelope": { "keys": [ { "value": 2, "time": 0 } ] } }
            ] }"#,
        )
        .unwrap();
        let s = motion.eval(0.0);
        assert_eq!(s.position, [0.0, 5.0, 0.0]);
        assert_eq!(s.scale, [2.0, 1.0, 1.0]);

        let text = export_motion_json(&motion).to_string();
        assert_eq!(parse_motion_json(&text).unwrap(), motion);
    }

    #[test]
    fn motion_rejects_duplicate_channels() {
        let err = parse_motion_json(
            r#"{ "channels": [
                { "channel": 3, "envelope": { "keys": [] } },
                { "channel": "heading", "envelope": { "keys": [] } }
            ] }"#,
        )
        .unwrap_err();
        assert_eq!(err, EnvelopeError::DuplicateChannel(3));
    }
}
