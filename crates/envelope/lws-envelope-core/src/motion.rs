//! Nine-channel item motion: the position, rotation and scale envelopes of a
//! single scene item, evaluated together.

use serde::{Deserialize, Serialize};

use crate::config::EvalConfig;
use crate::envelope::Envelope;
use crate::error::EnvelopeError;

/// Motion channel; discriminants are the scene-file channel indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    PositionX = 0,
    PositionY = 1,
    PositionZ = 2,
    Heading = 3,
    Pitch = 4,
    Bank = 5,
    ScaleX = 6,
    ScaleY = 7,
    ScaleZ = 8,
}

impl Channel {
    pub const ALL: [Channel; 9] = [
        Channel::PositionX,
        Channel::PositionY,
        Channel::PositionZ,
        Channel::Heading,
        Channel::Pitch,
        Channel::Bank,
        Channel::ScaleX,
        Channel::ScaleY,
        Channel::ScaleZ,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Value used when the channel has no envelope.
    #[inline]
    pub fn rest_value(self) -> f32 {
        match self {
            Channel::ScaleX | Channel::ScaleY | Channel::ScaleZ => 1.0,
            _ => 0.0,
        }
    }
}

impl TryFrom<u32> for Channel {
    type Error = EnvelopeError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Channel::ALL
            .get(index as usize)
            .copied()
            .ok_or(EnvelopeError::UnknownChannel(index))
    }
}

/// Evaluated motion at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub position: [f32; 3],
    /// Heading, pitch, bank.
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for MotionSample {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl MotionSample {
    fn set(&mut self, channel: Channel, value: f32) {
        let i = channel.index();
        match i {
            0..=2 => self.position[i] = value,
            3..=5 => self.rotation[i - 3] = value,
            _ => self.scale[i - 6] = value,
        }
    }

    pub fn get(&self, channel: Channel) -> f32 {
        let i = channel.index();
        match i {
            0..=2 => self.position[i],
            3..=5 => self.rotation[i - 3],
            _ => self.scale[i - 6],
        }
    }
}

/// Per-channel envelopes of one item. Channels without an envelope sit at rest.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Motion {
    channels: [Option<Envelope>; 9],
}

impl Motion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `envelope` on `channel`, returning the envelope it replaced.
    pub fn set_channel(&mut self, channel: Channel, envelope: Envelope) -> Option<Envelope> {
        self.channels[channel.index()].replace(envelope)
    }

    pub fn channel(&self, channel: Channel) -> Option<&Envelope> {
        self.channels[channel.index()].as_ref()
    }

    /// Channels that carry an envelope, in channel order.
    pub fn channels(&self) -> impl Iterator<Item = (Channel, &Envelope)> {
        Channel::ALL
            .iter()
            .zip(self.channels.iter())
            .filter_map(|(c, env)| env.as_ref().map(|env| (*c, env)))
    }

    /// Earliest first key and latest last key across all channels.
    pub fn time_range(&self) -> Option<(f32, f32)> {
        self.channels()
            .filter_map(|(_, env)| env.time_range())
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }

    pub fn eval(&self, time: f32) -> MotionSample {
        self.eval_with(time, &EvalConfig::default())
    }

    pub fn eval_with(&self, time: f32, cfg: &EvalConfig) -> MotionSample {
        let mut sample = MotionSample::default();
        for (channel, env) in self.channels() {
            sample.set(channel, env.eval_with(time, cfg));
        }
        sample
    }
}
