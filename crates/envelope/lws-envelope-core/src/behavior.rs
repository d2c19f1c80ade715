//! Pre/post extrapolation behaviors and the periodic range fold they share.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;

/// What an envelope does before its first key or after its last key.
/// Discriminants match the LightWave scene-file behavior codes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Evaluates to zero.
    #[default]
    Reset = 0,
    /// Holds the boundary key's value.
    Constant = 1,
    /// Loops the keyed span.
    Repeat = 2,
    /// Loops the keyed span, reversing direction on every other cycle.
    Oscillate = 3,
    /// Loops the keyed span, shifting each cycle by the span's value change.
    OffsetRepeat = 4,
    /// Continues along the boundary key's tangent.
    Linear = 5,
}

impl Behavior {
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// True for the behaviors that fold time back into the keyed span.
    #[inline]
    pub fn is_periodic(self) -> bool {
        matches!(
            self,
            Behavior::Repeat | Behavior::Oscillate | Behavior::OffsetRepeat
        )
    }
}

impl TryFrom<u32> for Behavior {
    type Error = EnvelopeError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Behavior::Reset),
            1 => Ok(Behavior::Constant),
            2 => Ok(Behavior::Repeat),
            3 => Ok(Behavior::Oscillate),
            4 => Ok(Behavior::OffsetRepeat),
            5 => Ok(Behavior::Linear),
            other => Err(EnvelopeError::UnknownBehavior(other)),
        }
    }
}

impl FromStr for Behavior {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "reset" => Ok(Behavior::Reset),
            "constant" => Ok(Behavior::Constant),
            "repeat" => Ok(Behavior::Repeat),
            "oscillate" => Ok(Behavior::Oscillate),
            "offsetrepeat" => Ok(Behavior::OffsetRepeat),
            "linear" => Ok(Behavior::Linear),
            _ => Err(EnvelopeError::UnknownBehaviorName(s.to_string())),
        }
    }
}

/// Fold `v` into the half-open period `[lo, hi)`.
///
/// Returns the folded value and the signed number of whole periods between
/// `v` and the fold (negative before `lo`, positive after `hi`). A zero-length
/// period folds everything onto `lo` with a count of zero.
pub fn range(v: f32, lo: f32, hi: f32) -> (f32, i32) {
    let r = hi - lo;
    if r == 0.0 {
        return (lo, 0);
    }
    let v2 = v - r * ((v - lo) / r).floor();
    let count = -((v2 - v) / r).round() as i32;
    // floor() is exact but the subtraction is not; keep the fold inside the span
    let v2 = if v2 < lo {
        lo
    } else if v2 > hi {
        hi
    } else {
        v2
    };
    (v2, count)
}
