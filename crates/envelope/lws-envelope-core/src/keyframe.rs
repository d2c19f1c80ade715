//! Keyframe record and interpolation shapes.
//!
//! A key's shape governs the span arriving at it from the previous key, and
//! also decides how its own tangents are derived for the neighbouring spans.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;

/// Interpolation basis stored on a key. Discriminants match the LightWave
/// scene-file shape codes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Kochanek-Bartels spline (tension/continuity/bias).
    #[default]
    Tcb = 0,
    Hermite = 1,
    /// One-dimensional Bezier; tangents behave exactly like Hermite.
    #[serde(rename = "bezier")]
    Bezier1D = 2,
    Linear = 3,
    Stepped = 4,
    /// Two-dimensional Bezier with explicit time/value control handles.
    #[serde(rename = "bezier2")]
    Bezier2D = 5,
}

impl Shape {
    /// LightWave scene-file code for this shape.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Tcb => "tcb",
            Shape::Hermite => "hermite",
            Shape::Bezier1D => "bezier",
            Shape::Linear => "linear",
            Shape::Stepped => "stepped",
            Shape::Bezier2D => "bezier2",
        }
    }
}

impl TryFrom<u32> for Shape {
    type Error = EnvelopeError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Shape::Tcb),
            1 => Ok(Shape::Hermite),
            2 => Ok(Shape::Bezier1D),
            3 => Ok(Shape::Linear),
            4 => Ok(Shape::Stepped),
            5 => Ok(Shape::Bezier2D),
            other => Err(EnvelopeError::UnknownShape(other)),
        }
    }
}

impl FromStr for Shape {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcb" => Ok(Shape::Tcb),
            "hermite" => Ok(Shape::Hermite),
            "bezier" | "bezier1d" => Ok(Shape::Bezier1D),
            "linear" => Ok(Shape::Linear),
            "stepped" | "step" => Ok(Shape::Stepped),
            "bezier2" | "bezier2d" => Ok(Shape::Bezier2D),
            _ => Err(EnvelopeError::UnknownShapeName(s.to_string())),
        }
    }
}

/// A single envelope sample plus its shape parameters.
///
/// `params` holds the six LightWave key parameters p1..p6:
/// - TCB/Hermite/Bezier1D: tension, continuity, bias, incoming tangent,
///   outgoing tangent, unused.
/// - Bezier2D: incoming handle (time, value) offsets, outgoing handle
///   (time, value) offsets, two unused slots.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub value: f32,
    pub time: f32,
    #[serde(default)]
    pub shape: Shape,
    #[serde(default)]
    pub params: [f32; 6],
}

impl Keyframe {
    /// Key with all shape parameters zeroed.
    pub fn new(value: f32, time: f32, shape: Shape) -> Self {
        Self {
            value,
            time,
            shape,
            params: [0.0; 6],
        }
    }

    pub fn with_params(mut self, params: [f32; 6]) -> Self {
        self.params = params;
        self
    }

    pub fn tcb(value: f32, time: f32, tension: f32, continuity: f32, bias: f32) -> Self {
        Self::new(value, time, Shape::Tcb).with_params([tension, continuity, bias, 0.0, 0.0, 0.0])
    }

    pub fn hermite(value: f32, time: f32, incoming: f32, outgoing: f32) -> Self {
        Self::new(value, time, Shape::Hermite).with_params([0.0, 0.0, 0.0, incoming, outgoing, 0.0])
    }

    pub fn bezier1d(value: f32, time: f32, incoming: f32, outgoing: f32) -> Self {
        Self::new(value, time, Shape::Bezier1D).with_params([0.0, 0.0, 0.0, incoming, outgoing, 0.0])
    }

    pub fn linear(value: f32, time: f32) -> Self {
        Self::new(value, time, Shape::Linear)
    }

    pub fn stepped(value: f32, time: f32) -> Self {
        Self::new(value, time, Shape::Stepped)
    }

    /// Bezier2D key with incoming and outgoing handles given as `(time, value)` offsets.
    pub fn bezier2d(value: f32, time: f32, incoming: (f32, f32), outgoing: (f32, f32)) -> Self {
        Self::new(value, time, Shape::Bezier2D).with_params([
            incoming.0, incoming.1, outgoing.0, outgoing.1, 0.0, 0.0,
        ])
    }

    #[inline]
    pub fn tension(&self) -> f32 {
        self.params[0]
    }

    #[inline]
    pub fn continuity(&self) -> f32 {
        self.params[1]
    }

    #[inline]
    pub fn bias(&self) -> f32 {
        self.params[2]
    }

    /// Stored incoming tangent (Hermite/Bezier1D).
    #[inline]
    pub fn incoming_tangent(&self) -> f32 {
        self.params[3]
    }

    /// Stored outgoing tangent (Hermite/Bezier1D).
    #[inline]
    pub fn outgoing_tangent(&self) -> f32 {
        self.params[4]
    }

    /// Incoming Bezier2D handle as `(time, value)` offsets.
    #[inline]
    pub fn incoming_handle(&self) -> (f32, f32) {
        (self.params[0], self.params[1])
    }

    /// Outgoing Bezier2D handle as `(time, value)` offsets.
    #[inline]
    pub fn outgoing_handle(&self) -> (f32, f32) {
        (self.params[2], self.params[3])
    }

    pub(crate) fn non_finite_field(&self) -> Option<&'static str> {
        if !self.value.is_finite() {
            Some("value")
        } else if !self.time.is_finite() {
            Some("time")
        } else if self.params.iter().any(|p| !p.is_finite()) {
            Some("parameter")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_codes_follow_scene_file_order() {
        for code in 0..6 {
            let shape = Shape::try_from(code).unwrap();
            assert_eq!(shape.code(), code);
        }
        assert_eq!(Shape::try_from(6), Err(EnvelopeError::UnknownShape(6)));
    }

    #[test]
    fn shape_names_parse_case_insensitively() {
        assert_eq!("TCB".parse::<Shape>().unwrap(), Shape::Tcb);
        assert_eq!("bezier2d".parse::<Shape>().unwrap(), Shape::Bezier2D);
        assert_eq!(Shape::Bezier1D.name().parse::<Shape>().unwrap(), Shape::Bezier1D);
        assert!("spline".parse::<Shape>().is_err());
    }

    #[test]
    fn constructors_place_params_in_lightwave_slots() {
        let k = Keyframe::tcb(1.0, 0.5, 0.1, 0.2, 0.3);
        assert_eq!((k.tension(), k.continuity(), k.bias()), (0.1, 0.2, 0.3));

        let k = Keyframe::hermite(0.0, 0.0, 2.0, 3.0);
        assert_eq!(k.incoming_tangent(), 2.0);
        assert_eq!(k.outgoing_tangent(), 3.0);

        let k = Keyframe::bezier2d(0.0, 0.0, (-0.25, 1.0), (0.25, -1.0));
        assert_eq!(k.incoming_handle(), (-0.25, 1.0));
        assert_eq!(k.outgoing_handle(), (0.25, -1.0));
        assert_eq!(k.params, [-0.25, 1.0, 0.25, -1.0, 0.0, 0.0]);
    }

    #[test]
    fn non_finite_fields_are_reported() {
        assert_eq!(Keyframe::linear(0.0, 0.0).non_finite_field(), None);
        assert_eq!(Keyframe::linear(f32::NAN, 0.0).non_finite_field(), Some("value"));
        assert_eq!(Keyframe::linear(0.0, f32::INFINITY).non_finite_field(), Some("time"));
        let k = Keyframe::linear(0.0, 0.0).with_params([0.0, f32::NAN, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(k.non_finite_field(), Some("parameter"));
    }
}
