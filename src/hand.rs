//! Hand observations delivered by the sensing pipeline.
//!
//! Observations arrive as [`RawHandObservation`], a loose serde shape in
//! which every field may be missing. [`RawHandObservation::validate`] turns
//! one into a [`HandObservation`] with all positions present and finite, or
//! reports why it cannot.
//!
//! All positions are normalized: `x` and `y` in `[0, 1]` of the canvas,
//! `z` a relative depth that the simulation does not use.

use std::fmt;
use std::str::FromStr;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::HandError;

/// Fingertip identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// Every finger, in landmark order.
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Finger::Thumb => "thumb",
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }

    /// Force multiplier for this finger's push.
    pub fn strength(&self) -> f32 {
        match self {
            Finger::Thumb => 1.5,
            Finger::Index => 1.3,
            Finger::Middle => 1.2,
            Finger::Ring => 1.0,
            Finger::Pinky => 0.8,
        }
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

impl FromStr for Finger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Finger::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown finger '{}'", s))
    }
}

/// Classified hand pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gesture {
    Grab,
    Push,
    Spread,
    Wave,
    #[default]
    None,
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Grab => "grab",
            Gesture::Push => "push",
            Gesture::Spread => "spread",
            Gesture::Wave => "wave",
            Gesture::None => "none",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gesture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grab" => Ok(Gesture::Grab),
            "push" => Ok(Gesture::Push),
            "spread" => Ok(Gesture::Spread),
            "wave" => Ok(Gesture::Wave),
            "none" => Ok(Gesture::None),
            _ => Err(format!("unknown gesture '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

impl Handedness {
    fn parse(label: Option<&str>) -> Self {
        match label.map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "left" => Handedness::Left,
            Some(s) if s == "right" => Handedness::Right,
            _ => Handedness::Unknown,
        }
    }

    fn label(&self) -> Option<&'static str> {
        match self {
            Handedness::Left => Some("Left"),
            Handedness::Right => Some("Right"),
            Handedness::Unknown => None,
        }
    }
}

/// The five fingertip positions of one hand, indexed by [`Finger`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fingertips([Vec3; 5]);

impl Fingertips {
    /// Positions in [`Finger::ALL`] order.
    pub fn new(positions: [Vec3; 5]) -> Self {
        Self(positions)
    }

    /// Tips fanned over the upper half circle of radius `reach` around
    /// `palm`, thumb on the left. Useful for synthetic hands.
    pub fn splayed(palm: Vec2, reach: f32) -> Self {
        let mut tips = [Vec3::ZERO; 5];
        for (i, tip) in tips.iter_mut().enumerate() {
            let angle = std::f32::consts::PI * (1.0 + i as f32 / 4.0);
            let p = palm + Vec2::from_angle(angle) * reach;
            *tip = p.extend(0.0);
        }
        Self(tips)
    }

    pub fn get(&self, finger: Finger) -> Vec3 {
        self.0[finger.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Finger, Vec3)> + '_ {
        Finger::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    /// Mean planar position of the tips.
    pub fn centroid(&self) -> Vec2 {
        self.0.iter().map(|p| p.truncate()).sum::<Vec2>() / 5.0
    }
}

/// A validated hand observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandObservation {
    pub palm: Vec3,
    pub fingertips: Fingertips,
    pub gesture: Gesture,
    pub handedness: Handedness,
}

impl HandObservation {
    pub fn new(palm: Vec3, fingertips: Fingertips, gesture: Gesture) -> Self {
        Self {
            palm,
            fingertips,
            gesture,
            handedness: Handedness::Unknown,
        }
    }

    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }
}

/// Point as delivered on the wire. Any coordinate may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl RawPoint {
    fn validate(&self, hand_index: usize, what: &str) -> Result<Vec3, HandError> {
        let coord = |v: Option<f32>, axis: &str| match v {
            Some(v) if v.is_finite() => Ok(v),
            Some(_) => Err(HandError::malformed(
                hand_index,
                format!("{}.{} is not finite", what, axis),
            )),
            None => Err(HandError::malformed(
                hand_index,
                format!("{}.{} is missing", what, axis),
            )),
        };
        let x = coord(self.x, "x")?;
        let y = coord(self.y, "y")?;
        let z = match self.z {
            None => 0.0,
            Some(_) => coord(self.z, "z")?,
        };
        Ok(Vec3::new(x, y, z))
    }
}

impl From<Vec3> for RawPoint {
    fn from(v: Vec3) -> Self {
        Self {
            x: Some(v.x),
            y: Some(v.y),
            z: Some(v.z),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFinger {
    pub finger: Option<String>,
    pub position: Option<RawPoint>,
}

/// Hand observation as delivered by the sensing pipeline.
///
/// ```json
/// {
///   "handedness": "Left",
///   "gestureType": "grab",
///   "palmPosition": { "x": 0.5, "y": 0.5, "z": 0.0 },
///   "fingerPositions": [ { "finger": "thumb", "position": { "x": 0.45, "y": 0.4 } } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHandObservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handedness: Option<String>,
    pub gesture_type: Option<String>,
    pub palm_position: Option<RawPoint>,
    pub finger_positions: Option<Vec<RawFinger>>,
}

impl RawHandObservation {
    /// Check every field and convert. `hand_index` is the observation's
    /// position in its frame, used in error reports.
    pub fn validate(&self, hand_index: usize) -> Result<HandObservation, HandError> {
        let palm = self
            .palm_position
            .as_ref()
            .ok_or_else(|| HandError::malformed(hand_index, "missing palmPosition"))?
            .validate(hand_index, "palmPosition")?;

        let gesture = self
            .gesture_type
            .as_deref()
            .ok_or_else(|| HandError::malformed(hand_index, "missing gestureType"))?
            .parse::<Gesture>()
            .map_err(|reason| HandError::malformed(hand_index, reason))?;

        let raw_tips = self
            .finger_positions
            .as_ref()
            .ok_or_else(|| HandError::malformed(hand_index, "missing fingerPositions"))?;
        if raw_tips.len() != Finger::ALL.len() {
            return Err(HandError::malformed(
                hand_index,
                format!("expected 5 fingertips, got {}", raw_tips.len()),
            ));
        }

        let mut tips: [Option<Vec3>; 5] = [None; 5];
        for raw in raw_tips {
            let name = raw
                .finger
                .as_deref()
                .ok_or_else(|| HandError::malformed(hand_index, "fingertip without a finger name"))?;
            let finger = name
                .parse::<Finger>()
                .map_err(|reason| HandError::malformed(hand_index, reason))?;
            let label = format!("fingerPositions[{}]", finger.name());
            let position = raw
                .position
                .as_ref()
                .ok_or_else(|| HandError::malformed(hand_index, format!("{} is missing", label)))?
                .validate(hand_index, &label)?;
            let slot = &mut tips[finger.slot()];
            if slot.is_some() {
                return Err(HandError::malformed(
                    hand_index,
                    format!("duplicate finger '{}'", finger.name()),
                ));
            }
            *slot = Some(position);
        }

        // Five entries, no duplicates, so every slot is filled.
        let tips = tips.map(|t| t.unwrap_or(Vec3::ZERO));

        Ok(HandObservation {
            palm,
            fingertips: Fingertips::new(tips),
            gesture,
            handedness: Handedness::parse(self.handedness.as_deref()),
        })
    }
}

impl From<&HandObservation> for RawHandObservation {
    fn from(hand: &HandObservation) -> Self {
        Self {
            handedness: hand.handedness.label().map(str::to_string),
            gesture_type: Some(hand.gesture.name().to_string()),
            palm_position: Some(hand.palm.into()),
            finger_positions: Some(
                hand.fingertips
                    .iter()
                    .map(|(finger, position)| RawFinger {
                        finger: Some(finger.name().to_string()),
                        position: Some(position.into()),
                    })
                    .collect(),
            ),
        }
    }
}
