//! Recorded hand input.
//!
//! A replay is a JSON array of frames; each frame is the array of raw hand
//! observations delivered for one tick, in the same shape the sensing
//! pipeline produces. Empty frames mean no hands that tick.
//!
//! ```json
//! [
//!   [],
//!   [ { "gestureType": "push", "palmPosition": { "x": 0.5, "y": 0.5 }, "fingerPositions": [ ... ] } ]
//! ]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hand::{HandObservation, RawHandObservation};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandReplay {
    frames: Vec<Vec<RawHandObservation>>,
}

impl HandReplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Append one tick's worth of hands.
    pub fn record(&mut self, hands: &[HandObservation]) {
        self.frames
            .push(hands.iter().map(RawHandObservation::from).collect());
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Hands for tick `index`; empty past the end of the recording.
    pub fn frame(&self, index: usize) -> &[RawHandObservation] {
        self.frames.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn frames(&self) -> impl Iterator<Item = &[RawHandObservation]> {
        self.frames.iter().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{Fingertips, Gesture};
    use glam::{Vec2, Vec3};

    #[test]
    fn test_parse_frames() {
        let json = r#"[
            [],
            [ { "gestureType": "push", "palmPosition": { "x": 0.5, "y": 0.5 } } ]
        ]"#;
        let replay = HandReplay::from_json(json).unwrap();
        assert_eq!(replay.len(), 2);
        assert!(replay.frame(0).is_empty());
        assert_eq!(replay.frame(1)[0].gesture_type.as_deref(), Some("push"));
        // Parsed fine; the missing fingertips are caught at validation.
        assert!(replay.frame(1)[0].validate(0).is_err());
        assert!(replay.frame(10).is_empty());
    }

    #[test]
    fn test_record_then_reload() {
        let hand = HandObservation::new(
            Vec3::new(0.3, 0.6, 0.0),
            Fingertips::splayed(Vec2::new(0.3, 0.6), 0.05),
            Gesture::Spread,
        );
        let mut replay = HandReplay::new();
        replay.record(&[hand]);
        replay.record(&[]);

        let path = std::env::temp_dir().join(format!("tactile-replay-{}.json", std::process::id()));
        replay.save(&path).unwrap();
        let loaded = HandReplay::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.len(), 2);
        let back = loaded.frame(0)[0].validate(0).unwrap();
        assert_eq!(back.gesture, Gesture::Spread);
        assert!((back.palm - hand.palm).length() < 1e-6);
    }

    #[test]
    fn test_not_an_array_is_json_error() {
        assert!(matches!(
            HandReplay::from_json(r#"{ "frames": [] }"#),
            Err(ConfigError::Json(_))
        ));
    }
}
