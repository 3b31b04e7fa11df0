//! Per-hand palm history for velocity estimation.
//!
//! Each hand is keyed by its position in the observation sequence, plus one
//! reserved slot for the single-hand path. A hand's velocity is half the
//! palm displacement since its previous observation, in canvas pixels; a
//! hand seen for the first time has zero velocity.
//!
//! Entries expire after `timeout` consecutive ticks without an
//! observation, so a hand that leaves and comes back starts from rest.

use std::collections::HashMap;

use glam::Vec2;

/// Scale applied to the palm displacement to get the hand velocity.
pub const VELOCITY_SCALE: f32 = 0.5;

/// Stable identity of a tracked hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandKey {
    /// The single-hand path.
    Primary,
    /// Position in the multi-hand observation sequence.
    Index(usize),
}

#[derive(Debug, Clone, Copy)]
struct TrackedHand {
    last_palm: Vec2,
    missed: u32,
    seen: bool,
}

/// Map from hand identity to its last known palm position.
#[derive(Debug, Clone)]
pub struct HandTracker {
    hands: HashMap<HandKey, TrackedHand>,
    timeout: u32,
}

impl HandTracker {
    /// `timeout` is the number of missed ticks after which a hand is dropped.
    pub fn new(timeout: u32) -> Self {
        Self {
            hands: HashMap::new(),
            timeout: timeout.max(1),
        }
    }

    /// Record a palm position (pixels) and return the hand's velocity.
    pub fn observe(&mut self, key: HandKey, palm: Vec2) -> Vec2 {
        match self.hands.get_mut(&key) {
            Some(hand) => {
                let velocity = (palm - hand.last_palm) * VELOCITY_SCALE;
                hand.last_palm = palm;
                hand.missed = 0;
                hand.seen = true;
                velocity
            }
            None => {
                self.hands.insert(
                    key,
                    TrackedHand {
                        last_palm: palm,
                        missed: 0,
                        seen: true,
                    },
                );
                Vec2::ZERO
            }
        }
    }

    /// Close the current tick: count a miss for every hand not observed
    /// and drop those that reached the timeout.
    pub fn end_tick(&mut self) {
        let timeout = self.timeout;
        self.hands.retain(|key, hand| {
            if hand.seen {
                hand.seen = false;
                return true;
            }
            hand.missed += 1;
            let keep = hand.missed < timeout;
            if !keep {
                log::debug!("Hand {:?} lost after {} missed ticks", key, hand.missed);
            }
            keep
        });
    }

    /// Last palm position of `key`, if tracked.
    pub fn last_palm(&self, key: HandKey) -> Option<Vec2> {
        self.hands.get(&key).map(|h| h.last_palm)
    }

    pub fn is_tracked(&self, key: HandKey) -> bool {
        self.hands.contains_key(&key)
    }

    pub fn tracked_count(&self) -> usize {
        self.hands.len()
    }

    pub fn clear(&mut self) {
        self.hands.clear();
    }
}
