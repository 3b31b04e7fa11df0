//! Keyboard and mouse input for the viewer.
//!
//! The `Input` struct tracks both instantaneous events (key just pressed)
//! and continuous state (button held), and turns the mouse into a synthetic
//! hand so the simulation can be played without a camera:
//!
//! | input | gesture |
//! |---|---|
//! | left button | grab |
//! | right button | push |
//! | middle button | spread |
//! | `W` held | wave |
//!
//! ```ignore
//! if let Some(hand) = input.synthetic_hand(true) {
//!     sim.update_hands(&[RawHandObservation::from(&hand)]);
//! }
//! ```

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::hand::{Fingertips, Gesture, HandObservation};

/// Fingertip distance from the palm for the synthetic hand, normalized.
const SYNTHETIC_REACH: f32 = 0.04;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn from_winit(btn: WinitMouseButton) -> Option<Self> {
        match btn {
            WinitMouseButton::Left => Some(MouseButton::Left),
            WinitMouseButton::Right => Some(MouseButton::Right),
            WinitMouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Keys the viewer responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    R,
    P,
    W,
    Space,
    Escape,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Digit1 => KeyCode::Key1,
            WinitKeyCode::Digit2 => KeyCode::Key2,
            WinitKeyCode::Digit3 => KeyCode::Key3,
            WinitKeyCode::Digit4 => KeyCode::Key4,
            WinitKeyCode::Digit5 => KeyCode::Key5,
            WinitKeyCode::KeyR => KeyCode::R,
            WinitKeyCode::KeyP => KeyCode::P,
            WinitKeyCode::KeyW => KeyCode::W,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// Input state tracking for keyboard and mouse.
#[derive(Debug, Default)]
pub struct Input {
    // Key state
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    // Mouse button state
    mouse_held: HashSet<MouseButton>,

    // Mouse position in window pixels
    mouse_position: Vec2,
    cursor_inside: bool,

    window_size: (u32, u32),
}

impl Input {
    /// Create a new input tracker.
    pub fn new() -> Self {
        Self {
            window_size: (640, 480),
            ..Default::default()
        }
    }

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key is currently held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a mouse button is currently held down.
    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Get the mouse position in window pixels.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Mouse position normalized to `[0, 1]²` of the window.
    ///
    /// With `mirror_x` the window shows a mirrored frame, so x is flipped
    /// back into simulation coordinates.
    pub fn mouse_normalized(&self, mirror_x: bool) -> Vec2 {
        let (w, h) = self.window_size;
        if w == 0 || h == 0 {
            return Vec2::splat(0.5);
        }
        let n = (self.mouse_position / Vec2::new(w as f32, h as f32)).clamp(Vec2::ZERO, Vec2::ONE);
        if mirror_x {
            Vec2::new(1.0 - n.x, n.y)
        } else {
            n
        }
    }

    /// Gesture selected by the held buttons and keys.
    pub fn gesture(&self) -> Gesture {
        if self.mouse_held(MouseButton::Left) {
            Gesture::Grab
        } else if self.mouse_held(MouseButton::Right) {
            Gesture::Push
        } else if self.mouse_held(MouseButton::Middle) {
            Gesture::Spread
        } else if self.key_held(KeyCode::W) {
            Gesture::Wave
        } else {
            Gesture::None
        }
    }

    /// A hand at the cursor while it is inside the window.
    pub fn synthetic_hand(&self, mirror_x: bool) -> Option<HandObservation> {
        if !self.cursor_inside {
            return None;
        }
        let palm = self.mouse_normalized(mirror_x);
        Some(HandObservation::new(
            palm.extend(0.0),
            Fingertips::splayed(palm, SYNTHETIC_REACH),
            self.gesture(),
        ))
    }

    /// Number key 1-5 pressed this frame, as a zero-based material slot.
    pub fn material_slot(&self) -> Option<usize> {
        [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4, KeyCode::Key5]
            .iter()
            .position(|&k| self.key_pressed(k))
    }

    /// Called at the start of each frame to clear per-frame state.
    pub(crate) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Update window size for coordinate normalization.
    pub(crate) fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let key = KeyCode::from(keycode);
                    self.key_event(key, event.state);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = MouseButton::from_winit(*button) {
                    match state {
                        ElementState::Pressed => {
                            self.mouse_held.insert(btn);
                        }
                        ElementState::Released => {
                            self.mouse_held.remove(&btn);
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = Vec2::new(position.x as f32, position.y as f32);
                self.cursor_inside = true;
            }

            WindowEvent::CursorEntered { .. } => self.cursor_inside = true,
            WindowEvent::CursorLeft { .. } => {
                self.cursor_inside = false;
                self.mouse_held.clear();
            }

            _ => {}
        }
    }

    fn key_event(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // Only fire pressed event if not already held (no repeat)
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }
}
