//! Keyboard mapping
//!
//! Hosts forward raw key-down/key-up events here; the core only ever sees the
//! resulting `TickInput`. Fire and pause trigger once per physical press.

use crate::sim::TickInput;

/// Logical control a key maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Thrust,
    Left,
    Right,
    Fire,
    Pause,
}

impl Control {
    /// Map a DOM-style key name
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Control::Thrust),
            "ArrowLeft" | "a" | "A" => Some(Control::Left),
            "ArrowRight" | "d" | "D" => Some(Control::Right),
            " " | "Space" | "Spacebar" => Some(Control::Fire),
            "p" | "P" => Some(Control::Pause),
            _ => None,
        }
    }
}

/// Held keys plus pending one-shot commands
#[derive(Debug, Clone, Default)]
pub struct InputState {
    thrust: bool,
    left: bool,
    right: bool,
    fire_held: bool,
    pause_held: bool,
    fire_pending: bool,
    pause_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is bound to a control
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(control) = Control::from_key(key) else {
            return false;
        };
        match control {
            Control::Thrust => self.thrust = true,
            Control::Left => self.left = true,
            Control::Right => self.right = true,
            Control::Fire => {
                // Auto-repeat keydowns arrive while held
                if !self.fire_held {
                    self.fire_pending = true;
                }
                self.fire_held = true;
            }
            Control::Pause => {
                if !self.pause_held {
                    self.pause_pending = true;
                }
                self.pause_held = true;
            }
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(control) = Control::from_key(key) else {
            return false;
        };
        match control {
            Control::Thrust => self.thrust = false,
            Control::Left => self.left = false,
            Control::Right => self.right = false,
            Control::Fire => self.fire_held = false,
            Control::Pause => self.pause_held = false,
        }
        true
    }

    /// Release everything (window blur)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Build this frame's input and consume one-shot commands
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            thrust: self.thrust,
            rotate: i8::from(self.right) - i8::from(self.left),
            fire: self.fire_pending,
            pause: self.pause_pending,
        };
        self.fire_pending = false;
        self.pause_pending = false;
        input
    }
}
