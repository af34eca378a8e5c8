// Pincab — Input Bindings
//
// Edge mapping from a normalized "is pressed" level to exactly-once Down/Up
// commands. One Binding per input channel, physical switch or synthetic
// nudge direction alike.

use crate::events::{Key, KeyCommand};

/// One input channel bound to an output key.
///
/// `pressed` mirrors "a Down has been emitted without a matching Up yet";
/// repeated reads of the same level therefore emit nothing.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    key: Key,
    pressed: bool,
}

impl Binding {
    /// A fresh binding starts released.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            pressed: false,
        }
    }

    #[allow(dead_code)]
    pub fn key(&self) -> Key {
        self.key
    }

    /// Feed one normalized level read (`true` = physically pressed).
    /// Returns a command only on a press or release edge.
    pub fn update(&mut self, active: bool) -> Option<KeyCommand> {
        if active && !self.pressed {
            self.pressed = true;
            Some(KeyCommand::Down(self.key))
        } else if !active && self.pressed {
            self.pressed = false;
            Some(KeyCommand::Up(self.key))
        } else {
            None
        }
    }
}
