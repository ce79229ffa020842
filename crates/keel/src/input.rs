//! Keyboard decoder mapping [`KeyBindings`] to movement commands.

use keel_core::{
    Command, InputDecoder, InputEvent, MoveBackward, MoveForward, MoveLeft, MoveRight,
};

use crate::config::KeyBindings;

/// Input decoder driven by configurable key bindings.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyboardDecoder {
    bindings: KeyBindings,
}

impl KeyboardDecoder {
    /// Decoder for `bindings`.
    #[must_use]
    pub const fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Bindings in use.
    #[must_use]
    pub const fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }
}

impl InputDecoder for KeyboardDecoder {
    fn decode(&mut self, event: &InputEvent) -> Option<Box<dyn Command>> {
        let b = &self.bindings;
        let command: Box<dyn Command> = match event.key {
            key if key == b.forward => Box::new(MoveForward),
            key if key == b.backward => Box::new(MoveBackward),
            key if key == b.left => Box::new(MoveLeft),
            key if key == b.right => Box::new(MoveRight),
            _ => return None,
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::Key;

    #[test]
    fn test_default_bindings_are_wasd() {
        let mut decoder = KeyboardDecoder::default();
        let name = |d: &mut KeyboardDecoder, key| {
            d.decode(&InputEvent::pressed(key)).map(|c| c.name())
        };

        assert_eq!(name(&mut decoder, Key::W), Some("move_forward"));
        assert_eq!(name(&mut decoder, Key::S), Some("move_backward"));
        assert_eq!(name(&mut decoder, Key::A), Some("move_left"));
        assert_eq!(name(&mut decoder, Key::D), Some("move_right"));
        assert_eq!(name(&mut decoder, Key::Space), None);
    }

    #[test]
    fn test_rebound_keys() {
        let mut decoder = KeyboardDecoder::new(KeyBindings {
            forward: Key::Up,
            backward: Key::Down,
            left: Key::Left,
            right: Key::Right,
        });
        assert!(decoder.decode(&InputEvent::released(Key::Up)).is_some());
        assert!(decoder.decode(&InputEvent::pressed(Key::W)).is_none());
    }
}
