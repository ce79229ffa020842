//! Input decoder interface.

use serde::{Deserialize, Serialize};

use crate::command::Command;

/// Platform-neutral key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// W.
    W,
    /// A.
    A,
    /// S.
    S,
    /// D.
    D,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
    /// Any other platform scancode.
    Other(u32),
}

/// A raw key transition from the platform layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    /// Key that changed.
    pub key: Key,
    /// `true` on press, `false` on release.
    pub pressed: bool,
}

impl InputEvent {
    /// Key press.
    #[must_use]
    pub const fn pressed(key: Key) -> Self {
        Self { key, pressed: true }
    }

    /// Key release.
    #[must_use]
    pub const fn released(key: Key) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Turns raw platform events into gameplay commands.
pub trait InputDecoder {
    /// Decodes one event; `None` when nothing is bound to it.
    fn decode(&mut self, event: &InputEvent) -> Option<Box<dyn Command>>;
}
