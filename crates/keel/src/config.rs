//! # Engine Configuration
//!
//! One TOML document configures the whole engine:
//!
//! ```toml
//! [world]
//! entity_capacity = 512
//! frame_time = 0.016666668
//!
//! [world.pools]
//! camera = 4
//!
//! [game_loop]
//! target_fps = 60
//! use_physics = true
//! max_frames = 600
//!
//! [bindings]
//! forward = "up"
//! backward = "down"
//! ```
//!
//! Every table and key is optional; missing values take their defaults.

use std::path::Path;

use keel_core::{Key, WorldConfig};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Default frame rate the loop paces to.
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Frame pacing and world startup options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Frames per second the loop sleeps to.
    pub target_fps: u32,
    /// Passed to `World::init`.
    pub use_physics: bool,
    /// Stop after this many loop iterations; run until told otherwise when
    /// absent.
    pub max_frames: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            use_physics: true,
            max_frames: None,
        }
    }
}

/// Keys driving the four movement commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Move forward.
    pub forward: Key,
    /// Move backward.
    pub backward: Key,
    /// Strafe left.
    pub left: Key,
    /// Strafe right.
    pub right: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: Key::W,
            backward: Key::S,
            left: Key::A,
            right: Key::D,
        }
    }
}

impl KeyBindings {
    fn validate(&self) -> EngineResult<()> {
        let keys = [self.forward, self.backward, self.left, self.right];
        for (i, key) in keys.iter().enumerate() {
            if keys[i + 1..].contains(key) {
                return Err(EngineError::InvalidConfig(format!(
                    "key {key:?} is bound to more than one action"
                )));
            }
        }
        Ok(())
    }
}

/// Top-level engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pool sizes and frame time.
    pub world: WorldConfig,
    /// Loop pacing.
    pub game_loop: LoopConfig,
    /// Movement keys.
    pub bindings: KeyBindings,
}

impl EngineConfig {
    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// [`EngineError::Io`] if the file cannot be read, otherwise as
    /// [`EngineConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "Engine config loaded");
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`EngineError::Parse`] for malformed TOML; [`EngineError::Core`]
    /// for a rejected world section; [`EngineError::InvalidConfig`] for a
    /// zero frame rate or a key bound twice.
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::from_toml_str`].
    pub fn validate(&self) -> EngineResult<()> {
        self.world.validate()?;
        if self.game_loop.target_fps == 0 {
            return Err(EngineError::InvalidConfig(
                "game_loop.target_fps must be positive".to_owned(),
            ));
        }
        self.bindings.validate()
    }
}
