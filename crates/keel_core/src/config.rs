//! # World Configuration
//!
//! Pool sizes and frame timing, loaded once at startup. The core never bakes
//! a capacity in; everything flows from here into [`crate::World::init`].

use serde::{Deserialize, Serialize};

use crate::ecs::Capability;
use crate::error::{CoreError, CoreResult};

/// Default number of entity slots.
pub const DEFAULT_ENTITY_CAPACITY: usize = 256;

/// Default number of slots in each component pool.
pub const DEFAULT_POOL_CAPACITY: usize = 256;

/// Default simulation step (60 Hz).
pub const DEFAULT_FRAME_TIME: f32 = 1.0 / 60.0;

/// Capacity of every per-capability component pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolCapacities {
    /// Actor (movement intent) pool size.
    pub actor: usize,
    /// Camera pool size.
    pub camera: usize,
    /// Light pool size.
    pub light: usize,
    /// Model pool size.
    pub model: usize,
    /// Physics binding pool size.
    pub physics: usize,
    /// Scene transform pool size.
    pub scene: usize,
}

impl PoolCapacities {
    /// Same capacity for every pool.
    #[must_use]
    pub const fn uniform(capacity: usize) -> Self {
        Self {
            actor: capacity,
            camera: capacity,
            light: capacity,
            model: capacity,
            physics: capacity,
            scene: capacity,
        }
    }

    /// Capacity configured for one capability.
    #[must_use]
    pub const fn get(&self, capability: Capability) -> usize {
        match capability {
            Capability::Actor => self.actor,
            Capability::Camera => self.camera,
            Capability::Light => self.light,
            Capability::Model => self.model,
            Capability::Physics => self.physics,
            Capability::Scene => self.scene,
        }
    }
}

impl Default for PoolCapacities {
    fn default() -> Self {
        Self::uniform(DEFAULT_POOL_CAPACITY)
    }
}

/// Configuration handed to the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Maximum number of simultaneously active entities.
    pub entity_capacity: usize,
    /// Component pool sizes.
    pub pools: PoolCapacities,
    /// Seconds simulated per frame (physics step and actor motion).
    pub frame_time: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            entity_capacity: DEFAULT_ENTITY_CAPACITY,
            pools: PoolCapacities::default(),
            frame_time: DEFAULT_FRAME_TIME,
        }
    }
}

impl WorldConfig {
    /// Config with `entities` entity slots and `components` slots per pool.
    #[must_use]
    pub fn with_capacity(entities: usize, components: usize) -> Self {
        Self {
            entity_capacity: entities,
            pools: PoolCapacities::uniform(components),
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] on malformed TOML or a rejected value.
    pub fn from_toml_str(source: &str) -> CoreResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every capacity fits a pool and the frame time is usable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> CoreResult<()> {
        if self.entity_capacity == 0 {
            return Err(CoreError::InvalidConfig(
                "entity_capacity must be greater than zero".into(),
            ));
        }
        if self.entity_capacity > u32::MAX as usize {
            return Err(CoreError::InvalidConfig(
                "entity_capacity cannot exceed u32::MAX".into(),
            ));
        }
        for capability in Capability::ALL {
            let capacity = self.pools.get(capability);
            if capacity == 0 {
                return Err(CoreError::InvalidConfig(format!(
                    "pools.{capability} must be greater than zero"
                )));
            }
            if capacity > u32::MAX as usize {
                return Err(CoreError::InvalidConfig(format!(
                    "pools.{capability} cannot exceed u32::MAX"
                )));
            }
        }
        if !self.frame_time.is_finite() || self.frame_time <= 0.0 {
            return Err(CoreError::InvalidConfig(
                "frame_time must be a positive number of seconds".into(),
            ));
        }
        Ok(())
    }
}
