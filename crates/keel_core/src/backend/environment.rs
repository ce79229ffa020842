//! Environment collaborator interface.

use super::{BackendError, RenderBackend, SceneHandle};

/// Ambient world state (sky, weather, time of day) driven in lockstep with
/// the world's own lifecycle.
pub trait Environment {
    /// Builds the environment inside the freshly created render scene.
    ///
    /// # Errors
    ///
    /// Failure creating render objects.
    fn init(&mut self, render: &mut dyn RenderBackend, scene: SceneHandle)
        -> Result<(), BackendError>;

    /// Tears the environment down. Runs before any entity is finalized.
    fn destroy(&mut self, render: &mut dyn RenderBackend);

    /// World paused.
    fn pause(&mut self);

    /// World resumed.
    fn resume(&mut self);

    /// Advances the environment by `frame_time` seconds.
    ///
    /// # Errors
    ///
    /// Failure updating render objects.
    fn update(&mut self, render: &mut dyn RenderBackend, frame_time: f32)
        -> Result<(), BackendError>;
}
