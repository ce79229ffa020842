//! Physics backend interface.

use super::BackendError;
use crate::math::{Transform, Vec3};

/// Handle to a rigid actor owned by the physics backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RigidActorHandle(pub u32);

/// Parameters for a new rigid actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidActorDesc {
    /// Initial pose.
    pub transform: Transform,
    /// Initial linear velocity.
    pub velocity: Vec3,
    /// Kinematic actors are moved by gameplay, not by the solver.
    pub kinematic: bool,
    /// Mass in kilograms, ignored for kinematic actors.
    pub mass: f32,
}

impl Default for RigidActorDesc {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            velocity: Vec3::ZERO,
            kinematic: false,
            mass: 1.0,
        }
    }
}

impl RigidActorDesc {
    /// A dynamic actor at `transform`.
    #[must_use]
    pub fn dynamic(transform: Transform) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }
}

/// Physics backend.
///
/// The core steps the simulation once per frame and reads poses back; the
/// solver itself is out of reach.
pub trait PhysicsBackend {
    /// Creates the simulation scene.
    ///
    /// # Errors
    ///
    /// Backend-specific failure to create the scene.
    fn create_scene(&mut self) -> Result<(), BackendError>;

    /// Destroys the simulation scene and every actor in it.
    fn destroy_scene(&mut self);

    /// Advances the simulation by `step` seconds.
    ///
    /// # Errors
    ///
    /// Backend-specific solver failure.
    fn simulate(&mut self, step: f32) -> Result<(), BackendError>;

    /// Adds a rigid actor to the scene.
    ///
    /// # Errors
    ///
    /// Backend-specific failure, e.g. no scene.
    fn create_rigid_actor(&mut self, desc: &RigidActorDesc)
        -> Result<RigidActorHandle, BackendError>;

    /// Removes a rigid actor.
    fn release_rigid_actor(&mut self, actor: RigidActorHandle);

    /// World transform of a rigid actor as of the last simulation step.
    ///
    /// # Errors
    ///
    /// Unknown or released actor.
    fn global_pose(&self, actor: RigidActorHandle) -> Result<Transform, BackendError>;
}
