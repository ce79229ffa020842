//! # Kinematic Physics
//!
//! Point-mass bodies falling onto a flat ground plane:
//! - Gravity pulls dynamic bodies down, capped at terminal velocity
//! - Bodies that reach the ground stop falling and rest on it
//! - Kinematic bodies move at their velocity and ignore gravity
//!
//! Poses read back through `global_pose` reflect the last `simulate` call.

use std::collections::BTreeMap;

use keel_core::{
    BackendError, PhysicsBackend, RigidActorDesc, RigidActorHandle, Transform, Vec3,
};

/// Gravity acceleration (units per second squared).
pub const GRAVITY: f32 = 32.0;

/// Terminal velocity (units per second).
pub const TERMINAL_VELOCITY: f32 = 50.0;

const BACKEND: &str = "physics";

/// One simulated body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Current pose.
    pub pose: Transform,
    /// Linear velocity.
    pub velocity: Vec3,
    /// Ignores gravity and the ground.
    pub kinematic: bool,
    /// Resting on the ground plane.
    pub on_ground: bool,
}

impl Body {
    fn step(&mut self, dt: f32, ground: f32) {
        if !self.kinematic && !self.on_ground {
            self.velocity.y = (self.velocity.y - GRAVITY * dt).max(-TERMINAL_VELOCITY);
        }

        self.pose.position = self.pose.position.add(self.velocity.scale(dt));

        if !self.kinematic {
            if self.pose.position.y <= ground {
                self.pose.position.y = ground;
                self.velocity.y = self.velocity.y.max(0.0);
                self.on_ground = self.velocity.y == 0.0;
            } else {
                self.on_ground = false;
            }
        }
    }
}

/// Physics backend with gravity and a ground plane.
#[derive(Debug)]
pub struct KinematicPhysics {
    ground_height: f32,
    scene_live: bool,
    next_actor: u32,
    bodies: BTreeMap<RigidActorHandle, Body>,
    elapsed: f64,
}

impl Default for KinematicPhysics {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl KinematicPhysics {
    /// Physics with the ground plane at `ground_height`.
    #[must_use]
    pub fn new(ground_height: f32) -> Self {
        Self {
            ground_height,
            scene_live: false,
            next_actor: 0,
            bodies: BTreeMap::new(),
            elapsed: 0.0,
        }
    }

    /// Height of the ground plane.
    #[inline]
    #[must_use]
    pub const fn ground_height(&self) -> f32 {
        self.ground_height
    }

    /// One body by handle.
    #[must_use]
    pub fn body(&self, actor: RigidActorHandle) -> Option<&Body> {
        self.bodies.get(&actor)
    }

    /// Sets a body's velocity; lifting it off the ground if it points up.
    ///
    /// # Errors
    ///
    /// Unknown actor.
    pub fn set_velocity(
        &mut self,
        actor: RigidActorHandle,
        velocity: Vec3,
    ) -> Result<(), BackendError> {
        let body = self
            .bodies
            .get_mut(&actor)
            .ok_or_else(|| BackendError::new(BACKEND, format!("unknown actor {}", actor.0)))?;
        body.velocity = velocity;
        if velocity.y > 0.0 {
            body.on_ground = false;
        }
        Ok(())
    }

    /// Number of live bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Seconds simulated since the scene was created.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl PhysicsBackend for KinematicPhysics {
    fn create_scene(&mut self) -> Result<(), BackendError> {
        if self.scene_live {
            return Err(BackendError::new(BACKEND, "scene already exists"));
        }
        self.scene_live = true;
        self.elapsed = 0.0;
        tracing::debug!(ground = self.ground_height, "Physics scene created");
        Ok(())
    }

    fn destroy_scene(&mut self) {
        self.scene_live = false;
        self.bodies.clear();
        tracing::debug!("Physics scene destroyed");
    }

    fn simulate(&mut self, step: f32) -> Result<(), BackendError> {
        if !self.scene_live {
            return Err(BackendError::new(BACKEND, "no scene"));
        }
        if !step.is_finite() || step < 0.0 {
            return Err(BackendError::new(BACKEND, format!("bad step {step}")));
        }

        let ground = self.ground_height;
        for body in self.bodies.values_mut() {
            body.step(step, ground);
        }
        self.elapsed += f64::from(step);
        Ok(())
    }

    fn create_rigid_actor(
        &mut self,
        desc: &RigidActorDesc,
    ) -> Result<RigidActorHandle, BackendError> {
        if !self.scene_live {
            return Err(BackendError::new(BACKEND, "no scene"));
        }
        self.next_actor += 1;
        let handle = RigidActorHandle(self.next_actor);
        self.bodies.insert(
            handle,
            Body {
                pose: desc.transform,
                velocity: desc.velocity,
                kinematic: desc.kinematic,
                on_ground: !desc.kinematic
                    && desc.transform.position.y <= self.ground_height
                    && desc.velocity.y <= 0.0,
            },
        );
        Ok(handle)
    }

    fn release_rigid_actor(&mut self, actor: RigidActorHandle) {
        self.bodies.remove(&actor);
    }

    fn global_pose(&self, actor: RigidActorHandle) -> Result<Transform, BackendError> {
        self.bodies
            .get(&actor)
            .map(|b| b.pose)
            .ok_or_else(|| BackendError::new(BACKEND, format!("unknown actor {}", actor.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> KinematicPhysics {
        let mut physics = KinematicPhysics::default();
        physics.create_scene().unwrap();
        physics
    }

    #[test]
    fn test_needs_scene() {
        let mut physics = KinematicPhysics::default();
        assert!(physics.simulate(0.1).is_err());
        assert!(physics.create_rigid_actor(&RigidActorDesc::default()).is_err());
    }

    #[test]
    fn test_falling_body_lands() {
        let mut physics = scene();
        let actor = physics
            .create_rigid_actor(&RigidActorDesc::dynamic(Transform::at(Vec3::new(0.0, 10.0, 0.0))))
            .unwrap();

        physics.simulate(0.25).unwrap();
        let pose = physics.global_pose(actor).unwrap();
        // v = -8 after the step, so it moved 2 units.
        assert!((pose.position.y - 8.0).abs() < 1e-4, "y = {}", pose.position.y);

        for _ in 0..20 {
            physics.simulate(0.25).unwrap();
        }
        let body = physics.body(actor).unwrap();
        assert_eq!(body.pose.position.y, 0.0);
        assert!(body.on_ground);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_terminal_velocity() {
        let mut physics = scene();
        let high = RigidActorDesc::dynamic(Transform::at(Vec3::new(0.0, 1000.0, 0.0)));
        let actor = physics.create_rigid_actor(&high).unwrap();
        for _ in 0..10 {
            physics.simulate(1.0).unwrap();
        }
        assert_eq!(physics.body(actor).unwrap().velocity.y, -TERMINAL_VELOCITY);
    }

    #[test]
    fn test_kinematic_ignores_gravity() {
        let mut physics = scene();
        let actor = physics
            .create_rigid_actor(&RigidActorDesc {
                transform: Transform::at(Vec3::new(0.0, 5.0, 0.0)),
                velocity: Vec3::new(1.0, 0.0, 0.0),
                kinematic: true,
                mass: 0.0,
            })
            .unwrap();
        physics.simulate(2.0).unwrap();
        assert_eq!(
            physics.global_pose(actor).unwrap().position,
            Vec3::new(2.0, 5.0, 0.0)
        );
    }

    #[test]
    fn test_release_and_destroy() {
        let mut physics = scene();
        let a = physics.create_rigid_actor(&RigidActorDesc::default()).unwrap();
        let _b = physics.create_rigid_actor(&RigidActorDesc::default()).unwrap();
        physics.release_rigid_actor(a);
        assert!(physics.global_pose(a).is_err());
        assert_eq!(physics.body_count(), 1);

        physics.destroy_scene();
        assert_eq!(physics.body_count(), 0);
        assert!(physics.create_scene().is_ok());
    }
}
