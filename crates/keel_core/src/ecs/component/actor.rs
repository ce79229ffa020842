//! Actor component - movement intent.

use super::{Component, ComponentContext, InitContext, SceneComponent};
use crate::ecs::entity::{Entity, EntityId};
use crate::ecs::{Capability, ComponentFactory};
use crate::error::{CoreError, CoreResult};
use crate::math::Vec3;
use crate::memory::{PoolAllocator, PoolHandle};

/// Default walking speed in world units per second.
pub const DEFAULT_ACTOR_SPEED: f32 = 5.0;

/// Which way an entity wants to move.
///
/// Commands flip the flags; the per-entity update turns them into motion of
/// the sibling Scene component, relative to its orientation (-Z forward).
#[derive(Clone, Debug)]
pub struct ActorComponent {
    owner: EntityId,
    /// Speed in world units per second.
    pub speed: f32,
    moving_forward: bool,
    moving_backward: bool,
    moving_left: bool,
    moving_right: bool,
}

impl Default for ActorComponent {
    fn default() -> Self {
        Self {
            owner: EntityId::NULL,
            speed: DEFAULT_ACTOR_SPEED,
            moving_forward: false,
            moving_backward: false,
            moving_left: false,
            moving_right: false,
        }
    }
}

impl ActorComponent {
    /// Sets the forward intent.
    pub fn set_moving_forward(&mut self, moving: bool) {
        self.moving_forward = moving;
    }

    /// Sets the backward intent.
    pub fn set_moving_backward(&mut self, moving: bool) {
        self.moving_backward = moving;
    }

    /// Sets the strafe-left intent.
    pub fn set_moving_left(&mut self, moving: bool) {
        self.moving_left = moving;
    }

    /// Sets the strafe-right intent.
    pub fn set_moving_right(&mut self, moving: bool) {
        self.moving_right = moving;
    }

    /// Whether any movement flag is set.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving_forward || self.moving_backward || self.moving_left || self.moving_right
    }

    /// Unit direction of travel in local space; zero when flags cancel out.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        let axis = |pos: bool, neg: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        let x = axis(self.moving_right, self.moving_left);
        let z = axis(self.moving_backward, self.moving_forward);
        Vec3::new(x, 0.0, z).normalized()
    }
}

impl Component for ActorComponent {
    const CAPABILITY: Capability = Capability::Actor;

    fn pool(factory: &ComponentFactory) -> &PoolAllocator<Self> {
        &factory.actors
    }

    fn pool_mut(factory: &mut ComponentFactory) -> &mut PoolAllocator<Self> {
        &mut factory.actors
    }

    fn owner(&self) -> EntityId {
        self.owner
    }

    fn init(&mut self, owner: EntityId, _ctx: &mut InitContext<'_>) -> CoreResult<()> {
        self.owner = owner;
        Ok(())
    }

    fn update(slot: PoolHandle, entity: &Entity, ctx: &mut ComponentContext<'_>) -> CoreResult<()> {
        let actor = ctx
            .components
            .get::<Self>(slot)
            .ok_or(CoreError::StaleComponent(Capability::Actor))?;

        let local = actor.direction();
        if local == Vec3::ZERO {
            return Ok(());
        }
        let distance = actor.speed * ctx.frame_time;

        // An actor without a body has nothing to move.
        let Some(body) = entity.component(Capability::Scene) else {
            return Ok(());
        };
        let scene = ctx
            .components
            .get_mut::<SceneComponent>(body.slot())
            .ok_or(CoreError::StaleComponent(Capability::Scene))?;

        let world = scene.orientation().rotate(local).scale(distance);
        scene.translate(world);
        Ok(())
    }
}
