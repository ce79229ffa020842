//! Physics component - binding to a rigid actor in the physics backend.

use super::{Component, InitContext, ReleaseContext};
use crate::backend::RigidActorHandle;
use crate::ecs::entity::EntityId;
use crate::ecs::{Capability, ComponentFactory};
use crate::error::CoreResult;
use crate::memory::PoolAllocator;

/// Links an entity to the rigid actor the physics backend simulates.
#[derive(Clone, Debug, Default)]
pub struct PhysicsComponent {
    owner: EntityId,
    actor: Option<RigidActorHandle>,
}

impl PhysicsComponent {
    /// The bound rigid actor.
    #[inline]
    #[must_use]
    pub const fn actor(&self) -> Option<RigidActorHandle> {
        self.actor
    }

    /// Binds a rigid actor, returning the previously bound one.
    pub(crate) fn bind_actor(&mut self, actor: RigidActorHandle) -> Option<RigidActorHandle> {
        self.actor.replace(actor)
    }
}

impl Component for PhysicsComponent {
    const CAPABILITY: Capability = Capability::Physics;

    fn pool(factory: &ComponentFactory) -> &PoolAllocator<Self> {
        &factory.physics
    }

    fn pool_mut(factory: &mut ComponentFactory) -> &mut PoolAllocator<Self> {
        &mut factory.physics
    }

    fn owner(&self) -> EntityId {
        self.owner
    }

    fn init(&mut self, owner: EntityId, _ctx: &mut InitContext<'_>) -> CoreResult<()> {
        self.owner = owner;
        Ok(())
    }

    fn release(&mut self, ctx: &mut ReleaseContext<'_>) {
        if let (Some(actor), Some(physics)) = (self.actor.take(), ctx.physics.as_deref_mut()) {
            physics.release_rigid_actor(actor);
        }
    }
}
