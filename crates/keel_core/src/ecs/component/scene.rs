//! Scene component - the render-facing spatial transform.

use super::{Component, ComponentContext, InitContext, ReleaseContext};
use crate::backend::{RenderObjectDesc, RenderObjectId};
use crate::ecs::entity::{Entity, EntityId};
use crate::ecs::{Capability, ComponentFactory};
use crate::error::{CoreError, CoreResult};
use crate::math::{Quat, Transform, Vec3};
use crate::memory::{PoolAllocator, PoolHandle};

/// Position and orientation of an entity, mirrored onto a render node.
///
/// Writers mark the transform dirty; the per-entity update pushes it to the
/// node once per frame.
#[derive(Clone, Debug, Default)]
pub struct SceneComponent {
    owner: EntityId,
    node: Option<RenderObjectId>,
    transform: Transform,
    dirty: bool,
}

impl SceneComponent {
    /// Render node backing this entity.
    #[inline]
    #[must_use]
    pub const fn node(&self) -> Option<RenderObjectId> {
        self.node
    }

    /// Current transform.
    #[inline]
    #[must_use]
    pub const fn transform(&self) -> Transform {
        self.transform
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Current orientation.
    #[inline]
    #[must_use]
    pub const fn orientation(&self) -> Quat {
        self.transform.orientation
    }

    /// Whether the render node lags behind the transform.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replaces the whole transform.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.dirty = true;
    }

    /// Moves the entity to `position`.
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.dirty = true;
    }

    /// Rotates the entity to `orientation`.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.transform.orientation = orientation;
        self.dirty = true;
    }

    /// Moves the entity by `delta` in world space.
    pub fn translate(&mut self, delta: Vec3) {
        self.transform.position = self.transform.position.add(delta);
        self.dirty = true;
    }
}

impl Component for SceneComponent {
    const CAPABILITY: Capability = Capability::Scene;

    fn pool(factory: &ComponentFactory) -> &PoolAllocator<Self> {
        &factory.scenes
    }

    fn pool_mut(factory: &mut ComponentFactory) -> &mut PoolAllocator<Self> {
        &mut factory.scenes
    }

    fn owner(&self) -> EntityId {
        self.owner
    }

    fn init(&mut self, owner: EntityId, ctx: &mut InitContext<'_>) -> CoreResult<()> {
        self.owner = owner;
        self.node = Some(ctx.render.create_object(ctx.scene, &RenderObjectDesc::Node)?);
        self.dirty = true;
        Ok(())
    }

    fn release(&mut self, ctx: &mut ReleaseContext<'_>) {
        if let Some(node) = self.node.take() {
            ctx.render.destroy_object(node);
        }
    }

    fn update(
        slot: PoolHandle,
        _entity: &Entity,
        ctx: &mut ComponentContext<'_>,
    ) -> CoreResult<()> {
        let scene = ctx
            .components
            .get_mut::<Self>(slot)
            .ok_or(CoreError::StaleComponent(Capability::Scene))?;

        if scene.dirty {
            if let Some(node) = scene.node {
                ctx.render.set_transform(node, &scene.transform);
            }
            scene.dirty = false;
        }
        Ok(())
    }
}
