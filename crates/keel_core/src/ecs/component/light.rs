//! Light component.

use super::{scene_node, Component, ComponentContext, InitContext, ReleaseContext};
use crate::backend::{LightKind, RenderObjectDesc, RenderObjectId};
use crate::ecs::entity::{Entity, EntityId};
use crate::ecs::{Capability, ComponentFactory};
use crate::error::{CoreError, CoreResult};
use crate::math::Vec3;
use crate::memory::{PoolAllocator, PoolHandle};

/// A light source hung off the entity's scene node.
#[derive(Clone, Debug)]
pub struct LightComponent {
    owner: EntityId,
    light: Option<RenderObjectId>,
    mounted: bool,
    kind: LightKind,
    colour: Vec3,
}

impl Default for LightComponent {
    fn default() -> Self {
        Self {
            owner: EntityId::NULL,
            light: None,
            mounted: false,
            kind: LightKind::Point,
            colour: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl LightComponent {
    /// Render light object.
    #[inline]
    #[must_use]
    pub const fn light(&self) -> Option<RenderObjectId> {
        self.light
    }

    /// Shape of the light.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> LightKind {
        self.kind
    }

    /// Linear RGB colour.
    #[inline]
    #[must_use]
    pub const fn colour(&self) -> Vec3 {
        self.colour
    }
}

impl Component for LightComponent {
    const CAPABILITY: Capability = Capability::Light;

    fn pool(factory: &ComponentFactory) -> &PoolAllocator<Self> {
        &factory.lights
    }

    fn pool_mut(factory: &mut ComponentFactory) -> &mut PoolAllocator<Self> {
        &mut factory.lights
    }

    fn owner(&self) -> EntityId {
        self.owner
    }

    fn init(&mut self, owner: EntityId, ctx: &mut InitContext<'_>) -> CoreResult<()> {
        self.owner = owner;
        let desc = RenderObjectDesc::Light {
            kind: self.kind,
            colour: self.colour,
        };
        self.light = Some(ctx.render.create_object(ctx.scene, &desc)?);
        Ok(())
    }

    fn release(&mut self, ctx: &mut ReleaseContext<'_>) {
        if let Some(light) = self.light.take() {
            ctx.render.destroy_object(light);
        }
        self.mounted = false;
    }

    fn setup(slot: PoolHandle, entity: &Entity, ctx: &mut ComponentContext<'_>) -> CoreResult<()> {
        let node = scene_node(entity, ctx.components, Capability::Light)?;
        let light = ctx
            .components
            .get_mut::<Self>(slot)
            .ok_or(CoreError::StaleComponent(Capability::Light))?;

        if let (false, Some(object), Some(node)) = (light.mounted, light.light, node) {
            ctx.render.attach_object(object, node)?;
            light.mounted = true;
        }
        Ok(())
    }
}
