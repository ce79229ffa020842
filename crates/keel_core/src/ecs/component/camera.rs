//! Camera component.

use super::{scene_node, Component, ComponentContext, InitContext, ReleaseContext};
use crate::backend::{RenderObjectDesc, RenderObjectId};
use crate::ecs::entity::{Entity, EntityId};
use crate::ecs::{Capability, ComponentFactory};
use crate::error::{CoreError, CoreResult};
use crate::memory::{PoolAllocator, PoolHandle};

/// A camera hung off the entity's scene node.
#[derive(Clone, Debug)]
pub struct CameraComponent {
    owner: EntityId,
    camera: Option<RenderObjectId>,
    mounted: bool,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            owner: EntityId::NULL,
            camera: None,
            mounted: false,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraComponent {
    /// Render camera object.
    #[inline]
    #[must_use]
    pub const fn camera(&self) -> Option<RenderObjectId> {
        self.camera
    }

    /// Whether setup attached the camera to the scene node.
    #[inline]
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl Component for CameraComponent {
    const CAPABILITY: Capability = Capability::Camera;

    fn pool(factory: &ComponentFactory) -> &PoolAllocator<Self> {
        &factory.cameras
    }

    fn pool_mut(factory: &mut ComponentFactory) -> &mut PoolAllocator<Self> {
        &mut factory.cameras
    }

    fn owner(&self) -> EntityId {
        self.owner
    }

    fn init(&mut self, owner: EntityId, ctx: &mut InitContext<'_>) -> CoreResult<()> {
        self.owner = owner;
        let desc = RenderObjectDesc::Camera {
            fov_y_degrees: self.fov_y_degrees,
            near: self.near,
            far: self.far,
        };
        self.camera = Some(ctx.render.create_object(ctx.scene, &desc)?);
        Ok(())
    }

    fn release(&mut self, ctx: &mut ReleaseContext<'_>) {
        if let Some(camera) = self.camera.take() {
            ctx.render.destroy_object(camera);
        }
        self.mounted = false;
    }

    fn setup(slot: PoolHandle, entity: &Entity, ctx: &mut ComponentContext<'_>) -> CoreResult<()> {
        let node = scene_node(entity, ctx.components, Capability::Camera)?;
        let camera = ctx
            .components
            .get_mut::<Self>(slot)
            .ok_or(CoreError::StaleComponent(Capability::Camera))?;

        if let (false, Some(object), Some(node)) = (camera.mounted, camera.camera, node) {
            ctx.render.attach_object(object, node)?;
            camera.mounted = true;
        }
        Ok(())
    }
}
