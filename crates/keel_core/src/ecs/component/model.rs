//! Model component - render mesh binding.

use super::{scene_node, Component, ComponentContext, InitContext, ReleaseContext};
use crate::backend::RenderObjectId;
use crate::ecs::entity::{Entity, EntityId};
use crate::ecs::{Capability, ComponentFactory};
use crate::error::{CoreError, CoreResult};
use crate::memory::{PoolAllocator, PoolHandle};

/// A mesh instance hung off the entity's scene node.
///
/// Starts empty; `World::set_model_mesh` loads the resource.
#[derive(Clone, Debug, Default)]
pub struct ModelComponent {
    owner: EntityId,
    mesh: Option<RenderObjectId>,
    resource: Option<String>,
    mounted: bool,
}

impl ModelComponent {
    /// Render mesh object.
    #[inline]
    #[must_use]
    pub const fn mesh(&self) -> Option<RenderObjectId> {
        self.mesh
    }

    /// Name of the loaded resource.
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Whether the mesh hangs off the scene node.
    #[inline]
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Replaces the mesh; returns the previous mesh object for the caller to
    /// destroy.
    pub(crate) fn replace_mesh(
        &mut self,
        mesh: RenderObjectId,
        resource: String,
    ) -> Option<RenderObjectId> {
        self.mounted = false;
        self.resource = Some(resource);
        self.mesh.replace(mesh)
    }

    pub(crate) fn mark_mounted(&mut self) {
        self.mounted = true;
    }
}

impl Component for ModelComponent {
    const CAPABILITY: Capability = Capability::Model;

    fn pool(factory: &ComponentFactory) -> &PoolAllocator<Self> {
        &factory.models
    }

    fn pool_mut(factory: &mut ComponentFactory) -> &mut PoolAllocator<Self> {
        &mut factory.models
    }

    fn owner(&self) -> EntityId {
        self.owner
    }

    fn init(&mut self, owner: EntityId, _ctx: &mut InitContext<'_>) -> CoreResult<()> {
        self.owner = owner;
        Ok(())
    }

    fn release(&mut self, ctx: &mut ReleaseContext<'_>) {
        if let Some(mesh) = self.mesh.take() {
            ctx.render.destroy_object(mesh);
        }
        self.resource = None;
        self.mounted = false;
    }

    fn setup(slot: PoolHandle, entity: &Entity, ctx: &mut ComponentContext<'_>) -> CoreResult<()> {
        let node = scene_node(entity, ctx.components, Capability::Model)?;
        let model = ctx
            .components
            .get_mut::<Self>(slot)
            .ok_or(CoreError::StaleComponent(Capability::Model))?;

        if let (false, Some(mesh), Some(node)) = (model.mounted, model.mesh, node) {
            ctx.render.attach_object(mesh, node)?;
            model.mounted = true;
        }
        Ok(())
    }
}
