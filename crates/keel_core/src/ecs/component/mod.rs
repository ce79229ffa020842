//! # Components
//!
//! One module per capability. Component storage belongs to the
//! [`ComponentFactory`](super::ComponentFactory); the owning entity only
//! keeps a [`ComponentHandle`] and each component keeps its owner's ID.
//!
//! ## Lifecycle
//!
//! ```text
//! factory.create(cap)    slot drawn from the capability's pool
//!        │
//! init(owner, ctx)       bound to its entity, render objects created
//!        │
//! setup(entity, ctx)     hooked to sibling components (once)
//!        │
//! update(entity, ctx)    per-entity hook, every frame
//!        │
//! release(ctx)           backend objects freed, slot returned
//! ```

mod actor;
mod camera;
mod light;
mod model;
mod physics;
mod scene;

pub use actor::ActorComponent;
pub use camera::CameraComponent;
pub use light::LightComponent;
pub use model::ModelComponent;
pub use physics::PhysicsComponent;
pub use scene::SceneComponent;

use super::capability::Capability;
use super::entity::{Entity, EntityId};
use super::factory::ComponentFactory;
use crate::backend::{PhysicsBackend, RenderBackend, RenderObjectId, SceneHandle};
use crate::error::{CoreError, CoreResult};
use crate::memory::{PoolAllocator, PoolHandle};

/// Typed reference to a component inside the factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentHandle {
    capability: Capability,
    slot: PoolHandle,
}

impl ComponentHandle {
    pub(crate) const fn new(capability: Capability, slot: PoolHandle) -> Self {
        Self { capability, slot }
    }

    /// Capability of the referenced component.
    #[inline]
    #[must_use]
    pub const fn capability(self) -> Capability {
        self.capability
    }

    /// Slot inside that capability's pool.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> PoolHandle {
        self.slot
    }
}

/// Backends available while a component is being initialized.
pub struct InitContext<'a> {
    /// Render backend.
    pub render: &'a mut dyn RenderBackend,
    /// The world's render scene.
    pub scene: SceneHandle,
}

/// Backends available while a component is being released.
pub struct ReleaseContext<'a> {
    /// Render backend.
    pub render: &'a mut dyn RenderBackend,
    /// Physics backend, when the world runs physics.
    pub physics: Option<&'a mut (dyn PhysicsBackend + 'static)>,
}

/// Access available to per-entity setup and update hooks.
pub struct ComponentContext<'a> {
    /// Every component pool, for sibling lookups.
    pub components: &'a mut ComponentFactory,
    /// Render backend.
    pub render: &'a mut dyn RenderBackend,
    /// Seconds simulated per frame.
    pub frame_time: f32,
}

/// A component capability type.
///
/// Implementors are plain data stored in a fixed pool. Hooks that need a
/// sibling component are associated functions taking the component's slot,
/// so they can reach across pools through the context.
pub trait Component: Default + 'static {
    /// The capability tag of this type.
    const CAPABILITY: Capability;

    /// Pool holding components of this type.
    fn pool(factory: &ComponentFactory) -> &PoolAllocator<Self>;

    /// Mutable pool holding components of this type.
    fn pool_mut(factory: &mut ComponentFactory) -> &mut PoolAllocator<Self>;

    /// Owning entity, [`EntityId::NULL`] before init.
    fn owner(&self) -> EntityId;

    /// Binds the component to its entity and creates backend resources.
    ///
    /// # Errors
    ///
    /// Backend failure creating resources.
    fn init(&mut self, owner: EntityId, ctx: &mut InitContext<'_>) -> CoreResult<()>;

    /// Frees backend resources. The slot is returned by the factory.
    fn release(&mut self, _ctx: &mut ReleaseContext<'_>) {}

    /// Connects the component to its siblings on the same entity.
    ///
    /// # Errors
    ///
    /// [`CoreError::MissingCapability`] or a backend failure.
    fn setup(
        _slot: PoolHandle,
        _entity: &Entity,
        _ctx: &mut ComponentContext<'_>,
    ) -> CoreResult<()> {
        Ok(())
    }

    /// Per-entity, per-frame hook.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn update(
        _slot: PoolHandle,
        _entity: &Entity,
        _ctx: &mut ComponentContext<'_>,
    ) -> CoreResult<()> {
        Ok(())
    }
}

/// Render node of `entity`'s Scene component, required by render-facing
/// components during setup.
pub(crate) fn scene_node(
    entity: &Entity,
    components: &ComponentFactory,
    dependent: Capability,
) -> CoreResult<Option<RenderObjectId>> {
    let missing = CoreError::MissingCapability {
        entity: entity.id(),
        capability: dependent,
        requires: Capability::Scene,
    };
    let handle = entity.component(Capability::Scene).ok_or(missing)?;
    let scene = components
        .get::<SceneComponent>(handle.slot())
        .ok_or(CoreError::StaleComponent(Capability::Scene))?;
    Ok(scene.node())
}
