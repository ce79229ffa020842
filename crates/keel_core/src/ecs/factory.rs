//! # Component Factory
//!
//! Owns one fixed-capacity pool per capability and dispatches lifecycle
//! calls on a [`ComponentHandle`] to the concrete component type.
//!
//! Dispatch goes through a table indexed by [`Capability::index`], one row
//! per capability, so adding a capability means adding a pool field, a
//! [`Component`] impl and a row.

use super::capability::Capability;
use super::component::{
    ActorComponent, CameraComponent, Component, ComponentContext, ComponentHandle, InitContext,
    LightComponent, ModelComponent, PhysicsComponent, ReleaseContext, SceneComponent,
};
use super::entity::{Entity, EntityId};
use crate::config::PoolCapacities;
use crate::error::{CoreError, CoreResult};
use crate::memory::{PoolAllocator, PoolHandle};

/// Storage for every component in the world.
#[derive(Debug)]
pub struct ComponentFactory {
    pub(crate) actors: PoolAllocator<ActorComponent>,
    pub(crate) cameras: PoolAllocator<CameraComponent>,
    pub(crate) lights: PoolAllocator<LightComponent>,
    pub(crate) models: PoolAllocator<ModelComponent>,
    pub(crate) physics: PoolAllocator<PhysicsComponent>,
    pub(crate) scenes: PoolAllocator<SceneComponent>,
}

impl ComponentFactory {
    /// Pre-allocates every pool.
    ///
    /// # Panics
    ///
    /// Panics if any capacity is zero or above `u32::MAX`;
    /// [`crate::WorldConfig::validate`] rejects both first.
    #[must_use]
    pub fn new(capacities: &PoolCapacities) -> Self {
        Self {
            actors: PoolAllocator::new(capacities.actor),
            cameras: PoolAllocator::new(capacities.camera),
            lights: PoolAllocator::new(capacities.light),
            models: PoolAllocator::new(capacities.model),
            physics: PoolAllocator::new(capacities.physics),
            scenes: PoolAllocator::new(capacities.scene),
        }
    }

    /// Draws a default component from the capability's pool.
    ///
    /// # Errors
    ///
    /// [`CoreError::ComponentPoolExhausted`] when the pool is full. Other
    /// pools and existing components are untouched.
    pub fn create(&mut self, capability: Capability) -> CoreResult<ComponentHandle> {
        let row = row(capability);
        let slot = (row.create)(self).ok_or(CoreError::ComponentPoolExhausted {
            capability,
            capacity: (row.capacity)(self),
        })?;
        Ok(ComponentHandle::new(capability, slot))
    }

    /// Size of the capability's pool.
    #[must_use]
    pub fn capacity(&self, capability: Capability) -> usize {
        (row(capability).capacity)(self)
    }

    /// Components currently drawn from the capability's pool.
    #[must_use]
    pub fn allocated(&self, capability: Capability) -> usize {
        (row(capability).allocated)(self)
    }

    /// Components allocated across every pool.
    #[must_use]
    pub fn total_allocated(&self) -> usize {
        Capability::ALL.iter().map(|&c| self.allocated(c)).sum()
    }

    /// Component of type `T` in `slot`, `None` if freed or stale.
    #[inline]
    #[must_use]
    pub fn get<T: Component>(&self, slot: PoolHandle) -> Option<&T> {
        T::pool(self).get(slot)
    }

    /// Mutable component of type `T` in `slot`.
    #[inline]
    pub fn get_mut<T: Component>(&mut self, slot: PoolHandle) -> Option<&mut T> {
        T::pool_mut(self).get_mut(slot)
    }

    /// Component behind a typed handle; `None` if the handle names another
    /// capability.
    #[must_use]
    pub fn resolve<T: Component>(&self, handle: ComponentHandle) -> Option<&T> {
        if handle.capability() != T::CAPABILITY {
            return None;
        }
        self.get(handle.slot())
    }

    /// Mutable component behind a typed handle.
    pub fn resolve_mut<T: Component>(&mut self, handle: ComponentHandle) -> Option<&mut T> {
        if handle.capability() != T::CAPABILITY {
            return None;
        }
        self.get_mut(handle.slot())
    }

    /// Every live component of type `T`.
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        T::pool(self).iter()
    }

    /// Owner of the component behind `handle`.
    #[must_use]
    pub fn owner(&self, handle: ComponentHandle) -> Option<EntityId> {
        (row(handle.capability()).owner)(self, handle.slot())
    }

    /// Binds a freshly created component to its entity.
    pub(crate) fn init(
        &mut self,
        handle: ComponentHandle,
        owner: EntityId,
        ctx: &mut InitContext<'_>,
    ) -> CoreResult<()> {
        (row(handle.capability()).init)(self, handle.slot(), owner, ctx)
    }

    /// Releases backend resources and returns the slot to its pool.
    ///
    /// Returns `false` if the handle was already released.
    pub(crate) fn release(
        &mut self,
        handle: ComponentHandle,
        ctx: &mut ReleaseContext<'_>,
    ) -> bool {
        (row(handle.capability()).release)(self, handle.slot(), ctx)
    }
}

/// Runs the per-entity update hook behind `handle`.
pub(crate) fn update(
    handle: ComponentHandle,
    entity: &Entity,
    ctx: &mut ComponentContext<'_>,
) -> CoreResult<()> {
    (row(handle.capability()).update)(handle.slot(), entity, ctx)
}

/// Runs the sibling setup hook behind `handle`.
pub(crate) fn setup(
    handle: ComponentHandle,
    entity: &Entity,
    ctx: &mut ComponentContext<'_>,
) -> CoreResult<()> {
    (row(handle.capability()).setup)(handle.slot(), entity, ctx)
}

type HookFn = fn(PoolHandle, &Entity, &mut ComponentContext<'_>) -> CoreResult<()>;

/// Type-erased lifecycle entry points of one capability.
struct VTable {
    capability: Capability,
    create: fn(&mut ComponentFactory) -> Option<PoolHandle>,
    init: fn(&mut ComponentFactory, PoolHandle, EntityId, &mut InitContext<'_>) -> CoreResult<()>,
    release: fn(&mut ComponentFactory, PoolHandle, &mut ReleaseContext<'_>) -> bool,
    owner: fn(&ComponentFactory, PoolHandle) -> Option<EntityId>,
    capacity: fn(&ComponentFactory) -> usize,
    allocated: fn(&ComponentFactory) -> usize,
    setup: HookFn,
    update: HookFn,
}

const fn vtable<T: Component>() -> VTable {
    VTable {
        capability: T::CAPABILITY,
        create: create_in::<T>,
        init: init_in::<T>,
        release: release_in::<T>,
        owner: owner_in::<T>,
        capacity: capacity_of::<T>,
        allocated: allocated_in::<T>,
        setup: T::setup,
        update: T::update,
    }
}

/// Indexed by [`Capability::index`].
static VTABLES: [VTable; Capability::COUNT] = [
    vtable::<ActorComponent>(),
    vtable::<CameraComponent>(),
    vtable::<LightComponent>(),
    vtable::<ModelComponent>(),
    vtable::<PhysicsComponent>(),
    vtable::<SceneComponent>(),
];

#[inline]
fn row(capability: Capability) -> &'static VTable {
    let row = &VTABLES[capability.index()];
    debug_assert_eq!(row.capability, capability, "dispatch row out of order");
    row
}

fn create_in<T: Component>(factory: &mut ComponentFactory) -> Option<PoolHandle> {
    T::pool_mut(factory).allocate(T::default())
}

fn init_in<T: Component>(
    factory: &mut ComponentFactory,
    slot: PoolHandle,
    owner: EntityId,
    ctx: &mut InitContext<'_>,
) -> CoreResult<()> {
    T::pool_mut(factory)
        .get_mut(slot)
        .ok_or(CoreError::StaleComponent(T::CAPABILITY))?
        .init(owner, ctx)
}

fn release_in<T: Component>(
    factory: &mut ComponentFactory,
    slot: PoolHandle,
    ctx: &mut ReleaseContext<'_>,
) -> bool {
    match T::pool_mut(factory).free(slot) {
        Some(mut component) => {
            component.release(ctx);
            true
        }
        None => false,
    }
}

fn capacity_of<T: Component>(factory: &ComponentFactory) -> usize {
    T::pool(factory).capacity()
}

fn allocated_in<T: Component>(factory: &ComponentFactory) -> usize {
    T::pool(factory).allocated_count()
}

fn owner_in<T: Component>(factory: &ComponentFactory, slot: PoolHandle) -> Option<EntityId> {
    T::pool(factory).get(slot).map(Component::owner)
}
