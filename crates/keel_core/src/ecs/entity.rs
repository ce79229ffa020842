//! # Entity Management
//!
//! An entity is an identity plus one ownership slot per capability. Entities
//! live inside the [`super::EntityPool`] for the whole process lifetime;
//! only their active flag and ID change.

use std::fmt;

use super::capability::{Capability, CapabilitySet};
use super::component::{ComponentContext, ComponentHandle};
use super::factory;
use crate::error::{CoreError, CoreResult};

/// Unique identifier for an entity.
///
/// IDs come from a monotonically increasing counter, so an ID is never
/// handed out twice even though the slot behind it is recycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Wraps a raw ID.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw ID value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Non-owning reference to an entity slot.
///
/// Resolving the handle after the entity was destroyed yields nothing, even
/// if the slot has been handed to a new entity since.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    slot: u32,
    id: EntityId,
}

impl EntityHandle {
    /// Slot index inside the pool.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.slot
    }

    /// ID the handle was issued for.
    #[inline]
    #[must_use]
    pub const fn id(self) -> EntityId {
        self.id
    }
}

/// One entity slot.
#[derive(Clone, Debug)]
pub struct Entity {
    id: EntityId,
    slot: u32,
    active: bool,
    components: [Option<ComponentHandle>; Capability::COUNT],
}

impl Entity {
    /// Creates an inactive, empty slot.
    pub(crate) const fn empty(slot: u32) -> Self {
        Self {
            id: EntityId::NULL,
            slot,
            active: false,
            components: [None; Capability::COUNT],
        }
    }

    /// The entity's ID, [`EntityId::NULL`] while inactive.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Whether the slot holds a live entity.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Handle to this slot for the current ID.
    #[inline]
    #[must_use]
    pub const fn handle(&self) -> EntityHandle {
        EntityHandle {
            slot: self.slot,
            id: self.id,
        }
    }

    /// Whether a component of this capability is attached.
    #[inline]
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        self.components[capability.index()].is_some()
    }

    /// The attached component of this capability.
    #[inline]
    #[must_use]
    pub fn component(&self, capability: Capability) -> Option<ComponentHandle> {
        self.components[capability.index()]
    }

    /// Every attached capability.
    #[must_use]
    pub fn capabilities(&self) -> CapabilitySet {
        let mut set = CapabilitySet::EMPTY;
        for handle in self.components.iter().flatten() {
            set.insert(handle.capability());
        }
        set
    }

    /// Attached components, in capability order.
    pub fn components(&self) -> impl Iterator<Item = ComponentHandle> + '_ {
        self.components.iter().flatten().copied()
    }

    /// Records ownership of a component.
    ///
    /// # Errors
    ///
    /// [`CoreError::CapabilityAlreadyAttached`] if the capability is taken;
    /// the existing component stays attached.
    pub(crate) fn attach(&mut self, handle: ComponentHandle) -> CoreResult<()> {
        let slot = &mut self.components[handle.capability().index()];
        if slot.is_some() {
            return Err(CoreError::CapabilityAlreadyAttached {
                entity: self.id,
                capability: handle.capability(),
            });
        }
        *slot = Some(handle);
        Ok(())
    }

    /// Gives up ownership of the capability's component, if attached.
    pub(crate) fn detach(&mut self, capability: Capability) -> Option<ComponentHandle> {
        self.components[capability.index()].take()
    }

    pub(crate) fn activate(&mut self, id: EntityId) {
        self.id = id;
        self.active = true;
    }

    /// Deactivates the slot and hands every component to `release`.
    pub(crate) fn finalize(&mut self, mut release: impl FnMut(ComponentHandle)) {
        for slot in &mut self.components {
            if let Some(handle) = slot.take() {
                release(handle);
            }
        }
        self.active = false;
        self.id = EntityId::NULL;
    }

    /// Runs the per-entity hook of every attached component.
    pub(crate) fn update(&self, ctx: &mut ComponentContext<'_>) -> CoreResult<()> {
        for handle in self.components() {
            factory::update(handle, self, ctx)?;
        }
        Ok(())
    }

    /// Binds every attached component to its siblings.
    pub(crate) fn setup(&self, ctx: &mut ComponentContext<'_>) -> CoreResult<()> {
        for handle in self.components() {
            factory::setup(handle, self, ctx)?;
        }
        Ok(())
    }
}
