//! # Entity Pool
//!
//! Fixed-capacity arena of entity slots. Slots are pre-allocated once and
//! recycled through a free list; an ID map gives O(1) lookup by entity ID.

use std::collections::HashMap;

use super::component::ComponentHandle;
use super::entity::{Entity, EntityHandle, EntityId};
use crate::error::{CoreError, CoreResult};

/// The entity arena.
///
/// # Capacity
///
/// The pool has a fixed capacity set at creation. Asking for one more
/// entity than that is an error; nothing is dropped or grown.
#[derive(Debug)]
pub struct EntityPool {
    /// All entity slots (pre-allocated).
    slots: Box<[Entity]>,
    /// Free list of slot indices for reuse.
    free_slots: Vec<u32>,
    /// Live entity ID to slot index.
    ids: HashMap<EntityId, u32>,
    /// Next ID to hand out.
    next_id: u64,
}

impl EntityPool {
    /// Creates a pool with `capacity` inactive slots.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`. Configured
    /// capacities are validated before they reach this point.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        let Ok(top) = u32::try_from(capacity) else {
            panic!("Capacity cannot exceed u32::MAX");
        };

        let slots = (0..top)
            .map(Entity::empty)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            free_slots: (0..top).rev().collect(),
            ids: HashMap::with_capacity(capacity),
            next_id: 0,
        }
    }

    /// Maximum number of simultaneously active entities.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of currently active entities.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.ids.len()
    }

    /// Activates a free slot under a fresh ID.
    ///
    /// # Errors
    ///
    /// [`CoreError::EntityPoolExhausted`] when every slot is active. Existing
    /// entities are untouched.
    pub fn create(&mut self) -> CoreResult<EntityHandle> {
        let Some(slot) = self.free_slots.pop() else {
            return Err(CoreError::EntityPoolExhausted {
                capacity: self.capacity(),
            });
        };

        let id = EntityId::new(self.next_id);
        self.next_id += 1;

        let entity = &mut self.slots[slot as usize];
        entity.activate(id);
        self.ids.insert(id, slot);

        Ok(entity.handle())
    }

    /// Deactivates an entity, handing each of its components to `release`.
    ///
    /// # Errors
    ///
    /// [`CoreError::EntityNotFound`] if `id` is not active (including a
    /// second destroy of the same entity).
    pub fn destroy(
        &mut self,
        id: EntityId,
        release: impl FnMut(ComponentHandle),
    ) -> CoreResult<()> {
        let Some(slot) = self.ids.remove(&id) else {
            return Err(CoreError::EntityNotFound(id));
        };

        self.slots[slot as usize].finalize(release);
        self.free_slots.push(slot);
        Ok(())
    }

    /// Finalizes every slot, active or not, and resets the pool.
    ///
    /// Returns how many entities were still active.
    pub fn finalize_all(&mut self, mut release: impl FnMut(ComponentHandle)) -> usize {
        let active = self.ids.len();
        for entity in self.slots.iter_mut() {
            entity.finalize(&mut release);
        }
        self.ids.clear();

        let top = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.free_slots.clear();
        self.free_slots.extend((0..top).rev());
        active
    }

    /// Active entity by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = *self.ids.get(&id)?;
        Some(&self.slots[slot as usize])
    }

    /// Mutable active entity by ID.
    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = *self.ids.get(&id)?;
        Some(&mut self.slots[slot as usize])
    }

    /// Resolves a handle; `None` once the entity it was issued for is gone.
    #[inline]
    #[must_use]
    pub fn resolve(&self, handle: EntityHandle) -> Option<&Entity> {
        let entity = self.slots.get(handle.slot() as usize)?;
        (entity.is_active() && entity.id() == handle.id()).then_some(entity)
    }

    /// Iterates over active entities in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().filter(|e| e.is_active())
    }

    /// Every slot, active or not.
    #[must_use]
    pub fn slots(&self) -> &[Entity] {
        &self.slots
    }
}
