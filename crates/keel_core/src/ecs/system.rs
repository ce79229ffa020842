//! # Systems
//!
//! A system is per-frame behaviour over the entities that hold every
//! capability it requires. Membership is claimed when an entity is offered
//! and dropped when the world forgets the entity; handles that no longer
//! resolve are skipped regardless.

use std::collections::BTreeMap;

use super::capability::CapabilitySet;
use super::entity::{Entity, EntityHandle, EntityId};
use super::entity_pool::EntityPool;
use super::factory::ComponentFactory;
use crate::backend::PhysicsBackend;
use crate::error::CoreResult;

/// Entities claimed by one system, ordered by ID.
#[derive(Clone, Debug, Default)]
pub struct Membership {
    members: BTreeMap<EntityId, EntityHandle>,
}

impl Membership {
    /// Empty membership.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims an entity; returns `false` if it was already a member.
    pub fn insert(&mut self, handle: EntityHandle) -> bool {
        self.members.insert(handle.id(), handle).is_none()
    }

    /// Drops an entity; returns whether it was a member.
    pub fn remove(&mut self, id: EntityId) -> bool {
        self.members.remove(&id).is_some()
    }

    /// Whether `id` is a member.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains_key(&id)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drops every member.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Member handles in ID order.
    pub fn handles(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.members.values().copied()
    }

    /// Members that still resolve to a live entity.
    pub fn live<'p>(&'p self, entities: &'p EntityPool) -> impl Iterator<Item = &'p Entity> + 'p {
        self.members.values().filter_map(|&h| entities.resolve(h))
    }
}

/// What a system sees during its update.
pub struct SystemContext<'a> {
    /// Every entity slot.
    pub entities: &'a EntityPool,
    /// Every component pool.
    pub components: &'a mut ComponentFactory,
    /// Physics backend, when the world runs physics.
    pub physics: Option<&'a (dyn PhysicsBackend + 'static)>,
    /// Index of the frame being run, starting at zero.
    pub frame: u64,
    /// Seconds simulated per frame.
    pub frame_time: f32,
}

/// Per-frame behaviour over a subset of entities.
pub trait System {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Capabilities an entity must hold to be claimed.
    fn requirements(&self) -> CapabilitySet;

    /// Claimed entities.
    fn members(&self) -> &Membership;

    /// Mutable claimed entities.
    fn members_mut(&mut self) -> &mut Membership;

    /// Offers an entity; claims it if it holds every required capability.
    ///
    /// Returns whether the entity was newly claimed.
    fn offer(&mut self, entity: &Entity) -> bool {
        if entity.is_active() && entity.capabilities().contains_all(self.requirements()) {
            self.members_mut().insert(entity.handle())
        } else {
            false
        }
    }

    /// Drops an entity from membership.
    fn forget(&mut self, id: EntityId) -> bool {
        self.members_mut().remove(id)
    }

    /// Runs one frame.
    ///
    /// # Errors
    ///
    /// Any failure aborts the frame and is returned from `World::update`.
    fn update(&mut self, ctx: &mut SystemContext<'_>) -> CoreResult<()>;
}
