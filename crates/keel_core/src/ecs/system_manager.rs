//! # System Manager
//!
//! Owns the registered systems and runs them in registration order. There
//! is no de-registration path.

use super::entity::{Entity, EntityId};
use super::system::{System, SystemContext};
use crate::error::CoreResult;

/// Ordered registry of systems.
#[derive(Default)]
pub struct SystemManager {
    systems: Vec<Box<dyn System>>,
}

impl SystemManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a system after every existing one.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        tracing::debug!(system = system.name(), order = self.systems.len(), "System registered");
        self.systems.push(system);
    }

    /// Offers an entity to every system; returns how many claimed it.
    pub fn add_entity(&mut self, entity: &Entity) -> usize {
        self.systems
            .iter_mut()
            .map(|system| usize::from(system.offer(entity)))
            .sum()
    }

    /// Drops an entity from every system's membership.
    pub fn remove_entity(&mut self, id: EntityId) {
        for system in &mut self.systems {
            system.forget(id);
        }
    }

    /// Drops the entity from systems whose requirements it no longer meets.
    /// Returns how many systems let it go.
    pub fn revalidate(&mut self, entity: &Entity) -> usize {
        let held = entity.capabilities();
        self.systems
            .iter_mut()
            .filter(|system| !held.contains_all(system.requirements()))
            .map(|system| usize::from(system.forget(entity.id())))
            .sum()
    }

    /// Empties every system's membership, keeping the systems.
    pub fn clear_members(&mut self) {
        for system in &mut self.systems {
            system.members_mut().clear();
        }
    }

    /// Runs every system once, in registration order.
    ///
    /// # Errors
    ///
    /// The first system failure; later systems do not run this frame.
    pub fn update(&mut self, ctx: &mut SystemContext<'_>) -> CoreResult<()> {
        for system in &mut self.systems {
            system.update(ctx)?;
        }
        Ok(())
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// System names in update order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.name())
    }

    /// Number of systems that claimed `id`.
    #[must_use]
    pub fn membership_count(&self, id: EntityId) -> usize {
        self.systems
            .iter()
            .filter(|s| s.members().contains(id))
            .count()
    }
}

impl std::fmt::Debug for SystemManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
