//! # Physics Transform Sync
//!
//! Pulls the authoritative pose of every bound rigid actor into the
//! entity's Scene component. The pull runs before this frame's physics step,
//! so a Scene always shows the pose from the previous step.

use crate::ecs::{
    Capability, CapabilitySet, Membership, PhysicsComponent, SceneComponent, System,
    SystemContext,
};
use crate::error::{CoreError, CoreResult};

/// Copies physics poses into Scene transforms.
#[derive(Debug, Default)]
pub struct PhysicsSyncSystem {
    members: Membership,
    last_synced: usize,
}

impl PhysicsSyncSystem {
    /// Creates the system with no members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities whose transform was written on the last update.
    #[must_use]
    pub const fn last_synced(&self) -> usize {
        self.last_synced
    }
}

impl System for PhysicsSyncSystem {
    fn name(&self) -> &str {
        "physics_sync"
    }

    fn requirements(&self) -> CapabilitySet {
        CapabilitySet::of(&[Capability::Physics, Capability::Scene])
    }

    fn members(&self) -> &Membership {
        &self.members
    }

    fn members_mut(&mut self) -> &mut Membership {
        &mut self.members
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> CoreResult<()> {
        self.last_synced = 0;
        let Some(physics) = ctx.physics else {
            return Ok(());
        };
        let entities = ctx.entities;

        for entity in self.members.live(entities) {
            let (Some(body), Some(scene)) = (
                entity.component(Capability::Physics),
                entity.component(Capability::Scene),
            ) else {
                continue;
            };

            // Unbound until a rigid actor is created for the entity.
            let Some(actor) = ctx
                .components
                .get::<PhysicsComponent>(body.slot())
                .and_then(PhysicsComponent::actor)
            else {
                continue;
            };

            let pose = physics.global_pose(actor)?;
            ctx.components
                .get_mut::<SceneComponent>(scene.slot())
                .ok_or(CoreError::StaleComponent(Capability::Scene))?
                .set_transform(pose);
            self.last_synced += 1;
        }

        tracing::trace!(frame = ctx.frame, synced = self.last_synced, "Physics poses pulled");
        Ok(())
    }
}
