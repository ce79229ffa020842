//! # Commands
//!
//! Decoded player input, applied to one entity. `execute` runs on key press
//! and `unexecute` on release, so a held key keeps an intent flag raised.

use std::fmt;

use crate::ecs::{ActorComponent, Capability, EntityId};
use crate::error::{CoreError, CoreResult};
use crate::world::World;

/// An action applied to an entity.
pub trait Command: fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Starts the action.
    ///
    /// # Errors
    ///
    /// [`CoreError::EntityNotFound`] or [`CoreError::CapabilityNotAttached`]
    /// when the target cannot carry the action.
    fn execute(&self, world: &mut World, entity: EntityId) -> CoreResult<()>;

    /// Stops the action.
    ///
    /// # Errors
    ///
    /// Same as [`Command::execute`].
    fn unexecute(&self, world: &mut World, entity: EntityId) -> CoreResult<()>;
}

fn actor_mut(world: &mut World, entity: EntityId) -> CoreResult<&mut ActorComponent> {
    if world.get_entity_by_id(entity).is_none() {
        return Err(CoreError::EntityNotFound(entity));
    }
    world
        .component_mut::<ActorComponent>(entity)
        .ok_or(CoreError::CapabilityNotAttached {
            entity,
            capability: Capability::Actor,
        })
}

macro_rules! movement_command {
    ($(#[$doc:meta])* $name:ident, $label:literal, $setter:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl Command for $name {
            fn name(&self) -> &'static str {
                $label
            }

            fn execute(&self, world: &mut World, entity: EntityId) -> CoreResult<()> {
                actor_mut(world, entity)?.$setter(true);
                Ok(())
            }

            fn unexecute(&self, world: &mut World, entity: EntityId) -> CoreResult<()> {
                actor_mut(world, entity)?.$setter(false);
                Ok(())
            }
        }
    };
}

movement_command!(
    /// Walk along the entity's facing direction.
    MoveForward,
    "move_forward",
    set_moving_forward
);
movement_command!(
    /// Walk away from the entity's facing direction.
    MoveBackward,
    "move_backward",
    set_moving_backward
);
movement_command!(
    /// Strafe left.
    MoveLeft,
    "move_left",
    set_moving_left
);
movement_command!(
    /// Strafe right.
    MoveRight,
    "move_right",
    set_moving_right
);
