//! # Core Error Types
//!
//! All errors the core can report to its caller. Nothing in the core logs
//! an error and carries on; every condition below reaches the caller.

use thiserror::Error;

use crate::backend::{BackendError, NetworkRole};
use crate::ecs::{Capability, EntityId};

/// Errors that can occur in the core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Every entity slot is active.
    #[error("entity pool exhausted: all {capacity} slots are active")]
    EntityPoolExhausted {
        /// Capacity of the pool.
        capacity: usize,
    },

    /// The backing pool for one capability is full.
    #[error("{capability} pool exhausted: all {capacity} slots are in use")]
    ComponentPoolExhausted {
        /// Capability whose pool ran out.
        capability: Capability,
        /// Capacity of that pool.
        capacity: usize,
    },

    /// An operation was called in a world state that does not allow it.
    #[error("cannot {operation} while the world is {state}")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// The state the world was in.
        state: &'static str,
    },

    /// A network backend was requested while another one is initialized.
    #[error("cannot start a network backend: {active} is already initialized")]
    NetworkAlreadyActive {
        /// The backend currently active.
        active: NetworkRole,
    },

    /// A network backend teardown was requested for a role that is not active.
    #[error("cannot destroy {requested}: active network backend is {active}")]
    NetworkNotActive {
        /// Role the caller asked to destroy.
        requested: NetworkRole,
        /// Role actually active.
        active: NetworkRole,
    },

    /// No active entity has this ID.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The entity already owns an instance of this capability.
    #[error("{entity} already has a {capability} component")]
    CapabilityAlreadyAttached {
        /// Target entity.
        entity: EntityId,
        /// Capability attached twice.
        capability: Capability,
    },

    /// The entity has no component of this capability.
    #[error("{entity} has no {capability} component")]
    CapabilityNotAttached {
        /// Target entity.
        entity: EntityId,
        /// Capability looked up.
        capability: Capability,
    },

    /// A component handle no longer points at a live pool slot.
    #[error("stale {0} component handle")]
    StaleComponent(Capability),

    /// A component needs a sibling capability that the entity lacks.
    #[error("{entity}: {capability} component requires a {requires} component")]
    MissingCapability {
        /// Entity being set up.
        entity: EntityId,
        /// Component that failed.
        capability: Capability,
        /// Capability it depends on.
        requires: Capability,
    },

    /// An external backend required by the operation was not injected.
    #[error("missing backend: {0}")]
    MissingBackend(&'static str),

    /// An external backend reported a failure.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_capability() {
        let err = CoreError::ComponentPoolExhausted {
            capability: Capability::Camera,
            capacity: 4,
        };
        assert_eq!(
            err.to_string(),
            "camera pool exhausted: all 4 slots are in use"
        );
    }

    #[test]
    fn test_backend_error_converts() {
        let err: CoreError = BackendError::new("physics", "scene lost").into();
        assert!(matches!(err, CoreError::Backend(_)));
        assert_eq!(err.to_string(), "physics backend failure: scene lost");
    }
}
