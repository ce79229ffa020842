//! # Entity Component System
//!
//! ```text
//! ┌────────────┐   owns    ┌──────────────────┐
//! │ EntityPool │──────────▶│ Entity (slot)    │──┐ ComponentHandle per capability
//! └────────────┘           └──────────────────┘  │
//!                                                 ▼
//! ┌──────────────────┐  one pool per capability ┌───────────┐
//! │ ComponentFactory │─────────────────────────▶│ Component │── owner: EntityId
//! └──────────────────┘                          └───────────┘
//!
//! ┌───────────────┐  registration order  ┌────────┐  membership: EntityHandle
//! │ SystemManager │─────────────────────▶│ System │───────────────────────────
//! └───────────────┘                      └────────┘
//! ```
//!
//! Nothing holds a pointer into another arena; every cross-reference is an
//! index that resolves to `None` once its target is gone.

mod capability;
pub mod component;
mod entity;
mod entity_pool;
pub(crate) mod factory;
mod system;
mod system_manager;

pub use capability::{Capability, CapabilitySet};
pub use component::{
    ActorComponent, CameraComponent, Component, ComponentContext, ComponentHandle,
    InitContext, LightComponent, ModelComponent, PhysicsComponent, ReleaseContext,
    SceneComponent,
};
pub use entity::{Entity, EntityHandle, EntityId};
pub use entity_pool::EntityPool;
pub use factory::ComponentFactory;
pub use system::{Membership, System, SystemContext};
pub use system_manager::SystemManager;
