//! # KEEL Core
//!
//! The gameplay-object backbone of the frame loop:
//! - A fixed-capacity entity pool
//! - One fixed-capacity pool per component capability
//! - A system registry driven once per frame in registration order
//! - The [`World`] orchestrator tying them to the external backends
//!
//! ## Architecture Rules
//!
//! 1. **Pools never grow** - capacities come from [`WorldConfig`]
//! 2. **Handles, not pointers** - entities and components refer to each other by index
//! 3. **Single frame thread** - all entity/component mutation happens inside `World::update`
//!
//! ## Example
//!
//! ```rust,ignore
//! use keel_core::{Capability, World, WorldConfig};
//!
//! let mut world = World::new(WorldConfig::default(), deps);
//! world.init(true)?;
//!
//! let player = world.create_entity()?;
//! world.attach_component(player, Capability::Scene)?;
//! world.attach_component(player, Capability::Camera)?;
//! world.setup_entities()?;
//!
//! loop {
//!     world.update()?;
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod backend;
pub mod command;
pub mod config;
pub mod ecs;
pub mod error;
pub mod math;
pub mod memory;
pub mod systems;
pub mod world;

pub use backend::{
    BackendError, Environment, InputDecoder, InputEvent, Key, LightKind, NetworkBackend,
    NetworkParams, NetworkRole, NullNetwork, PhysicsBackend, RenderBackend, RenderObjectDesc,
    RenderObjectId, RigidActorDesc, RigidActorHandle, SceneHandle,
};
pub use command::{Command, MoveBackward, MoveForward, MoveLeft, MoveRight};
pub use config::{PoolCapacities, WorldConfig};
pub use ecs::{
    ActorComponent, CameraComponent, Capability, CapabilitySet, Component, ComponentFactory,
    ComponentHandle, Entity, EntityHandle, EntityId, EntityPool, LightComponent, Membership,
    ModelComponent, PhysicsComponent, SceneComponent, System, SystemContext, SystemManager,
};
pub use error::{CoreError, CoreResult};
pub use math::{Quat, Transform, Vec3};
pub use memory::{PoolAllocator, PoolHandle};
pub use systems::PhysicsSyncSystem;
pub use world::{Dependencies, World, WorldState};
