//! Built-in systems.

mod physics_sync;

pub use physics_sync::PhysicsSyncSystem;
