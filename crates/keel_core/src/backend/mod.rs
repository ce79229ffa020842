//! # Capability Interfaces
//!
//! The core never talks to a renderer, physics engine, socket or keyboard
//! directly. Each collaborator sits behind one of these traits and is
//! injected into the [`crate::World`] through [`crate::Dependencies`].
//!
//! ```text
//! ┌──────────────┐   RenderBackend    ┌──────────────┐
//! │              │───────────────────>│ scene graph  │
//! │              │   PhysicsBackend   ├──────────────┤
//! │    World     │───────────────────>│ rigid bodies │
//! │              │   NetworkBackend   ├──────────────┤
//! │              │───────────────────>│ server/client│
//! │              │   InputDecoder     ├──────────────┤
//! │              │───────────────────>│ key events   │
//! │              │   Environment      ├──────────────┤
//! │              │───────────────────>│ sky, weather │
//! └──────────────┘                    └──────────────┘
//! ```

mod environment;
mod input;
mod network;
mod physics;
mod render;

pub use environment::Environment;
pub use input::{InputDecoder, InputEvent, Key};
pub use network::{NetworkBackend, NetworkParams, NetworkRole, NullNetwork};
pub use physics::{PhysicsBackend, RigidActorDesc, RigidActorHandle};
pub use render::{LightKind, RenderBackend, RenderObjectDesc, RenderObjectId, SceneHandle};

use thiserror::Error;

/// Failure reported by an external backend.
///
/// The core forwards these unchanged; retry policy belongs to the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{backend} backend failure: {message}")]
pub struct BackendError {
    /// Which backend failed ("render", "physics", "network", ...).
    pub backend: &'static str,
    /// Backend-specific description.
    pub message: String,
}

impl BackendError {
    /// Creates a backend error.
    #[must_use]
    pub fn new(backend: &'static str, message: impl Into<String>) -> Self {
        Self {
            backend,
            message: message.into(),
        }
    }
}
