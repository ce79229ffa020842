//! # KEEL
//!
//! The engine facade. Re-exports the core and networking crates and supplies
//! the concrete pieces a headless build needs:
//!
//! | Module          | Provides                                         |
//! |-----------------|--------------------------------------------------|
//! | [`render`]      | In-memory scene graph renderer + probe           |
//! | [`physics`]     | Gravity, terminal velocity, ground plane         |
//! | [`environment`] | Day/night cycle                                  |
//! | [`input`]       | Keyboard decoder over configurable bindings      |
//! | [`game_loop`]   | Frame pacing, pause handling, frame statistics   |
//! | [`config`]      | TOML engine configuration                        |
//!
//! ## Example
//!
//! ```rust,ignore
//! use keel::{headless_dependencies, EngineConfig, GameLoop, LoopControl, World};
//!
//! let config = EngineConfig::load("keel.toml")?;
//! let (deps, _probe) = headless_dependencies(&config);
//! let mut world = World::new(config.world.clone(), deps);
//! world.init(config.game_loop.use_physics)?;
//!
//! let mut game = GameLoop::new(world, config.game_loop);
//! game.run(|_, _| Ok(LoopControl::Continue))?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod environment;
pub mod error;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod render;

pub use keel_core as core;
pub use keel_networking as networking;

pub use config::{EngineConfig, KeyBindings, LoopConfig};
pub use environment::DayCycle;
pub use error::{EngineError, EngineResult};
pub use game_loop::{FrameStats, FrameStatsAccumulator, GameLoop, LoopControl};
pub use input::KeyboardDecoder;
pub use physics::KinematicPhysics;
pub use render::{HeadlessRenderer, RenderProbe};

pub use keel_core::{Capability, Dependencies, EntityId, World, WorldConfig, WorldState};

/// Dependencies wired to the headless backends: renderer, day cycle,
/// kinematic physics and a keyboard decoder using `config.bindings`.
/// Network backends are left for the caller to attach.
#[must_use]
pub fn headless_dependencies(config: &EngineConfig) -> (Dependencies, RenderProbe) {
    let render = HeadlessRenderer::new();
    let probe = render.probe();
    let deps = Dependencies::new(Box::new(render), Box::new(DayCycle::default()))
        .with_physics(Box::new(KinematicPhysics::default()))
        .with_input(Box::new(KeyboardDecoder::new(config.bindings)));
    (deps, probe)
}
