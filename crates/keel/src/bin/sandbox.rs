//! # KEEL Sandbox
//!
//! Headless demo: hosts a server, lets one in-process guest join, spawns a
//! player, a prop and a light, then walks the player forward while the loop
//! runs. Halfway through it pauses and resumes the world.
//!
//! ```bash
//! cargo run --bin sandbox                  # defaults
//! cargo run --bin sandbox -- keel.toml     # config file
//! RUST_LOG=keel=debug cargo run --bin sandbox
//! ```

use keel::core::{
    ActorComponent, InputEvent, Key, NetworkBackend, NetworkParams, PhysicsSyncSystem,
    RigidActorDesc, SceneComponent, Transform, Vec3,
};
use keel::networking::{ChannelHub, Client, ClientConfig, Server, ServerConfig, DEFAULT_PORT};
use keel::{
    headless_dependencies, Capability, EngineConfig, EngineResult, EntityId, GameLoop,
    LoopControl, World,
};
use tracing_subscriber::EnvFilter;

/// Iterations run when the config sets no limit.
const DEMO_FRAMES: u64 = 240;

/// Iterations spent paused in the middle of the run.
const PAUSE_FRAMES: u64 = 30;

fn main() -> EngineResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let max_frames = *config.game_loop.max_frames.get_or_insert(DEMO_FRAMES);

    let mut hub = ChannelHub::new();
    let (deps, probe) = headless_dependencies(&config);
    let deps = deps.with_server(Box::new(Server::new(hub.host(), ServerConfig::default())));

    let mut world = World::new(config.world.clone(), deps);
    world.init(config.game_loop.use_physics)?;
    world.init_server(DEFAULT_PORT, "host")?;

    let mut guest = Client::new(hub.connect(), ClientConfig::default());
    guest.init(&NetworkParams::Client {
        address: format!("127.0.0.1:{DEFAULT_PORT}"),
        username: "guest".to_owned(),
    })?;

    let player = spawn_scene(&mut world, config.game_loop.use_physics)?;
    world.set_player(player)?;

    let pause_at = max_frames / 2;
    let mut game = GameLoop::new(world, config.game_loop);
    game.run(|world, iteration| {
        guest.update()?;

        if iteration == 10 {
            world.apply_input(player, &InputEvent::pressed(Key::W))?;
        }
        if iteration == pause_at {
            world.pause()?;
        }
        if iteration == pause_at + PAUSE_FRAMES {
            world.resume()?;
            world.apply_input(player, &InputEvent::released(Key::W))?;
        }
        Ok(LoopControl::Continue)
    })?;

    let mut world = game.into_world();
    if let Some(scene) = world.component::<SceneComponent>(player) {
        tracing::info!(position = ?scene.position(), "Player final position");
    }
    tracing::info!(
        guest = ?guest.state(),
        frames = world.frame(),
        render_objects = probe.object_count(),
        "Sandbox finished"
    );

    world.destroy_server()?;
    world.destroy()?;
    Ok(())
}

/// Player (camera + actor, optionally physics), a crate prop and a lamp.
fn spawn_scene(world: &mut World, use_physics: bool) -> EngineResult<EntityId> {
    let player = world.create_entity()?;
    for capability in [Capability::Scene, Capability::Camera, Capability::Actor] {
        world.attach_component(player, capability)?;
    }
    if let Some(actor) = world.component_mut::<ActorComponent>(player) {
        actor.speed = 4.0;
    }

    let prop = world.create_entity()?;
    world.attach_component(prop, Capability::Scene)?;
    world.attach_component(prop, Capability::Model)?;

    let lamp = world.create_entity()?;
    world.attach_component(lamp, Capability::Scene)?;
    world.attach_component(lamp, Capability::Light)?;

    world.setup_entities()?;
    world.set_model_mesh(prop, "crate.mesh")?;

    if use_physics {
        world.attach_component(prop, Capability::Physics)?;
        world.add_system(Box::new(PhysicsSyncSystem::new()))?;
        world.bind_rigid_actor(
            prop,
            &RigidActorDesc::dynamic(Transform::at(Vec3::new(2.0, 8.0, -5.0))),
        )?;
        world.add_entity_to_systems(prop)?;
    }

    Ok(player)
}
