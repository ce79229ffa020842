//! # World Lifecycle Tests
//!
//! Drive a [`World`] over recording mock backends and check the frame
//! order, pool bounds, teardown order and network mode switching.
//!
//! Run with: cargo test -p keel_core --test world_lifecycle

mod common;

use std::collections::HashSet;

use common::{count, position, Harness, MockEnvironment, MockRender};
use keel_core::{
    ActorComponent, CameraComponent, Capability, CapabilitySet, CoreError, CoreResult,
    Dependencies, InputEvent, Key, Membership, ModelComponent, NetworkRole, PhysicsComponent,
    PhysicsSyncSystem, PoolCapacities, RenderObjectDesc, RigidActorDesc, SceneComponent, System,
    SystemContext, Transform, Vec3, World, WorldConfig, WorldState,
};

/// Raises the forward flag on every member actor.
#[derive(Default)]
struct DriveForward {
    members: Membership,
}

impl System for DriveForward {
    fn requirements(&self) -> CapabilitySet {
        CapabilitySet::of(&[Capability::Actor])
    }

    fn members(&self) -> &Membership {
        &self.members
    }

    fn members_mut(&mut self) -> &mut Membership {
        &mut self.members
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> CoreResult<()> {
        for entity in self.members.live(ctx.entities) {
            if let Some(handle) = entity.component(Capability::Actor) {
                if let Some(actor) = ctx.components.get_mut::<ActorComponent>(handle.slot()) {
                    actor.set_moving_forward(true);
                }
            }
        }
        Ok(())
    }
}

fn spawn(world: &mut World, capabilities: &[Capability]) -> keel_core::EntityId {
    let id = world.create_entity().unwrap();
    for &capability in capabilities {
        world.attach_component(id, capability).unwrap();
    }
    id
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn init_brings_backends_up_in_dependency_order() {
    let mut h = Harness::new(WorldConfig::default());
    assert_eq!(h.world.state(), WorldState::Uninitialized);

    h.world.init(true).unwrap();

    assert_eq!(h.world.state(), WorldState::Initialized);
    let scene = position(&h.journal, "render.create_scene").unwrap();
    let env = position(&h.journal, "env.init").unwrap();
    let physics = position(&h.journal, "physics.create_scene").unwrap();
    assert!(scene < env && env < physics);
    assert_eq!(h.world.entities().unwrap().capacity(), 256);
}

#[test]
fn init_with_physics_requires_a_backend() {
    let journal = common::Journal::default();
    let deps = Dependencies::new(
        Box::new(MockRender {
            state: std::sync::Arc::default(),
            journal: journal.clone(),
        }),
        Box::new(MockEnvironment {
            journal: journal.clone(),
        }),
    );
    let mut world = World::new(WorldConfig::default(), deps);

    assert_eq!(world.init(true), Err(CoreError::MissingBackend("physics")));
    assert_eq!(world.state(), WorldState::Uninitialized);
    assert!(journal.lock().is_empty());

    world.init(false).unwrap();
    world.update().unwrap();
}

#[test]
fn lifecycle_calls_outside_their_state_are_rejected() {
    let mut h = Harness::new(WorldConfig::default());

    assert!(matches!(
        h.world.update(),
        Err(CoreError::InvalidState { state: "uninitialized", .. })
    ));
    assert!(h.world.create_entity().is_err());

    h.world.init(false).unwrap();
    assert!(h.world.init(false).is_err());
    assert!(h.world.resume().is_err());

    h.world.destroy().unwrap();
    assert!(matches!(
        h.world.update(),
        Err(CoreError::InvalidState { state: "destroyed", .. })
    ));
    assert!(h.world.destroy().is_err());
}

#[test]
fn invalid_config_is_rejected_before_anything_is_created() {
    let config = WorldConfig {
        pools: PoolCapacities {
            light: 0,
            ..PoolCapacities::default()
        },
        ..WorldConfig::default()
    };
    let mut h = Harness::new(config);

    assert!(matches!(h.world.init(false), Err(CoreError::InvalidConfig(_))));
    assert!(h.journal.lock().is_empty());
}

#[test]
#[cfg(target_pointer_width = "64")]
fn oversized_pool_fails_init_without_touching_backends() {
    let config = WorldConfig {
        pools: PoolCapacities {
            actor: u32::MAX as usize + 1,
            ..PoolCapacities::default()
        },
        ..WorldConfig::default()
    };
    let mut h = Harness::new(config);

    assert!(matches!(h.world.init(false), Err(CoreError::InvalidConfig(_))));
    assert_eq!(h.world.state(), WorldState::Uninitialized);
    assert!(h.journal.lock().is_empty());
}

#[test]
fn update_runs_network_systems_entities_physics_environment() {
    let mut h = Harness::initialized(true);
    h.world.init_server(7777, "host").unwrap();
    h.journal.lock().clear();

    h.world.update().unwrap();

    let journal = h.journal.lock().clone();
    assert_eq!(
        journal,
        vec!["server.update", "physics.simulate", "env.update"]
    );
    assert_eq!(h.world.state(), WorldState::Running);
    assert_eq!(h.world.frame(), 1);
}

#[test]
fn pause_and_resume_drive_the_environment() {
    let mut h = Harness::initialized(false);
    h.world.update().unwrap();

    h.world.pause().unwrap();
    assert_eq!(h.world.state(), WorldState::Paused);
    assert!(h.world.pause().is_err());

    // The caller decides whether to keep stepping while paused.
    h.world.update().unwrap();

    h.world.resume().unwrap();
    assert_eq!(h.world.state(), WorldState::Running);
    assert_eq!(count(&h.journal, "env.pause"), 1);
    assert_eq!(count(&h.journal, "env.resume"), 1);
}

#[test]
fn destroy_tears_down_in_reverse_order() {
    let mut h = Harness::initialized(true);
    let id = spawn(
        &mut h.world,
        &[Capability::Scene, Capability::Camera, Capability::Physics],
    );
    h.world.setup_entities().unwrap();
    let actor = h
        .world
        .bind_rigid_actor(id, &RigidActorDesc::default())
        .unwrap();
    assert_eq!(h.render.lock().live.len(), 2);

    h.world.destroy().unwrap();

    let env = position(&h.journal, "env.destroy").unwrap();
    let physics = position(&h.journal, "physics.destroy_scene").unwrap();
    let cameras = position(&h.journal, "render.destroy_all_cameras").unwrap();
    let clear = position(&h.journal, "render.clear_scene").unwrap();
    let scene = position(&h.journal, "render.destroy_scene").unwrap();
    assert!(env < physics && physics < cameras && cameras < clear && clear < scene);

    // Components released their backend objects before the scene went away.
    assert_eq!(h.render.lock().destroyed.len(), 2);
    assert_eq!(h.physics.lock().released, vec![actor]);
    assert_eq!(h.world.state(), WorldState::Destroyed);
    assert_eq!(h.world.entity_count(), 0);
}

// ============================================================================
// Entities and components
// ============================================================================

#[test]
fn entity_pool_capacity_is_a_hard_bound() {
    let mut h = Harness::initialized(false);

    let ids: Vec<_> = (0..8).map(|_| h.world.create_entity().unwrap()).collect();
    h.world.attach_component(ids[0], Capability::Scene).unwrap();

    assert_eq!(
        h.world.create_entity(),
        Err(CoreError::EntityPoolExhausted { capacity: 8 })
    );

    assert_eq!(h.world.entity_count(), 8);
    for id in &ids {
        assert_eq!(h.world.get_entity_by_id(*id).unwrap().id(), *id);
    }
    assert!(h.world.component::<SceneComponent>(ids[0]).is_some());
}

#[test]
fn entity_ids_stay_unique_across_reuse() {
    let mut h = Harness::initialized(false);
    let mut seen = HashSet::new();

    for _ in 0..5 {
        let batch: Vec<_> = (0..8).map(|_| h.world.create_entity().unwrap()).collect();
        for id in &batch {
            assert!(seen.insert(*id), "{id} handed out twice");
        }
        for id in batch {
            h.world.destroy_entity(id).unwrap();
        }
    }
}

#[test]
fn destroy_round_trip_frees_the_slot() {
    let mut h = Harness::initialized(false);
    let ids: Vec<_> = (0..8).map(|_| h.world.create_entity().unwrap()).collect();
    h.world.attach_component(ids[3], Capability::Scene).unwrap();

    h.world.destroy_entity(ids[3]).unwrap();

    assert!(h.world.get_entity_by_id(ids[3]).is_none());
    assert_eq!(
        h.world.destroy_entity(ids[3]),
        Err(CoreError::EntityNotFound(ids[3]))
    );
    assert_eq!(
        h.world.components().unwrap().allocated(Capability::Scene),
        0
    );

    let replacement = h.world.create_entity().unwrap();
    assert_ne!(replacement, ids[3]);
    assert!(h.world.get_entity_by_id(replacement).is_some());
}

#[test]
fn second_attach_of_a_capability_is_rejected() {
    let mut h = Harness::initialized(false);
    let id = spawn(&mut h.world, &[Capability::Scene]);
    let first = h.world.get_entity_by_id(id).unwrap().component(Capability::Scene);

    assert_eq!(
        h.world.attach_component(id, Capability::Scene),
        Err(CoreError::CapabilityAlreadyAttached {
            entity: id,
            capability: Capability::Scene,
        })
    );

    assert_eq!(
        h.world.get_entity_by_id(id).unwrap().component(Capability::Scene),
        first
    );
    assert_eq!(h.world.components().unwrap().allocated(Capability::Scene), 1);
    assert_eq!(h.render.lock().live.len(), 1);
}

#[test]
fn component_pool_exhaustion_is_per_capability() {
    let config = WorldConfig {
        pools: PoolCapacities {
            camera: 1,
            ..PoolCapacities::uniform(4)
        },
        ..WorldConfig::with_capacity(4, 4)
    };
    let mut h = Harness::new(config);
    h.world.init(false).unwrap();

    let a = spawn(&mut h.world, &[Capability::Camera]);
    let b = h.world.create_entity().unwrap();

    assert_eq!(
        h.world.attach_component(b, Capability::Camera),
        Err(CoreError::ComponentPoolExhausted {
            capability: Capability::Camera,
            capacity: 1,
        })
    );
    assert!(h.world.attach::<SceneComponent>(b).is_ok());
    assert!(h.world.get_entity_by_id(a).unwrap().has(Capability::Camera));
    assert!(!h.world.get_entity_by_id(b).unwrap().has(Capability::Camera));
}

#[test]
fn setup_mounts_render_components_on_the_scene_node() {
    let mut h = Harness::initialized(false);
    let id = spawn(
        &mut h.world,
        &[Capability::Scene, Capability::Camera, Capability::Light],
    );

    assert_eq!(h.world.setup_entities().unwrap(), 1);
    // Idempotent.
    h.world.setup_entity(id).unwrap();

    let node = h.world.component::<SceneComponent>(id).unwrap().node().unwrap();
    let camera = h.world.component::<CameraComponent>(id).unwrap();
    assert!(camera.is_mounted());

    let render = h.render.lock();
    assert_eq!(render.parents.get(&camera.camera().unwrap()), Some(&node));
    assert_eq!(render.parents.len(), 2);
}

#[test]
fn setup_without_a_scene_names_the_missing_capability() {
    let mut h = Harness::initialized(false);
    let id = spawn(&mut h.world, &[Capability::Camera]);

    assert_eq!(
        h.world.setup_entity(id),
        Err(CoreError::MissingCapability {
            entity: id,
            capability: Capability::Camera,
            requires: Capability::Scene,
        })
    );
}

#[test]
fn model_mesh_hangs_off_the_scene_node() {
    let mut h = Harness::initialized(false);
    let id = spawn(&mut h.world, &[Capability::Scene, Capability::Model]);

    h.world.set_model_mesh(id, "crate.mesh").unwrap();
    h.world.set_model_mesh(id, "barrel.mesh").unwrap();

    let model = h.world.component::<ModelComponent>(id).unwrap();
    assert_eq!(model.resource(), Some("barrel.mesh"));
    assert!(model.is_mounted());
    assert_eq!(
        h.render
            .lock()
            .live_count(|d| matches!(d, RenderObjectDesc::Mesh { .. })),
        1
    );

    let plain = h.world.create_entity().unwrap();
    assert_eq!(
        h.world.set_model_mesh(plain, "crate.mesh"),
        Err(CoreError::CapabilityNotAttached {
            entity: plain,
            capability: Capability::Model,
        })
    );
}

// ============================================================================
// Frame semantics
// ============================================================================

#[test]
fn system_results_are_visible_to_entity_hooks_in_the_same_frame() {
    let mut h = Harness::initialized(false);
    h.world.add_system(Box::new(DriveForward::default())).unwrap();
    let id = spawn(&mut h.world, &[Capability::Scene, Capability::Actor]);
    h.world.setup_entities().unwrap();

    h.world.update().unwrap();

    let scene = h.world.component::<SceneComponent>(id).unwrap();
    let expected = -ActorComponent::default().speed * h.world.config().frame_time;
    assert!((scene.position().z - expected).abs() < 1e-5);
    assert!(!scene.is_dirty());

    let node = scene.node().unwrap();
    let pushed = h.render.lock().transforms[&node];
    assert!((pushed.position.z - expected).abs() < 1e-5);
}

#[test]
fn physics_poses_reach_the_scene_one_frame_late() {
    let mut h = Harness::initialized(true);
    h.world.add_system(Box::new(PhysicsSyncSystem::new())).unwrap();
    let id = spawn(&mut h.world, &[Capability::Scene, Capability::Physics]);
    h.world.setup_entities().unwrap();

    let desc = RigidActorDesc {
        velocity: Vec3::new(0.0, 0.0, -60.0),
        ..RigidActorDesc::dynamic(Transform::at(Vec3::ZERO))
    };
    let actor = h.world.bind_rigid_actor(id, &desc).unwrap();
    let scene_z = |world: &World| world.component::<SceneComponent>(id).unwrap().position().z;

    // Frame 0: pull sees the initial pose, then the step moves the actor.
    h.world.update().unwrap();
    let simulated = h.physics.lock().actors[&actor].0.position.z;
    assert!((simulated + 1.0).abs() < 1e-4);
    assert!(scene_z(&h.world).abs() < 1e-6);

    // Frame 1: the pull catches up with frame 0's step.
    h.world.update().unwrap();
    assert!((scene_z(&h.world) - simulated).abs() < 1e-6);
}

#[test]
fn destroyed_entities_leave_system_membership() {
    let mut h = Harness::initialized(true);
    h.world.add_system(Box::new(PhysicsSyncSystem::new())).unwrap();
    let id = spawn(&mut h.world, &[Capability::Scene, Capability::Physics]);
    h.world.setup_entities().unwrap();
    assert_eq!(h.world.system_membership(id), 1);

    h.world.bind_rigid_actor(id, &RigidActorDesc::default()).unwrap();
    h.world.destroy_entity(id).unwrap();

    assert_eq!(h.world.system_membership(id), 0);
    assert!(h.world.component::<PhysicsComponent>(id).is_none());
    assert_eq!(h.physics.lock().released.len(), 1);
    h.world.update().unwrap();
}

#[test]
fn detached_physics_leaves_the_pool_and_the_sync_system() {
    let mut h = Harness::initialized(true);
    h.world.add_system(Box::new(PhysicsSyncSystem::new())).unwrap();
    let id = spawn(&mut h.world, &[Capability::Scene, Capability::Physics]);
    h.world.setup_entities().unwrap();
    let actor = h.world.bind_rigid_actor(id, &RigidActorDesc::default()).unwrap();
    assert_eq!(h.world.system_membership(id), 1);

    h.world.detach_component(id, Capability::Physics).unwrap();

    assert_eq!(h.world.components().unwrap().allocated(Capability::Physics), 0);
    assert_eq!(h.physics.lock().released, vec![actor]);
    assert_eq!(h.world.system_membership(id), 0);
    assert!(!h.world.get_entity_by_id(id).unwrap().has(Capability::Physics));
    h.world.update().unwrap();

    assert_eq!(
        h.world.detach_component(id, Capability::Physics),
        Err(CoreError::CapabilityNotAttached {
            entity: id,
            capability: Capability::Physics,
        })
    );

    h.world.attach_component(id, Capability::Physics).unwrap();
    assert_eq!(h.world.add_entity_to_systems(id).unwrap(), 1);
}

#[test]
fn detached_camera_destroys_its_render_object() {
    let mut h = Harness::initialized(false);
    let id = spawn(&mut h.world, &[Capability::Scene, Capability::Camera]);
    h.world.setup_entity(id).unwrap();
    let camera = h
        .world
        .component::<CameraComponent>(id)
        .and_then(CameraComponent::camera)
        .unwrap();

    // The scene node carries the camera.
    assert_eq!(
        h.world.detach_component(id, Capability::Scene),
        Err(CoreError::MissingCapability {
            entity: id,
            capability: Capability::Camera,
            requires: Capability::Scene,
        })
    );

    h.world.detach_component(id, Capability::Camera).unwrap();
    {
        let render = h.render.lock();
        assert!(!render.live.contains_key(&camera));
        assert!(render.destroyed.contains(&camera));
    }
    assert_eq!(h.world.components().unwrap().allocated(Capability::Camera), 0);

    h.world.detach_component(id, Capability::Scene).unwrap();
    assert!(h.world.get_entity_by_id(id).unwrap().capabilities().is_empty());
    assert!(h.world.attach::<CameraComponent>(id).is_ok());
}

#[test]
fn input_presses_and_releases_toggle_actor_intent() {
    let mut h = Harness::initialized(false);
    let id = spawn(&mut h.world, &[Capability::Scene, Capability::Actor]);

    assert!(h.world.apply_input(id, &InputEvent::pressed(Key::W)).unwrap());
    assert!(h.world.component::<ActorComponent>(id).unwrap().is_moving());

    assert!(h.world.apply_input(id, &InputEvent::released(Key::W)).unwrap());
    assert!(!h.world.component::<ActorComponent>(id).unwrap().is_moving());

    assert!(!h.world.apply_input(id, &InputEvent::pressed(Key::Space)).unwrap());

    let bare = h.world.create_entity().unwrap();
    assert_eq!(
        h.world.apply_input(bare, &InputEvent::pressed(Key::W)),
        Err(CoreError::CapabilityNotAttached {
            entity: bare,
            capability: Capability::Actor,
        })
    );
}

// ============================================================================
// Network
// ============================================================================

#[test]
fn offline_world_updates_without_any_backend_initialized() {
    let mut h = Harness::initialized(false);

    for _ in 0..3 {
        h.world.update().unwrap();
        assert!(!h.world.is_network_initialized());
    }

    assert_eq!(h.world.network_role(), NetworkRole::Offline);
    assert_eq!(h.server.lock().updates, 0);
    assert_eq!(h.client.lock().updates, 0);
}

#[test]
fn init_server_while_client_active_is_rejected() {
    let mut h = Harness::initialized(false);
    h.world.init_client("127.0.0.1:7777", "guest").unwrap();

    assert_eq!(
        h.world.init_server(7777, "host"),
        Err(CoreError::NetworkAlreadyActive {
            active: NetworkRole::Client,
        })
    );

    assert_eq!(h.world.network_role(), NetworkRole::Client);
    assert!(h.client.lock().initialized);
    assert_eq!(h.server.lock().inits, 0);
}

#[test]
fn destroying_the_inactive_role_is_rejected() {
    let mut h = Harness::initialized(false);

    assert_eq!(
        h.world.destroy_server(),
        Err(CoreError::NetworkNotActive {
            requested: NetworkRole::Server,
            active: NetworkRole::Offline,
        })
    );

    h.world.init_server(7777, "host").unwrap();
    h.world.destroy_server().unwrap();
    assert_eq!(h.world.network_role(), NetworkRole::Offline);
    assert_eq!(h.server.lock().destroys, 1);

    // Offline again, so a client may start.
    h.world.init_client("127.0.0.1:7777", "guest").unwrap();
}

#[test]
fn init_probes_server_then_client() {
    let mut h = Harness::new(WorldConfig::with_capacity(4, 4));
    h.client.lock().initialized = true;
    h.server.lock().initialized = true;

    h.world.init(false).unwrap();

    assert_eq!(h.world.network_role(), NetworkRole::Server);
}

#[test]
fn resume_rebinds_player_camera_and_drops_a_dead_network() {
    let mut h = Harness::initialized(false);
    let player = spawn(&mut h.world, &[Capability::Scene, Capability::Camera]);
    h.world.setup_entities().unwrap();
    h.world.set_player(player).unwrap();
    h.world.init_client("127.0.0.1:7777", "guest").unwrap();

    h.world.pause().unwrap();
    h.client.lock().initialized = false;
    h.world.resume().unwrap();

    let camera = h.world.component::<CameraComponent>(player).unwrap().camera();
    assert_eq!(h.render.lock().viewport, camera);
    assert_eq!(h.world.network_role(), NetworkRole::Offline);
    let bind = position(&h.journal, "render.bind_viewport_camera").unwrap();
    assert!(bind < position(&h.journal, "env.resume").unwrap());
}

#[test]
fn player_requires_a_camera() {
    let mut h = Harness::initialized(false);
    let id = spawn(&mut h.world, &[Capability::Scene]);

    assert_eq!(
        h.world.set_player(id),
        Err(CoreError::CapabilityNotAttached {
            entity: id,
            capability: Capability::Camera,
        })
    );
    assert_eq!(h.world.player(), None);
}
