//! # World
//!
//! The orchestrator. Owns the entity pool, the component factory and the
//! system manager, holds the injected backends, and runs the frame:
//!
//! ```text
//! update()
//!   1. network      receive / dispatch on the active backend
//!   2. systems      in registration order (physics pull happens here)
//!   3. entities     every active entity's per-entity hooks
//!   4. physics      advance the simulation by one step
//!   5. environment
//! ```
//!
//! Because the pull in step 2 runs before the step in 4, a Scene transform
//! always reflects the previous physics step.
//!
//! ## Lifecycle
//!
//! `Uninitialized → Initialized → (Running ⇄ Paused) → Destroyed`

use std::fmt;

use crate::backend::{
    Environment, InputDecoder, InputEvent, NetworkBackend, NetworkParams, NetworkRole,
    NullNetwork, PhysicsBackend, RenderBackend, RenderObjectDesc, RigidActorDesc,
    RigidActorHandle, SceneHandle,
};
use crate::command::Command;
use crate::config::WorldConfig;
use crate::ecs::{
    CameraComponent, Capability, Component, ComponentContext, ComponentFactory, ComponentHandle,
    Entity, EntityId, EntityPool, InitContext, ModelComponent, PhysicsComponent, ReleaseContext,
    SceneComponent, System, SystemContext, SystemManager,
};
use crate::error::{CoreError, CoreResult};

/// Lifecycle state of a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorldState {
    /// Constructed, backends injected, nothing allocated.
    Uninitialized,
    /// Pools allocated, no frame run yet.
    Initialized,
    /// At least one frame has run.
    Running,
    /// Environment paused; the caller stops calling `update`.
    Paused,
    /// Torn down. Terminal.
    Destroyed,
}

impl WorldState {
    /// Lower-case name used in errors and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Destroyed => "destroyed",
        }
    }

    const fn is_live(self) -> bool {
        matches!(self, Self::Initialized | Self::Running | Self::Paused)
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// External collaborators handed to the world at construction.
pub struct Dependencies {
    /// Render backend.
    pub render: Box<dyn RenderBackend>,
    /// Environment driven in lockstep with the world.
    pub environment: Box<dyn Environment>,
    /// Physics backend, required for `init(true)`.
    pub physics: Option<Box<dyn PhysicsBackend>>,
    /// Input decoder for [`World::handle_input`].
    pub input: Option<Box<dyn InputDecoder>>,
    /// Server network backend.
    pub server: Option<Box<dyn NetworkBackend>>,
    /// Client network backend.
    pub client: Option<Box<dyn NetworkBackend>>,
}

impl Dependencies {
    /// The mandatory backends; the rest start empty.
    #[must_use]
    pub fn new(render: Box<dyn RenderBackend>, environment: Box<dyn Environment>) -> Self {
        Self {
            render,
            environment,
            physics: None,
            input: None,
            server: None,
            client: None,
        }
    }

    /// Adds a physics backend.
    #[must_use]
    pub fn with_physics(mut self, physics: Box<dyn PhysicsBackend>) -> Self {
        self.physics = Some(physics);
        self
    }

    /// Adds an input decoder.
    #[must_use]
    pub fn with_input(mut self, input: Box<dyn InputDecoder>) -> Self {
        self.input = Some(input);
        self
    }

    /// Adds a server backend.
    #[must_use]
    pub fn with_server(mut self, server: Box<dyn NetworkBackend>) -> Self {
        self.server = Some(server);
        self
    }

    /// Adds a client backend.
    #[must_use]
    pub fn with_client(mut self, client: Box<dyn NetworkBackend>) -> Self {
        self.client = Some(client);
        self
    }
}

/// State that only exists between `init` and `destroy`.
struct WorldCore {
    scene: SceneHandle,
    entities: EntityPool,
    components: ComponentFactory,
    systems: SystemManager,
}

fn live<'a>(
    core: &'a mut Option<WorldCore>,
    state: WorldState,
    operation: &'static str,
) -> CoreResult<&'a mut WorldCore> {
    core.as_mut().ok_or(CoreError::InvalidState {
        operation,
        state: state.name(),
    })
}

/// The gameplay-object orchestrator.
pub struct World {
    config: WorldConfig,
    state: WorldState,
    render: Box<dyn RenderBackend>,
    environment: Box<dyn Environment>,
    physics: Option<Box<dyn PhysicsBackend>>,
    input: Option<Box<dyn InputDecoder>>,
    server: Option<Box<dyn NetworkBackend>>,
    client: Option<Box<dyn NetworkBackend>>,
    offline: NullNetwork,
    network: NetworkRole,
    use_physics: bool,
    core: Option<WorldCore>,
    player: Option<EntityId>,
    frame: u64,
}

impl World {
    /// Creates an uninitialized world around the injected backends.
    #[must_use]
    pub fn new(config: WorldConfig, deps: Dependencies) -> Self {
        Self {
            config,
            state: WorldState::Uninitialized,
            render: deps.render,
            environment: deps.environment,
            physics: deps.physics,
            input: deps.input,
            server: deps.server,
            client: deps.client,
            offline: NullNetwork,
            network: NetworkRole::Offline,
            use_physics: false,
            core: None,
            player: None,
            frame: 0,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Allocates pools and brings the backends up.
    ///
    /// Order: render scene, environment, entity pool, component factory,
    /// system manager, physics scene (if `use_physics`), network probe
    /// (server, then client, else offline). A failure part-way tears down
    /// what was already brought up.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidState`] unless the world is uninitialized
    /// - [`CoreError::InvalidConfig`] for a bad configuration
    /// - [`CoreError::MissingBackend`] for `use_physics` without a backend
    /// - Backend failures
    pub fn init(&mut self, use_physics: bool) -> CoreResult<()> {
        if self.state != WorldState::Uninitialized {
            return Err(self.invalid("init"));
        }
        self.config.validate()?;
        if use_physics && self.physics.is_none() {
            return Err(CoreError::MissingBackend("physics"));
        }

        let scene = self.render.create_scene()?;
        if let Err(e) = self.environment.init(self.render.as_mut(), scene) {
            self.render.destroy_scene(scene);
            return Err(e.into());
        }

        let entities = EntityPool::new(self.config.entity_capacity);
        let components = ComponentFactory::new(&self.config.pools);
        let systems = SystemManager::new();

        if use_physics {
            if let Some(physics) = self.physics.as_deref_mut() {
                if let Err(e) = physics.create_scene() {
                    self.environment.destroy(self.render.as_mut());
                    self.render.destroy_scene(scene);
                    return Err(e.into());
                }
            }
        }

        self.network = if self.server.as_ref().is_some_and(|s| s.initialized()) {
            NetworkRole::Server
        } else if self.client.as_ref().is_some_and(|c| c.initialized()) {
            NetworkRole::Client
        } else {
            NetworkRole::Offline
        };

        self.core = Some(WorldCore {
            scene,
            entities,
            components,
            systems,
        });
        self.use_physics = use_physics;
        self.state = WorldState::Initialized;

        tracing::info!(
            entity_capacity = self.config.entity_capacity,
            use_physics,
            network = %self.network,
            "World initialized"
        );
        Ok(())
    }

    /// Runs one frame.
    ///
    /// Permitted while paused; stopping the frame loop is the caller's job.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidState`] before `init` or after `destroy`; the
    /// first failure of any step, which ends the frame there.
    pub fn update(&mut self) -> CoreResult<()> {
        if !self.state.is_live() {
            return Err(self.invalid("update"));
        }
        let frame_time = self.config.frame_time;

        // 1. Network.
        self.active_network_mut().update()?;

        let core = live(&mut self.core, self.state, "update")?;

        // 2. Systems.
        let physics = if self.use_physics {
            self.physics.as_deref()
        } else {
            None
        };
        let mut systems = SystemContext {
            entities: &core.entities,
            components: &mut core.components,
            physics,
            frame: self.frame,
            frame_time,
        };
        core.systems.update(&mut systems)?;

        // 3. Per-entity hooks.
        let mut hooks = ComponentContext {
            components: &mut core.components,
            render: self.render.as_mut(),
            frame_time,
        };
        for entity in core.entities.iter_active() {
            entity.update(&mut hooks)?;
        }

        // 4. Physics step.
        if self.use_physics {
            if let Some(physics) = self.physics.as_deref_mut() {
                physics.simulate(frame_time)?;
            }
        }

        // 5. Environment.
        self.environment.update(self.render.as_mut(), frame_time)?;

        tracing::trace!(frame = self.frame, "Frame complete");
        self.frame += 1;
        if self.state == WorldState::Initialized {
            self.state = WorldState::Running;
        }
        Ok(())
    }

    /// Pauses the environment.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidState`] unless initialized or running.
    pub fn pause(&mut self) -> CoreResult<()> {
        if !matches!(self.state, WorldState::Initialized | WorldState::Running) {
            return Err(self.invalid("pause"));
        }
        self.environment.pause();
        self.state = WorldState::Paused;
        tracing::info!(frame = self.frame, "World paused");
        Ok(())
    }

    /// Resumes after a pause.
    ///
    /// Rebinds the viewport to the player's camera, resumes the environment,
    /// and falls back to the offline network if the active backend has
    /// stopped reporting itself initialized.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidState`] unless paused; render failure binding
    /// the camera.
    pub fn resume(&mut self) -> CoreResult<()> {
        if self.state != WorldState::Paused {
            return Err(self.invalid("resume"));
        }

        match self.player_camera() {
            Some(camera) => self.render.bind_viewport_camera(camera)?,
            None => tracing::warn!("Resuming without a player camera; viewport left as is"),
        }
        self.environment.resume();

        if self.network != NetworkRole::Offline && !self.active_network().initialized() {
            tracing::info!(lost = %self.network, "Network backend went down, switching to offline");
            self.network = NetworkRole::Offline;
        }

        self.state = WorldState::Running;
        tracing::info!(frame = self.frame, "World resumed");
        Ok(())
    }

    /// Tears everything down in reverse order of acquisition: environment,
    /// every entity slot and its components, physics scene, render scene.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidState`] unless the world is live.
    pub fn destroy(&mut self) -> CoreResult<()> {
        if !self.state.is_live() {
            return Err(self.invalid("destroy"));
        }
        let Some(mut core) = self.core.take() else {
            return Err(self.invalid("destroy"));
        };

        self.environment.destroy(self.render.as_mut());

        let mut release = ReleaseContext {
            render: self.render.as_mut(),
            physics: self.physics.as_deref_mut(),
        };
        let components = &mut core.components;
        let remaining = core.entities.finalize_all(|handle| {
            components.release(handle, &mut release);
        });
        core.systems.clear_members();
        self.player = None;

        if self.use_physics {
            if let Some(physics) = self.physics.as_deref_mut() {
                physics.destroy_scene();
            }
        }

        self.render.destroy_all_cameras(core.scene);
        self.render.clear_scene(core.scene);
        self.render.destroy_scene(core.scene);

        self.state = WorldState::Destroyed;
        tracing::info!(remaining, frames = self.frame, "World destroyed");
        Ok(())
    }

    // =========================================================================
    // Entities and components
    // =========================================================================

    /// Activates a new entity.
    ///
    /// # Errors
    ///
    /// [`CoreError::EntityPoolExhausted`] when every slot is in use.
    pub fn create_entity(&mut self) -> CoreResult<EntityId> {
        let core = live(&mut self.core, self.state, "create an entity")?;
        let handle = core.entities.create()?;
        tracing::debug!(entity = %handle.id(), slot = handle.slot(), "Entity created");
        Ok(handle.id())
    }

    /// Destroys an entity, releasing every component it owns and dropping
    /// it from system membership.
    ///
    /// # Errors
    ///
    /// [`CoreError::EntityNotFound`] if `id` is not active.
    pub fn destroy_entity(&mut self, id: EntityId) -> CoreResult<()> {
        let core = live(&mut self.core, self.state, "destroy an entity")?;

        let mut release = ReleaseContext {
            render: self.render.as_mut(),
            physics: self.physics.as_deref_mut(),
        };
        let components = &mut core.components;
        core.entities.destroy(id, |handle| {
            components.release(handle, &mut release);
        })?;
        core.systems.remove_entity(id);

        if self.player == Some(id) {
            self.player = None;
        }
        tracing::debug!(entity = %id, "Entity destroyed");
        Ok(())
    }

    /// Active entity by ID.
    #[must_use]
    pub fn get_entity_by_id(&self, id: EntityId) -> Option<&Entity> {
        self.core.as_ref()?.entities.get(id)
    }

    /// Number of active entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.core.as_ref().map_or(0, |c| c.entities.active_count())
    }

    /// Attaches a fresh component of `capability` to an entity.
    ///
    /// The duplicate check happens before the pool is touched; a failed
    /// component init returns the slot.
    ///
    /// # Errors
    ///
    /// - [`CoreError::EntityNotFound`]
    /// - [`CoreError::CapabilityAlreadyAttached`]
    /// - [`CoreError::ComponentPoolExhausted`]
    /// - Backend failure during init
    pub fn attach_component(
        &mut self,
        id: EntityId,
        capability: Capability,
    ) -> CoreResult<ComponentHandle> {
        let core = live(&mut self.core, self.state, "attach a component")?;

        let entity = core.entities.get(id).ok_or(CoreError::EntityNotFound(id))?;
        if entity.has(capability) {
            return Err(CoreError::CapabilityAlreadyAttached {
                entity: id,
                capability,
            });
        }

        let handle = core.components.create(capability)?;
        let mut init = InitContext {
            render: self.render.as_mut(),
            scene: core.scene,
        };
        let attached = core.components.init(handle, id, &mut init).and_then(|()| {
            core.entities
                .get_mut(id)
                .ok_or(CoreError::EntityNotFound(id))?
                .attach(handle)
        });

        if let Err(e) = attached {
            let mut release = ReleaseContext {
                render: self.render.as_mut(),
                physics: self.physics.as_deref_mut(),
            };
            core.components.release(handle, &mut release);
            return Err(e);
        }

        tracing::debug!(entity = %id, %capability, "Component attached");
        Ok(handle)
    }

    /// Releases the entity's component of `capability` back to its pool and
    /// drops the entity from systems that needed it. The capability can be
    /// attached again afterwards.
    ///
    /// A Scene stays while a Camera, Light or Model hangs off its node.
    ///
    /// # Errors
    ///
    /// - [`CoreError::EntityNotFound`]
    /// - [`CoreError::CapabilityNotAttached`] if nothing is attached
    /// - [`CoreError::MissingCapability`] naming a component still mounted
    ///   on the Scene
    pub fn detach_component(&mut self, id: EntityId, capability: Capability) -> CoreResult<()> {
        let core = live(&mut self.core, self.state, "detach a component")?;

        let entity = core.entities.get_mut(id).ok_or(CoreError::EntityNotFound(id))?;
        if capability == Capability::Scene {
            let mounted = [Capability::Camera, Capability::Light, Capability::Model];
            if let Some(&dependent) = mounted.iter().find(|&&c| entity.has(c)) {
                return Err(CoreError::MissingCapability {
                    entity: id,
                    capability: dependent,
                    requires: Capability::Scene,
                });
            }
        }
        let handle = entity
            .detach(capability)
            .ok_or(CoreError::CapabilityNotAttached {
                entity: id,
                capability,
            })?;

        let mut release = ReleaseContext {
            render: self.render.as_mut(),
            physics: self.physics.as_deref_mut(),
        };
        core.components.release(handle, &mut release);

        let dropped = core
            .entities
            .get(id)
            .map_or(0, |entity| core.systems.revalidate(entity));
        tracing::debug!(entity = %id, %capability, systems_left = dropped, "Component detached");
        Ok(())
    }

    /// Typed form of [`World::attach_component`].
    ///
    /// # Errors
    ///
    /// Same as [`World::attach_component`].
    pub fn attach<T: Component>(&mut self, id: EntityId) -> CoreResult<ComponentHandle> {
        self.attach_component(id, T::CAPABILITY)
    }

    /// The entity's component of type `T`.
    #[must_use]
    pub fn component<T: Component>(&self, id: EntityId) -> Option<&T> {
        let core = self.core.as_ref()?;
        let handle = core.entities.get(id)?.component(T::CAPABILITY)?;
        core.components.get::<T>(handle.slot())
    }

    /// Mutable access to the entity's component of type `T`.
    pub fn component_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        let core = self.core.as_mut()?;
        let handle = core.entities.get(id)?.component(T::CAPABILITY)?;
        core.components.get_mut::<T>(handle.slot())
    }

    /// Registers a system after every existing one.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidState`] unless the world is live.
    pub fn add_system(&mut self, system: Box<dyn System>) -> CoreResult<()> {
        let core = live(&mut self.core, self.state, "add a system")?;
        core.systems.add_system(system);
        Ok(())
    }

    /// Offers one entity to every system; returns how many claimed it.
    ///
    /// # Errors
    ///
    /// [`CoreError::EntityNotFound`] if `id` is not active.
    pub fn add_entity_to_systems(&mut self, id: EntityId) -> CoreResult<usize> {
        let core = live(&mut self.core, self.state, "register an entity")?;
        let entity = core.entities.get(id).ok_or(CoreError::EntityNotFound(id))?;
        Ok(core.systems.add_entity(entity))
    }

    /// Hooks an entity's components to each other, then offers it to every
    /// system. Safe to call again after attaching more components.
    ///
    /// # Errors
    ///
    /// [`CoreError::EntityNotFound`], [`CoreError::MissingCapability`] or a
    /// render failure.
    pub fn setup_entity(&mut self, id: EntityId) -> CoreResult<()> {
        let core = live(&mut self.core, self.state, "set up an entity")?;
        let entity = core.entities.get(id).ok_or(CoreError::EntityNotFound(id))?;

        let mut ctx = ComponentContext {
            components: &mut core.components,
            render: self.render.as_mut(),
            frame_time: self.config.frame_time,
        };
        entity.setup(&mut ctx)?;
        core.systems.add_entity(entity);
        Ok(())
    }

    /// [`World::setup_entity`] for every active entity. Stops at the first
    /// failure.
    ///
    /// # Errors
    ///
    /// Same as [`World::setup_entity`].
    pub fn setup_entities(&mut self) -> CoreResult<usize> {
        let core = live(&mut self.core, self.state, "set up entities")?;

        let mut ctx = ComponentContext {
            components: &mut core.components,
            render: self.render.as_mut(),
            frame_time: self.config.frame_time,
        };
        let mut count = 0;
        for entity in core.entities.iter_active() {
            entity.setup(&mut ctx)?;
            core.systems.add_entity(entity);
            count += 1;
        }
        tracing::debug!(count, "Entities set up");
        Ok(count)
    }

    /// Creates a rigid actor for the entity's Physics component. The entity's
    /// Scene, if any, starts at the actor's transform.
    ///
    /// # Errors
    ///
    /// - [`CoreError::MissingBackend`] when the world runs without physics
    /// - [`CoreError::EntityNotFound`], [`CoreError::CapabilityNotAttached`]
    /// - Physics failure
    pub fn bind_rigid_actor(
        &mut self,
        id: EntityId,
        desc: &RigidActorDesc,
    ) -> CoreResult<RigidActorHandle> {
        let core = live(&mut self.core, self.state, "bind a rigid actor")?;
        let physics = match self.physics.as_deref_mut() {
            Some(physics) if self.use_physics => physics,
            _ => return Err(CoreError::MissingBackend("physics")),
        };

        let entity = core.entities.get(id).ok_or(CoreError::EntityNotFound(id))?;
        let body = entity
            .component(Capability::Physics)
            .ok_or(CoreError::CapabilityNotAttached {
                entity: id,
                capability: Capability::Physics,
            })?;
        let scene = entity.component(Capability::Scene);

        let actor = physics.create_rigid_actor(desc)?;
        let previous = core
            .components
            .get_mut::<PhysicsComponent>(body.slot())
            .ok_or(CoreError::StaleComponent(Capability::Physics))?
            .bind_actor(actor);
        if let Some(previous) = previous {
            physics.release_rigid_actor(previous);
        }

        let scene = scene.and_then(|h| core.components.get_mut::<SceneComponent>(h.slot()));
        if let Some(scene) = scene {
            scene.set_transform(desc.transform);
        }

        tracing::debug!(entity = %id, actor = actor.0, "Rigid actor bound");
        Ok(actor)
    }

    /// Loads a mesh into the entity's Model component and hangs it off the
    /// Scene node when there is one.
    ///
    /// # Errors
    ///
    /// [`CoreError::EntityNotFound`], [`CoreError::CapabilityNotAttached`]
    /// or a render failure.
    pub fn set_model_mesh(&mut self, id: EntityId, resource: &str) -> CoreResult<()> {
        let core = live(&mut self.core, self.state, "set a model mesh")?;

        let entity = core.entities.get(id).ok_or(CoreError::EntityNotFound(id))?;
        let model = entity
            .component(Capability::Model)
            .ok_or(CoreError::CapabilityNotAttached {
                entity: id,
                capability: Capability::Model,
            })?;
        let node = entity
            .component(Capability::Scene)
            .and_then(|h| core.components.get::<SceneComponent>(h.slot()))
            .and_then(SceneComponent::node);

        let desc = RenderObjectDesc::Mesh {
            resource: resource.to_owned(),
        };
        let mesh = self.render.create_object(core.scene, &desc)?;

        let model = core
            .components
            .get_mut::<ModelComponent>(model.slot())
            .ok_or(CoreError::StaleComponent(Capability::Model))?;
        if let Some(old) = model.replace_mesh(mesh, resource.to_owned()) {
            self.render.destroy_object(old);
        }
        if let Some(node) = node {
            self.render.attach_object(mesh, node)?;
            model.mark_mounted();
        }
        Ok(())
    }

    /// Designates the player; its camera drives the viewport on resume.
    ///
    /// # Errors
    ///
    /// [`CoreError::EntityNotFound`] or [`CoreError::CapabilityNotAttached`]
    /// for an entity without a camera.
    pub fn set_player(&mut self, id: EntityId) -> CoreResult<()> {
        let entity = self
            .get_entity_by_id(id)
            .ok_or(CoreError::EntityNotFound(id))?;
        if !entity.has(Capability::Camera) {
            return Err(CoreError::CapabilityNotAttached {
                entity: id,
                capability: Capability::Camera,
            });
        }
        self.player = Some(id);
        tracing::debug!(entity = %id, "Player set");
        Ok(())
    }

    /// The player entity, if one is set and still alive.
    #[must_use]
    pub const fn player(&self) -> Option<EntityId> {
        self.player
    }

    fn player_camera(&self) -> Option<crate::backend::RenderObjectId> {
        self.component::<CameraComponent>(self.player?)?.camera()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Decodes a raw input event into a command, if it maps to one.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<Box<dyn Command>> {
        self.input.as_deref_mut()?.decode(event)
    }

    /// Decodes `event` and applies it to `entity`: execute on press,
    /// unexecute on release. Returns whether the event mapped to a command.
    ///
    /// # Errors
    ///
    /// Whatever the command reports.
    pub fn apply_input(&mut self, entity: EntityId, event: &InputEvent) -> CoreResult<bool> {
        let Some(command) = self.handle_input(event) else {
            return Ok(false);
        };
        if event.pressed {
            command.execute(self, entity)?;
        } else {
            command.unexecute(self, entity)?;
        }
        tracing::trace!(command = command.name(), pressed = event.pressed, "Input applied");
        Ok(true)
    }

    // =========================================================================
    // Network
    // =========================================================================

    /// Starts the server backend and makes it the active one.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NetworkAlreadyActive`] if any backend is initialized;
    ///   nothing is changed
    /// - [`CoreError::MissingBackend`] without a server backend
    /// - Backend failure, leaving the world offline
    pub fn init_server(&mut self, port: u16, username: &str) -> CoreResult<()> {
        let params = NetworkParams::Server {
            port,
            username: username.to_owned(),
        };
        self.init_network(NetworkRole::Server, &params)
    }

    /// Stops the server backend and goes offline.
    ///
    /// # Errors
    ///
    /// [`CoreError::NetworkNotActive`] if the server is not the active
    /// backend.
    pub fn destroy_server(&mut self) -> CoreResult<()> {
        self.destroy_network(NetworkRole::Server)
    }

    /// Starts the client backend and makes it the active one.
    ///
    /// # Errors
    ///
    /// Same as [`World::init_server`].
    pub fn init_client(&mut self, address: &str, username: &str) -> CoreResult<()> {
        let params = NetworkParams::Client {
            address: address.to_owned(),
            username: username.to_owned(),
        };
        self.init_network(NetworkRole::Client, &params)
    }

    /// Stops the client backend and goes offline.
    ///
    /// # Errors
    ///
    /// [`CoreError::NetworkNotActive`] if the client is not the active
    /// backend.
    pub fn destroy_client(&mut self) -> CoreResult<()> {
        self.destroy_network(NetworkRole::Client)
    }

    /// Role of the active network backend.
    #[must_use]
    pub const fn network_role(&self) -> NetworkRole {
        self.network
    }

    /// Whether the active network backend reports itself initialized.
    #[must_use]
    pub fn is_network_initialized(&self) -> bool {
        self.active_network().initialized()
    }

    fn init_network(&mut self, role: NetworkRole, params: &NetworkParams) -> CoreResult<()> {
        if self.state == WorldState::Destroyed {
            return Err(self.invalid("start networking"));
        }
        if self.active_network().initialized() {
            return Err(CoreError::NetworkAlreadyActive {
                active: self.network,
            });
        }

        let backend = match role {
            NetworkRole::Server => self.server.as_deref_mut(),
            NetworkRole::Client => self.client.as_deref_mut(),
            NetworkRole::Offline => None,
        }
        .ok_or(CoreError::MissingBackend(role.name()))?;

        backend.init(params)?;
        self.network = role;
        tracing::info!(network = %role, "Network backend started");
        Ok(())
    }

    fn destroy_network(&mut self, role: NetworkRole) -> CoreResult<()> {
        if self.network != role {
            return Err(CoreError::NetworkNotActive {
                requested: role,
                active: self.network,
            });
        }
        self.active_network_mut().destroy();
        self.network = NetworkRole::Offline;
        tracing::info!(network = %role, "Network backend stopped");
        Ok(())
    }

    fn active_network(&self) -> &dyn NetworkBackend {
        let backend = match self.network {
            NetworkRole::Server => self.server.as_deref(),
            NetworkRole::Client => self.client.as_deref(),
            NetworkRole::Offline => None,
        };
        backend.unwrap_or(&self.offline)
    }

    fn active_network_mut(&mut self) -> &mut dyn NetworkBackend {
        let backend = match self.network {
            NetworkRole::Server => self.server.as_deref_mut(),
            NetworkRole::Client => self.client.as_deref_mut(),
            NetworkRole::Offline => None,
        };
        backend.unwrap_or(&mut self.offline)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> WorldState {
        self.state
    }

    /// Configuration the world was built with.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Frames run so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Whether `init` enabled physics.
    #[must_use]
    pub const fn uses_physics(&self) -> bool {
        self.use_physics
    }

    /// The render scene, while live.
    #[must_use]
    pub fn scene(&self) -> Option<SceneHandle> {
        self.core.as_ref().map(|c| c.scene)
    }

    /// Component storage, while live.
    #[must_use]
    pub fn components(&self) -> Option<&ComponentFactory> {
        self.core.as_ref().map(|c| &c.components)
    }

    /// Entity storage, while live.
    #[must_use]
    pub fn entities(&self) -> Option<&EntityPool> {
        self.core.as_ref().map(|c| &c.entities)
    }

    /// Number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.core.as_ref().map_or(0, |c| c.systems.len())
    }

    /// Number of systems that claimed `id`.
    #[must_use]
    pub fn system_membership(&self, id: EntityId) -> usize {
        self.core
            .as_ref()
            .map_or(0, |c| c.systems.membership_count(id))
    }

    /// Render backend.
    #[must_use]
    pub fn render(&self) -> &dyn RenderBackend {
        self.render.as_ref()
    }

    /// Physics backend, if one was injected.
    #[must_use]
    pub fn physics(&self) -> Option<&dyn PhysicsBackend> {
        self.physics.as_deref()
    }

    /// Mutable physics backend, if one was injected.
    pub fn physics_mut(&mut self) -> Option<&mut (dyn PhysicsBackend + 'static)> {
        self.physics.as_deref_mut()
    }

    fn invalid(&self, operation: &'static str) -> CoreError {
        CoreError::InvalidState {
            operation,
            state: self.state.name(),
        }
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("state", &self.state)
            .field("frame", &self.frame)
            .field("entities", &self.entity_count())
            .field("network", &self.network)
            .field("use_physics", &self.use_physics)
            .finish_non_exhaustive()
    }
}
