//! Recording mock backends shared by the integration tests.
//!
//! Every mock writes to a shared journal so tests can check call order
//! after the world has taken ownership of the boxes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use keel_core::{
    BackendError, Command, Dependencies, Environment, InputDecoder, InputEvent, Key, MoveBackward,
    MoveForward, MoveLeft, MoveRight, NetworkBackend, NetworkParams, PhysicsBackend,
    RenderBackend, RenderObjectDesc, RenderObjectId, RigidActorDesc, RigidActorHandle,
    SceneHandle, Transform, Vec3, World, WorldConfig,
};
use parking_lot::Mutex;

/// Ordered log of backend calls.
pub type Journal = Arc<Mutex<Vec<String>>>;

fn note(journal: &Journal, entry: impl Into<String>) {
    journal.lock().push(entry.into());
}

/// Index of the first journal entry equal to `entry`.
pub fn position(journal: &Journal, entry: &str) -> Option<usize> {
    journal.lock().iter().position(|e| e == entry)
}

/// Number of journal entries equal to `entry`.
pub fn count(journal: &Journal, entry: &str) -> usize {
    journal.lock().iter().filter(|e| *e == entry).count()
}

// ============================================================================
// Render
// ============================================================================

/// Observable render state.
#[derive(Debug, Default)]
pub struct RenderState {
    pub next_id: u32,
    pub live: HashMap<RenderObjectId, RenderObjectDesc>,
    pub destroyed: Vec<RenderObjectId>,
    pub parents: HashMap<RenderObjectId, RenderObjectId>,
    pub transforms: HashMap<RenderObjectId, Transform>,
    pub viewport: Option<RenderObjectId>,
    pub fail_meshes: bool,
}

impl RenderState {
    pub fn live_count(&self, pred: impl Fn(&RenderObjectDesc) -> bool) -> usize {
        self.live.values().filter(|d| pred(d)).count()
    }
}

pub struct MockRender {
    pub state: Arc<Mutex<RenderState>>,
    pub journal: Journal,
}

impl RenderBackend for MockRender {
    fn create_scene(&mut self) -> Result<SceneHandle, BackendError> {
        note(&self.journal, "render.create_scene");
        Ok(SceneHandle(1))
    }

    fn destroy_all_cameras(&mut self, _scene: SceneHandle) {
        note(&self.journal, "render.destroy_all_cameras");
        let mut state = self.state.lock();
        state
            .live
            .retain(|_, d| !matches!(d, RenderObjectDesc::Camera { .. }));
    }

    fn clear_scene(&mut self, _scene: SceneHandle) {
        note(&self.journal, "render.clear_scene");
        let mut state = self.state.lock();
        state.live.clear();
        state.parents.clear();
    }

    fn destroy_scene(&mut self, _scene: SceneHandle) {
        note(&self.journal, "render.destroy_scene");
    }

    fn create_object(
        &mut self,
        _scene: SceneHandle,
        desc: &RenderObjectDesc,
    ) -> Result<RenderObjectId, BackendError> {
        let mut state = self.state.lock();
        if state.fail_meshes && matches!(desc, RenderObjectDesc::Mesh { .. }) {
            return Err(BackendError::new("render", "mesh not found"));
        }
        state.next_id += 1;
        let id = RenderObjectId(state.next_id);
        state.live.insert(id, desc.clone());
        Ok(id)
    }

    fn destroy_object(&mut self, object: RenderObjectId) {
        let mut state = self.state.lock();
        state.live.remove(&object);
        state.parents.remove(&object);
        state.destroyed.push(object);
    }

    fn attach_object(
        &mut self,
        child: RenderObjectId,
        parent: RenderObjectId,
    ) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        if !state.live.contains_key(&parent) {
            return Err(BackendError::new("render", "unknown parent"));
        }
        state.parents.insert(child, parent);
        Ok(())
    }

    fn set_transform(&mut self, node: RenderObjectId, transform: &Transform) {
        self.state.lock().transforms.insert(node, *transform);
    }

    fn bind_viewport_camera(&mut self, camera: RenderObjectId) -> Result<(), BackendError> {
        note(&self.journal, "render.bind_viewport_camera");
        self.state.lock().viewport = Some(camera);
        Ok(())
    }
}

// ============================================================================
// Physics
// ============================================================================

/// Observable physics state. Actors integrate their velocity each step.
#[derive(Debug, Default)]
pub struct PhysicsState {
    pub next_id: u32,
    pub actors: HashMap<RigidActorHandle, (Transform, Vec3)>,
    pub released: Vec<RigidActorHandle>,
    pub steps: u32,
    pub scene_live: bool,
}

pub struct MockPhysics {
    pub state: Arc<Mutex<PhysicsState>>,
    pub journal: Journal,
}

impl PhysicsBackend for MockPhysics {
    fn create_scene(&mut self) -> Result<(), BackendError> {
        note(&self.journal, "physics.create_scene");
        self.state.lock().scene_live = true;
        Ok(())
    }

    fn destroy_scene(&mut self) {
        note(&self.journal, "physics.destroy_scene");
        self.state.lock().scene_live = false;
    }

    fn simulate(&mut self, step: f32) -> Result<(), BackendError> {
        note(&self.journal, "physics.simulate");
        let mut state = self.state.lock();
        state.steps += 1;
        for (pose, velocity) in state.actors.values_mut() {
            pose.position = pose.position.add(velocity.scale(step));
        }
        Ok(())
    }

    fn create_rigid_actor(
        &mut self,
        desc: &RigidActorDesc,
    ) -> Result<RigidActorHandle, BackendError> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let handle = RigidActorHandle(state.next_id);
        state.actors.insert(handle, (desc.transform, desc.velocity));
        Ok(handle)
    }

    fn release_rigid_actor(&mut self, actor: RigidActorHandle) {
        let mut state = self.state.lock();
        state.actors.remove(&actor);
        state.released.push(actor);
    }

    fn global_pose(&self, actor: RigidActorHandle) -> Result<Transform, BackendError> {
        self.state
            .lock()
            .actors
            .get(&actor)
            .map(|(pose, _)| *pose)
            .ok_or_else(|| BackendError::new("physics", "unknown actor"))
    }
}

// ============================================================================
// Network
// ============================================================================

#[derive(Debug, Default)]
pub struct NetworkState {
    pub initialized: bool,
    pub inits: u32,
    pub updates: u32,
    pub destroys: u32,
    pub last_params: Option<NetworkParams>,
}

pub struct MockNetwork {
    pub name: &'static str,
    pub state: Arc<Mutex<NetworkState>>,
    pub journal: Journal,
}

impl NetworkBackend for MockNetwork {
    fn init(&mut self, params: &NetworkParams) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        state.initialized = true;
        state.inits += 1;
        state.last_params = Some(params.clone());
        Ok(())
    }

    fn destroy(&mut self) {
        let mut state = self.state.lock();
        state.initialized = false;
        state.destroys += 1;
    }

    fn update(&mut self) -> Result<(), BackendError> {
        note(&self.journal, format!("{}.update", self.name));
        self.state.lock().updates += 1;
        Ok(())
    }

    fn initialized(&self) -> bool {
        self.state.lock().initialized
    }
}

// ============================================================================
// Environment and input
// ============================================================================

pub struct MockEnvironment {
    pub journal: Journal,
}

impl Environment for MockEnvironment {
    fn init(
        &mut self,
        _render: &mut dyn RenderBackend,
        _scene: SceneHandle,
    ) -> Result<(), BackendError> {
        note(&self.journal, "env.init");
        Ok(())
    }

    fn destroy(&mut self, _render: &mut dyn RenderBackend) {
        note(&self.journal, "env.destroy");
    }

    fn pause(&mut self) {
        note(&self.journal, "env.pause");
    }

    fn resume(&mut self) {
        note(&self.journal, "env.resume");
    }

    fn update(
        &mut self,
        _render: &mut dyn RenderBackend,
        _frame_time: f32,
    ) -> Result<(), BackendError> {
        note(&self.journal, "env.update");
        Ok(())
    }
}

/// WASD decoder.
pub struct WasdDecoder;

impl InputDecoder for WasdDecoder {
    fn decode(&mut self, event: &InputEvent) -> Option<Box<dyn Command>> {
        match event.key {
            Key::W => Some(Box::new(MoveForward)),
            Key::S => Some(Box::new(MoveBackward)),
            Key::A => Some(Box::new(MoveLeft)),
            Key::D => Some(Box::new(MoveRight)),
            _ => None,
        }
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A world wired to mocks, plus handles on the mocks' state.
pub struct Harness {
    pub world: World,
    pub journal: Journal,
    pub render: Arc<Mutex<RenderState>>,
    pub physics: Arc<Mutex<PhysicsState>>,
    pub server: Arc<Mutex<NetworkState>>,
    pub client: Arc<Mutex<NetworkState>>,
}

impl Harness {
    pub fn new(config: WorldConfig) -> Self {
        let journal = Journal::default();
        let render = Arc::new(Mutex::new(RenderState::default()));
        let physics = Arc::new(Mutex::new(PhysicsState::default()));
        let server = Arc::new(Mutex::new(NetworkState::default()));
        let client = Arc::new(Mutex::new(NetworkState::default()));

        let deps = Dependencies::new(
            Box::new(MockRender {
                state: render.clone(),
                journal: journal.clone(),
            }),
            Box::new(MockEnvironment {
                journal: journal.clone(),
            }),
        )
        .with_physics(Box::new(MockPhysics {
            state: physics.clone(),
            journal: journal.clone(),
        }))
        .with_input(Box::new(WasdDecoder))
        .with_server(Box::new(MockNetwork {
            name: "server",
            state: server.clone(),
            journal: journal.clone(),
        }))
        .with_client(Box::new(MockNetwork {
            name: "client",
            state: client.clone(),
            journal: journal.clone(),
        }));

        Self {
            world: World::new(config, deps),
            journal,
            render,
            physics,
            server,
            client,
        }
    }

    /// Harness with a small world already initialized.
    pub fn initialized(use_physics: bool) -> Self {
        let mut harness = Self::new(WorldConfig::with_capacity(8, 8));
        harness.world.init(use_physics).unwrap();
        harness
    }
}
