//! # Headless Renderer
//!
//! A scene graph with nothing behind it: objects, parents, transforms and
//! the viewport camera are tracked in memory and never drawn. Used by the
//! dedicated server, the sandbox and tests.
//!
//! The graph sits behind `Arc<Mutex<_>>` so a [`RenderProbe`] can inspect it
//! after the world has taken ownership of the renderer.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use keel_core::{
    BackendError, RenderBackend, RenderObjectDesc, RenderObjectId, SceneHandle, Transform,
};
use parking_lot::Mutex;

const BACKEND: &str = "render";

/// One object in the headless graph.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessObject {
    /// Scene the object lives in.
    pub scene: SceneHandle,
    /// What was created.
    pub desc: RenderObjectDesc,
    /// Node this object hangs off.
    pub parent: Option<RenderObjectId>,
    /// Last transform pushed to the object.
    pub transform: Transform,
}

#[derive(Debug, Default)]
struct SceneGraph {
    next_scene: u32,
    next_object: u32,
    scenes: BTreeSet<u32>,
    objects: BTreeMap<RenderObjectId, HeadlessObject>,
    viewport: Option<RenderObjectId>,
    transform_updates: u64,
}

impl SceneGraph {
    fn remove_where(&mut self, pred: impl Fn(&HeadlessObject) -> bool) {
        self.objects.retain(|_, object| !pred(object));
        if self.viewport.is_some_and(|v| !self.objects.contains_key(&v)) {
            self.viewport = None;
        }
    }
}

/// Render backend that keeps its scene graph in memory.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    graph: Arc<Mutex<SceneGraph>>,
}

impl HeadlessRenderer {
    /// Creates an empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read handle on the graph that stays valid after the renderer is
    /// boxed into a world.
    #[must_use]
    pub fn probe(&self) -> RenderProbe {
        RenderProbe {
            graph: Arc::clone(&self.graph),
        }
    }
}

impl RenderBackend for HeadlessRenderer {
    fn create_scene(&mut self) -> Result<SceneHandle, BackendError> {
        let mut graph = self.graph.lock();
        graph.next_scene += 1;
        let id = graph.next_scene;
        graph.scenes.insert(id);
        tracing::debug!(scene = id, "Headless scene created");
        Ok(SceneHandle(id))
    }

    fn destroy_all_cameras(&mut self, scene: SceneHandle) {
        self.graph.lock().remove_where(|o| {
            o.scene == scene && matches!(o.desc, RenderObjectDesc::Camera { .. })
        });
    }

    fn clear_scene(&mut self, scene: SceneHandle) {
        self.graph.lock().remove_where(|o| o.scene == scene);
    }

    fn destroy_scene(&mut self, scene: SceneHandle) {
        let mut graph = self.graph.lock();
        graph.remove_where(|o| o.scene == scene);
        graph.scenes.remove(&scene.0);
        tracing::debug!(scene = scene.0, "Headless scene destroyed");
    }

    fn create_object(
        &mut self,
        scene: SceneHandle,
        desc: &RenderObjectDesc,
    ) -> Result<RenderObjectId, BackendError> {
        let mut graph = self.graph.lock();
        if !graph.scenes.contains(&scene.0) {
            return Err(BackendError::new(BACKEND, format!("no scene {}", scene.0)));
        }
        if let RenderObjectDesc::Mesh { resource } = desc {
            if resource.trim().is_empty() {
                return Err(BackendError::new(BACKEND, "empty mesh resource name"));
            }
        }

        graph.next_object += 1;
        let id = RenderObjectId(graph.next_object);
        graph.objects.insert(
            id,
            HeadlessObject {
                scene,
                desc: desc.clone(),
                parent: None,
                transform: Transform::default(),
            },
        );
        Ok(id)
    }

    fn destroy_object(&mut self, object: RenderObjectId) {
        let mut graph = self.graph.lock();
        graph.remove_where(|o| o.parent == Some(object));
        graph.objects.remove(&object);
        if graph.viewport == Some(object) {
            graph.viewport = None;
        }
    }

    fn attach_object(
        &mut self,
        child: RenderObjectId,
        parent: RenderObjectId,
    ) -> Result<(), BackendError> {
        let mut graph = self.graph.lock();
        match graph.objects.get(&parent) {
            Some(HeadlessObject {
                desc: RenderObjectDesc::Node,
                ..
            }) => {}
            Some(_) => {
                return Err(BackendError::new(
                    BACKEND,
                    format!("object {} is not a node", parent.0),
                ))
            }
            None => return Err(BackendError::new(BACKEND, format!("no object {}", parent.0))),
        }
        let object = graph
            .objects
            .get_mut(&child)
            .ok_or_else(|| BackendError::new(BACKEND, format!("no object {}", child.0)))?;
        object.parent = Some(parent);
        Ok(())
    }

    fn set_transform(&mut self, node: RenderObjectId, transform: &Transform) {
        let mut graph = self.graph.lock();
        if let Some(object) = graph.objects.get_mut(&node) {
            object.transform = *transform;
            graph.transform_updates += 1;
        }
    }

    fn bind_viewport_camera(&mut self, camera: RenderObjectId) -> Result<(), BackendError> {
        let mut graph = self.graph.lock();
        let is_camera = graph
            .objects
            .get(&camera)
            .map(|o| matches!(o.desc, RenderObjectDesc::Camera { .. }));
        match is_camera {
            Some(true) => {
                graph.viewport = Some(camera);
                Ok(())
            }
            Some(false) => Err(BackendError::new(
                BACKEND,
                format!("object {} is not a camera", camera.0),
            )),
            None => Err(BackendError::new(BACKEND, format!("no object {}", camera.0))),
        }
    }
}

/// Shared read access to a [`HeadlessRenderer`]'s graph.
#[derive(Clone, Debug)]
pub struct RenderProbe {
    graph: Arc<Mutex<SceneGraph>>,
}

impl RenderProbe {
    /// Number of live scenes.
    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.graph.lock().scenes.len()
    }

    /// Number of live objects across all scenes.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.graph.lock().objects.len()
    }

    /// Snapshot of one object.
    #[must_use]
    pub fn object(&self, id: RenderObjectId) -> Option<HeadlessObject> {
        self.graph.lock().objects.get(&id).cloned()
    }

    /// Camera currently bound to the viewport.
    #[must_use]
    pub fn viewport_camera(&self) -> Option<RenderObjectId> {
        self.graph.lock().viewport
    }

    /// Total `set_transform` calls that hit a live object.
    #[must_use]
    pub fn transform_updates(&self) -> u64 {
        self.graph.lock().transform_updates
    }
}
