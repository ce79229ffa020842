//! Rendering backend interface.

use serde::{Deserialize, Serialize};

use super::BackendError;
use crate::math::{Transform, Vec3};

/// Handle to a scene context created by the render backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u32);

/// Handle to any object living in a render scene (node, camera, light, mesh).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderObjectId(pub u32);

/// Shape of a light source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    /// Omnidirectional light.
    #[default]
    Point,
    /// Sun-like parallel light.
    Directional,
    /// Cone light.
    Spot,
}

/// What to create in a render scene.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderObjectDesc {
    /// Transform node other objects hang off.
    Node,
    /// Camera.
    Camera {
        /// Vertical field of view in degrees.
        fov_y_degrees: f32,
        /// Near clip distance.
        near: f32,
        /// Far clip distance.
        far: f32,
    },
    /// Light source.
    Light {
        /// Shape of the light.
        kind: LightKind,
        /// Linear RGB colour.
        colour: Vec3,
    },
    /// Mesh instance loaded from a named resource.
    Mesh {
        /// Resource name, e.g. `"crate.mesh"`.
        resource: String,
    },
}

/// Rendering backend.
///
/// Scene graph, cameras, viewports and draw submission all live behind this
/// trait. The core only creates and binds objects; drawing is the backend's
/// business.
pub trait RenderBackend {
    /// Creates a scene context.
    ///
    /// # Errors
    ///
    /// Backend-specific failure to create the context.
    fn create_scene(&mut self) -> Result<SceneHandle, BackendError>;

    /// Destroys every camera in the scene.
    fn destroy_all_cameras(&mut self, scene: SceneHandle);

    /// Removes every object from the scene.
    fn clear_scene(&mut self, scene: SceneHandle);

    /// Releases the scene context itself.
    fn destroy_scene(&mut self, scene: SceneHandle);

    /// Creates an object in `scene`.
    ///
    /// # Errors
    ///
    /// Backend-specific failure, e.g. an unknown mesh resource.
    fn create_object(
        &mut self,
        scene: SceneHandle,
        desc: &RenderObjectDesc,
    ) -> Result<RenderObjectId, BackendError>;

    /// Destroys one object.
    fn destroy_object(&mut self, object: RenderObjectId);

    /// Hangs `child` off the node `parent`.
    ///
    /// # Errors
    ///
    /// Backend-specific failure, e.g. an unknown handle.
    fn attach_object(
        &mut self,
        child: RenderObjectId,
        parent: RenderObjectId,
    ) -> Result<(), BackendError>;

    /// Moves a node.
    fn set_transform(&mut self, node: RenderObjectId, transform: &Transform);

    /// Makes `camera` the camera of the main viewport.
    ///
    /// # Errors
    ///
    /// Backend-specific failure, e.g. the object is not a camera.
    fn bind_viewport_camera(&mut self, camera: RenderObjectId) -> Result<(), BackendError>;
}
