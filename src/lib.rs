//! A series of real-time rendering exercises built on wgpu.
//!
//! Each exercise (a flat pentagon, a position-only OBJ mesh, a textured and
//! lit model, and a normal mapped model inside a skybox) is described by a
//! [`SceneConfig`] preset. Everything up to the GPU upload is plain data, so
//! meshes, tangents, cameras and images can be built and checked headless.

pub mod app;
pub mod assets;
pub mod camera;
pub mod exercise;
pub mod input;
pub mod obj;
pub mod polygon;
pub mod render;
pub mod scene;
pub mod skybox;
pub mod tangent;
pub mod texture;
pub mod transform;

pub use assets::ExerciseAssets;
pub use camera::{Camera, Projection};
pub use exercise::Exercise;
pub use input::{Action, InputState, KeyCode, NamedKey};
pub use obj::{load_obj_file, load_obj_from_str, MeshData, ObjData, VertexLayout};
pub use render::{CameraParams, LightParams, Renderer};
pub use scene::{LightConfig, ModelSource, SceneConfig};
pub use texture::{CubeFace, CubemapImages, TextureError, TextureImage};
pub use transform::{Controls, ModelTransform, Velocity};
