pub mod common;
pub mod native;
mod shaders;

pub use common::{CameraParams, LightParams};
pub use native::Renderer;
