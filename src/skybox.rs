//! Geometry for an environment cube drawn around the camera.
//!
//! ```text
//!   7--------6
//!  /|       /|
//! 4--------5 |
//! | |      | |
//! | 3------|-2
//! |/       |/
//! 0--------1
//! ```

use crate::obj::{MeshData, VertexLayout};

pub const SKYBOX_VERTICES: [f32; 24] = [
    -1.0, -1.0, 1.0, // 0
    1.0, -1.0, 1.0, // 1
    1.0, -1.0, -1.0, // 2
    -1.0, -1.0, -1.0, // 3
    -1.0, 1.0, 1.0, // 4
    1.0, 1.0, 1.0, // 5
    1.0, 1.0, -1.0, // 6
    -1.0, 1.0, -1.0, // 7
];

pub const SKYBOX_INDICES: [u32; 36] = [
    1, 2, 6, 6, 5, 1, // right
    0, 4, 7, 7, 3, 0, // left
    4, 5, 6, 6, 7, 4, // top
    0, 3, 2, 2, 1, 0, // bottom
    0, 1, 5, 5, 4, 0, // front
    3, 7, 6, 6, 2, 3, // back
];

pub fn skybox_mesh() -> MeshData {
    MeshData {
        layout: VertexLayout::Position,
        vertices: SKYBOX_VERTICES.to_vec(),
        indices: SKYBOX_INDICES.to_vec(),
    }
}
