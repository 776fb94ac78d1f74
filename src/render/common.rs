use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3, Vec4};

/// Camera parameters consumed by the renderer's uniform buffer.
#[derive(Clone, Debug)]
pub struct CameraParams {
    pub view: Mat4,
    pub projection: Mat4,
    pub sky_view: Mat4,
    pub position: Vec3,
}

/// Phong lighting state consumed by the renderer's uniform buffer.
#[derive(Clone, Debug)]
pub struct LightParams {
    pub position: Vec3,
    pub color: Vec3,
    pub ambient_color: Vec3,
    pub ambient_strength: f32,
    pub specular_strength: f32,
    pub specular_phong: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub(crate) struct GlobalUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub sky_view: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub light_position: [f32; 4],
    pub light_color: [f32; 4],
    /// `rgb` ambient color, `w` ambient strength.
    pub ambient: [f32; 4],
    /// `x` strength, `y` Phong exponent.
    pub specular: [f32; 4],
}

impl GlobalUniform {
    pub(crate) fn new(camera: &CameraParams, light: Option<&LightParams>) -> Self {
        // Unlit scenes still get full ambient so any lit shader shows the base color.
        let (light_position, light_color, ambient, specular) = match light {
            Some(light) => (
                light.position.extend(1.0),
                light.color.extend(1.0),
                light.ambient_color.extend(light.ambient_strength),
                Vec4::new(light.specular_strength, light.specular_phong, 0.0, 0.0),
            ),
            None => (Vec4::W, Vec4::W, Vec4::ONE, Vec4::new(0.0, 1.0, 0.0, 0.0)),
        };
        Self {
            view: camera.view.to_cols_array_2d(),
            projection: camera.projection.to_cols_array_2d(),
            sky_view: camera.sky_view.to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).into(),
            light_position: light_position.into(),
            light_color: light_color.into(),
            ambient: ambient.into(),
            specular: specular.into(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub(crate) struct ObjectConstants {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
    pub color: [f32; 4],
}

impl ObjectConstants {
    pub(crate) fn new(model: Mat4, color: Vec4) -> Self {
        let normal = Mat3::from_mat4(model).inverse().transpose();
        Self {
            model: model.to_cols_array_2d(),
            normal: mat3_to_3x4(normal),
            color: color.into(),
        }
    }
}

fn mat3_to_3x4(matrix: Mat3) -> [[f32; 4]; 3] {
    let cols = matrix.to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}
