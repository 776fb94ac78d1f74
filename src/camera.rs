use anyhow::{anyhow, Result};
use glam::{Mat3, Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// A look-at camera described by its eye position and the point it faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub center: Vec3,
    pub world_up: Vec3,
}

/// Right, up and forward unit vectors of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, center: Vec3) -> Self {
        Self {
            position,
            center,
            world_up: Vec3::Y,
        }
    }

    /// Rejects cameras whose basis cannot be formed.
    pub fn validate(&self) -> Result<()> {
        let forward = self.center - self.position;
        if !(forward.length_squared() > f32::EPSILON) {
            return Err(anyhow!("camera center must differ from its position"));
        }
        if !(forward.cross(self.world_up).length_squared() > f32::EPSILON) {
            return Err(anyhow!("camera forward direction is parallel to world up"));
        }
        Ok(())
    }

    pub fn basis(&self) -> CameraBasis {
        let forward = (self.center - self.position).normalize();
        let right = forward.cross(self.world_up.normalize()).normalize();
        let up = right.cross(forward);
        CameraBasis { right, up, forward }
    }

    /// Rotation taking world axes onto the camera's; rows are right, up and -forward.
    pub fn orientation(&self) -> Mat4 {
        let CameraBasis { right, up, forward } = self.basis();
        Mat4::from_cols(
            Vec4::new(right.x, up.x, -forward.x, 0.0),
            Vec4::new(right.y, up.y, -forward.y, 0.0),
            Vec4::new(right.z, up.z, -forward.z, 0.0),
            Vec4::W,
        )
    }

    pub fn view(&self) -> Mat4 {
        self.orientation() * Mat4::from_translation(-self.position)
    }

    /// View matrix with the translation stripped, for geometry pinned to the eye.
    pub fn skybox_view(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.view()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    Perspective {
        fov_y_degrees: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    /// Identity-equivalent projection for geometry already in clip space.
    pub const CLIP_SPACE: Self = Self::Orthographic {
        left: -1.0,
        right: 1.0,
        bottom: -1.0,
        top: 1.0,
        near: -1.0,
        far: 1.0,
    };

    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Perspective {
                fov_y_degrees,
                near,
                far,
            } => {
                if !(fov_y_degrees > 0.0 && fov_y_degrees < 180.0) {
                    return Err(anyhow!("field of view must be in (0, 180), got {fov_y_degrees}"));
                }
                if !(near > 0.0 && near < far) {
                    return Err(anyhow!("invalid clip planes near={near} far={far}"));
                }
            }
            Self::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => {
                if [left, right, bottom, top, near, far]
                    .iter()
                    .any(|value| !value.is_finite())
                {
                    return Err(anyhow!("orthographic bounds must be finite"));
                }
                if left == right || bottom == top || near == far {
                    return Err(anyhow!("orthographic volume has zero extent"));
                }
            }
        }
        Ok(())
    }

    /// Projection matrix mapping depth onto `[0, 1]`.
    ///
    /// `aspect` is width over height.
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        match *self {
            Self::Perspective {
                fov_y_degrees,
                near,
                far,
            } => Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect.max(0.01), near, far),
            Self::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Mat4::orthographic_rh(left, right, bottom, top, near, far),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 3.0, 0.0))
    }

    #[test]
    fn basis_is_orthonormal() {
        let CameraBasis { right, up, forward } = sample().basis();
        for v in [right, up, forward] {
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
        assert!(right.dot(up).abs() < 1e-5);
        assert!(right.dot(forward).abs() < 1e-5);
        assert!(up.dot(forward).abs() < 1e-5);
        assert!(right.x > 0.99);
    }

    #[test]
    fn view_matches_look_at() {
        let camera = sample();
        let expected = Mat4::look_at_rh(camera.position, camera.center, camera.world_up);
        assert!(camera.view().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn default_camera_is_identity() {
        let camera = Camera::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(camera.view().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn skybox_view_drops_translation() {
        let sky = sample().skybox_view();
        assert_eq!(sky.w_axis, Vec4::W);
        let point = sky.transform_point3(Vec3::ZERO);
        assert!(point.length() < 1e-6);
    }

    #[test]
    fn degenerate_cameras_are_rejected() {
        assert!(Camera::new(Vec3::ONE, Vec3::ONE).validate().is_err());
        assert!(Camera::new(Vec3::ZERO, Vec3::Y).validate().is_err());
        assert!(sample().validate().is_ok());
        assert!(Camera::new(Vec3::splat(f32::NAN), Vec3::ZERO).validate().is_err());
    }

    #[test]
    fn perspective_maps_near_plane_to_zero_depth() {
        let projection = Projection::Perspective {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        };
        let clip = projection.matrix(1.0) * Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert!((clip.z / clip.w).abs() < 1e-4);
        assert!(projection.validate().is_ok());
    }

    #[test]
    fn nan_clip_planes_are_rejected() {
        let perspective = |near: f32, far: f32| Projection::Perspective {
            fov_y_degrees: 60.0,
            near,
            far,
        };
        assert!(perspective(f32::NAN, 100.0).validate().is_err());
        assert!(perspective(0.1, f32::NAN).validate().is_err());
        assert!(perspective(0.1, 100.0).validate().is_ok());
        let ortho = Projection::Orthographic {
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
            near: f32::NAN,
            far: 1.0,
        };
        assert!(ortho.validate().is_err());
    }

    #[test]
    fn clip_space_projection_keeps_xy() {
        let m = Projection::CLIP_SPACE.matrix(1.0);
        let p = m.transform_point3(Vec3::new(0.3, -0.2, 0.0));
        assert!((p.x - 0.3).abs() < 1e-6 && (p.y + 0.2).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&p.z));
    }
}
