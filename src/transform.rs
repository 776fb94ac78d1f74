use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Placement of the model in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelTransform {
    pub translation: Vec3,
    pub scale: Vec3,
    /// Euler angles in degrees, applied X, then Y, then Z in model space.
    pub rotation_degrees: Vec3,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation_degrees: Vec3::ZERO,
        }
    }
}

impl ModelTransform {
    pub fn matrix(&self) -> Mat4 {
        let rotation = Mat4::from_rotation_x(self.rotation_degrees.x.to_radians())
            * Mat4::from_rotation_y(self.rotation_degrees.y.to_radians())
            * Mat4::from_rotation_z(self.rotation_degrees.z.to_radians());
        Mat4::from_translation(self.translation) * Mat4::from_scale(self.scale) * rotation
    }

    /// Integrates a rate of change over `dt` seconds.
    pub fn advance(&mut self, velocity: &Velocity, dt: f32) {
        self.translation += velocity.translation * dt;
        self.scale += velocity.scale * dt;
        self.rotation_degrees += velocity.rotation_degrees * dt;
        let r = self.rotation_degrees;
        self.rotation_degrees = Vec3::new(r.x % 360.0, r.y % 360.0, r.z % 360.0);
    }
}

/// Rates of change per second for each component of a [`ModelTransform`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub translation: Vec3,
    pub scale: Vec3,
    pub rotation_degrees: Vec3,
}

/// Speeds applied while a control key is held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    /// Units per second.
    pub move_speed: f32,
    /// Degrees per second.
    pub rotate_speed: f32,
    /// Scale units per second.
    pub scale_speed: f32,
    /// Automatic rotation about Y, degrees per second.
    pub spin: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            rotate_speed: 100.0,
            scale_speed: 10.0,
            spin: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_scales_before_translating() {
        let transform = ModelTransform {
            translation: Vec3::new(0.0, 0.0, -10.0),
            scale: Vec3::splat(0.5),
            rotation_degrees: Vec3::ZERO,
        };
        let p = transform.matrix().transform_point3(Vec3::new(2.0, 0.0, 0.0));
        assert!((p - Vec3::new(1.0, 0.0, -10.0)).length() < 1e-6);
    }

    #[test]
    fn rotation_about_z_flips_xy() {
        let transform = ModelTransform {
            rotation_degrees: Vec3::new(0.0, 0.0, 180.0),
            ..Default::default()
        };
        let p = transform.matrix().transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((p - Vec3::new(-1.0, -1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn advance_is_frame_rate_independent() {
        let velocity = Velocity {
            translation: Vec3::new(0.0, 10.0, 0.0),
            scale: Vec3::ZERO,
            rotation_degrees: Vec3::new(0.0, 100.0, 0.0),
        };
        let mut coarse = ModelTransform::default();
        coarse.advance(&velocity, 0.5);

        let mut fine = ModelTransform::default();
        for _ in 0..50 {
            fine.advance(&velocity, 0.01);
        }
        assert!((coarse.translation - fine.translation).length() < 1e-3);
        assert!((coarse.rotation_degrees.y - 50.0).abs() < 1e-4);
        assert!((fine.rotation_degrees.y - 50.0).abs() < 1e-2);
    }

    #[test]
    fn rotation_wraps() {
        let mut transform = ModelTransform::default();
        transform.advance(
            &Velocity {
                rotation_degrees: Vec3::new(370.0, 0.0, 0.0),
                ..Default::default()
            },
            1.0,
        );
        assert!((transform.rotation_degrees.x - 10.0).abs() < 1e-4);
    }
}
