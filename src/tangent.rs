//! Tangent space basis for normal mapping.

use glam::{Vec2, Vec3};

/// Determinants smaller than this mean the UV mapping collapses the triangle.
const MIN_UV_DETERMINANT: f32 = 1e-8;

/// Tangent and bitangent shared by the three corners of a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentBasis {
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

/// Solves `dP = dU * T + dV * B` for the triangle's two edges.
///
/// The result is not normalized; shaders normalize after interpolation. When the
/// texture mapping is degenerate an orthonormal pair perpendicular to the face is
/// returned instead.
pub fn triangle_basis(positions: [Vec3; 3], uvs: [Vec2; 3]) -> TangentBasis {
    let delta_pos1 = positions[1] - positions[0];
    let delta_pos2 = positions[2] - positions[0];
    let delta_uv1 = uvs[1] - uvs[0];
    let delta_uv2 = uvs[2] - uvs[0];

    let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
    if det.abs() < MIN_UV_DETERMINANT {
        return fallback_basis(delta_pos1.cross(delta_pos2));
    }
    let r = 1.0 / det;

    TangentBasis {
        tangent: (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r,
        bitangent: (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * r,
    }
}

fn fallback_basis(face_normal: Vec3) -> TangentBasis {
    match face_normal.try_normalize() {
        Some(normal) => {
            let (tangent, bitangent) = normal.any_orthonormal_pair();
            TangentBasis { tangent, bitangent }
        }
        None => TangentBasis {
            tangent: Vec3::X,
            bitangent: Vec3::Y,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_mapping_matches_axes() {
        let basis = triangle_basis(
            [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)],
            [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        );
        assert!((basis.tangent - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
        assert!((basis.bitangent - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn mirrored_uvs_flip_the_bitangent() {
        let basis = triangle_basis(
            [Vec3::ZERO, Vec3::X, Vec3::Y],
            [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, -1.0)],
        );
        assert!((basis.tangent - Vec3::X).length() < 1e-6);
        assert!((basis.bitangent + Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn basis_reproduces_edges() {
        let positions = [
            Vec3::new(0.2, -1.0, 3.0),
            Vec3::new(1.5, 0.5, 2.0),
            Vec3::new(-0.5, 1.0, 2.5),
        ];
        let uvs = [Vec2::new(0.1, 0.2), Vec2::new(0.7, 0.3), Vec2::new(0.4, 0.9)];
        let basis = triangle_basis(positions, uvs);
        for i in 1..3 {
            let duv = uvs[i] - uvs[0];
            let rebuilt = basis.tangent * duv.x + basis.bitangent * duv.y;
            assert!((rebuilt - (positions[i] - positions[0])).length() < 1e-4);
        }
    }

    #[test]
    fn degenerate_uvs_fall_back_to_face_plane() {
        let basis = triangle_basis([Vec3::ZERO, Vec3::X, Vec3::Y], [Vec2::ZERO; 3]);
        assert!(basis.tangent.is_finite() && basis.bitangent.is_finite());
        assert!(basis.tangent.dot(Vec3::Z).abs() < 1e-6);
        assert!(basis.bitangent.dot(Vec3::Z).abs() < 1e-6);
        assert!((basis.tangent.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_area_triangle_uses_axes() {
        let basis = triangle_basis([Vec3::ONE; 3], [Vec2::ZERO; 3]);
        assert_eq!(basis.tangent, Vec3::X);
        assert_eq!(basis.bitangent, Vec3::Y);
    }
}
