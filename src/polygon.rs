use std::f32::consts::TAU;

use anyhow::{anyhow, Result};
use glam::Vec2;

use crate::obj::{MeshData, VertexLayout};

/// Returns the corners of a regular polygon centered on the origin.
///
/// Corner `i` sits at `start_angle + i * 2π / sides` radians, counter-clockwise.
pub fn regular_polygon(sides: u32, radius: f32, start_angle: f32) -> Result<Vec<Vec2>> {
    if sides < 3 {
        return Err(anyhow!("a polygon needs at least 3 sides, got {sides}"));
    }
    let step = TAU / sides as f32;
    Ok((0..sides)
        .map(|i| {
            let angle = start_angle + step * i as f32;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect())
}

/// Triangle-fan indices for a convex polygon with `vertex_count` corners.
pub fn fan_indices(vertex_count: u32) -> Vec<u32> {
    (1..vertex_count.saturating_sub(1))
        .flat_map(|i| [0, i, i + 1])
        .collect()
}

/// Flat polygon mesh in the XY plane using the position-only layout.
pub fn polygon_mesh(sides: u32, radius: f32) -> Result<MeshData> {
    let corners = regular_polygon(sides, radius, 0.0)?;
    let vertices = corners
        .iter()
        .flat_map(|corner| [corner.x, corner.y, 0.0])
        .collect();
    Ok(MeshData {
        layout: VertexLayout::Position,
        vertices,
        indices: fan_indices(sides),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pentagon_corners_are_72_degrees_apart() {
        let corners = regular_polygon(5, 0.3, 0.0).unwrap();
        assert_eq!(corners.len(), 5);
        assert!((corners[0] - Vec2::new(0.3, 0.0)).length() < 1e-6);
        let expected = 72f32.to_radians();
        let angle = corners[1].y.atan2(corners[1].x);
        assert!((angle - expected).abs() < 1e-5);
        for corner in &corners {
            assert!((corner.length() - 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn fan_covers_every_corner() {
        assert_eq!(fan_indices(5), vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
        assert!(fan_indices(2).is_empty());
    }

    #[test]
    fn degenerate_polygons_are_rejected() {
        assert!(regular_polygon(2, 1.0, 0.0).is_err());
    }

    #[test]
    fn polygon_mesh_is_flat() {
        let mesh = polygon_mesh(5, 0.3).unwrap();
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.triangle_count(), 3);
        assert!(mesh.vertices.chunks_exact(3).all(|v| v[2] == 0.0));
    }
}
