use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::tangent::triangle_basis;

/// Interleaving used by a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexLayout {
    /// `position.xyz`
    Position,
    /// `position.xyz`, `normal.xyz`, `uv`
    PositionNormalUv,
    /// `position.xyz`, `normal.xyz`, `uv`, `tangent.xyz`, `bitangent.xyz`
    PositionNormalUvTangent,
}

impl VertexLayout {
    pub const fn floats_per_vertex(self) -> usize {
        match self {
            Self::Position => 3,
            Self::PositionNormalUv => 8,
            Self::PositionNormalUvTangent => 14,
        }
    }

    pub const fn stride(self) -> u64 {
        (self.floats_per_vertex() * std::mem::size_of::<f32>()) as u64
    }
}

/// GPU ready vertex and index arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub layout: VertexLayout,
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.floats_per_vertex()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex(&self, index: usize) -> &[f32] {
        let n = self.layout.floats_per_vertex();
        &self.vertices[index * n..(index + 1) * n]
    }
}

/// One triangle corner, with indices already resolved to zero-based offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceVertex {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

/// Raw attribute pools and triangles read from an OBJ file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub triangles: Vec<[FaceVertex; 3]>,
}

/// Reads and parses an OBJ file from disk.
pub fn load_obj_file(path: impl AsRef<Path>) -> Result<ObjData> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("unable to read {}", path.display()))?;
    load_obj_from_str(&contents).with_context(|| format!("failed to parse OBJ {}", path.display()))
}

/// Parses an OBJ file from memory.
///
/// Only geometry records are read; materials, groups and smoothing groups are ignored.
/// Polygons are fan-triangulated.
pub fn load_obj_from_str(data: &str) -> Result<ObjData> {
    let mut obj = ObjData::default();

    for (line_no, line) in data.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };
        match tag {
            "v" => obj.positions.push(
                parse_vec3(parts)
                    .with_context(|| format!("invalid vertex on line {}", line_no + 1))?,
            ),
            "vn" => obj.normals.push(
                parse_vec3(parts)
                    .with_context(|| format!("invalid normal on line {}", line_no + 1))?,
            ),
            "vt" => obj.texcoords.push(
                parse_vec2(parts)
                    .with_context(|| format!("invalid texture coordinate on line {}", line_no + 1))?,
            ),
            "f" => {
                let polygon = parse_face(parts, &obj)
                    .with_context(|| format!("invalid face on line {}", line_no + 1))?;
                triangulate_face(&polygon, &mut obj.triangles);
            }
            _ => {}
        }
    }

    if obj.positions.is_empty() {
        return Err(anyhow!("OBJ file does not define any vertices"));
    }
    if obj.triangles.is_empty() {
        return Err(anyhow!("OBJ file does not define any faces"));
    }
    Ok(obj)
}

fn parse_vec3<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Vec3> {
    let mut next = || -> Result<f32> {
        Ok(parts
            .next()
            .ok_or_else(|| anyhow!("missing vector component"))?
            .parse::<f32>()?)
    };
    Ok(Vec3::new(next()?, next()?, next()?))
}

fn parse_vec2<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Vec2> {
    let mut next = || -> Result<f32> {
        Ok(parts
            .next()
            .ok_or_else(|| anyhow!("missing texture coordinate component"))?
            .parse::<f32>()?)
    };
    Ok(Vec2::new(next()?, next()?))
}

fn parse_face<'a>(parts: impl Iterator<Item = &'a str>, obj: &ObjData) -> Result<Vec<FaceVertex>> {
    let mut corners = Vec::new();
    for part in parts {
        let mut segments = part.split('/');
        let position = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("missing vertex index in {part:?}"))?;
        let position = resolve_index(position, obj.positions.len())
            .with_context(|| format!("bad vertex index in {part:?}"))?;
        let texcoord = match segments.next().filter(|s| !s.is_empty()) {
            Some(s) => Some(
                resolve_index(s, obj.texcoords.len())
                    .with_context(|| format!("bad texture coordinate index in {part:?}"))?,
            ),
            None => None,
        };
        let normal = match segments.next().filter(|s| !s.is_empty()) {
            Some(s) => Some(
                resolve_index(s, obj.normals.len())
                    .with_context(|| format!("bad normal index in {part:?}"))?,
            ),
            None => None,
        };
        corners.push(FaceVertex {
            position,
            texcoord,
            normal,
        });
    }
    if corners.len() < 3 {
        return Err(anyhow!("faces must reference at least 3 vertices"));
    }
    Ok(corners)
}

/// Converts a 1-based or negative (relative to the current pool size) OBJ index.
fn resolve_index(raw: &str, len: usize) -> Result<usize> {
    let index = raw.parse::<i64>()?;
    let resolved = if index > 0 {
        let zero_based = (index - 1) as usize;
        (zero_based < len).then_some(zero_based)
    } else if index < 0 {
        let back = index.unsigned_abs() as usize;
        (back <= len).then(|| len - back)
    } else {
        None
    };
    resolved.ok_or_else(|| anyhow!("index {index} out of range for {len} element(s)"))
}

fn triangulate_face(polygon: &[FaceVertex], triangles: &mut Vec<[FaceVertex; 3]>) {
    for i in 1..polygon.len().saturating_sub(1) {
        triangles.push([polygon[0], polygon[i], polygon[i + 1]]);
    }
}

impl ObjData {
    /// Position-only vertex buffer indexed straight from the face vertex indices.
    pub fn indexed_positions(&self) -> MeshData {
        let vertices = self
            .positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect();
        let indices = self
            .triangles
            .iter()
            .flatten()
            .map(|corner| corner.position as u32)
            .collect();
        MeshData {
            layout: VertexLayout::Position,
            vertices,
            indices,
        }
    }

    /// Position, normal and uv interleaved, with identical corners shared.
    pub fn interleaved(&self) -> MeshData {
        let smooth = self.smooth_normals();
        let mut lookup: HashMap<FaceVertex, u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::with_capacity(self.triangles.len() * 3);

        for corner in self.triangles.iter().flatten() {
            let next_index = (vertices.len() / 8) as u32;
            let entry = lookup.entry(*corner).or_insert_with(|| {
                let position = self.positions[corner.position];
                let normal = self.corner_normal(corner, &smooth);
                let uv = self.corner_uv(corner);
                vertices.extend_from_slice(&[position.x, position.y, position.z]);
                vertices.extend_from_slice(&[normal.x, normal.y, normal.z]);
                vertices.extend_from_slice(&[uv.x, uv.y]);
                next_index
            });
            indices.push(*entry);
        }

        MeshData {
            layout: VertexLayout::PositionNormalUv,
            vertices,
            indices,
        }
    }

    /// Fully expanded vertices carrying a per-triangle tangent and bitangent.
    pub fn with_tangents(&self) -> MeshData {
        let smooth = self.smooth_normals();
        let mut vertices = Vec::with_capacity(self.triangles.len() * 3 * 14);

        for triangle in &self.triangles {
            let positions = triangle.map(|corner| self.positions[corner.position]);
            let uvs = triangle.map(|corner| self.corner_uv(&corner));
            let basis = triangle_basis(positions, uvs);

            for (i, corner) in triangle.iter().enumerate() {
                let position = positions[i];
                let normal = self.corner_normal(corner, &smooth);
                let uv = uvs[i];
                vertices.extend_from_slice(&[position.x, position.y, position.z]);
                vertices.extend_from_slice(&[normal.x, normal.y, normal.z]);
                vertices.extend_from_slice(&[uv.x, uv.y]);
                vertices.extend_from_slice(&basis.tangent.to_array());
                vertices.extend_from_slice(&basis.bitangent.to_array());
            }
        }

        let count = (self.triangles.len() * 3) as u32;
        MeshData {
            layout: VertexLayout::PositionNormalUvTangent,
            vertices,
            indices: (0..count).collect(),
        }
    }

    /// Builds the mesh for the requested layout.
    pub fn build(&self, layout: VertexLayout) -> MeshData {
        match layout {
            VertexLayout::Position => self.indexed_positions(),
            VertexLayout::PositionNormalUv => self.interleaved(),
            VertexLayout::PositionNormalUvTangent => self.with_tangents(),
        }
    }

    fn corner_normal(&self, corner: &FaceVertex, smooth: &[Vec3]) -> Vec3 {
        corner
            .normal
            .map(|i| self.normals[i])
            .unwrap_or_else(|| smooth[corner.position])
    }

    fn corner_uv(&self, corner: &FaceVertex) -> Vec2 {
        corner
            .texcoord
            .map(|i| self.texcoords[i])
            .unwrap_or(Vec2::ZERO)
    }

    /// Area weighted vertex normals, used for corners that have no `vn`.
    fn smooth_normals(&self) -> Vec<Vec3> {
        let mut accum = vec![Vec3::ZERO; self.positions.len()];
        if self.triangles.iter().flatten().all(|c| c.normal.is_some()) {
            return accum;
        }
        for triangle in &self.triangles {
            let [a, b, c] = triangle.map(|corner| corner.position);
            let p0 = self.positions[a];
            let face = (self.positions[b] - p0).cross(self.positions[c] - p0);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }
        accum.into_iter().map(Vec3::normalize_or_zero).collect()
    }
}
