use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use log::warn;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Projection};
use crate::obj::VertexLayout;
use crate::texture::CubeFace;
use crate::transform::{Controls, ModelTransform};

/// Everything an exercise needs to open a window and draw its model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub model: ModelSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_map: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skybox: Option<[PathBuf; 6]>,
    #[serde(default)]
    pub transform: ModelTransform,
    pub camera: Camera,
    pub projection: Projection,
    /// Phong lighting; `None` draws the model in [`Self::color`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<LightConfig>,
    #[serde(default = "default_color")]
    pub color: Vec3,
    #[serde(default)]
    pub clear_color: Vec3,
    #[serde(default)]
    pub controls: Controls,
    #[serde(default)]
    pub blending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelSource {
    Polygon { sides: u32, radius: f32 },
    Obj { path: PathBuf, layout: VertexLayout },
}

impl ModelSource {
    pub fn layout(&self) -> VertexLayout {
        match self {
            Self::Polygon { .. } => VertexLayout::Position,
            Self::Obj { layout, .. } => *layout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub position: Vec3,
    pub color: Vec3,
    pub ambient_strength: f32,
    pub ambient_color: Vec3,
    pub specular_strength: f32,
    pub specular_phong: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Vec3::ONE,
            ambient_strength: 0.1,
            ambient_color: Vec3::ONE,
            specular_strength: 0.5,
            specular_phong: 16.0,
        }
    }
}

fn default_color() -> Vec3 {
    Vec3::ONE
}

impl SceneConfig {
    /// Checks the invariants the renderer relies on.
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(anyhow!(
                "window must have a non-zero size, got {}x{}",
                self.window.width,
                self.window.height
            ));
        }
        if let ModelSource::Polygon { sides, radius } = self.model {
            if sides < 3 || !(radius > 0.0) {
                return Err(anyhow!("invalid polygon: {sides} sides, radius {radius}"));
            }
        }
        self.camera.validate().context("invalid camera")?;
        self.projection.validate().context("invalid projection")?;
        Ok(())
    }

    /// Overrides fields from a `<scene>` XML document.
    pub fn apply_xml(&mut self, xml: &str) -> Result<()> {
        let document = Document::parse(xml).context("invalid scene XML")?;
        let root = document.root_element();
        if !root.has_tag_name("scene") {
            return Err(anyhow!(
                "expected <scene> root element, found <{}>",
                root.tag_name().name()
            ));
        }

        for node in root.children().filter(Node::is_element) {
            let tag = node.tag_name().name();
            self.apply_element(&node)
                .with_context(|| format!("invalid <{tag}> element"))?;
        }
        self.validate()
    }

    fn apply_element(&mut self, node: &Node<'_, '_>) -> Result<()> {
        let tag = node.tag_name().name();
        if tag == "skybox" {
            self.skybox = Some(parse_skybox(node)?);
            return Ok(());
        }
        let text = node_text(node).ok_or_else(|| anyhow!("<{tag}> is empty"))?;
        match tag {
            "title" => self.window.title = text.to_string(),
            "width" => self.window.width = parse_u32(text)?,
            "height" => self.window.height = parse_u32(text)?,
            "model" => {
                let layout = match self.model {
                    ModelSource::Obj { layout, .. } => layout,
                    ModelSource::Polygon { .. } => VertexLayout::Position,
                };
                self.model = ModelSource::Obj {
                    path: PathBuf::from(text),
                    layout,
                };
            }
            "layout" => {
                let layout = parse_layout(text)?;
                match &mut self.model {
                    ModelSource::Obj { layout: current, .. } => *current = layout,
                    ModelSource::Polygon { .. } => {
                        return Err(anyhow!("<layout> requires an OBJ <model>"));
                    }
                }
            }
            "sides" | "radius" => {
                let ModelSource::Polygon { sides, radius } = &mut self.model else {
                    return Err(anyhow!("<{tag}> only applies to polygon exercises"));
                };
                if tag == "sides" {
                    *sides = parse_u32(text)?;
                } else {
                    *radius = parse_f32(text)?;
                }
            }
            "texture" => self.texture = Some(PathBuf::from(text)),
            "normal_map" => self.normal_map = Some(PathBuf::from(text)),
            "position" => self.transform.translation = parse_vec3(text)?,
            "scale" => self.transform.scale = parse_vec3(text)?,
            "rotation" => self.transform.rotation_degrees = parse_vec3(text)?,
            "camera_position" => self.camera.position = parse_vec3(text)?,
            "camera_center" => self.camera.center = parse_vec3(text)?,
            "camera_up" => self.camera.world_up = parse_vec3(text)?,
            "fov" | "near" | "far" => self.apply_projection(tag, parse_f32(text)?)?,
            "color" => self.color = parse_vec3(text)?,
            "clear_color" => self.clear_color = parse_vec3(text)?,
            "blending" => self.blending = parse_bool(text)?,
            "light_position" => self.light_mut().position = parse_vec3(text)?,
            "light_color" => {
                let color = parse_vec3(text)?;
                let light = self.light_mut();
                light.color = color;
                light.ambient_color = color;
            }
            "ambient_strength" => self.light_mut().ambient_strength = parse_f32(text)?,
            "specular_strength" => self.light_mut().specular_strength = parse_f32(text)?,
            "specular_phong" => self.light_mut().specular_phong = parse_f32(text)?,
            "move_speed" => {
                let speed = parse_f32(text)?;
                self.controls.move_speed = speed;
                self.controls.scale_speed = speed;
            }
            "rotate_speed" => self.controls.rotate_speed = parse_f32(text)?,
            "spin" => self.controls.spin = parse_f32(text)?,
            other => warn!("ignoring unknown scene element <{other}>"),
        }
        Ok(())
    }

    fn apply_projection(&mut self, tag: &str, value: f32) -> Result<()> {
        let Projection::Perspective {
            fov_y_degrees,
            near,
            far,
        } = &mut self.projection
        else {
            return Err(anyhow!("<{tag}> requires a perspective projection"));
        };
        match tag {
            "fov" => *fov_y_degrees = value,
            "near" => *near = value,
            _ => *far = value,
        }
        Ok(())
    }

    fn light_mut(&mut self) -> &mut LightConfig {
        self.light.get_or_insert_with(LightConfig::default)
    }
}

fn parse_skybox(node: &Node<'_, '_>) -> Result<[PathBuf; 6]> {
    let mut faces: [Option<PathBuf>; 6] = Default::default();
    for child in node.children().filter(Node::is_element) {
        let name = child.tag_name().name();
        let index = match name {
            "right" => 0,
            "left" => 1,
            "up" => 2,
            "down" => 3,
            "front" => 4,
            "back" => 5,
            other => return Err(anyhow!("unknown skybox face <{other}>")),
        };
        let path = node_text(&child).ok_or_else(|| anyhow!("<{name}> is empty"))?;
        faces[index] = Some(PathBuf::from(path));
    }

    let mut paths: Vec<PathBuf> = Vec::with_capacity(6);
    for (face, path) in CubeFace::ALL.into_iter().zip(faces) {
        paths.push(path.ok_or_else(|| anyhow!("skybox is missing the {face} face"))?);
    }
    paths
        .try_into()
        .map_err(|_| anyhow!("skybox needs exactly six faces"))
}

fn node_text<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|text| !text.is_empty())
}

fn parse_vec3(value: &str) -> Result<Vec3> {
    let numbers = value
        .split_whitespace()
        .map(|component| component.parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid number in {value:?}"))?;
    match numbers.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(anyhow!("expected 3 components, got {}", numbers.len())),
    }
}

fn parse_f32(value: &str) -> Result<f32> {
    value
        .parse::<f32>()
        .map_err(|err| anyhow!("failed to parse float {value:?}: {err}"))
}

fn parse_u32(value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|err| anyhow!("failed to parse integer {value:?}: {err}"))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(anyhow!("expected a boolean, got {other:?}")),
    }
}

fn parse_layout(value: &str) -> Result<VertexLayout> {
    match value {
        "position" => Ok(VertexLayout::Position),
        "normal-uv" => Ok(VertexLayout::PositionNormalUv),
        "tangent" => Ok(VertexLayout::PositionNormalUvTangent),
        other => Err(anyhow!(
            "unknown layout {other:?}; expected position, normal-uv or tangent"
        )),
    }
}
