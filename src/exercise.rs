use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use glam::Vec3;

use crate::camera::{Camera, Projection};
use crate::obj::VertexLayout;
use crate::scene::{LightConfig, ModelSource, SceneConfig, WindowConfig};
use crate::texture::CubeFace;
use crate::transform::{Controls, ModelTransform};

/// The available rendering exercises, in course order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exercise {
    /// Filled regular pentagon in clip space.
    Pentagon,
    /// Position-only OBJ mesh under a narrow perspective camera.
    Bunny,
    /// Textured OBJ mesh with Phong lighting.
    Textured,
    /// Normal mapped OBJ mesh inside a skybox.
    NormalMapped,
}

impl Exercise {
    pub const ALL: [Exercise; 4] = [
        Self::Pentagon,
        Self::Bunny,
        Self::Textured,
        Self::NormalMapped,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pentagon => "pentagon",
            Self::Bunny => "bunny",
            Self::Textured => "textured",
            Self::NormalMapped => "normal-mapped",
        }
    }

    pub fn preset(self) -> SceneConfig {
        match self {
            Self::Pentagon => pentagon(),
            Self::Bunny => bunny(),
            Self::Textured => textured(),
            Self::NormalMapped => normal_mapped(),
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Exercise {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|exercise| exercise.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|e| e.name()).collect();
                anyhow!("unknown exercise {s:?}; expected one of {}", names.join(", "))
            })
    }
}

fn window(title: &str, size: u32) -> WindowConfig {
    WindowConfig {
        title: title.to_string(),
        width: size,
        height: size,
    }
}

fn pentagon() -> SceneConfig {
    SceneConfig {
        window: window("Pentagon", 640),
        model: ModelSource::Polygon {
            sides: 5,
            radius: 0.3,
        },
        texture: None,
        normal_map: None,
        skybox: None,
        transform: ModelTransform::default(),
        camera: Camera::new(Vec3::ZERO, Vec3::NEG_Z),
        projection: Projection::CLIP_SPACE,
        light: None,
        color: Vec3::ONE,
        clear_color: Vec3::ZERO,
        controls: Controls {
            move_speed: 0.0,
            rotate_speed: 0.0,
            scale_speed: 0.0,
            spin: 0.0,
        },
        blending: false,
    }
}

fn bunny() -> SceneConfig {
    SceneConfig {
        window: window("Bunny", 600),
        model: ModelSource::Obj {
            path: PathBuf::from("3D/bunny.obj"),
            layout: VertexLayout::Position,
        },
        transform: ModelTransform {
            translation: Vec3::new(0.0, 0.0, -5.0),
            scale: Vec3::ONE,
            rotation_degrees: Vec3::new(0.0, 0.0, 180.0),
        },
        projection: Projection::Perspective {
            fov_y_degrees: 6.0,
            near: 0.1,
            far: 100.0,
        },
        controls: Controls {
            move_speed: 3.0,
            rotate_speed: 100.0,
            scale_speed: 3.0,
            spin: 0.0,
        },
        ..pentagon()
    }
}

/// Camera, projection and light shared by the lit exercises.
fn lit_scene(title: &str, light_position: Vec3) -> SceneConfig {
    SceneConfig {
        window: window(title, 600),
        camera: Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 3.0, 0.0)),
        projection: Projection::Perspective {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        },
        light: Some(LightConfig {
            position: light_position,
            ..LightConfig::default()
        }),
        ..bunny()
    }
}

fn textured() -> SceneConfig {
    SceneConfig {
        model: ModelSource::Obj {
            path: PathBuf::from("3D/djSword.obj"),
            layout: VertexLayout::PositionNormalUv,
        },
        texture: Some(PathBuf::from("3D/partenza.jpg")),
        transform: ModelTransform {
            translation: Vec3::new(0.0, 30.0, -70.0),
            scale: Vec3::splat(0.75),
            rotation_degrees: Vec3::ZERO,
        },
        controls: Controls {
            move_speed: 30.0,
            rotate_speed: 30.0,
            scale_speed: 30.0,
            spin: 30.0,
        },
        ..lit_scene("Textured", Vec3::new(-10.0, 3.0, 0.0))
    }
}

fn normal_mapped() -> SceneConfig {
    let skybox = CubeFace::ALL
        .map(|face| PathBuf::from(format!("Skybox/rainbow_{}.png", face.suffix())));
    SceneConfig {
        model: ModelSource::Obj {
            path: PathBuf::from("3D/djSword.obj"),
            layout: VertexLayout::PositionNormalUvTangent,
        },
        texture: Some(PathBuf::from("3D/brickwall.jpg")),
        normal_map: Some(PathBuf::from("3D/brickwall_normal.jpg")),
        skybox: Some(skybox),
        transform: ModelTransform {
            translation: Vec3::new(0.0, 0.0, -10.0),
            scale: Vec3::splat(0.3),
            rotation_degrees: Vec3::ZERO,
        },
        controls: Controls::default(),
        blending: true,
        ..lit_scene("Normal Mapping", Vec3::new(0.0, 0.0, 8.0))
    }
}
