use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::obj::{load_obj_file, MeshData};
use crate::polygon::polygon_mesh;
use crate::scene::{ModelSource, SceneConfig};
use crate::texture::{CubemapImages, TextureImage};

/// CPU-side resources for one exercise, ready for upload.
#[derive(Debug, Clone)]
pub struct ExerciseAssets {
    pub mesh: MeshData,
    pub texture: Option<TextureImage>,
    pub normal_map: Option<TextureImage>,
    pub skybox: Option<CubemapImages>,
}

impl ExerciseAssets {
    /// Loads the model and images named by `config`, resolving relative paths against `root`.
    pub fn load(config: &SceneConfig, root: &Path) -> Result<Self> {
        let mesh = match &config.model {
            ModelSource::Polygon { sides, radius } => polygon_mesh(*sides, *radius)?,
            ModelSource::Obj { path, layout } => {
                let path = resolve(root, path);
                let obj = load_obj_file(&path)?;
                info!(
                    "loaded {} ({} positions, {} triangles)",
                    path.display(),
                    obj.positions.len(),
                    obj.triangles.len()
                );
                obj.build(*layout)
            }
        };
        debug!(
            "mesh uses {:?}: {} vertices, {} triangles",
            mesh.layout,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        let texture = load_texture(root, config.texture.as_deref()).context("diffuse texture")?;
        let normal_map = load_texture(root, config.normal_map.as_deref()).context("normal map")?;
        let skybox = match &config.skybox {
            Some(faces) => {
                let faces = faces.clone().map(|face| resolve(root, &face));
                Some(CubemapImages::load(&faces).context("skybox")?)
            }
            None => None,
        };

        Ok(Self {
            mesh,
            texture,
            normal_map,
            skybox,
        })
    }
}

fn load_texture(root: &Path, path: Option<&Path>) -> Result<Option<TextureImage>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let image = TextureImage::load(resolve(root, path), true)?;
    debug!("{}: {}x{}", path.display(), image.width, image.height);
    Ok(Some(image))
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::Exercise;
    use crate::obj::VertexLayout;
    use image::{RgbImage, RgbaImage};
    use std::fs;
    use tempfile::TempDir;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n";

    fn asset_root() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("3D")).unwrap();
        fs::write(dir.path().join("3D/djSword.obj"), TRIANGLE).unwrap();
        fs::write(dir.path().join("3D/bunny.obj"), TRIANGLE).unwrap();
        for name in ["brickwall.jpg", "brickwall_normal.jpg", "partenza.jpg"] {
            RgbImage::new(4, 2)
                .save(dir.path().join("3D").join(name))
                .unwrap();
        }
        fs::create_dir_all(dir.path().join("Skybox")).unwrap();
        for suffix in ["rt", "lf", "up", "dn", "ft", "bk"] {
            RgbaImage::new(2, 2)
                .save(dir.path().join(format!("Skybox/rainbow_{suffix}.png")))
                .unwrap();
        }
        dir
    }

    #[test]
    fn pentagon_needs_no_files() {
        let assets =
            ExerciseAssets::load(&Exercise::Pentagon.preset(), Path::new("/nowhere")).unwrap();
        assert_eq!(assets.mesh.vertex_count(), 5);
        assert!(assets.texture.is_none() && assets.skybox.is_none());
    }

    #[test]
    fn normal_mapped_loads_everything() {
        let root = asset_root();
        let assets = ExerciseAssets::load(&Exercise::NormalMapped.preset(), root.path()).unwrap();
        assert_eq!(assets.mesh.layout, VertexLayout::PositionNormalUvTangent);
        assert_eq!(assets.mesh.vertex_count(), 3);
        assert_eq!(assets.texture.unwrap().width, 4);
        assert!(assets.normal_map.is_some());
        assert_eq!(assets.skybox.unwrap().size, 2);
    }

    #[test]
    fn missing_texture_is_reported() {
        let root = asset_root();
        fs::remove_file(root.path().join("3D/partenza.jpg")).unwrap();
        let err = ExerciseAssets::load(&Exercise::Textured.preset(), root.path()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("diffuse texture"));
        assert!(message.contains("partenza.jpg"));
    }
}
