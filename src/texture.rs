use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("unable to load image {}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cubemap face {face} is {width}x{height}; faces must be square")]
    NonSquareFace {
        face: CubeFace,
        width: u32,
        height: u32,
    },
    #[error("cubemap face {face} is {actual}px wide, expected {expected}px like the first face")]
    FaceSizeMismatch {
        face: CubeFace,
        expected: u32,
        actual: u32,
    },
}

/// Decoded RGBA8 pixels, rows stored top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl fmt::Debug for TextureImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl TextureImage {
    /// Decodes an image file into RGBA8.
    ///
    /// OBJ texture coordinates start at the bottom-left corner, so model textures are
    /// loaded with `flip_vertically` set.
    pub fn load(path: impl AsRef<Path>, flip_vertically: bool) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let image = if flip_vertically { image.flipv() } else { image };
        let rgba = image.into_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// A single pixel texture.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }

    /// Normal map texel pointing straight out of the surface.
    pub fn flat_normal() -> Self {
        Self::solid([128, 128, 255, 255])
    }

    pub fn bytes_per_row(&self) -> u32 {
        4 * self.width
    }
}

/// Cube faces in GPU layer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeFace {
    Right,
    Left,
    Up,
    Down,
    Front,
    Back,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        Self::Right,
        Self::Left,
        Self::Up,
        Self::Down,
        Self::Front,
        Self::Back,
    ];

    /// Conventional file-name suffix, e.g. `rainbow_rt.png`.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Right => "rt",
            Self::Left => "lf",
            Self::Up => "up",
            Self::Down => "dn",
            Self::Front => "ft",
            Self::Back => "bk",
        }
    }
}

impl fmt::Display for CubeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Right => "right (+X)",
            Self::Left => "left (-X)",
            Self::Up => "up (+Y)",
            Self::Down => "down (-Y)",
            Self::Front => "front (+Z)",
            Self::Back => "back (-Z)",
        };
        f.write_str(name)
    }
}

/// Six square faces of equal size, ordered as [`CubeFace::ALL`].
#[derive(Debug, Clone)]
pub struct CubemapImages {
    pub size: u32,
    pub faces: Vec<TextureImage>,
}

impl CubemapImages {
    pub fn load(paths: &[PathBuf; 6]) -> Result<Self, TextureError> {
        let mut faces = Vec::with_capacity(6);
        for path in paths {
            faces.push(TextureImage::load(path, false)?);
        }
        Self::from_faces(faces)
    }

    pub fn from_faces(faces: Vec<TextureImage>) -> Result<Self, TextureError> {
        let mut size = None;
        for (face, image) in CubeFace::ALL.into_iter().zip(&faces) {
            if image.width != image.height {
                return Err(TextureError::NonSquareFace {
                    face,
                    width: image.width,
                    height: image.height,
                });
            }
            let expected = *size.get_or_insert(image.width);
            if image.width != expected {
                return Err(TextureError::FaceSizeMismatch {
                    face,
                    expected,
                    actual: image.width,
                });
            }
        }
        Ok(Self {
            size: size.unwrap_or(1),
            faces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let mut image = RgbaImage::new(width, height);
        // Mark the top-left pixel so flips can be observed.
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let path = dir.path().join(name);
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn loads_rgba_pixels() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "tex.png", 4, 2);
        let texture = TextureImage::load(&path, false).unwrap();
        assert_eq!((texture.width, texture.height), (4, 2));
        assert_eq!(texture.pixels.len(), 4 * 4 * 2);
        assert_eq!(&texture.pixels[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn flipping_moves_first_row_to_bottom() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "tex.png", 2, 2);
        let texture = TextureImage::load(&path, true).unwrap();
        assert_eq!(&texture.pixels[..4], &[0, 0, 0, 0]);
        let bottom_left = (texture.bytes_per_row()) as usize;
        assert_eq!(&texture.pixels[bottom_left..bottom_left + 4], &[255, 0, 0, 255]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = TextureImage::load("does/not/exist.png", false).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.png"));
    }

    #[test]
    fn cubemap_requires_matching_square_faces() {
        let dir = TempDir::new().unwrap();
        let mut paths: Vec<PathBuf> = CubeFace::ALL
            .iter()
            .map(|face| write_png(&dir, &format!("sky_{}.png", face.suffix()), 8, 8))
            .collect();
        let ok: [PathBuf; 6] = paths.clone().try_into().unwrap();
        let cubemap = CubemapImages::load(&ok).unwrap();
        assert_eq!(cubemap.size, 8);
        assert_eq!(cubemap.faces.len(), 6);

        paths[3] = write_png(&dir, "small.png", 4, 4);
        let bad: [PathBuf; 6] = paths.clone().try_into().unwrap();
        assert!(matches!(
            CubemapImages::load(&bad),
            Err(TextureError::FaceSizeMismatch {
                face: CubeFace::Down,
                ..
            })
        ));

        paths[3] = write_png(&dir, "wide.png", 8, 4);
        let bad: [PathBuf; 6] = paths.try_into().unwrap();
        assert!(matches!(
            CubemapImages::load(&bad),
            Err(TextureError::NonSquareFace { .. })
        ));
    }
}
