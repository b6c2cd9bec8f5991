//! Image textures for the cube faces and the water normals.

use crate::color::Rgb;
use crate::cube::FaceMaterial;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Colours used when a face texture cannot be loaded.
pub const FALLBACK_FACE_COLORS: [Rgb; 6] = [
    Rgb::new(255, 0, 0),   // Red
    Rgb::new(0, 255, 0),   // Green
    Rgb::new(0, 0, 255),   // Blue
    Rgb::new(255, 255, 0), // Yellow
    Rgb::new(255, 0, 255), // Magenta
    Rgb::new(0, 255, 255), // Cyan
];

/// Decoded RGB image sampled with nearest-neighbour lookup and repeat wrap.
#[derive(Clone, Debug)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pixels: Arc<Vec<Rgb>>,
}

impl Texture {
    /// A 1x1 texture of a single colour.
    pub fn solid(color: Rgb) -> Self {
        Self::from_pixels(1, 1, vec![color])
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb>) -> Self {
        debug_assert_eq!(width * height, pixels.len());
        Self {
            width,
            height,
            pixels: Arc::new(pixels),
        }
    }

    /// Decodes an image file.
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?
            .to_rgb8();
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|p| Rgb::new(p[0], p[1], p[2]))
            .collect();
        Ok(Self::from_pixels(width as usize, height as usize, pixels))
    }

    /// Decodes an image file, or falls back to a solid colour.
    pub fn load_or(path: &Path, fallback: Rgb) -> Self {
        match Self::load(path) {
            Ok(texture) => {
                log::debug!(
                    "Loaded texture {} ({}x{})",
                    path.display(),
                    texture.width,
                    texture.height
                );
                texture
            }
            Err(err) => {
                log::warn!("{:#}", err);
                Self::solid(fallback)
            }
        }
    }

    pub fn is_solid(&self) -> bool {
        self.pixels.len() == 1
    }

    /// Samples at `(u, v)`, wrapping outside `[0, 1)`. `v = 0` is the top row.
    pub fn sample(&self, u: f32, v: f32) -> Rgb {
        let x = (u.rem_euclid(1.0) * self.width as f32) as usize;
        let y = (v.rem_euclid(1.0) * self.height as f32) as usize;
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[y * self.width + x]
    }
}

/// Loads the six face textures from `base`. Missing files become solid
/// fallback colours.
pub fn load_face_materials(base: &Path, names: &[String; 6]) -> Vec<FaceMaterial> {
    names
        .iter()
        .zip(FALLBACK_FACE_COLORS)
        .map(|(name, fallback)| FaceMaterial {
            name: name.clone(),
            texture: Texture::load_or(&base.join(name), fallback),
        })
        .collect()
}

/// Loads the water normal map, if it can be read.
pub fn load_water_normals(base: &Path, name: &str) -> Option<Texture> {
    let path = base.join(name);
    match Texture::load(&path) {
        Ok(texture) => Some(texture),
        Err(err) => {
            log::warn!("{:#}; using procedural waves", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        Texture::from_pixels(
            2,
            2,
            vec![Rgb::WHITE, Rgb::BLACK, Rgb::BLACK, Rgb::new(1, 2, 3)],
        )
    }

    #[test]
    fn test_sample_corners() {
        let tex = checker();
        assert_eq!(tex.sample(0.0, 0.0), Rgb::WHITE);
        assert_eq!(tex.sample(0.75, 0.0), Rgb::BLACK);
        assert_eq!(tex.sample(0.99, 0.99), Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_sample_wraps() {
        let tex = checker();
        assert_eq!(tex.sample(1.0, 1.0), tex.sample(0.0, 0.0));
        assert_eq!(tex.sample(-0.25, 0.25), tex.sample(0.75, 0.25));
    }

    #[test]
    fn test_missing_assets_keep_face_order() {
        let names = crate::config::CubeConfig::default().faces;
        let materials = load_face_materials(Path::new("/nonexistent"), &names);
        assert_eq!(materials.len(), 6);
        assert_eq!(materials[1].name, "github.jpg");
        assert_eq!(materials[2].texture.sample(0.5, 0.5), FALLBACK_FACE_COLORS[2]);
        assert!(load_water_normals(Path::new("/nonexistent"), "waternormals.jpg").is_none());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tex = Texture::load_or(Path::new("/nonexistent/face.jpg"), Rgb::new(9, 9, 9));
        assert!(tex.is_solid());
        assert_eq!(tex.sample(0.3, 0.7), Rgb::new(9, 9, 9));
    }
}
