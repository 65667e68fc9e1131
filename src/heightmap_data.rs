// src/heightmap_data.rs
use image::GrayImage;
use std::path::Path;

/// Ground dimensions in world units; the mesh is centred on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightmapOptions {
    pub width: f32,
    pub depth: f32,
    /// Quads per side.
    pub subdivisions: u32,
    pub min_height: f32,
    pub max_height: f32,
    /// Texture repeats across the whole ground.
    pub uv_scale: f32,
}

#[derive(thiserror::Error, Debug)]
pub enum TerrainError {
    #[error("failed to open heightmap '{path}': {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("heightmap '{0}' has no pixels")]
    Empty(String),
}

/// Grayscale height source. Black maps to `min_height`, white to `max_height`.
#[derive(Clone)]
pub struct Heightmap {
    image: GrayImage,
}

impl Heightmap {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| TerrainError::Image {
                path: path.display().to_string(),
                source,
            })?
            .to_luma8();
        if image.width() == 0 || image.height() == 0 {
            return Err(TerrainError::Empty(path.display().to_string()));
        }
        Ok(Self::from_image(image))
    }

    pub fn from_image(image: GrayImage) -> Self {
        Self { image }
    }

    /// Single black pixel: a level ground at `min_height`.
    pub fn flat() -> Self {
        Self { image: GrayImage::new(1, 1) }
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Nearest-pixel height in [0, 1] at normalized `(u, v)`, `v = 0` being
    /// the top row of the image.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return 0.0;
        }
        let px = (u.clamp(0.0, 1.0) * (w - 1) as f32).round() as u32;
        let py = (v.clamp(0.0, 1.0) * (h - 1) as f32).round() as u32;
        self.image.get_pixel(px, py)[0] as f32 / 255.0
    }

    /// World height for normalized `(u, v)`.
    pub fn height(&self, u: f32, v: f32, opts: &HeightmapOptions) -> f32 {
        opts.min_height + (opts.max_height - opts.min_height) * self.sample(u, v)
    }
}
