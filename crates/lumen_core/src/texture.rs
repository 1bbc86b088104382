//! Texture loading, caching and filtered lookup for materials.
//!
//! Texels are stored as raw (display-encoded) RGBA in the 0-1 range. Gamma
//! decoding happens at lookup time in [`crate::Material::sample_albedo`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumen_math::{Vec2, Vec4};
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture data has {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Texture must be at least 1x1, got {0}x{1}")]
    Empty(u32, u32),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A 2D RGBA texture.
///
/// Row 0 is the bottom of the image (v = 0), matching OBJ texture
/// coordinates.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data, row-major, bottom row first
    pub pixels: Vec<Vec4>,
}

impl Texture {
    /// Create a solid color texture (1x1).
    pub fn solid(color: Vec4) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
        }
    }

    /// Create a texture from 8-bit RGBA bytes, bottom row first.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(width, height));
        }

        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Vec4::new(p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32) / 255.0)
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Load a texture from an image file.
    ///
    /// The image is flipped so that its bottom row becomes row 0.
    pub fn load(path: &Path) -> TextureResult<Self> {
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let rgba = image::imageops::flip_vertical(&img.to_rgba8());
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.as_raw())
    }

    /// Get the texel at integer coordinates.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> Vec4 {
        self.pixels[y * self.width as usize + x]
    }

    /// Sample the texture with bilinear filtering and wraparound addressing.
    ///
    /// Texel centres sit at half-integer coordinates. Textures with a single
    /// row or column always return texel (0, 0).
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        if self.width == 1 || self.height == 1 {
            return self.at(0, 0);
        }

        let width = self.width as usize;
        let height = self.height as usize;

        let x = fract(uv.x) * width as f32 - 0.5;
        let y = fract(uv.y) * height as f32 - 0.5;

        // floor(x) >= -1, so adding the size keeps the index non-negative
        let xmin = (x.floor() as isize + width as isize) as usize % width;
        let ymin = (y.floor() as isize + height as isize) as usize % height;
        let xmax = (xmin + 1) % width;
        let ymax = (ymin + 1) % height;

        let xfrac = fract(x);
        let yfrac = fract(y);

        let left = self.at(xmin, ymin).lerp(self.at(xmin, ymax), yfrac);
        let right = self.at(xmax, ymin).lerp(self.at(xmax, ymax), yfrac);
        left.lerp(right, xfrac)
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Vec4>()
    }
}

/// GLSL-style fractional part, always in [0, 1).
#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Cache for loaded textures.
///
/// Scene files often reference the same image from several materials.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<PathBuf, Arc<Texture>>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &Path) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let texture = Arc::new(Texture::load(path)?);
        self.textures.insert(path.to_path_buf(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path.display(),
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
