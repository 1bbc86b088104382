//! Linear image buffer and 8-bit conversion.

use crate::shading::Color;

/// Encode a linear value with `1 / gamma`.
#[inline]
pub fn linear_to_gamma(linear: f32, gamma: f32) -> f32 {
    if linear > 0.0 {
        linear.powf(1.0 / gamma)
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color, gamma: f32) -> [u8; 4] {
    let quantize = |c: f32| (255.0 * linear_to_gamma(c, gamma).clamp(0.0, 1.0)).round() as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z), 255]
}

/// Row-major image of linear colours, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Reset every pixel to black.
    pub fn clear(&mut self) {
        self.pixels.fill(Color::ZERO);
    }

    /// Convert to RGBA bytes with the given output gamma.
    pub fn to_rgba8(&self, gamma: f32) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color, gamma));
        }
        bytes
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
