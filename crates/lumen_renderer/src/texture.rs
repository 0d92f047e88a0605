//! In-memory textures sampled by materials.
//!
//! Pixels are stored in linear RGB. Decoding image files is left to the
//! caller; the demo shows one way to fill a texture.

use crate::{Color, RenderError, RenderResult};

/// A texture with linear RGB pixel data.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    /// Row-major, top row first
    pixels: Vec<Color>,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidTexture(format!(
                "texture size {width}x{height} is empty"
            )));
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RenderError::InvalidTexture(format!(
                "expected {expected} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
        }
    }

    /// Checkerboard of `cells x cells` squares alternating `a` and `b`.
    pub fn checker(cells: u32, a: Color, b: Color) -> Self {
        let cells = cells.max(1);
        let pixels = (0..cells)
            .flat_map(|y| (0..cells).map(move |x| if (x + y) % 2 == 0 { a } else { b }))
            .collect();
        Self {
            width: cells,
            height: cells,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample the texture at UV coordinates (bilinear filtering).
    ///
    /// Coordinates wrap; `(0, 0)` is the bottom-left corner.
    pub fn sample(&self, u: f64, v: f64) -> Color {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        let x = u * (self.width - 1) as f64;
        let y = (1.0 - v) * (self.height - 1) as f64; // Flip V for image rows

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x.fract();
        let fy = y.fract();

        let top = self.get_pixel(x0, y0).lerp(self.get_pixel(x1, y0), fx);
        let bottom = self.get_pixel(x0, y1).lerp(self.get_pixel(x1, y1), fx);
        top.lerp(bottom, fy)
    }

    /// Pixel at integer coordinates, clamped to the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }
}
