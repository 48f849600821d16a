use crate::foundation::error::{CardError, CardResult};

/// Largest canvas edge the glyph rasterizer accepts.
pub const MAX_CANVAS_DIM: u32 = u16::MAX as u32;

/// Opaque sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque premultiplied form (identical channels, alpha 255).
    pub fn opaque(self) -> Rgba8Premul {
        Rgba8Premul {
            r: self.r,
            g: self.g,
            b: self.b,
            a: 255,
        }
    }

    /// Premultiplied form with a straight alpha in `[0, 1]`.
    pub fn with_alpha(self, alpha: f32) -> Rgba8Premul {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, a)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Convert back to straight alpha. Transparent pixels become transparent black.
    pub fn to_straight_rgba(self) -> [u8; 4] {
        if self.a == 0 {
            return [0, 0, 0, 0];
        }
        let a = u16::from(self.a);
        let unpremul = |c: u8| -> u8 { ((u16::from(c) * 255 + a / 2) / a).min(255) as u8 };
        [unpremul(self.r), unpremul(self.g), unpremul(self.b), self.a]
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Create a validated size: both edges in `1..=65535`.
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardError::validation(format!(
                "canvas size must be positive, got {width}x{height}"
            )));
        }
        if width > MAX_CANVAS_DIM || height > MAX_CANVAS_DIM {
            return Err(CardError::validation(format!(
                "canvas size {width}x{height} exceeds {MAX_CANVAS_DIM}x{MAX_CANVAS_DIM}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Premultiplied RGBA8 pixel buffer being composed for one render.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    size: CanvasSize,
    data: Vec<u8>,
}

impl Canvas {
    /// Allocate a canvas with every pixel set to `fill`.
    pub fn filled(size: CanvasSize, fill: Rgba8Premul) -> Self {
        let data = fill.to_array().repeat(size.pixel_count());
        Self { size, data }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = (y as usize * self.size.width as usize + x as usize) * 4;
        let px = &self.data[i..i + 4];
        Some(Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }

    /// Straight-alpha copy suitable for encoders.
    pub fn to_rgba_image(&self) -> CardResult<image::RgbaImage> {
        let mut straight = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let p = Rgba8Premul {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            };
            straight.extend_from_slice(&p.to_straight_rgba());
        }
        image::RgbaImage::from_raw(self.size.width, self.size.height, straight)
            .ok_or_else(|| CardError::validation("canvas byte length does not match its size"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
