use std::path::Path;

use anyhow::Context;

use crate::{
    assets::decode,
    effects::{
        chain::Effect,
        composite::{blit_over, fill_rect_over},
        ops,
    },
    encode::export::ExportFormat,
    foundation::{
        core::{Canvas, Rgba8Premul},
        error::{CardError, CardResult},
    },
    layout::geometry::{Position, resolve_anchor},
    render::{
        backend::RasterBackend,
        text::{TextDraw, TextLayoutEngine},
    },
};

/// CPU raster backend built on `image`, with Parley and `vello_cpu` for text.
pub struct CpuBackend {
    text: TextLayoutEngine,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBackend {
    pub fn new() -> Self {
        Self {
            text: TextLayoutEngine::new(),
        }
    }
}

impl RasterBackend for CpuBackend {
    fn decode_image(&self, path: &Path) -> CardResult<image::RgbaImage> {
        decode::decode_image(path)
    }

    fn scale(&self, img: &image::RgbaImage, width: u32, height: u32) -> image::RgbaImage {
        if img.width() == width && img.height() == height {
            return img.clone();
        }
        image::imageops::resize(img, width, height, image::imageops::FilterType::Lanczos3)
    }

    fn apply_effect(&self, img: &mut image::RgbaImage, effect: &Effect) -> CardResult<()> {
        match *effect {
            Effect::Brightness(level) => ops::brightness(img, level),
            Effect::Contrast(level) => ops::contrast(img, level),
            Effect::Gamma(g) => ops::gamma(img, g),
            Effect::Colorize { red, green, blue } => ops::colorize(img, red, green, blue),
            Effect::Greyscale => ops::greyscale(img),
            Effect::Flop => ops::flop(img),
            Effect::Flip => ops::flip(img),
            Effect::Blur(amount) => ops::blur(img, amount)?,
            Effect::Sharpen(amount) => ops::sharpen(img, amount)?,
            Effect::Invert => ops::invert(img),
            Effect::Pixelate(size) => ops::pixelate(img, size),
            Effect::ReduceColors { limit, background } => {
                ops::reduce_colors(img, limit, background)
            }
        }
        Ok(())
    }

    fn place_centered(&self, canvas: &mut Canvas, img: &image::RgbaImage) {
        let (x, y) = resolve_anchor(
            Position::Center,
            canvas.width(),
            canvas.height(),
            img.width(),
            img.height(),
            0,
            0,
        );
        blit_over(canvas, img, x, y, 1.0);
    }

    fn place_at(&self, canvas: &mut Canvas, img: &image::RgbaImage, x: i64, y: i64, opacity: f32) {
        blit_over(canvas, img, x, y, opacity);
    }

    fn draw_filled_rect(&self, canvas: &mut Canvas, rect: kurbo::Rect, color: Rgba8Premul) {
        fill_rect_over(canvas, rect, color);
    }

    fn draw_text(&mut self, canvas: &mut Canvas, draw: &TextDraw<'_>) -> CardResult<()> {
        self.text.draw(canvas, draw)
    }

    fn encode_and_write(
        &self,
        canvas: &Canvas,
        path: &Path,
        format: ExportFormat,
    ) -> CardResult<()> {
        let rgba = canvas.to_rgba_image()?;
        let result = match format {
            ExportFormat::Png => rgba.save_with_format(path, image::ImageFormat::Png),
            ExportFormat::WebP => rgba.save_with_format(path, image::ImageFormat::WebP),
            ExportFormat::Jpeg => image::DynamicImage::ImageRgba8(rgba)
                .to_rgb8()
                .save_with_format(path, image::ImageFormat::Jpeg),
        };
        result
            .with_context(|| format!("write {}", path.display()))
            .map_err(|e| CardError::encode(format!("{e:#}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
