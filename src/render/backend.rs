use std::path::Path;

use crate::{
    effects::chain::Effect,
    encode::export::ExportFormat,
    foundation::{
        core::{Canvas, CanvasSize, Rgb8, Rgba8Premul},
        error::CardResult,
    },
    layout::geometry::SourceCrop,
    render::text::TextDraw,
};

/// Pixel-level capabilities the compositor drives.
///
/// The compositor owns the ordering and geometry of a render; a backend owns allocation,
/// decoding, resampling, filter math, glyph rasterization and encoding.
pub trait RasterBackend {
    /// Allocate a canvas filled with an opaque color.
    fn create_canvas(&self, size: CanvasSize, fill: Rgb8) -> Canvas {
        Canvas::filled(size, fill.opaque())
    }

    /// Decode an image file into straight-alpha RGBA8.
    fn decode_image(&self, path: &Path) -> CardResult<image::RgbaImage>;

    /// Copy out the `crop` region of `img`.
    fn crop(&self, img: &image::RgbaImage, crop: SourceCrop) -> image::RgbaImage {
        image::imageops::crop_imm(img, crop.x, crop.y, crop.width, crop.height).to_image()
    }

    /// Resample `img` to exactly `width`x`height`.
    fn scale(&self, img: &image::RgbaImage, width: u32, height: u32) -> image::RgbaImage;

    /// Run one filter in place.
    fn apply_effect(&self, img: &mut image::RgbaImage, effect: &Effect) -> CardResult<()>;

    /// Composite `img` centered on the canvas, cropping any overflow.
    fn place_centered(&self, canvas: &mut Canvas, img: &image::RgbaImage);

    /// Composite `img` with its top-left at `(x, y)`; `opacity` is in `[0, 1]`.
    fn place_at(&self, canvas: &mut Canvas, img: &image::RgbaImage, x: i64, y: i64, opacity: f32);

    /// Blend a solid color over a pixel rectangle.
    fn draw_filled_rect(&self, canvas: &mut Canvas, rect: kurbo::Rect, color: Rgba8Premul);

    /// Shape, wrap, align and rasterize text onto the canvas.
    fn draw_text(&mut self, canvas: &mut Canvas, draw: &TextDraw<'_>) -> CardResult<()>;

    /// Encode the canvas and write it to `path`.
    fn encode_and_write(&self, canvas: &Canvas, path: &Path, format: ExportFormat)
    -> CardResult<()>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BackendKind {
    /// CPU raster backend: `image` for pixels, `parley` + `vello_cpu` for text.
    #[default]
    #[serde(rename = "cpu", alias = "gd", alias = "imagick")]
    Cpu,
}

/// Create a backend implementation.
pub fn create_backend(kind: BackendKind) -> Box<dyn RasterBackend> {
    match kind {
        BackendKind::Cpu => Box::new(crate::render::cpu::CpuBackend::new()),
    }
}
