use std::path::Path;

use anyhow::Context;

use crate::{
    assets::font,
    foundation::{
        core::Rgba8Premul,
        error::{CardError, CardResult},
    },
};

/// Largest edge an SVG resource may rasterize to.
const MAX_SVG_DIM: u32 = 16_384;

/// Return `true` when `path` names an existing regular file.
pub fn resource_exists(path: &Path) -> bool {
    path.is_file()
}

/// Decode an image file into straight-alpha RGBA8.
///
/// Files with an `.svg` extension are rasterized at their intrinsic size; everything else goes
/// through `image`'s format sniffing.
pub fn decode_image(path: &Path) -> CardResult<image::RgbaImage> {
    if is_svg(path) {
        let bytes =
            std::fs::read(path).with_context(|| format!("read svg '{}'", path.display()))?;
        return rasterize_svg(&bytes, path.parent());
    }

    let dyn_img = image::ImageReader::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("sniff image format '{}'", path.display()))?
        .decode()
        .with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(dyn_img.to_rgba8())
}

/// Load an optional image resource with `decode`.
///
/// A missing path, a nonexistent file, or an undecodable file all yield `None`; only the last is
/// logged as a warning.
pub fn load_optional_image<F>(path: Option<&Path>, decode: F) -> Option<image::RgbaImage>
where
    F: FnOnce(&Path) -> CardResult<image::RgbaImage>,
{
    let path = path?;
    if !resource_exists(path) {
        tracing::debug!(path = %path.display(), "optional image not found, skipping");
        return None;
    }
    match decode(path) {
        Ok(img) => Some(img),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "optional image unreadable, skipping");
            None
        }
    }
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Parse SVG bytes and rasterize them at the document's intrinsic size.
pub fn rasterize_svg(bytes: &[u8], resources_dir: Option<&Path>) -> CardResult<image::RgbaImage> {
    let opts = usvg::Options {
        resources_dir: resources_dir.map(Path::to_path_buf),
        fontdb: font::system_fontdb(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let (width, height) = svg_raster_size(&tree)?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CardError::validation("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    let mut straight = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.data().chunks_exact(4) {
        let p = Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        };
        straight.extend_from_slice(&p.to_straight_rgba());
    }
    image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| CardError::validation("svg raster byte length mismatch"))
}

fn svg_raster_size(tree: &usvg::Tree) -> CardResult<(u32, u32)> {
    fn to_px(v: f32) -> CardResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(CardError::validation("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let w = to_px(size.width())?;
    let h = to_px(size.height())?;
    if w > MAX_SVG_DIM || h > MAX_SVG_DIM {
        return Err(CardError::validation(format!(
            "svg raster size too large: {w}x{h} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
