use std::path::Path;

use crate::{
    foundation::{core::Canvas, error::CardResult},
    render::backend::RasterBackend,
};

/// Output encodings a card can be written as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Png,
    Jpeg,
    WebP,
}

impl ExportFormat {
    /// Map the text after the path's final `.` (case-folded) to a format.
    ///
    /// Only `png`, `jpg` and `webp` are recognized; anything else, including a path
    /// without a `.`, yields `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let s = path.to_string_lossy();
        let (_, ext) = s.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// The `image` crate's format tag, for callers that inspect written files.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Encode `canvas` to `path` in the format named by its extension.
///
/// Returns `Ok(false)` without touching the filesystem when the extension is not supported.
/// Backend encode/write failures propagate.
pub fn save(backend: &dyn RasterBackend, canvas: &Canvas, path: &Path) -> CardResult<bool> {
    let Some(format) = ExportFormat::from_path(path) else {
        tracing::warn!(path = %path.display(), "unsupported output extension, nothing written");
        return Ok(false);
    };
    backend.encode_and_write(canvas, path, format)?;
    tracing::info!(
        path = %path.display(),
        format = format.extension(),
        width = canvas.width(),
        height = canvas.height(),
        "card written"
    );
    Ok(true)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
