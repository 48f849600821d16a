use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::Context;

use crate::foundation::error::CardResult;

/// Where the text layer's font comes from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontSource {
    /// A font file supplied by the caller.
    File(PathBuf),
    /// The system's default sans-serif face.
    SystemDefault,
}

/// Raw font file bytes plus the face index inside them.
#[derive(Clone, Debug)]
pub struct FontBytes {
    pub data: Arc<Vec<u8>>,
    pub index: u32,
}

/// Pick the caller's font when it exists, otherwise the system default.
pub fn resolve_font_source(path: Option<&Path>) -> FontSource {
    match path {
        Some(p) if p.is_file() => FontSource::File(p.to_path_buf()),
        Some(p) => {
            tracing::debug!(path = %p.display(), "font file not found, using default font");
            FontSource::SystemDefault
        }
        None => FontSource::SystemDefault,
    }
}

/// Load font bytes for `source`.
///
/// An unreadable custom font falls back to the system default. `None` means no usable face was
/// found anywhere.
pub fn load_font(source: &FontSource) -> Option<FontBytes> {
    if let FontSource::File(path) = source {
        match read_font_file(path) {
            Ok(data) => {
                return Some(FontBytes {
                    data: Arc::new(data),
                    index: 0,
                });
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "font unreadable, using default font");
            }
        }
    }
    default_font()
}

fn read_font_file(path: &Path) -> CardResult<Vec<u8>> {
    let data =
        std::fs::read(path).with_context(|| format!("read font file '{}'", path.display()))?;
    Ok(data)
}

fn default_font() -> Option<FontBytes> {
    let db = system_fontdb();
    let families = [
        usvg::fontdb::Family::SansSerif,
        usvg::fontdb::Family::Serif,
        usvg::fontdb::Family::Monospace,
    ];
    let query = usvg::fontdb::Query {
        families: &families,
        weight: usvg::fontdb::Weight::NORMAL,
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };
    let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
    db.with_face_data(id, |data, index| FontBytes {
        data: Arc::new(data.to_vec()),
        index,
    })
}

/// Process-wide font database populated from the system font directories.
pub fn system_fontdb() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Arc::new(db)
    })
    .clone()
}
