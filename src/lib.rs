//! ogcard composes fixed-size social card images (Open Graph previews).
//!
//! A card is built from four layers drawn onto one canvas:
//!
//! 1. **Background**: a solid color, optionally covered by a photo that is cover-scaled,
//!    filtered by an ordered effect chain and center-cropped.
//! 2. **Overlay**: a translucent full-canvas color wash.
//! 3. **Text**: wrapped, aligned, line-spaced body text around an anchor point.
//! 4. **Logo**: an image placed at one of nine symbolic positions with offsets and opacity.
//!
//! The finished canvas is written as PNG, JPEG or WebP depending on the output extension.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** canvas; decoded images are straight alpha until composited.
//! - Optional files (background, logo, font) that are missing or unreadable are skipped, never
//!   errors. Malformed colors and positions are errors.
//!
//! ```no_run
//! use ogcard::{CardConfig, Compositor};
//!
//! let config = CardConfig::from_json_str(r##"{ "background_color": "#1d2021" }"##)?;
//! let mut card = Compositor::new(&config);
//! card.make("Hello World", None)?;
//! card.save(std::path::Path::new("card.png"))?;
//! # Ok::<(), ogcard::CardError>(())
//! ```
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod effects;
mod encode;
mod foundation;
mod layout;
mod render;

pub use assets::color::parse_hex;
pub use assets::decode::{decode_image, load_optional_image, rasterize_svg, resource_exists};
pub use assets::font::{FontBytes, FontSource, load_font, resolve_font_source};
pub use compose::compositor::{Compositor, RenderedCard, Stage};
pub use compose::config::{
    BackgroundSpec, CanvasConfig, CardConfig, LayerSpecs, LogoSpec, OverlaySpec, TextSpec,
};
pub use effects::chain::{Effect, EffectChain, EffectSpec, effect_specs_from_json};
pub use encode::export::{ExportFormat, save};
pub use foundation::core::{Canvas, CanvasSize, MAX_CANVAS_DIM, Rgb8, Rgba8Premul};
pub use foundation::error::{CardError, CardResult};
pub use layout::geometry::{
    Position, ScaleAction, SourceCrop, cover_source_crop, resolve_anchor, resolve_fill_scale,
    resolve_named_anchor,
};
pub use layout::text_block::{BlockStyle, FontExtents, HAlign, LineOrigin, VAlign, wrap_width};
pub use render::backend::{BackendKind, RasterBackend, create_backend};
pub use render::cpu::CpuBackend;
pub use render::text::{TextBrushRgba8, TextDraw, TextLayoutEngine};
