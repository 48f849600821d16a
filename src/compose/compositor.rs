use std::path::Path;

use crate::{
    assets::{color::parse_hex, decode::load_optional_image, font::resolve_font_source},
    compose::config::{CardConfig, LayerSpecs},
    effects::chain::EffectChain,
    encode::export,
    foundation::{
        core::{Canvas, CanvasSize},
        error::{CardError, CardResult},
    },
    layout::{
        geometry::{ScaleAction, cover_source_crop, resolve_fill_scale, resolve_named_anchor},
        text_block::{HAlign, VAlign, wrap_width},
    },
    render::{
        backend::{RasterBackend, create_backend},
        text::TextDraw,
    },
};

/// Last layer drawn onto the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Empty,
    BackgroundDrawn,
    OverlayDrawn,
    TextDrawn,
    LogoDrawn,
    Finalized,
}

/// Builds one card at a time: background, overlay, text, logo.
///
/// [`Compositor::make`] runs the layers in that order. The step methods can also be called one
/// by one after [`Compositor::create_canvas`], in any order, to customize a render. A compositor
/// may be reused for sequential renders; every `create_canvas` starts from a fresh canvas.
pub struct Compositor {
    specs: LayerSpecs,
    backend: Box<dyn RasterBackend>,
    canvas: Option<Canvas>,
    stage: Stage,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("specs", &self.specs)
            .field("stage", &self.stage)
            .field("has_canvas", &self.canvas.is_some())
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Compositor on the backend selected by `config.driver`.
    pub fn new(config: &CardConfig) -> Self {
        Self::with_backend(config, create_backend(config.driver))
    }

    pub fn with_backend(config: &CardConfig, backend: Box<dyn RasterBackend>) -> Self {
        Self {
            specs: config.split(),
            backend,
            canvas: None,
            stage: Stage::Empty,
        }
    }

    pub fn specs(&self) -> &LayerSpecs {
        &self.specs
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The canvas being built, if `create_canvas` has run.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Render every layer in canonical order.
    ///
    /// `background` replaces the configured background path for this and later renders.
    #[tracing::instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub fn make(&mut self, text: &str, background: Option<&Path>) -> CardResult<&mut Self> {
        if let Some(path) = background {
            self.specs.background.source = Some(path.to_path_buf());
        }
        self.create_canvas()?
            .draw_background()?
            .draw_overlay()?
            .draw_text(text)?
            .draw_logo()
    }

    /// Allocate a fresh canvas filled with the background color, discarding any previous one.
    pub fn create_canvas(&mut self) -> CardResult<&mut Self> {
        let cfg = &self.specs.canvas;
        let fill = parse_hex(&cfg.background_color)?;
        let size = CanvasSize::new(cfg.width, cfg.height)?;
        tracing::debug!(width = size.width, height = size.height, "creating canvas");
        self.canvas = Some(self.backend.create_canvas(size, fill));
        self.stage = Stage::Empty;
        Ok(self)
    }

    /// Place the background image, cover-scaled when `fill` is set and filtered by the effect
    /// chain. A missing or unreadable image leaves the solid fill in place.
    #[tracing::instrument(skip(self))]
    pub fn draw_background(&mut self) -> CardResult<&mut Self> {
        let Self {
            specs,
            backend,
            canvas,
            stage,
        } = self;
        let canvas = require_canvas(canvas, "draw_background")?;
        let spec = &specs.background;

        let Some(mut img) =
            load_optional_image(spec.source.as_deref(), |p| backend.decode_image(p))
        else {
            tracing::debug!("no background image, keeping solid fill");
            *stage = Stage::BackgroundDrawn;
            return Ok(self);
        };

        if spec.fill {
            let (cw, ch) = (canvas.width(), canvas.height());
            if resolve_fill_scale(img.width(), img.height(), cw, ch)? != ScaleAction::Keep {
                // Only the part left on the canvas after centering is resampled.
                let crop = cover_source_crop(img.width(), img.height(), cw, ch)?;
                tracing::debug!(
                    from_w = img.width(),
                    from_h = img.height(),
                    crop_x = crop.x,
                    crop_y = crop.y,
                    crop_w = crop.width,
                    crop_h = crop.height,
                    "cover-scaling background"
                );
                img = backend.scale(&backend.crop(&img, crop), cw, ch);
            }
        }

        EffectChain::from_specs(&spec.effects).apply(&**backend, &mut img)?;
        backend.place_centered(canvas, &img);
        *stage = Stage::BackgroundDrawn;
        Ok(self)
    }

    /// Blend the overlay color across the whole canvas. Alphas outside `(0, 1)` skip the layer.
    #[tracing::instrument(skip(self))]
    pub fn draw_overlay(&mut self) -> CardResult<&mut Self> {
        let Self {
            specs,
            backend,
            canvas,
            stage,
        } = self;
        let canvas = require_canvas(canvas, "draw_overlay")?;
        let spec = &specs.overlay;

        if spec.is_visible() {
            let color = parse_hex(&spec.color)?.with_alpha(spec.alpha);
            let rect = kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(canvas.width()),
                f64::from(canvas.height()),
            );
            backend.draw_filled_rect(canvas, rect, color);
        } else {
            tracing::debug!(alpha = spec.alpha, "overlay alpha outside (0, 1), skipping");
        }
        *stage = Stage::OverlayDrawn;
        Ok(self)
    }

    /// Draw `text` as a wrapped, aligned block around the configured anchor.
    #[tracing::instrument(skip(self, text))]
    pub fn draw_text(&mut self, text: &str) -> CardResult<&mut Self> {
        let Self {
            specs,
            backend,
            canvas,
            stage,
        } = self;
        let canvas = require_canvas(canvas, "draw_text")?;
        let spec = &specs.text;

        let draw = TextDraw {
            text,
            anchor_x: spec.x as f32,
            anchor_y: spec.y as f32,
            font: resolve_font_source(spec.font_path.as_deref()),
            color: parse_hex(&spec.color)?,
            size_px: spec.font_size as f32,
            h_align: spec.h_align.parse::<HAlign>()?,
            v_align: spec.v_align.parse::<VAlign>()?,
            line_height: spec.line_height,
            wrap_width: wrap_width(spec.wrap_width),
        };
        backend.draw_text(canvas, &draw)?;
        *stage = Stage::TextDrawn;
        Ok(self)
    }

    /// Place the logo at its symbolic position with offsets and opacity. A missing or
    /// unreadable logo is skipped.
    #[tracing::instrument(skip(self))]
    pub fn draw_logo(&mut self) -> CardResult<&mut Self> {
        let Self {
            specs,
            backend,
            canvas,
            stage,
        } = self;
        let canvas = require_canvas(canvas, "draw_logo")?;
        let spec = &specs.logo;

        if let Some(img) = load_optional_image(spec.source.as_deref(), |p| backend.decode_image(p))
        {
            let (x, y) = resolve_named_anchor(
                &spec.position,
                canvas.width(),
                canvas.height(),
                img.width(),
                img.height(),
                spec.offset_x,
                spec.offset_y,
            )?;
            tracing::debug!(x, y, position = %spec.position, "placing logo");
            backend.place_at(canvas, &img, x, y, spec.opacity_fraction());
        } else {
            tracing::debug!("no logo image, skipping");
        }
        *stage = Stage::LogoDrawn;
        Ok(self)
    }

    /// Write the current canvas. `Ok(false)` when nothing has been rendered yet or the
    /// extension is not supported.
    pub fn save(&self, path: &Path) -> CardResult<bool> {
        let Some(canvas) = self.canvas.as_ref() else {
            tracing::debug!(path = %path.display(), "save before render, nothing written");
            return Ok(false);
        };
        export::save(self.backend.as_ref(), canvas, path)
    }

    /// Freeze the canvas into a finished card.
    pub fn finish(self) -> CardResult<RenderedCard> {
        let canvas = self
            .canvas
            .ok_or_else(|| CardError::validation("finish called before create_canvas"))?;
        Ok(RenderedCard {
            canvas,
            backend: self.backend,
        })
    }
}

/// An immutable, fully composited card.
pub struct RenderedCard {
    canvas: Canvas,
    backend: Box<dyn RasterBackend>,
}

impl RenderedCard {
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn stage(&self) -> Stage {
        Stage::Finalized
    }

    pub fn save(&self, path: &Path) -> CardResult<bool> {
        export::save(self.backend.as_ref(), &self.canvas, path)
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }
}

fn require_canvas<'a>(canvas: &'a mut Option<Canvas>, step: &str) -> CardResult<&'a mut Canvas> {
    canvas
        .as_mut()
        .ok_or_else(|| CardError::validation(format!("{step} called before create_canvas")))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
