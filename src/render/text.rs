use std::collections::HashMap;

use crate::{
    assets::font::{self, FontBytes, FontSource},
    effects::composite::over_in_place,
    foundation::{
        core::{Canvas, Rgb8},
        error::{CardError, CardResult},
    },
    layout::text_block::{BlockStyle, FontExtents, HAlign, VAlign},
};

/// One text layer request.
#[derive(Clone, Debug)]
pub struct TextDraw<'a> {
    pub text: &'a str,
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub font: FontSource,
    pub color: Rgb8,
    pub size_px: f32,
    pub h_align: HAlign,
    pub v_align: VAlign,
    /// Baseline distance as a multiple of `size_px`.
    pub line_height: f32,
    /// Maximum line width in pixels; `None` disables wrapping.
    pub wrap_width: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

struct LoadedFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// A positioned glyph run ready for rasterization.
struct PlacedRun {
    size_px: f32,
    brush: TextBrushRgba8,
    glyphs: Vec<vello_cpu::Glyph>,
}

/// Stateful helper: Parley shapes and wraps, `vello_cpu` rasterizes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    fonts: HashMap<FontSource, Option<LoadedFont>>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
        }
    }

    /// Draw `draw` onto the canvas. Without any usable font the layer is skipped.
    pub fn draw(&mut self, canvas: &mut Canvas, draw: &TextDraw<'_>) -> CardResult<()> {
        if !draw.size_px.is_finite() || draw.size_px <= 0.0 {
            return Err(CardError::validation(
                "text font size must be finite and > 0",
            ));
        }
        if draw.text.trim().is_empty() {
            tracing::debug!("empty text, nothing to draw");
            return Ok(());
        }

        if !self.fonts.contains_key(&draw.font) {
            let loaded = self.resolve(&draw.font);
            self.fonts.insert(draw.font.clone(), loaded);
        }
        let Some(Some(loaded)) = self.fonts.get(&draw.font) else {
            tracing::warn!(font = ?draw.font, "no usable font available, skipping text layer");
            return Ok(());
        };
        let family = loaded.family.clone();
        let font_data = loaded.data.clone();

        let brush = TextBrushRgba8 {
            r: draw.color.r,
            g: draw.color.g,
            b: draw.color.b,
            a: 255,
        };
        let runs = self.layout_runs(draw, &family, brush);
        if runs.is_empty() {
            return Ok(());
        }

        let width: u16 = canvas
            .width()
            .try_into()
            .map_err(|_| CardError::validation("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height()
            .try_into()
            .map_err(|_| CardError::validation("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        for run in runs {
            let TextBrushRgba8 { r, g, b, a } = run.brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.glyph_run(&font_data)
                .font_size(run.size_px)
                .fill_glyphs(run.glyphs.into_iter());
        }
        ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut layer);
        over_in_place(canvas.data_mut(), layer.data_as_u8_slice(), 1.0)
    }

    fn resolve(&mut self, source: &FontSource) -> Option<LoadedFont> {
        let bytes = font::load_font(source)?;
        match self.register(bytes) {
            Ok(loaded) => Some(loaded),
            Err(err) => {
                tracing::warn!(font = ?source, error = %err, "font not usable");
                match source {
                    FontSource::File(_) => self.resolve(&FontSource::SystemDefault),
                    FontSource::SystemDefault => None,
                }
            }
        }
    }

    fn register(&mut self, bytes: FontBytes) -> CardResult<LoadedFont> {
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::new(bytes.data.clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CardError::validation("no font families registered from font bytes")
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::validation("registered font family has no name"))?
            .to_string();
        tracing::debug!(family = %family, "registered text font");

        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::new(bytes.data),
            bytes.index,
        );
        Ok(LoadedFont { family, data })
    }

    // Shape and wrap with Parley, then move every line to the origin chosen by `BlockStyle`.
    fn layout_runs(
        &mut self,
        draw: &TextDraw<'_>,
        family: &str,
        brush: TextBrushRgba8,
    ) -> Vec<PlacedRun> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, draw.text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_owned())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(draw.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(draw.text);
        layout.break_all_lines(draw.wrap_width);
        layout.align(
            draw.wrap_width,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let mut extents = None;
        let mut lines = Vec::new();
        for line in layout.lines() {
            let mut runs = Vec::new();
            let mut min_x = f32::INFINITY;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                min_x = min_x.min(run.offset());
                if extents.is_none() {
                    let m = run.run().metrics();
                    extents = Some(FontExtents {
                        ascent: m.ascent,
                        descent: m.descent.abs(),
                    });
                }
                let baseline = run.baseline();
                let glyphs: Vec<(u32, f32, f32)> = run
                    .positioned_glyphs()
                    .map(|g| (g.id, g.x, g.y - baseline))
                    .collect();
                runs.push((run.run().font_size(), run.style().brush, glyphs));
            }
            if runs.is_empty() {
                // Blank line: keeps its slot in the block.
                lines.push((0.0, 0.0, runs));
            } else {
                // A wrapped line keeps its break space; alignment measures the visible text only.
                let m = line.metrics();
                let visible = (m.advance - m.trailing_whitespace).max(0.0);
                lines.push((min_x, visible, runs));
            }
        }

        let extents = extents.unwrap_or(FontExtents {
            ascent: draw.size_px * 0.8,
            descent: draw.size_px * 0.2,
        });
        let style = BlockStyle {
            anchor_x: draw.anchor_x,
            anchor_y: draw.anchor_y,
            font_size: draw.size_px,
            line_height: draw.line_height,
            h_align: draw.h_align,
            v_align: draw.v_align,
        };
        let advances: Vec<f32> = lines.iter().map(|(_, w, _)| *w).collect();
        let origins = style.place_lines(&advances, extents);

        let mut placed = Vec::new();
        for ((min_x, _, runs), origin) in lines.into_iter().zip(origins) {
            for (size_px, brush, glyphs) in runs {
                placed.push(PlacedRun {
                    size_px,
                    brush,
                    glyphs: glyphs
                        .into_iter()
                        .map(|(id, x, dy)| vello_cpu::Glyph {
                            id,
                            x: x - min_x + origin.x,
                            y: origin.baseline + dy,
                        })
                        .collect(),
                });
            }
        }
        placed
    }
}
