//! Placement of a wrapped text block relative to an anchor point.
//!
//! Shaping and line breaking happen elsewhere; this module only needs each line's advance width
//! and the font's vertical metrics to decide where every line's origin lands.

use std::str::FromStr;

use crate::foundation::error::CardError;

/// Horizontal alignment of each line relative to the anchor's x.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    /// Lines start at the anchor.
    Left,
    /// Lines are centered on the anchor.
    #[default]
    Center,
    /// Lines end at the anchor.
    Right,
}

impl FromStr for HAlign {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" | "middle" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(CardError::validation(format!(
                "unknown horizontal alignment \"{s}\" (expected left, center or right)"
            ))),
        }
    }
}

/// Vertical alignment of the whole block relative to the anchor's y.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    /// Block top sits on the anchor.
    Top,
    /// Block is centered on the anchor.
    #[default]
    Middle,
    /// Block bottom sits on the anchor.
    Bottom,
}

impl FromStr for VAlign {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "middle" | "center" | "centre" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            _ => Err(CardError::validation(format!(
                "unknown vertical alignment \"{s}\" (expected top, middle or bottom)"
            ))),
        }
    }
}

/// Everything needed to position lines, independent of the glyphs themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockStyle {
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub font_size: f32,
    /// Baseline-to-baseline distance as a multiple of `font_size`.
    pub line_height: f32,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

/// Vertical font metrics in pixels, both positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontExtents {
    pub ascent: f32,
    pub descent: f32,
}

/// Left edge and baseline of one laid-out line, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineOrigin {
    pub x: f32,
    pub baseline: f32,
}

impl BlockStyle {
    pub fn line_step(&self) -> f32 {
        self.font_size * self.line_height.max(0.0)
    }

    /// Height of a block of `lines` lines.
    pub fn block_height(&self, lines: usize, extents: FontExtents) -> f32 {
        if lines == 0 {
            return 0.0;
        }
        extents.ascent + extents.descent + (lines - 1) as f32 * self.line_step()
    }

    /// Origins for lines with the given advances, in order.
    pub fn place_lines(&self, line_advances: &[f32], extents: FontExtents) -> Vec<LineOrigin> {
        let height = self.block_height(line_advances.len(), extents);
        let top = match self.v_align {
            VAlign::Top => self.anchor_y,
            VAlign::Middle => self.anchor_y - height / 2.0,
            VAlign::Bottom => self.anchor_y - height,
        };
        let first_baseline = top + extents.ascent;
        let step = self.line_step();

        line_advances
            .iter()
            .enumerate()
            .map(|(i, &advance)| {
                let x = match self.h_align {
                    HAlign::Left => self.anchor_x,
                    HAlign::Center => self.anchor_x - advance / 2.0,
                    HAlign::Right => self.anchor_x - advance,
                };
                LineOrigin {
                    x,
                    baseline: first_baseline + i as f32 * step,
                }
            })
            .collect()
    }
}

/// Wrap width in layout units; zero disables wrapping.
pub fn wrap_width(px: u32) -> Option<f32> {
    (px > 0).then_some(px as f32)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text_block.rs"]
mod tests;
