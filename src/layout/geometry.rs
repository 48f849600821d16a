use std::str::FromStr;

use crate::foundation::error::{CardError, CardResult};

/// How a source image must be resized to cover a target area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleAction {
    /// Source already matches the target exactly.
    Keep,
    /// Resize so the width equals the target width; height follows the source ratio.
    ToWidth { width: u32, height: u32 },
    /// Resize so the height equals the target height; width follows the source ratio.
    ToHeight { width: u32, height: u32 },
}

impl ScaleAction {
    /// Resulting dimensions when applied to a `src_w`x`src_h` image.
    pub fn dimensions(self, src_w: u32, src_h: u32) -> (u32, u32) {
        match self {
            Self::Keep => (src_w, src_h),
            Self::ToWidth { width, height } | Self::ToHeight { width, height } => (width, height),
        }
    }
}

/// Cover-scale: preserve the source aspect ratio and cover the whole target, overflowing on at
/// most one axis.
///
/// All dimensions must be non-zero.
pub fn resolve_fill_scale(
    source_w: u32,
    source_h: u32,
    target_w: u32,
    target_h: u32,
) -> CardResult<ScaleAction> {
    if source_w == 0 || source_h == 0 || target_w == 0 || target_h == 0 {
        return Err(CardError::validation(format!(
            "fill scale needs positive sizes, got source {source_w}x{source_h} target {target_w}x{target_h}"
        )));
    }
    if source_w == target_w && source_h == target_h {
        return Ok(ScaleAction::Keep);
    }

    let source_ratio = f64::from(source_w) / f64::from(source_h);
    let target_ratio = f64::from(target_w) / f64::from(target_h);

    if source_ratio <= target_ratio {
        let height = proportional(target_w, source_h, source_w);
        Ok(ScaleAction::ToWidth {
            width: target_w,
            height,
        })
    } else {
        let width = proportional(target_h, source_w, source_h);
        Ok(ScaleAction::ToHeight {
            width,
            height: target_h,
        })
    }
}

// `known * num / den`, rounded, at least one pixel.
fn proportional(known: u32, num: u32, den: u32) -> u32 {
    let v = (f64::from(known) * f64::from(num) / f64::from(den)).round();
    (v as u32).max(1)
}

/// Rectangle of source pixels, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceCrop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The part of the source still visible once it is cover-scaled and centered on the target.
///
/// Resampling only this region to the target size gives the same picture as scaling the whole
/// source and cropping the overflow, without ever allocating the overflowing image.
pub fn cover_source_crop(
    source_w: u32,
    source_h: u32,
    target_w: u32,
    target_h: u32,
) -> CardResult<SourceCrop> {
    let full = SourceCrop {
        x: 0,
        y: 0,
        width: source_w,
        height: source_h,
    };
    match resolve_fill_scale(source_w, source_h, target_w, target_h)? {
        ScaleAction::Keep => Ok(full),
        ScaleAction::ToWidth { height, .. } => {
            let rows = visible_span(source_h, target_h, height);
            Ok(SourceCrop {
                y: (source_h - rows) / 2,
                height: rows,
                ..full
            })
        }
        ScaleAction::ToHeight { width, .. } => {
            let cols = visible_span(source_w, target_w, width);
            Ok(SourceCrop {
                x: (source_w - cols) / 2,
                width: cols,
                ..full
            })
        }
    }
}

// Source pixels behind `target` of `scaled` output pixels, rounded up, within `1..=source`.
fn visible_span(source: u32, target: u32, scaled: u32) -> u32 {
    let v = (u64::from(target) * u64::from(source)).div_ceil(u64::from(scaled.max(1)));
    v.clamp(1, u64::from(source)) as u32
}

/// One of the nine symbolic anchors on a rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Position {
    pub const ALL: [Position; 9] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Left,
        Self::Center,
        Self::Right,
        Self::BottomLeft,
        Self::Bottom,
        Self::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::Top => "top",
            Self::TopRight => "top-right",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::BottomLeft => "bottom-left",
            Self::Bottom => "bottom",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Anchor point inside a `w`x`h` box.
    ///
    /// Offsets push away from the anchored edge: on right/bottom anchors a positive offset moves
    /// left/up, everywhere else it moves right/down.
    fn pivot(self, w: u32, h: u32, offset_x: i32, offset_y: i32) -> (i64, i64) {
        let (w, h) = (i64::from(w), i64::from(h));
        let (ox, oy) = (i64::from(offset_x), i64::from(offset_y));
        let mid_x = half(w);
        let mid_y = half(h);
        match self {
            Self::TopLeft => (ox, oy),
            Self::Top => (mid_x + ox, oy),
            Self::TopRight => (w - ox, oy),
            Self::Left => (ox, mid_y + oy),
            Self::Center => (mid_x + ox, mid_y + oy),
            Self::Right => (w - ox, mid_y + oy),
            Self::BottomLeft => (ox, h - oy),
            Self::Bottom => (mid_x + ox, h - oy),
            Self::BottomRight => (w - ox, h - oy),
        }
    }
}

fn half(v: i64) -> i64 {
    (v as f64 / 2.0).round() as i64
}

impl FromStr for Position {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let pos = match key.as_str() {
            "top-left" | "left-top" => Self::TopLeft,
            "top" | "top-center" | "top-middle" | "center-top" | "middle-top" => Self::Top,
            "top-right" | "right-top" => Self::TopRight,
            "left" | "left-center" | "left-middle" | "center-left" | "middle-left" => Self::Left,
            "center" | "middle" | "center-center" | "middle-middle" => Self::Center,
            "right" | "right-center" | "right-middle" | "center-right" | "middle-right" => {
                Self::Right
            }
            "bottom-left" | "left-bottom" => Self::BottomLeft,
            "bottom" | "bottom-center" | "bottom-middle" | "center-bottom" | "middle-bottom" => {
                Self::Bottom
            }
            "bottom-right" | "right-bottom" => Self::BottomRight,
            _ => {
                return Err(CardError::invalid_position(format!(
                    "unknown position \"{s}\""
                )));
            }
        };
        Ok(pos)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-left pixel at which a `content_w`x`content_h` box lands when anchored at `position` on the
/// canvas and nudged by the offsets. The result may be negative or overflow the canvas.
pub fn resolve_anchor(
    position: Position,
    canvas_w: u32,
    canvas_h: u32,
    content_w: u32,
    content_h: u32,
    offset_x: i32,
    offset_y: i32,
) -> (i64, i64) {
    let (cx, cy) = position.pivot(canvas_w, canvas_h, offset_x, offset_y);
    let (px, py) = position.pivot(content_w, content_h, 0, 0);
    (cx - px, cy - py)
}

/// [`resolve_anchor`] for a position still in its symbolic string form.
pub fn resolve_named_anchor(
    position: &str,
    canvas_w: u32,
    canvas_h: u32,
    content_w: u32,
    content_h: u32,
    offset_x: i32,
    offset_y: i32,
) -> CardResult<(i64, i64)> {
    let position: Position = position.parse()?;
    Ok(resolve_anchor(
        position, canvas_w, canvas_h, content_w, content_h, offset_x, offset_y,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
