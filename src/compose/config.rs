use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    effects::chain::{EffectSpec, deserialize_effect_specs},
    foundation::error::{CardError, CardResult},
    render::backend::BackendKind,
};

/// Flat render configuration. Every key is optional; missing keys take their defaults.
///
/// Colors, positions and alignments stay as strings here and are parsed by the draw step
/// that uses them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub driver: BackendKind,
    pub image_width: u32,
    pub image_height: u32,

    pub background_color: String,
    pub background_path: Option<PathBuf>,
    pub background_fill: bool,
    #[serde(deserialize_with = "deserialize_effect_specs")]
    pub background_effects: Vec<EffectSpec>,

    pub overlay_color: String,
    pub overlay_alpha: f32,

    pub logo_path: Option<PathBuf>,
    pub logo_position: String,
    pub logo_pos_x: i32,
    pub logo_pos_y: i32,
    pub logo_opacity: i32,

    pub text_pos_x: i32,
    pub text_pos_y: i32,
    pub text_horizontal_align: String,
    pub text_vertical_align: String,
    pub text_wrap_width: u32,
    pub text_line_height: f32,
    pub text_color: String,
    pub text_font_size: u32,
    pub text_font_path: Option<PathBuf>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            driver: BackendKind::Cpu,
            image_width: 1200,
            image_height: 630,
            background_color: "#444444".to_owned(),
            background_path: None,
            background_fill: true,
            background_effects: Vec::new(),
            overlay_color: "#000000".to_owned(),
            overlay_alpha: 0.35,
            logo_path: None,
            logo_position: "bottom-right".to_owned(),
            logo_pos_x: 100,
            logo_pos_y: 50,
            logo_opacity: 100,
            text_pos_x: 600,
            text_pos_y: 315,
            text_horizontal_align: "center".to_owned(),
            text_vertical_align: "middle".to_owned(),
            text_wrap_width: 1000,
            text_line_height: 1.5,
            text_color: "#ffffff".to_owned(),
            text_font_size: 48,
            text_font_path: None,
        }
    }
}

impl CardConfig {
    pub fn from_json_str(s: &str) -> CardResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| CardError::validation(format!("invalid card config: {e}")))
    }

    pub fn from_json_file(path: &Path) -> CardResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read card config {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Break the flat record into the per-layer specs the compositor consumes.
    pub fn split(&self) -> LayerSpecs {
        LayerSpecs {
            canvas: CanvasConfig {
                width: self.image_width,
                height: self.image_height,
                background_color: self.background_color.clone(),
                driver: self.driver,
            },
            background: BackgroundSpec {
                source: self.background_path.clone(),
                fill: self.background_fill,
                effects: self.background_effects.clone(),
            },
            overlay: OverlaySpec {
                color: self.overlay_color.clone(),
                alpha: self.overlay_alpha,
            },
            text: TextSpec {
                x: self.text_pos_x,
                y: self.text_pos_y,
                h_align: self.text_horizontal_align.clone(),
                v_align: self.text_vertical_align.clone(),
                wrap_width: self.text_wrap_width,
                line_height: self.text_line_height,
                font_size: self.text_font_size,
                color: self.text_color.clone(),
                font_path: self.text_font_path.clone(),
            },
            logo: LogoSpec {
                source: self.logo_path.clone(),
                position: self.logo_position.clone(),
                offset_x: self.logo_pos_x,
                offset_y: self.logo_pos_y,
                opacity: self.logo_opacity,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    pub driver: BackendKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundSpec {
    pub source: Option<PathBuf>,
    /// Cover-scale the image to the canvas before placing it.
    pub fill: bool,
    pub effects: Vec<EffectSpec>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlaySpec {
    pub color: String,
    /// Drawn only when strictly inside `(0, 1)`.
    pub alpha: f32,
}

impl OverlaySpec {
    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0 && self.alpha < 1.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextSpec {
    pub x: i32,
    pub y: i32,
    pub h_align: String,
    pub v_align: String,
    /// `0` disables wrapping.
    pub wrap_width: u32,
    pub line_height: f32,
    pub font_size: u32,
    pub color: String,
    pub font_path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogoSpec {
    pub source: Option<PathBuf>,
    pub position: String,
    pub offset_x: i32,
    pub offset_y: i32,
    /// Percent, clamped to `0..=100` when drawn.
    pub opacity: i32,
}

impl LogoSpec {
    pub fn opacity_fraction(&self) -> f32 {
        self.opacity.clamp(0, 100) as f32 / 100.0
    }
}

/// Typed per-layer view of a [`CardConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpecs {
    pub canvas: CanvasConfig,
    pub background: BackgroundSpec,
    pub overlay: OverlaySpec,
    pub text: TextSpec,
    pub logo: LogoSpec,
}

#[cfg(test)]
#[path = "../../tests/unit/compose/config.rs"]
mod tests;
