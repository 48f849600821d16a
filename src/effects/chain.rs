use serde::Deserialize;

use crate::{
    assets::color::parse_hex,
    foundation::{
        core::Rgb8,
        error::{CardError, CardResult},
    },
    render::backend::RasterBackend,
};

/// A named effect with positional arguments, as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Deserialize, serde::Serialize)]
pub struct EffectSpec {
    pub name: String,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

impl EffectSpec {
    pub fn new(name: impl Into<String>, args: Vec<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// A recognized background filter with typed arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Brightness(i32),
    Contrast(i32),
    Gamma(f32),
    Colorize { red: i32, green: i32, blue: i32 },
    Greyscale,
    Flop,
    Flip,
    Blur(u32),
    Sharpen(u32),
    Invert,
    Pixelate(u32),
    ReduceColors { limit: u32, background: Option<Rgb8> },
}

impl Effect {
    /// Type a spec. `None` for unknown names or arguments that do not fit the effect's shape.
    pub fn from_spec(spec: &EffectSpec) -> Option<Self> {
        let key: String = spec
            .name
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let a = &spec.args;

        let effect = match key.as_str() {
            "brightness" => Self::Brightness(arg_i32(a, 0)?),
            "contrast" => Self::Contrast(arg_i32(a, 0)?),
            "gamma" => Self::Gamma(arg_f32(a, 0)?),
            "colorize" => Self::Colorize {
                red: arg_i32(a, 0)?,
                green: arg_i32(a, 1)?,
                blue: arg_i32(a, 2)?,
            },
            "greyscale" => Self::Greyscale,
            "flop" => Self::Flop,
            "flip" => Self::Flip,
            "blur" => Self::Blur(arg_u32(a, 0)?),
            "sharpen" => Self::Sharpen(arg_u32(a, 0)?),
            "invert" => Self::Invert,
            "pixelate" => Self::Pixelate(arg_u32(a, 0)?),
            "reducecolors" => Self::ReduceColors {
                limit: arg_u32(a, 0)?,
                background: match a.get(1) {
                    None | Some(serde_json::Value::Null) => None,
                    Some(v) => {
                        let s = v.as_str()?;
                        if s.eq_ignore_ascii_case("transparent") {
                            None
                        } else {
                            Some(parse_hex(s).ok()?)
                        }
                    }
                },
            },
            _ => return None,
        };
        Some(effect)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Brightness(_) => "brightness",
            Self::Contrast(_) => "contrast",
            Self::Gamma(_) => "gamma",
            Self::Colorize { .. } => "colorize",
            Self::Greyscale => "greyscale",
            Self::Flop => "flop",
            Self::Flip => "flip",
            Self::Blur(_) => "blur",
            Self::Sharpen(_) => "sharpen",
            Self::Invert => "invert",
            Self::Pixelate(_) => "pixelate",
            Self::ReduceColors { .. } => "reduceColors",
        }
    }
}

/// Ordered, validated list of background effects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectChain {
    effects: Vec<Effect>,
}

impl EffectChain {
    /// Keep recognized specs in caller order; drop the rest.
    pub fn from_specs(specs: &[EffectSpec]) -> Self {
        let effects = specs
            .iter()
            .filter_map(|spec| {
                let effect = Effect::from_spec(spec);
                if effect.is_none() {
                    tracing::warn!(
                        name = %spec.name,
                        args = ?spec.args,
                        "dropping unrecognized background effect"
                    );
                }
                effect
            })
            .collect();
        Self { effects }
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Run every effect against `img`, in order, through the backend.
    pub fn apply(
        &self,
        backend: &dyn RasterBackend,
        img: &mut image::RgbaImage,
    ) -> CardResult<()> {
        for effect in &self.effects {
            tracing::debug!(effect = effect.name(), "applying background effect");
            backend.apply_effect(img, effect)?;
        }
        Ok(())
    }
}

/// Read `background_effects` in either accepted JSON form.
///
/// - an array of `{ "name": .., "args": [..] }` objects, or
/// - an object whose key order is the chain order and whose values are `null` (no arguments),
///   a scalar (one argument) or an array (positional arguments).
pub fn effect_specs_from_json(value: &serde_json::Value) -> CardResult<Vec<EffectSpec>> {
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| {
                EffectSpec::deserialize(item).map_err(|e| {
                    CardError::validation(format!("invalid background effect entry: {e}"))
                })
            })
            .collect(),
        serde_json::Value::Object(map) => Ok(map
            .iter()
            .map(|(name, v)| {
                let args = match v {
                    serde_json::Value::Null => Vec::new(),
                    serde_json::Value::Array(a) => a.clone(),
                    other => vec![other.clone()],
                };
                EffectSpec::new(name.clone(), args)
            })
            .collect()),
        _ => Err(CardError::validation(
            "background_effects must be an array or an object",
        )),
    }
}

pub(crate) fn deserialize_effect_specs<'de, D>(deserializer: D) -> Result<Vec<EffectSpec>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    effect_specs_from_json(&value).map_err(serde::de::Error::custom)
}

fn arg_f64(args: &[serde_json::Value], i: usize) -> Option<f64> {
    match args.get(i)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn arg_i32(args: &[serde_json::Value], i: usize) -> Option<i32> {
    let v = arg_f64(args, i)?;
    (v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX)).then(|| v.round() as i32)
}

fn arg_u32(args: &[serde_json::Value], i: usize) -> Option<u32> {
    let v = arg_f64(args, i)?;
    (v >= 0.0 && v <= f64::from(u32::MAX)).then(|| v.round() as u32)
}

fn arg_f32(args: &[serde_json::Value], i: usize) -> Option<f32> {
    arg_f64(args, i).map(|v| v as f32)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/chain.rs"]
mod tests;
