//! Per-pixel filter math behind each background effect.
//!
//! Every operation works on straight-alpha RGBA8 and leaves the alpha channel alone unless noted.

use image::{Rgba, RgbaImage, imageops};

use crate::{
    effects::blur::{blur_image, blur_rgba8_premul},
    foundation::{core::Rgb8, error::CardResult},
};

/// Shift all color channels by `level` percent of full scale (`-100..=100`).
pub fn brightness(img: &mut RgbaImage, level: i32) {
    *img = imageops::brighten(img, percent_of_full_scale(level));
}

/// Stretch (positive) or flatten (negative) contrast, `-100..=100`.
pub fn contrast(img: &mut RgbaImage, level: i32) {
    *img = imageops::contrast(img, level.clamp(-100, 100) as f32);
}

/// Gamma correction: `out = in^(1/gamma)` on normalized channels.
pub fn gamma(img: &mut RgbaImage, gamma: f32) {
    if !gamma.is_finite() || gamma <= 0.0 {
        tracing::warn!(gamma, "gamma must be finite and > 0, skipping");
        return;
    }
    let inv = 1.0 / f64::from(gamma);
    let lut: Vec<u8> = (0..=255u32)
        .map(|c| ((f64::from(c) / 255.0).powf(inv) * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect();
    map_rgb(img, |c, _| lut[usize::from(c)]);
}

/// Add a per-channel tint, each component `-100..=100` percent of full scale.
pub fn colorize(img: &mut RgbaImage, red: i32, green: i32, blue: i32) {
    let deltas = [red, green, blue].map(percent_of_full_scale);
    map_rgb(img, |c, channel| {
        (i32::from(c) + deltas[channel]).clamp(0, 255) as u8
    });
}

/// Replace color with luma.
pub fn greyscale(img: &mut RgbaImage) {
    let grey = imageops::grayscale_alpha(img);
    for (dst, src) in img.pixels_mut().zip(grey.pixels()) {
        let [l, a] = src.0;
        dst.0 = [l, l, l, a];
    }
}

/// Mirror left to right.
pub fn flop(img: &mut RgbaImage) {
    imageops::flip_horizontal_in_place(img);
}

/// Mirror top to bottom.
pub fn flip(img: &mut RgbaImage) {
    imageops::flip_vertical_in_place(img);
}

/// Gaussian blur; `amount` (`0..=100`) is the kernel radius in pixels.
pub fn blur(img: &mut RgbaImage, amount: u32) -> CardResult<()> {
    let radius = amount.min(100);
    if radius == 0 {
        return Ok(());
    }
    blur_image(img, radius, radius as f32 / 2.0)
}

/// Unsharp mask; `amount` (`0..=100`) scales the detail boost up to 2x.
pub fn sharpen(img: &mut RgbaImage, amount: u32) -> CardResult<()> {
    let amount = amount.min(100);
    if amount == 0 {
        return Ok(());
    }
    let strength = amount as f32 / 50.0;
    let (w, h) = img.dimensions();
    let soft = blur_rgba8_premul(img.as_raw(), w, h, 1, 1.0)?;
    for (px, s) in img.pixels_mut().zip(soft.chunks_exact(4)) {
        for c in 0..3 {
            let v = f32::from(px.0[c]);
            let detail = v - f32::from(s[c]);
            px.0[c] = (v + detail * strength).round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(())
}

/// Negate color channels.
pub fn invert(img: &mut RgbaImage) {
    imageops::invert(img);
}

/// Replace each `size`x`size` cell with its average color.
pub fn pixelate(img: &mut RgbaImage, size: u32) {
    if size <= 1 {
        return;
    }
    let (w, h) = img.dimensions();
    for cell_y in (0..h).step_by(size as usize) {
        for cell_x in (0..w).step_by(size as usize) {
            let x1 = (cell_x + size).min(w);
            let y1 = (cell_y + size).min(h);

            let mut sum = [0u64; 4];
            for y in cell_y..y1 {
                for x in cell_x..x1 {
                    for (s, v) in sum.iter_mut().zip(img.get_pixel(x, y).0) {
                        *s += u64::from(v);
                    }
                }
            }
            let n = u64::from((x1 - cell_x) * (y1 - cell_y));
            let avg = Rgba(sum.map(|s| ((s + n / 2) / n) as u8));
            for y in cell_y..y1 {
                for x in cell_x..x1 {
                    img.put_pixel(x, y, avg);
                }
            }
        }
    }
}

/// Limit the palette to at most `limit` colors by uniform quantization.
///
/// With `background`, fully transparent pixels become that opaque color first.
pub fn reduce_colors(img: &mut RgbaImage, limit: u32, background: Option<Rgb8>) {
    if let Some(bg) = background {
        for px in img.pixels_mut().filter(|p| p.0[3] == 0) {
            px.0 = [bg.r, bg.g, bg.b, 255];
        }
    }

    match limit {
        0 | 1 => {
            let n = u64::from(img.width()) * u64::from(img.height());
            if n == 0 {
                return;
            }
            let mut sum = [0u64; 3];
            for px in img.pixels() {
                for c in 0..3 {
                    sum[c] += u64::from(px.0[c]);
                }
            }
            let avg = sum.map(|s| ((s + n / 2) / n) as u8);
            map_rgb(img, |_, channel| avg[channel]);
        }
        2..=7 => {
            // Too few colors for per-channel levels: quantize luma instead.
            let levels = limit;
            for px in img.pixels_mut() {
                let [r, g, b, _] = px.0;
                let luma = (0.2126 * f32::from(r) + 0.7152 * f32::from(g) + 0.0722 * f32::from(b))
                    .round() as u8;
                let q = quantize(luma, levels);
                px.0[0] = q;
                px.0[1] = q;
                px.0[2] = q;
            }
        }
        _ => {
            let levels = ((f64::from(limit).cbrt() + 1e-9).floor() as u32).max(2);
            map_rgb(img, |c, _| quantize(c, levels));
        }
    }
}

fn percent_of_full_scale(level: i32) -> i32 {
    (f64::from(level.clamp(-100, 100) * 255) / 100.0).round() as i32
}

fn quantize(c: u8, levels: u32) -> u8 {
    let step = 255.0 / (levels - 1) as f32;
    ((f32::from(c) / step).round() * step).round().clamp(0.0, 255.0) as u8
}

fn map_rgb(img: &mut RgbaImage, f: impl Fn(u8, usize) -> u8) {
    for px in img.pixels_mut() {
        for c in 0..3 {
            px.0[c] = f(px.0[c], c);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/ops.rs"]
mod tests;
