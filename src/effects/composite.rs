use crate::foundation::{
    core::{Canvas, Rgba8Premul},
    error::{CardError, CardResult},
};

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over: `dst = src * opacity + dst * (1 - src_alpha * opacity)`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite an equally sized premultiplied layer over `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> CardResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CardError::validation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite a straight-alpha image onto the canvas with its top-left at `(x, y)`.
///
/// The image may hang off any edge; only the overlapping region is touched.
pub fn blit_over(canvas: &mut Canvas, img: &image::RgbaImage, x: i64, y: i64, opacity: f32) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let (iw, ih) = (i64::from(img.width()), i64::from(img.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + iw).min(cw);
    let y1 = (y + ih).min(ch);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let data = canvas.data_mut();
    for cy in y0..y1 {
        for cx in x0..x1 {
            let [r, g, b, a] = img.get_pixel((cx - x) as u32, (cy - y) as u32).0;
            let src = Rgba8Premul::from_straight_rgba(r, g, b, a).to_array();
            let i = ((cy * cw + cx) as usize) * 4;
            let out = over([data[i], data[i + 1], data[i + 2], data[i + 3]], src, opacity);
            data[i..i + 4].copy_from_slice(&out);
        }
    }
}

/// Blend a solid premultiplied color over the canvas inside the pixel rectangle.
pub fn fill_rect_over(canvas: &mut Canvas, rect: kurbo::Rect, color: Rgba8Premul) {
    let (cw, ch) = (f64::from(canvas.width()), f64::from(canvas.height()));
    let x0 = rect.x0.max(0.0).round() as usize;
    let y0 = rect.y0.max(0.0).round() as usize;
    let x1 = rect.x1.min(cw).round() as usize;
    let y1 = rect.y1.min(ch).round() as usize;
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let stride = canvas.width() as usize * 4;
    let src = color.to_array();
    let data = canvas.data_mut();
    for row in data.chunks_exact_mut(stride).skip(y0).take(y1 - y0) {
        for d in row[x0 * 4..x1 * 4].chunks_exact_mut(4) {
            let out = over([d[0], d[1], d[2], d[3]], src, 1.0);
            d.copy_from_slice(&out);
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
