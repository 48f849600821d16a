use super::*;

fn solid(r: u8, g: u8, b: u8, a: u8) -> RgbaImage {
    RgbaImage::from_pixel(4, 4, Rgba([r, g, b, a]))
}

fn gradient() -> RgbaImage {
    RgbaImage::from_fn(4, 2, |x, y| Rgba([(x * 60) as u8, (y * 100) as u8, 7, 255]))
}

#[test]
fn brightness_shifts_channels_and_keeps_alpha() {
    let mut img = solid(100, 100, 100, 200);
    brightness(&mut img, 20);
    assert_eq!(img.get_pixel(0, 0).0, [151, 151, 151, 200]);

    let mut img = solid(10, 10, 10, 255);
    brightness(&mut img, -100);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn positive_contrast_pushes_channels_apart() {
    let mut img = RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            Rgba([50, 50, 50, 255])
        } else {
            Rgba([200, 200, 200, 255])
        }
    });
    contrast(&mut img, 50);
    assert!(img.get_pixel(0, 0).0[0] < 50);
    assert!(img.get_pixel(1, 0).0[0] > 200);
    assert_eq!(img.get_pixel(1, 0).0[3], 255);
}

#[test]
fn gamma_one_is_identity_and_above_one_brightens() {
    let mut img = gradient();
    let before = img.clone();
    gamma(&mut img, 1.0);
    assert_eq!(img, before);

    let mut img = solid(64, 64, 64, 255);
    gamma(&mut img, 2.2);
    assert!(img.get_pixel(0, 0).0[0] > 64);

    let mut img = gradient();
    gamma(&mut img, 0.0);
    assert_eq!(img, before);
}

#[test]
fn colorize_adds_per_channel() {
    let mut img = solid(100, 100, 100, 255);
    colorize(&mut img, 100, -100, 10);
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 126, 255]);
}

#[test]
fn greyscale_equalizes_channels() {
    let mut img = gradient();
    greyscale(&mut img);
    for p in img.pixels() {
        assert_eq!(p.0[0], p.0[1]);
        assert_eq!(p.0[1], p.0[2]);
        assert_eq!(p.0[3], 255);
    }
}

#[test]
fn flop_mirrors_horizontally_and_flip_vertically() {
    let mut img = gradient();
    let before = img.clone();
    flop(&mut img);
    assert_eq!(img.get_pixel(0, 0), before.get_pixel(3, 0));

    let mut img = before.clone();
    flip(&mut img);
    assert_eq!(img.get_pixel(0, 0), before.get_pixel(0, 1));
}

#[test]
fn invert_negates_color_only() {
    let mut img = solid(0, 100, 255, 128);
    invert(&mut img);
    assert_eq!(img.get_pixel(0, 0).0, [255, 155, 0, 128]);
}

#[test]
fn blur_and_sharpen_keep_flat_images_flat() {
    let mut img = solid(30, 60, 90, 255);
    blur(&mut img, 5).unwrap();
    assert!(img.pixels().all(|p| p.0 == [30, 60, 90, 255]));

    sharpen(&mut img, 80).unwrap();
    assert!(img.pixels().all(|p| p.0 == [30, 60, 90, 255]));
}

#[test]
fn sharpen_increases_edge_contrast() {
    let mut img = RgbaImage::from_fn(6, 1, |x, _| {
        if x < 3 {
            Rgba([50, 50, 50, 255])
        } else {
            Rgba([200, 200, 200, 255])
        }
    });
    sharpen(&mut img, 100).unwrap();
    assert!(img.get_pixel(2, 0).0[0] < 50);
    assert!(img.get_pixel(3, 0).0[0] > 200);
}

#[test]
fn pixelate_averages_cells() {
    let mut img = RgbaImage::from_fn(2, 2, |x, y| {
        let v = if (x + y) % 2 == 0 { 0 } else { 200 };
        Rgba([v, v, v, 255])
    });
    pixelate(&mut img, 2);
    assert!(img.pixels().all(|p| p.0 == [100, 100, 100, 255]));
}

#[test]
fn reduce_colors_limits_palette() {
    let mut img = RgbaImage::from_fn(16, 16, |x, y| Rgba([(x * 16) as u8, (y * 16) as u8, 99, 255]));
    reduce_colors(&mut img, 27, None);
    let mut palette: Vec<[u8; 4]> = img.pixels().map(|p| p.0).collect();
    palette.sort();
    palette.dedup();
    assert!(palette.len() <= 27, "{} colors", palette.len());

    let mut img = gradient();
    reduce_colors(&mut img, 2, None);
    assert!(img.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
}

#[test]
fn reduce_colors_fills_transparent_with_background() {
    let mut img = solid(0, 0, 0, 0);
    reduce_colors(&mut img, 256, Some(Rgb8::new(255, 255, 255)));
    assert!(img.pixels().all(|p| p.0 == [255, 255, 255, 255]));
}
