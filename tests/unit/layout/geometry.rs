use super::*;

#[test]
fn identical_size_keeps_source() {
    assert_eq!(
        resolve_fill_scale(1200, 630, 1200, 630).unwrap(),
        ScaleAction::Keep
    );
}

#[test]
fn taller_source_scales_to_target_width() {
    // 1:1 source into 1200x630 (ratio 1.9): width wins, height overflows.
    let a = resolve_fill_scale(1000, 1000, 1200, 630).unwrap();
    assert_eq!(
        a,
        ScaleAction::ToWidth {
            width: 1200,
            height: 1200
        }
    );
}

#[test]
fn wider_source_scales_to_target_height() {
    let a = resolve_fill_scale(4000, 1000, 1200, 630).unwrap();
    assert_eq!(
        a,
        ScaleAction::ToHeight {
            width: 2520,
            height: 630
        }
    );
}

#[test]
fn equal_ratio_scales_to_width() {
    let a = resolve_fill_scale(600, 315, 1200, 630).unwrap();
    assert_eq!(
        a,
        ScaleAction::ToWidth {
            width: 1200,
            height: 630
        }
    );
}

#[test]
fn one_matching_edge_still_scales() {
    // Width matches but height does not: the image must still grow to cover.
    let a = resolve_fill_scale(1200, 300, 1200, 630).unwrap();
    assert_eq!(
        a,
        ScaleAction::ToHeight {
            width: 2520,
            height: 630
        }
    );
}

#[test]
fn fill_scale_covers_target_and_keeps_ratio() {
    let sizes = [
        (1u32, 1u32),
        (37, 1000),
        (1000, 37),
        (640, 480),
        (1920, 1080),
        (1200, 630),
        (333, 777),
    ];
    let targets = [(1200u32, 630u32), (100, 100), (64, 512)];
    for &(sw, sh) in &sizes {
        for &(tw, th) in &targets {
            let (w, h) = resolve_fill_scale(sw, sh, tw, th)
                .unwrap()
                .dimensions(sw, sh);
            assert!(w >= tw && h >= th, "{sw}x{sh} -> {w}x{h} must cover {tw}x{th}");
            assert!(w == tw || h == th, "{sw}x{sh} -> {w}x{h} must match one edge");

            let src_ratio = f64::from(sw) / f64::from(sh);
            let out_ratio = f64::from(w) / f64::from(h);
            // One pixel of rounding on the derived edge.
            let tol = src_ratio.max(1.0 / src_ratio) / f64::from(w.min(h)) * 1.01;
            assert!(
                (out_ratio - src_ratio).abs() / src_ratio <= tol,
                "{sw}x{sh} -> {w}x{h}"
            );
        }
    }
}

#[test]
fn fill_scale_rejects_zero_dimensions() {
    assert!(resolve_fill_scale(0, 10, 10, 10).is_err());
    assert!(resolve_fill_scale(10, 10, 10, 0).is_err());
}

#[test]
fn parses_positions_and_aliases() {
    for p in Position::ALL {
        assert_eq!(p.as_str().parse::<Position>().unwrap(), p);
    }
    assert_eq!("Bottom-Right".parse::<Position>().unwrap(), Position::BottomRight);
    assert_eq!("top-center".parse::<Position>().unwrap(), Position::Top);
    assert_eq!(" middle ".parse::<Position>().unwrap(), Position::Center);
}

#[test]
fn unknown_position_is_invalid_position() {
    let err = "upper-left".parse::<Position>().unwrap_err();
    assert!(matches!(err, CardError::InvalidPosition(_)));
    let err = resolve_named_anchor("nowhere", 10, 10, 1, 1, 0, 0).unwrap_err();
    assert!(matches!(err, CardError::InvalidPosition(_)));
}

#[test]
fn corner_anchors_apply_offsets_inward() {
    let (cw, ch, w, h) = (1200, 630, 200, 100);
    assert_eq!(
        resolve_anchor(Position::TopLeft, cw, ch, w, h, 100, 50),
        (100, 50)
    );
    assert_eq!(
        resolve_anchor(Position::TopRight, cw, ch, w, h, 100, 50),
        (900, 50)
    );
    assert_eq!(
        resolve_anchor(Position::BottomLeft, cw, ch, w, h, 100, 50),
        (100, 480)
    );
    assert_eq!(
        resolve_anchor(Position::BottomRight, cw, ch, w, h, 100, 50),
        (900, 480)
    );
}

#[test]
fn edge_and_center_anchors() {
    let (cw, ch, w, h) = (1200, 630, 200, 100);
    assert_eq!(resolve_anchor(Position::Center, cw, ch, w, h, 0, 0), (500, 265));
    assert_eq!(resolve_anchor(Position::Center, cw, ch, w, h, 10, -5), (510, 260));
    assert_eq!(resolve_anchor(Position::Top, cw, ch, w, h, 10, 5), (510, 5));
    assert_eq!(resolve_anchor(Position::Bottom, cw, ch, w, h, 10, 5), (510, 525));
    assert_eq!(resolve_anchor(Position::Left, cw, ch, w, h, 10, 5), (10, 270));
    assert_eq!(resolve_anchor(Position::Right, cw, ch, w, h, 10, 5), (990, 270));
}

#[test]
fn oversized_content_centers_with_negative_origin() {
    // A cover-scaled background that overflows horizontally is cropped evenly.
    assert_eq!(
        resolve_anchor(Position::Center, 1200, 630, 2520, 630, 0, 0),
        (-660, 0)
    );
}

#[test]
fn cover_crop_keeps_whole_source_when_sizes_match() {
    assert_eq!(
        cover_source_crop(1200, 630, 1200, 630).unwrap(),
        SourceCrop {
            x: 0,
            y: 0,
            width: 1200,
            height: 630
        }
    );
}

#[test]
fn cover_crop_trims_overflowing_axis_evenly() {
    // 1000x1000 covers 1200x630 at 1200x1200; 630/1200 of the rows stay visible.
    assert_eq!(
        cover_source_crop(1000, 1000, 1200, 630).unwrap(),
        SourceCrop {
            x: 0,
            y: 237,
            width: 1000,
            height: 525
        }
    );
    // 4000x1000 covers at 2520x630; 1200/2520 of the columns stay visible.
    assert_eq!(
        cover_source_crop(4000, 1000, 1200, 630).unwrap(),
        SourceCrop {
            x: 1047,
            y: 0,
            width: 1905,
            height: 1000
        }
    );
}

#[test]
fn cover_crop_of_extreme_ratio_stays_small() {
    // Scaled whole, this source would be 1200x78642000.
    let crop = cover_source_crop(1, 65_535, 1200, 630).unwrap();
    assert_eq!((crop.width, crop.height), (1, 1));
    assert_eq!(crop.y, 32_767);

    let crop = cover_source_crop(65_535, 1, 1200, 630).unwrap();
    assert_eq!((crop.width, crop.height), (2, 1));
}

#[test]
fn cover_crop_upscale_keeps_every_source_pixel() {
    // 40x40 into 100x50 scales to 100x100; half the rows remain.
    let crop = cover_source_crop(40, 40, 100, 50).unwrap();
    assert_eq!(
        crop,
        SourceCrop {
            x: 0,
            y: 10,
            width: 40,
            height: 20
        }
    );
}
