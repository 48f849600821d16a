use super::*;

fn style(h: HAlign, v: VAlign) -> BlockStyle {
    BlockStyle {
        anchor_x: 600.0,
        anchor_y: 315.0,
        font_size: 40.0,
        line_height: 1.5,
        h_align: h,
        v_align: v,
    }
}

const EXTENTS: FontExtents = FontExtents {
    ascent: 30.0,
    descent: 10.0,
};

#[test]
fn parses_alignment_keywords() {
    assert_eq!("left".parse::<HAlign>().unwrap(), HAlign::Left);
    assert_eq!("CENTER".parse::<HAlign>().unwrap(), HAlign::Center);
    assert_eq!("right".parse::<HAlign>().unwrap(), HAlign::Right);
    assert_eq!("top".parse::<VAlign>().unwrap(), VAlign::Top);
    assert_eq!("middle".parse::<VAlign>().unwrap(), VAlign::Middle);
    assert_eq!("bottom".parse::<VAlign>().unwrap(), VAlign::Bottom);

    assert!(matches!(
        "justify".parse::<HAlign>().unwrap_err(),
        CardError::Validation(_)
    ));
    assert!("baseline".parse::<VAlign>().is_err());
}

#[test]
fn block_height_accounts_for_line_height() {
    let s = style(HAlign::Left, VAlign::Top);
    assert_eq!(s.line_step(), 60.0);
    assert_eq!(s.block_height(0, EXTENTS), 0.0);
    assert_eq!(s.block_height(1, EXTENTS), 40.0);
    assert_eq!(s.block_height(3, EXTENTS), 160.0);
}

#[test]
fn top_left_block_starts_at_anchor() {
    let lines = style(HAlign::Left, VAlign::Top).place_lines(&[100.0, 80.0], EXTENTS);
    assert_eq!(
        lines,
        vec![
            LineOrigin {
                x: 600.0,
                baseline: 345.0
            },
            LineOrigin {
                x: 600.0,
                baseline: 405.0
            },
        ]
    );
}

#[test]
fn centered_block_is_symmetric_around_anchor() {
    let lines = style(HAlign::Center, VAlign::Middle).place_lines(&[200.0, 100.0], EXTENTS);
    // Block height 100: top at 265.
    assert_eq!(lines[0].x, 500.0);
    assert_eq!(lines[1].x, 550.0);
    assert_eq!(lines[0].baseline, 295.0);
    assert_eq!(lines[1].baseline, 355.0);

    let top = lines[0].baseline - EXTENTS.ascent;
    let bottom = lines[1].baseline + EXTENTS.descent;
    assert_eq!((top + bottom) / 2.0, 315.0);
}

#[test]
fn right_bottom_block_ends_at_anchor() {
    let lines = style(HAlign::Right, VAlign::Bottom).place_lines(&[120.0], EXTENTS);
    assert_eq!(lines[0].x, 480.0);
    assert_eq!(lines[0].baseline + EXTENTS.descent, 315.0);
}

#[test]
fn negative_line_height_collapses_lines() {
    let mut s = style(HAlign::Left, VAlign::Top);
    s.line_height = -2.0;
    let lines = s.place_lines(&[10.0, 10.0], EXTENTS);
    assert_eq!(lines[0].baseline, lines[1].baseline);
}

#[test]
fn zero_wrap_width_disables_wrapping() {
    assert_eq!(wrap_width(0), None);
    assert_eq!(wrap_width(1000), Some(1000.0));
}
