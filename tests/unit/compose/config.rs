use super::*;
use crate::effects::chain::{Effect, EffectChain};

#[test]
fn empty_object_yields_defaults() {
    let cfg = CardConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, CardConfig::default());
    assert_eq!((cfg.image_width, cfg.image_height), (1200, 630));
    assert_eq!(cfg.background_color, "#444444");
    assert!(cfg.background_fill);
    assert_eq!(cfg.overlay_alpha, 0.35);
    assert_eq!(cfg.logo_position, "bottom-right");
    assert_eq!((cfg.logo_pos_x, cfg.logo_pos_y), (100, 50));
    assert_eq!((cfg.text_pos_x, cfg.text_pos_y), (600, 315));
    assert_eq!(cfg.text_font_size, 48);
}

#[test]
fn overrides_merge_over_defaults() {
    let cfg = CardConfig::from_json_str(
        r##"{ "image_width": 800, "overlay_alpha": 0.5, "text_color": "#000" }"##,
    )
    .unwrap();
    assert_eq!(cfg.image_width, 800);
    assert_eq!(cfg.image_height, 630);
    assert_eq!(cfg.overlay_alpha, 0.5);
    assert_eq!(cfg.text_color, "#000");
    assert_eq!(cfg.overlay_color, "#000000");
}

#[test]
fn driver_aliases_select_cpu() {
    for driver in ["cpu", "gd", "imagick"] {
        let cfg = CardConfig::from_json_str(&format!(r#"{{ "driver": "{driver}" }}"#)).unwrap();
        assert_eq!(cfg.driver, BackendKind::Cpu);
    }
    assert!(CardConfig::from_json_str(r#"{ "driver": "gpu" }"#).is_err());
}

#[test]
fn effects_accept_object_form_in_key_order() {
    let cfg = CardConfig::from_json_str(
        r#"{ "background_effects": { "greyscale": null, "blur": 3, "colorize": [1, 2, 3] } }"#,
    )
    .unwrap();
    let chain = EffectChain::from_specs(&cfg.background_effects);
    assert_eq!(
        chain.effects(),
        &[
            Effect::Greyscale,
            Effect::Blur(3),
            Effect::Colorize {
                red: 1,
                green: 2,
                blue: 3
            },
        ]
    );
}

#[test]
fn effects_accept_array_form() {
    let cfg = CardConfig::from_json_str(
        r#"{ "background_effects": [{ "name": "invert" }, { "name": "gamma", "args": [0.8] }] }"#,
    )
    .unwrap();
    assert_eq!(cfg.background_effects.len(), 2);
    assert_eq!(cfg.background_effects[0].name, "invert");
}

#[test]
fn malformed_json_is_validation_error() {
    let err = CardConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, CardError::Validation(_)));
}

#[test]
fn missing_config_file_carries_path() {
    let err = CardConfig::from_json_file(Path::new("target/definitely/missing.json")).unwrap_err();
    assert!(matches!(err, CardError::Other(_)));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn split_maps_every_layer() {
    let cfg = CardConfig {
        logo_opacity: 140,
        overlay_alpha: 1.0,
        ..CardConfig::default()
    };
    let specs = cfg.split();
    assert_eq!(specs.canvas.width, 1200);
    assert_eq!(specs.canvas.background_color, "#444444");
    assert!(specs.background.fill);
    assert!(!specs.overlay.is_visible());
    assert_eq!(specs.text.wrap_width, 1000);
    assert_eq!(specs.logo.opacity_fraction(), 1.0);
    assert_eq!(specs.logo.position, "bottom-right");
}

#[test]
fn overlay_visibility_is_exclusive_of_bounds() {
    let mut overlay = CardConfig::default().split().overlay;
    for (alpha, visible) in [(0.0, false), (-0.2, false), (0.01, true), (0.99, true), (1.0, false)] {
        overlay.alpha = alpha;
        assert_eq!(overlay.is_visible(), visible, "alpha {alpha}");
    }
}

#[test]
fn negative_logo_opacity_clamps_to_zero() {
    let mut logo = CardConfig::default().split().logo;
    logo.opacity = -5;
    assert_eq!(logo.opacity_fraction(), 0.0);
    logo.opacity = 50;
    assert_eq!(logo.opacity_fraction(), 0.5);
}
