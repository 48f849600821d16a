use super::*;
use crate::foundation::core::{CanvasSize, Rgb8};
use crate::render::cpu::CpuBackend;
use std::path::PathBuf;

fn out_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_export").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn small_canvas() -> Canvas {
    CpuBackend::new().create_canvas(CanvasSize::new(8, 6).unwrap(), Rgb8::new(0x44, 0x44, 0x44))
}

#[test]
fn extension_mapping_is_case_insensitive() {
    assert_eq!(ExportFormat::from_path(Path::new("a.png")), Some(ExportFormat::Png));
    assert_eq!(ExportFormat::from_path(Path::new("a.PNG")), Some(ExportFormat::Png));
    assert_eq!(ExportFormat::from_path(Path::new("dir/a.JpG")), Some(ExportFormat::Jpeg));
    assert_eq!(ExportFormat::from_path(Path::new("a.webp")), Some(ExportFormat::WebP));
}

#[test]
fn unsupported_extensions_map_to_none() {
    assert_eq!(ExportFormat::from_path(Path::new("a.bmp")), None);
    assert_eq!(ExportFormat::from_path(Path::new("a.jpeg")), None);
    assert_eq!(ExportFormat::from_path(Path::new("image")), None);
    assert_eq!(ExportFormat::from_path(Path::new("trailing.")), None);
}

#[test]
fn last_dot_wins() {
    assert_eq!(
        ExportFormat::from_path(Path::new("card.png.webp")),
        Some(ExportFormat::WebP)
    );
}

#[test]
fn save_writes_each_supported_format() {
    let dir = out_dir("formats");
    let backend = CpuBackend::new();
    let canvas = small_canvas();
    for format in [ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::WebP] {
        let path = dir.join(format!("card.{}", format.extension()));
        assert!(save(&backend, &canvas, &path).unwrap());
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            format.image_format(),
            "{}",
            path.display()
        );
    }
}

#[test]
fn save_unsupported_returns_false_and_writes_nothing() {
    let dir = out_dir("unsupported");
    let backend = CpuBackend::new();
    let canvas = small_canvas();
    for name in ["card.bmp", "card"] {
        let path = dir.join(name);
        assert!(!save(&backend, &canvas, &path).unwrap());
        assert!(!path.exists());
    }
}
