//! Integration tests for persisting annotated page images.

mod common;

use common::blank_page;
use pageimage::{DrawStyle, ImageError, ImageOptions, OutputFormat, PageImager};

fn annotated_image_bytes(backend: &str, format: OutputFormat) -> Vec<u8> {
    let page = blank_page(64.0, 48.0);
    let mut image = PageImager::default()
        .with_options(ImageOptions {
            backend: backend.to_string(),
            ..ImageOptions::default()
        })
        .to_image(&page)
        .unwrap();
    image
        .draw_rect((8.0, 8.0, 40.0, 30.0), &DrawStyle::default())
        .unwrap();
    image.encode(format).unwrap()
}

#[test]
fn save_infers_format_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let page = blank_page(64.0, 48.0);
    let mut image = PageImager::default().to_image(&page).unwrap();
    image.draw_hline(24.0, &DrawStyle::default()).unwrap();

    for name in ["page.png", "page.JPG", "page.bmp", "page.tiff"] {
        let path = dir.path().join(name);
        image.save(&path, None).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48), "{name}");
    }
}

#[test]
fn explicit_format_overrides_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.dat");
    let page = blank_page(10.0, 10.0);
    let image = PageImager::default().to_image(&page).unwrap();
    image.save(&path, Some(OutputFormat::Png)).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn unsupported_extension_fails_without_touching_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let page = blank_page(32.0, 32.0);
    let image = PageImager::default().to_image(&page).unwrap();

    let good = dir.path().join("table_1.png");
    image.save(&good, None).unwrap();
    let before = std::fs::read(&good).unwrap();

    let bad = dir.path().join("table_1.xyz");
    std::fs::write(&bad, b"previous run").unwrap();

    let err = image.save(&bad, None).unwrap_err();
    assert!(matches!(err, ImageError::UnknownFormat(_)));
    assert!(err.is_persistence());
    assert_eq!(std::fs::read(&bad).unwrap(), b"previous run");
    assert_eq!(std::fs::read(&good).unwrap(), before);

    let missing = dir.path().join("no_extension");
    assert!(image.save(&missing, None).is_err());
    assert!(!missing.exists());
}

#[test]
fn save_into_missing_directory_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("page.png");
    let page = blank_page(8.0, 8.0);
    let image = PageImager::default().to_image(&page).unwrap();
    let err = image.save(&path, None).unwrap_err();
    assert!(matches!(err, ImageError::Io(_)));
}

#[test]
fn backends_encode_same_dimensions() {
    for format in [OutputFormat::Png, OutputFormat::Jpeg] {
        let skia = image::load_from_memory(&annotated_image_bytes("skia", format)).unwrap();
        let array = image::load_from_memory(&annotated_image_bytes("array", format)).unwrap();
        assert_eq!((skia.width(), skia.height()), (array.width(), array.height()));
        assert_eq!(skia.color().has_alpha(), format.supports_alpha());
    }
}

#[test]
fn to_png_matches_png_save() {
    let page = blank_page(16.0, 16.0);
    let image = PageImager::default().to_image(&page).unwrap();
    let mut buf = Vec::new();
    image.save(&mut buf, Some(OutputFormat::Png)).unwrap();
    assert_eq!(buf, image.to_png().unwrap());
}
