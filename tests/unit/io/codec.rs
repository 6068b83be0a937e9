use super::*;

#[test]
fn output_name_joins_stems_and_tag() {
    let name = output_file_name(
        "photos/zhang.png",
        Some(Path::new("../masks/leaf.jpeg")),
        "blend-multiply",
        false,
    );
    assert_eq!(name, PathBuf::from("zhang-leaf-blend-multiply.jpg"));
    let name = output_file_name("zhang.png", None, "blur-2-2", true);
    assert_eq!(name, PathBuf::from("zhang-blur-2-2.png"));
}

#[test]
fn translucent_buffers_default_to_png_and_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let buf = PixelBuffer::from_pixels(2, 2, vec![0xFF_FF_00_00, 0x80_80_00_00, 0, 0xFF_00_00_FF])
        .unwrap();
    let written = save_image(&buf, dir.path().join("out"), ColorSpace::Srgb).unwrap();
    assert_eq!(written.extension().unwrap(), "png");

    let back = load_image(&written, ColorSpace::Srgb).unwrap();
    assert_eq!(back, buf);
}

#[test]
fn opaque_buffers_default_to_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let buf = PixelBuffer::filled(8, 4, 0xFF_40_80_C0);
    let written = save_image(&buf, dir.path().join("out"), ColorSpace::LinearRgb).unwrap();
    assert_eq!(written.extension().unwrap(), "jpg");

    let back = load_image(&written, ColorSpace::LinearRgb).unwrap();
    assert_eq!(back.extent(), buf.extent());
    assert!(!back.has_transparency());
}

#[test]
fn explicit_extension_wins() {
    let dir = tempfile::tempdir().unwrap();
    let buf = PixelBuffer::filled(2, 2, 0xFF_10_20_30);
    let target = dir.path().join("forced.png");
    let written = save_image(&buf, &target, ColorSpace::Srgb).unwrap();
    assert_eq!(written, target);
    assert_eq!(load_image(&written, ColorSpace::Srgb).unwrap(), buf);
}

#[test]
fn empty_and_missing_images_fail() {
    let dir = tempfile::tempdir().unwrap();
    let err = save_image(&PixelBuffer::new(0, 3), dir.path().join("x"), ColorSpace::Srgb).unwrap_err();
    assert!(matches!(err, FilterError::Validation(_)));

    let err = load_image(dir.path().join("nope.png"), ColorSpace::Srgb).unwrap_err();
    assert!(matches!(err, FilterError::Image(_)));
    assert!(err.to_string().contains("nope.png"));
}
