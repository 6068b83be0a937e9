use super::*;

#[test]
fn straight_rgba_is_premultiplied_on_load() {
    let buf = PixelBuffer::from_straight_rgba8(&[255, 0, 0, 128], 1, 1, ColorSpace::Srgb).unwrap();
    assert_eq!(buf.pixels(), &[0x80_80_00_00]);
}

#[test]
fn linear_load_decodes_before_premultiplying() {
    let buf =
        PixelBuffer::from_straight_rgba8(&[128, 128, 128, 255], 1, 1, ColorSpace::LinearRgb)
            .unwrap();
    assert_eq!(buf.pixels(), &[0xFF_37_37_37]);
}

#[test]
fn byte_count_must_match_extent() {
    let err = PixelBuffer::from_straight_rgba8(&[0; 7], 1, 2, ColorSpace::Srgb).unwrap_err();
    assert!(err.to_string().contains("needs 8 bytes"));
    assert!(PixelBuffer::from_pixels(2, 2, vec![0; 3]).is_err());
}

#[test]
fn opaque_round_trip_is_exact() {
    let bytes = [128u8, 200, 10, 255, 0, 255, 64, 255];
    for space in [ColorSpace::Srgb, ColorSpace::LinearRgb] {
        let buf = PixelBuffer::from_straight_rgba8(&bytes, 2, 1, space).unwrap();
        let back = buf.to_straight_rgba8(space);
        if space == ColorSpace::Srgb {
            assert_eq!(back, bytes);
        } else {
            assert_eq!(&back[..2], &[128, 200]);
        }
    }
}

#[test]
fn transparent_pixels_save_as_zero() {
    let buf = PixelBuffer::from_pixels(1, 1, vec![0]).unwrap();
    assert_eq!(buf.to_straight_rgba8(ColorSpace::LinearRgb), vec![0, 0, 0, 0]);
}

#[test]
fn rgb_output_drops_alpha() {
    let buf = PixelBuffer::filled(2, 1, 0xFF_10_20_30);
    assert_eq!(buf.to_straight_rgb8(ColorSpace::Srgb), vec![0x10, 0x20, 0x30, 0x10, 0x20, 0x30]);
}

#[test]
fn transparency_detection() {
    let mut buf = PixelBuffer::filled(3, 2, 0xFF_00_00_00);
    assert!(!buf.has_transparency());
    buf.surface_mut().set_pixel(2, 1, 0xFE_00_00_00);
    assert!(buf.has_transparency());
    assert!(PixelBuffer::new(1, 1).has_transparency());
}

#[test]
fn surfaces_cover_whole_buffer() {
    let mut buf = PixelBuffer::new(4, 3);
    assert_eq!(buf.surface().extent(), Extent::new(4, 3));
    buf.surface_mut().fill(0xFF_FF_FF_FF);
    assert!(buf.pixels().iter().all(|&p| p == 0xFF_FF_FF_FF));
    assert_eq!(buf.into_pixels().len(), 12);
}
