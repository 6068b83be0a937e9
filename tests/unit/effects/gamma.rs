use super::*;

#[test]
fn tables_are_monotonic_and_span_full_range() {
    for table in [&SRGB_TO_LINEAR, &LINEAR_TO_SRGB] {
        assert_eq!(table[0], 0);
        assert_eq!(table[255], 255);
        assert!(table.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn midpoints_follow_the_curve() {
    assert_eq!(Transfer::SrgbToLinear.channel(128), 55);
    assert_eq!(Transfer::LinearToSrgb.channel(128), 188);
}

#[test]
fn opaque_gray_is_decoded() {
    let src = [0xFF_80_80_80u32];
    let mut dst = [0u32];
    srgb_to_linear(
        &Surface::packed(&src, 1, 1).unwrap(),
        &mut SurfaceMut::packed(&mut dst, 1, 1).unwrap(),
    );
    assert_eq!(dst[0], 0xFF_37_37_37);
}

#[test]
fn alpha_and_transparent_pixels_are_preserved() {
    let mut px = vec![0u32, 0x80_40_20_10, 0xFF_FF_FF_FF];
    linear_to_srgb_in_place(&mut SurfaceMut::packed(&mut px, 3, 1).unwrap());
    assert_eq!(px[0], 0);
    assert_eq!(px[1] >> 24, 0x80);
    assert_eq!(px[2], 0xFF_FF_FF_FF);
}

#[test]
fn invalid_premultiplied_input_is_pinned() {
    // red exceeds alpha, so the unpremultiplied value overflows the table index range
    assert_eq!(Transfer::SrgbToLinear.pixel(0x01_FF_00_00), 0x01_01_00_00);
}

#[test]
fn decode_then_encode_stays_close_for_bright_values() {
    for v in 128..=255u8 {
        let back = Transfer::LinearToSrgb.channel(Transfer::SrgbToLinear.channel(v));
        assert!(back.abs_diff(v) <= 3, "{v} -> {back}");
    }
}

#[test]
fn in_place_matches_separate() {
    let src = vec![0xFF_10_80_F0u32, 0x40_10_20_30];
    let mut separate = vec![0u32; 2];
    srgb_to_linear(
        &Surface::packed(&src, 2, 1).unwrap(),
        &mut SurfaceMut::packed(&mut separate, 2, 1).unwrap(),
    );
    let mut in_place = src.clone();
    srgb_to_linear_in_place(&mut SurfaceMut::packed(&mut in_place, 2, 1).unwrap());
    assert_eq!(separate, in_place);
}
