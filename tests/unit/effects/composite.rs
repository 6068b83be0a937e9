use super::*;

fn one(op: CompositeOp, src: u32, backdrop: u32) -> u32 {
    let (s, b) = ([src], [backdrop]);
    let mut out = [0u32];
    composite(
        &Surface::packed(&s, 1, 1).unwrap(),
        &Surface::packed(&b, 1, 1).unwrap(),
        &mut SurfaceMut::packed(&mut out, 1, 1).unwrap(),
        op,
    );
    out[0]
}

fn arith(k: Arithmetic, src: u32, backdrop: u32) -> u32 {
    let (s, b) = ([src], [backdrop]);
    let mut out = [0u32];
    composite_arithmetic(
        &Surface::packed(&s, 1, 1).unwrap(),
        &Surface::packed(&b, 1, 1).unwrap(),
        &mut SurfaceMut::packed(&mut out, 1, 1).unwrap(),
        k.k1,
        k.k2,
        k.k3,
        k.k4,
    );
    out[0]
}

#[test]
fn opaque_over_replaces_backdrop() {
    for backdrop in [0, 0x80_40_20_10, 0xFF_FF_FF_FF] {
        assert_eq!(one(CompositeOp::Over, 0xFF_12_34_56, backdrop), 0xFF_12_34_56);
    }
}

#[test]
fn transparent_over_keeps_backdrop() {
    assert_eq!(one(CompositeOp::Over, 0, 0x80_40_20_10), 0x80_40_20_10);
}

#[test]
fn in_against_transparent_backdrop_is_empty() {
    assert_eq!(one(CompositeOp::In, 0xFF_12_34_56, 0), 0);
    assert_eq!(one(CompositeOp::In, 0xFF_12_34_56, 0xFF_00_00_00), 0xFF_12_34_56);
}

#[test]
fn out_against_opaque_backdrop_is_empty() {
    assert_eq!(one(CompositeOp::Out, 0xFF_12_34_56, 0xFF_00_00_00), 0);
    assert_eq!(one(CompositeOp::Out, 0xFF_12_34_56, 0), 0xFF_12_34_56);
}

#[test]
fn atop_keeps_backdrop_alpha() {
    let out = one(CompositeOp::Atop, 0x80_40_20_10, 0x40_10_20_30);
    assert_eq!(out >> 24, 0x40);
    assert_eq!(one(CompositeOp::Atop, 0xFF_FF_00_00, 0), 0);
}

#[test]
fn xor_of_opaque_pixels_is_empty() {
    assert_eq!(one(CompositeOp::Xor, 0xFF_FF_00_00, 0xFF_00_00_FF), 0);
    assert_eq!(one(CompositeOp::Xor, 0xFF_FF_00_00, 0), 0xFF_FF_00_00);
}

#[test]
fn sums_saturate_per_channel() {
    // red exceeds alpha in the source; the overflow must not carry into alpha
    assert_eq!(one(CompositeOp::Over, 0x00_FF_00_00, 0xFF_FF_00_00), 0xFF_FF_00_00);
}

#[test]
fn arithmetic_source_coefficients_pass_through() {
    for px in [0u32, 0x80_40_20_10, 0xFF_12_34_56] {
        assert_eq!(arith(Arithmetic::SOURCE, px, 0xFF_FF_FF_FF), px);
    }
}

#[test]
fn arithmetic_offset_and_product() {
    assert_eq!(arith(Arithmetic::new(0.0, 0.0, 0.0, 1.0), 0, 0), 0xFF_FF_FF_FF);
    assert_eq!(
        arith(Arithmetic::new(1.0, 0.0, 0.0, 0.0), 0xFF_FF_00_FF, 0xFF_FF_FF_00),
        0xFF_FF_00_00
    );
    // negative results clamp to zero
    assert_eq!(arith(Arithmetic::new(0.0, -1.0, 0.0, 0.0), 0xFF_FF_FF_FF, 0), 0);
}

#[test]
fn arithmetic_in_place_variants_match() {
    let src = vec![0xFF_10_20_30u32, 0x80_40_00_20];
    let backdrop = vec![0x40_10_10_10u32, 0xFF_00_FF_00];
    let k = Arithmetic::new(0.5, 0.25, 0.75, 0.0);

    let mut separate = vec![0u32; 2];
    composite_arithmetic(
        &Surface::packed(&src, 2, 1).unwrap(),
        &Surface::packed(&backdrop, 2, 1).unwrap(),
        &mut SurfaceMut::packed(&mut separate, 2, 1).unwrap(),
        k.k1,
        k.k2,
        k.k3,
        k.k4,
    );

    let mut into_src = src.clone();
    composite_arithmetic_into_source(
        &mut SurfaceMut::packed(&mut into_src, 2, 1).unwrap(),
        &Surface::packed(&backdrop, 2, 1).unwrap(),
        k,
    );
    let mut into_bd = backdrop.clone();
    composite_arithmetic_into_backdrop(
        &Surface::packed(&src, 2, 1).unwrap(),
        &mut SurfaceMut::packed(&mut into_bd, 2, 1).unwrap(),
        k,
    );
    assert_eq!(separate, into_src);
    assert_eq!(separate, into_bd);
}

#[test]
fn in_place_variants_match_separate() {
    let src = vec![0xFF_10_20_30u32, 0x80_40_00_20, 0, 0x20_10_10_10];
    let backdrop = vec![0x40_10_10_10u32, 0xFF_00_FF_00, 0x80_80_00_00, 0];
    for op in CompositeOp::ALL {
        let mut separate = vec![0u32; 4];
        composite(
            &Surface::packed(&src, 2, 2).unwrap(),
            &Surface::packed(&backdrop, 2, 2).unwrap(),
            &mut SurfaceMut::packed(&mut separate, 2, 2).unwrap(),
            op,
        );
        let mut into_src = src.clone();
        composite_into_source(
            &mut SurfaceMut::packed(&mut into_src, 2, 2).unwrap(),
            &Surface::packed(&backdrop, 2, 2).unwrap(),
            op,
        );
        let mut into_bd = backdrop.clone();
        composite_into_backdrop(
            &Surface::packed(&src, 2, 2).unwrap(),
            &mut SurfaceMut::packed(&mut into_bd, 2, 2).unwrap(),
            op,
        );
        assert_eq!(separate, into_src, "{op}");
        assert_eq!(separate, into_bd, "{op}");
    }
}

#[test]
fn names_parse_and_display() {
    for op in CompositeOp::ALL {
        assert_eq!(op.to_string().parse::<CompositeOp>().unwrap(), op);
    }
    let err = "plus".parse::<CompositeOp>().unwrap_err();
    assert!(err.to_string().contains("over, in, out, atop, xor"));
    assert_eq!(serde_json::to_string(&CompositeOp::Atop).unwrap(), "\"atop\"");
}
