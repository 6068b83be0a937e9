use super::*;

const CHAIN_JSON: &str = r#"{
  "filters": [
    { "op": "grayscale", "amount": 1.0 },
    { "op": "hue-rotate", "angle": 90 },
    { "op": "gaussian-blur", "std_dev_x": 2.0 },
    { "op": "gaussian-blur", "std_dev_x": 1.0, "std_dev_y": 0.0 },
    { "op": "luminance-to-alpha" },
    { "op": "srgb-to-linear" },
    { "op": "color-matrix", "matrix": [1,0,0,0,0, 0,1,0,0,0, 0,0,1,0,0, 0,0,0,1,0] }
  ]
}"#;

#[test]
fn parses_every_shape() {
    let chain: FilterChain = CHAIN_JSON.parse().unwrap();
    assert_eq!(chain.filters.len(), 7);
    assert_eq!(chain.filters[0], Filter::Grayscale { amount: 1.0 });
    assert_eq!(chain.filters[1], Filter::HueRotate { angle: 90.0 });
    assert_eq!(
        chain.filters[2],
        Filter::GaussianBlur {
            std_dev_x: 2.0,
            std_dev_y: None
        }
    );
    assert_eq!(chain.filters[4], Filter::LuminanceToAlpha);
    assert_eq!(
        chain.filters[6],
        Filter::ColorMatrix {
            matrix: ColorMatrix::IDENTITY
        }
    );
}

#[test]
fn serializes_with_op_tag() {
    let json = serde_json::to_string(&Filter::GaussianBlur {
        std_dev_x: 2.0,
        std_dev_y: None,
    })
    .unwrap();
    assert_eq!(json, r#"{"op":"gaussian-blur","std_dev_x":2.0}"#);
    let json = serde_json::to_string(&Filter::SrgbToLinear).unwrap();
    assert_eq!(json, r#"{"op":"srgb-to-linear"}"#);
}

#[test]
fn unknown_op_is_a_serde_error() {
    let err = r#"{"filters":[{"op":"posterize","levels":4}]}"#
        .parse::<FilterChain>()
        .unwrap_err();
    assert!(matches!(err, FilterError::Serde(_)), "{err}");
}

#[test]
fn negative_blur_is_rejected_with_index() {
    let err = r#"{"filters":[{"op":"invert","amount":1},{"op":"gaussian-blur","std_dev_x":-1}]}"#
        .parse::<FilterChain>()
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("filters[1]"), "{msg}");
    assert!(msg.contains("gaussian-blur"), "{msg}");
}

#[test]
fn non_finite_parameters_are_rejected() {
    assert!(Filter::Opacity { amount: f32::NAN }.validate().is_err());
    assert!(Filter::HueRotate {
        angle: f32::INFINITY
    }
    .validate()
    .is_err());
    let mut m = ColorMatrix::IDENTITY;
    m.0[7] = f32::NEG_INFINITY;
    let err = Filter::ColorMatrix { matrix: m }.validate().unwrap_err();
    assert!(err.to_string().contains("matrix[7]"));
    assert!(Filter::LinearToSrgb.validate().is_ok());
}

#[test]
fn matrix_filters_reduce_to_presets() {
    assert_eq!(
        Filter::Sepia { amount: 0.5 }.matrix(),
        Some(ColorMatrix::sepia(0.5))
    );
    assert_eq!(Filter::LuminanceToAlpha.matrix(), None);
}

#[test]
fn double_invert_restores_opaque_pixels() {
    let chain = FilterChain::new(vec![
        Filter::Invert { amount: 1.0 },
        Filter::Invert { amount: 1.0 },
    ]);
    let original = vec![0xFF_12_34_56u32, 0xFF_FF_00_80];
    let mut px = original.clone();
    chain.apply_in_place(&mut SurfaceMut::packed(&mut px, 2, 1).unwrap());
    assert_eq!(px, original);
}

#[test]
fn apply_matches_apply_in_place() {
    let chain: FilterChain = CHAIN_JSON.parse().unwrap();
    let src: Vec<u32> = (0..36u32)
        .map(|i| 0xFF_00_00_00 | (i * 7) << 16 | (i * 3) << 8 | i)
        .collect();
    for f in &chain.filters {
        let mut separate = vec![0u32; 36];
        f.apply(
            &Surface::packed(&src, 6, 6).unwrap(),
            &mut SurfaceMut::packed(&mut separate, 6, 6).unwrap(),
        );
        let mut in_place = src.clone();
        f.apply_in_place(&mut SurfaceMut::packed(&mut in_place, 6, 6).unwrap());
        assert_eq!(separate, in_place, "{}", f.name());
    }

    let mut separate = vec![0u32; 36];
    chain.apply(
        &Surface::packed(&src, 6, 6).unwrap(),
        &mut SurfaceMut::packed(&mut separate, 6, 6).unwrap(),
    );
    let mut in_place = src.clone();
    chain.apply_in_place(&mut SurfaceMut::packed(&mut in_place, 6, 6).unwrap());
    assert_eq!(separate, in_place);
}

#[test]
fn loads_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain.json");
    std::fs::write(&path, CHAIN_JSON).unwrap();
    let chain = FilterChain::from_path(&path).unwrap();
    assert_eq!(chain.filters.len(), 7);

    let missing = FilterChain::from_path(dir.path().join("missing.json")).unwrap_err();
    assert!(missing.to_string().contains("missing.json"));
}
