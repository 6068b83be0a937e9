use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FilterError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FilterError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(FilterError::image("x").to_string().contains("image error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FilterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
