use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RetimeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(RetimeError::parse("x").to_string().contains("parse error:"));
    assert!(
        RetimeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(RetimeError::host("x").to_string().contains("host error:"));
    assert!(
        RetimeError::DegenerateInterval { frame: 12.0 }
            .to_string()
            .contains("frame 12")
    );
}

#[test]
fn only_degenerate_intervals_are_skippable() {
    assert!(RetimeError::DegenerateInterval { frame: 0.0 }.is_skippable());
    assert!(!RetimeError::CollisionResolutionExhausted { index: 3 }.is_skippable());
    assert!(!RetimeError::validation("x").is_skippable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RetimeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: RetimeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, RetimeError::Serde(_)));
}
