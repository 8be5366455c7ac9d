use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TowerError::invalid_geometry("x")
            .to_string()
            .contains("invalid geometry:")
    );
    assert!(
        TowerError::transport("x")
            .to_string()
            .contains("transport failure:")
    );
    assert!(
        TowerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TowerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn render_failed_keeps_remote_text_verbatim() {
    let err = TowerError::render_failed("buffer overflow");
    match &err {
        TowerError::RenderFailed(msg) => assert_eq!(msg, "buffer overflow"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "render failed: buffer overflow");
}

#[test]
fn io_errors_become_transport_failures() {
    let err: TowerError = std::io::Error::other("connection reset").into();
    assert!(matches!(err, TowerError::TransportFailure(ref m) if m.contains("connection reset")));
}

#[test]
fn entry_index_error_names_layer_and_count() {
    let err = TowerError::InvalidEntryIndex {
        layer: LayerId(3),
        entry: 7,
        count: 2,
    };
    let text = err.to_string();
    assert!(text.contains("entry 7"));
    assert!(text.contains("layer 3"));
    assert!(text.contains("2 entries"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TowerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
