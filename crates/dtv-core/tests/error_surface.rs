use dtv_core::errors::{DtvError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("trial", "12")
        .with_context("cue", "elephant")
}

#[test]
fn config_error_surface() {
    let err = DtvError::Config(sample_info("bad-ratio", "ratio outside unit interval"));
    assert_eq!(err.info().code, "bad-ratio");
    assert!(err.info().context.contains_key("trial"));
}

#[test]
fn stimuli_error_surface() {
    let err = DtvError::Stimuli(sample_info("duplicate-id", "proposition id repeated"));
    assert_eq!(err.info().code, "duplicate-id");
    assert!(err.info().context.contains_key("cue"));
}

#[test]
fn design_error_surface() {
    let err = DtvError::Design(sample_info("empty-factor", "factor has no levels"));
    assert_eq!(err.info().code, "empty-factor");
}

#[test]
fn content_error_surface() {
    let err = DtvError::Content(sample_info("pool-exhausted", "no eligible proposition"));
    assert_eq!(err.info().code, "pool-exhausted");
}

#[test]
fn session_error_surface() {
    let err = DtvError::Session(sample_info("data-file-exists", "refusing to overwrite"));
    assert_eq!(err.info().code, "data-file-exists");
}

#[test]
fn serde_error_surface() {
    let err = DtvError::Serde(sample_info("manifest-encode", "serialization failed"));
    assert_eq!(err.info().code, "manifest-encode");
}

#[test]
fn context_can_be_added_after_construction() {
    let err = DtvError::Content(ErrorInfo::new("pool-exhausted", "no eligible proposition"))
        .with_context("feat_type", "visual");
    assert_eq!(
        err.info().context.get("feat_type").map(String::as_str),
        Some("visual")
    );
}

#[test]
fn display_includes_code_and_context() {
    let err = DtvError::Config(
        ErrorInfo::new("bad-ratio", "ratio outside unit interval").with_context("ratio", "1.5"),
    );
    let rendered = err.to_string();
    assert!(rendered.contains("config error"));
    assert!(rendered.contains("[bad-ratio]"));
    assert!(rendered.contains("ratio=1.5"));
}

#[test]
fn errors_round_trip_through_json() {
    let err = DtvError::Content(sample_info("pool-exhausted", "no eligible proposition"));
    let json = serde_json::to_string(&err).expect("serialize");
    let decoded: DtvError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
