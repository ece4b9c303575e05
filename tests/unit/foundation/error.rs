use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SynthError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(SynthError::render("x").to_string().contains("render error:"));
    assert!(
        SynthError::dataset("x")
            .to_string()
            .contains("dataset error:")
    );
}

#[test]
fn only_coverage_and_render_are_transient() {
    let coverage = SynthError::Coverage {
        font: "a.ttf".to_string(),
        missing: ['x'].into_iter().collect(),
    };
    assert!(coverage.is_transient());
    assert!(SynthError::render("blank").is_transient());
    assert!(!SynthError::config("bad").is_transient());
    assert!(!SynthError::dataset("io").is_transient());
    let exhausted = SynthError::RetryExhausted {
        attempts: 3,
        last: Box::new(SynthError::render("blank")),
    };
    assert!(!exhausted.is_transient());
    assert!(exhausted.to_string().contains("3 attempts"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SynthError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_transient());
}
