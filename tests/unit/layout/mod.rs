use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::test_support::sampled;

#[test]
fn config_defaults_to_same_line() {
    let cfg: LayoutConfig = serde_json::from_str(r#"{"type":"same_line"}"#).unwrap();
    match cfg {
        LayoutConfig::SameLine { h_spacing } => assert_eq!(h_spacing, (0.0, 1.0)),
        other => panic!("unexpected config: {other:?}"),
    }
    let cfg: LayoutConfig = serde_json::from_str(r#"{"type":"extra_text_line"}"#).unwrap();
    assert!(matches!(cfg, LayoutConfig::ExtraTextLine { bottom_prob } if bottom_prob == 0.5));
}

#[test]
fn build_rejects_bad_parameters() {
    let bad = LayoutConfig::SameLine {
        h_spacing: (1.0, 0.5),
    };
    assert!(matches!(bad.build(), Err(SynthError::Config(_))));
    let bad = LayoutConfig::ExtraTextLine { bottom_prob: 1.5 };
    assert!(matches!(bad.build(), Err(SynthError::Config(_))));
}

#[test]
fn apply_layout_concatenates_labels() {
    let layout = LayoutConfig::default().build().unwrap();
    let texts = [sampled("ab"), sampled("cd")];
    let boxes = vec![BBox::from_size((10, 8)), BBox::from_size((12, 8))];
    let mut rng = StdRng::seed_from_u64(0);
    let (placed, label) = apply_layout(layout.as_ref(), &texts, &boxes, boxes.clone(), &mut rng).unwrap();
    assert_eq!(placed.len(), 2);
    assert_eq!(label, "abcd");
}
