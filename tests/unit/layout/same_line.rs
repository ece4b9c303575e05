use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

#[test]
fn zero_spacing_chains_centers() {
    let layout = SameLineLayout {
        h_spacing: (0.0, 0.0),
    };
    let boxes = vec![BBox::from_size((30, 20)), BBox::from_size((40, 20))];
    let mut rng = StdRng::seed_from_u64(1);
    let out = layout.apply(&boxes, boxes.clone(), &mut rng).unwrap();
    assert_eq!(out[0], BBox::new(0, 0, 30, 20));
    assert_eq!(out[1].left_cnt(), out[0].right_cnt());
    assert_eq!(out[1], BBox::new(30, 0, 70, 20));
}

#[test]
fn spacing_is_bounded_by_average_height() {
    let layout = SameLineLayout {
        h_spacing: (0.5, 1.0),
    };
    let boxes = vec![
        BBox::from_size((30, 20)),
        BBox::from_size((30, 20)),
        BBox::from_size((30, 20)),
    ];
    let mut rng = StdRng::seed_from_u64(2);
    let out = layout.apply(&boxes, boxes.clone(), &mut rng).unwrap();
    for pair in out.windows(2) {
        let gap = pair[0].width() - 30;
        assert!((10..=20).contains(&gap), "gap {gap}");
        assert_eq!(pair[1].left, pair[0].right);
    }
    assert_eq!(out[2].width(), 30);
}

#[test]
fn mixed_heights_share_a_center_line() {
    let layout = SameLineLayout {
        h_spacing: (0.0, 0.0),
    };
    let boxes = vec![BBox::from_size((10, 10)), BBox::from_size((10, 30))];
    let mut rng = StdRng::seed_from_u64(3);
    let out = layout.apply(&boxes, boxes.clone(), &mut rng).unwrap();
    assert_eq!(out[0].cy(), out[1].cy());
    assert!(out.iter().all(|b| b.top >= 0));
}

#[test]
fn empty_input_is_rejected() {
    let layout = SameLineLayout {
        h_spacing: (0.0, 1.0),
    };
    let mut rng = StdRng::seed_from_u64(4);
    assert!(layout.apply(&[], vec![], &mut rng).is_err());
}
