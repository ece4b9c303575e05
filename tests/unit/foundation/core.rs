use super::*;

#[test]
fn offset_left_cnt_onto_right_cnt() {
    let a = BBox::new(0, 0, 100, 32);
    let mut b = BBox::new(0, 0, 50, 16);
    b.offset_mut(b.left_cnt(), a.right_cnt());
    assert_eq!(b, BBox::new(100, 8, 150, 24));
}

#[test]
fn offset_moves_anchor_exactly_and_keeps_size() {
    let b = BBox::new(-3, 7, 41, 20);
    let targets = [(0, 0), (-15, 9), (120, -40)];
    let anchors: [fn(&BBox) -> Point; 9] = [
        BBox::left_top,
        BBox::right_top,
        BBox::right_bottom,
        BBox::left_bottom,
        BBox::left_cnt,
        BBox::right_cnt,
        BBox::top_cnt,
        BBox::bottom_cnt,
        BBox::center,
    ];
    for t in targets {
        for anchor in anchors {
            let moved = b.offset(anchor(&b), t);
            assert_eq!(anchor(&moved), t);
            assert_eq!(moved.width(), b.width());
            assert_eq!(moved.height(), b.height());
        }
    }
    // the source box is untouched by the copying variant
    assert_eq!(b, BBox::new(-3, 7, 41, 20));
}

#[test]
fn move_origin_is_offset_from_zero() {
    let b = BBox::new(2, 3, 12, 13);
    assert_eq!(b.move_origin((5, 6)), BBox::new(7, 9, 17, 19));
    let mut c = b;
    c.move_origin_mut((5, 6));
    assert_eq!(c, b.offset((0, 0), (5, 6)));
}

#[test]
fn from_bboxes_contains_inputs_and_clamps_low_edges() {
    let boxes = [
        BBox::new(5, 5, 20, 10),
        BBox::new(30, 2, 60, 40),
        BBox::new(10, 12, 15, 18),
    ];
    let hull = BBox::from_bboxes(&boxes).unwrap();
    assert_eq!(hull, BBox::new(5, 2, 60, 40));
    for b in &boxes {
        assert!(hull.contains(b));
    }

    let negative = [BBox::new(-10, -4, 5, 5), BBox::new(0, 0, 3, 3)];
    let hull = BBox::from_bboxes(&negative).unwrap();
    assert_eq!(hull, BBox::new(0, 0, 5, 5));

    assert!(BBox::from_bboxes(&[]).is_none());
}

#[test]
fn accessors_follow_floor_division() {
    let b = BBox::new(-3, -3, 0, 0);
    assert_eq!(b.cx(), -2);
    assert_eq!(b.cy(), -2);
    let b = BBox::from_size((7, 5));
    assert_eq!(b.center(), (3, 2));
    assert_eq!(b.size(), (7, 5));
    assert_eq!(b.pnts(), [(0, 0), (7, 0), (7, 5), (0, 5)]);
}

#[test]
fn transparent_canvas_is_never_empty() {
    let c = transparent_canvas(0, 3);
    assert_eq!(c.dimensions(), (1, 3));
    assert!(c.pixels().all(|p| p.0[3] == 0));
}
