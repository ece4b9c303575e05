use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn line() -> Line {
    Line {
        thickness: (2, 3),
        lr_in_offset: (1, 2),
        lr_out_offset: (3, 4),
        tb_in_offset: (1, 2),
        tb_out_offset: (3, 4),
        line_pos_p: default_line_pos_p(),
        color: Some(TextColorConfig::Fixed {
            rgba: [9, 9, 9, 255],
        }),
    }
}

fn text() -> (Canvas, BBox) {
    let canvas = Canvas::from_pixel(30, 10, Rgba([0, 0, 0, 255]));
    (canvas, BBox::new(0, 0, 30, 10))
}

#[test]
fn top_line_grows_canvas_above_text() {
    let (canvas, bbox) = text();
    let mut rng = StdRng::seed_from_u64(0);
    let (out, b) = line().apply_at(LinePosition::Top, canvas, bbox, &mut rng);
    // inner 1 + thickness 2 + outer 3
    assert_eq!(out.dimensions(), (30, 16));
    assert_eq!(b, BBox::new(0, 0, 30, 16));
    assert_eq!(out.get_pixel(0, 3).0, [9, 9, 9, 255]);
    assert_eq!(out.get_pixel(0, 4).0, [9, 9, 9, 255]);
    assert_eq!(out.get_pixel(0, 5).0, [255, 255, 255, 0]);
    assert_eq!(out.get_pixel(0, 6).0, [0, 0, 0, 255]);
}

#[test]
fn bottom_right_line_extends_both_edges() {
    let (canvas, bbox) = text();
    let mut rng = StdRng::seed_from_u64(0);
    let (out, b) = line().apply_at(LinePosition::BottomRight, canvas, bbox, &mut rng);
    assert_eq!(out.dimensions(), (36, 16));
    assert_eq!(b, BBox::new(0, 0, 36, 16));
    assert_eq!(out.get_pixel(5, 11).0, [9, 9, 9, 255]);
    assert_eq!(out.get_pixel(31, 2).0, [9, 9, 9, 255]);
}

#[test]
fn left_line_shifts_text_right() {
    let (canvas, bbox) = text();
    let mut rng = StdRng::seed_from_u64(0);
    let (out, b) = line().apply_at(LinePosition::Left, canvas, bbox, &mut rng);
    assert_eq!(out.dimensions(), (36, 10));
    assert_eq!(b, BBox::new(0, 0, 36, 10));
    assert_eq!(out.get_pixel(6, 0).0, [0, 0, 0, 255]);
    assert_eq!(out.get_pixel(3, 0).0, [9, 9, 9, 255]);
}

#[test]
fn middle_lines_keep_geometry() {
    let (canvas, bbox) = text();
    let mut rng = StdRng::seed_from_u64(0);
    let (out, b) = line().apply_at(LinePosition::HorizontalMiddle, canvas.clone(), bbox, &mut rng);
    assert_eq!(out.dimensions(), canvas.dimensions());
    assert_eq!(b, bbox);
    let (out, b) = line().apply_at(LinePosition::VerticalMiddle, canvas.clone(), bbox, &mut rng);
    assert_eq!(out.dimensions(), canvas.dimensions());
    assert_eq!(b, bbox);
}

#[test]
fn apply_picks_a_position() {
    let (canvas, bbox) = text();
    let mut rng = StdRng::seed_from_u64(3);
    let (out, b) = line().apply(canvas, bbox, &mut rng).unwrap();
    assert!(BBox::from_size(out.dimensions()).contains(&b));
}
