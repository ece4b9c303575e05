use super::*;

#[test]
fn solve_linear_small_system() {
    let a = [[2.0, 1.0], [1.0, 3.0]];
    let b = [5.0, 10.0];
    let x = solve_linear(a, b).unwrap();
    assert!((x[0] - 1.0).abs() < 1e-9);
    assert!((x[1] - 3.0).abs() < 1e-9);
}

#[test]
fn solve_linear_rejects_singular() {
    let a = [[1.0, 2.0], [2.0, 4.0]];
    assert!(solve_linear(a, [1.0, 2.0]).is_none());
}

#[test]
fn homography_maps_corners_onto_targets() {
    let src = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 5.0),
        Point::new(0.0, 5.0),
    ];
    let dst = [
        Point::new(2.0, 1.0),
        Point::new(14.0, 3.0),
        Point::new(12.5, 9.0),
        Point::new(1.0, 7.5),
    ];
    let m = homography_from_points(&src, &dst).unwrap();
    for (s, d) in src.iter().zip(dst.iter()) {
        let p = apply_homography(&m, *s);
        assert!((p.x - d.x).abs() < 1e-6, "{p:?} vs {d:?}");
        assert!((p.y - d.y).abs() < 1e-6, "{p:?} vs {d:?}");
    }
}

#[test]
fn cubic_weights_interpolate_exactly_at_knots() {
    assert_eq!(cubic_weight(0.0), 1.0);
    assert!(cubic_weight(1.0).abs() < 1e-12);
    assert!(cubic_weight(2.0).abs() < 1e-12);
    let sum: f64 = [-1.25, -0.25, 0.75, 1.75].iter().map(|t| cubic_weight(*t)).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u16(100, 128), 50);
}
