use rand::{SeedableRng, rngs::StdRng};

use super::*;

#[test]
fn prob_extremes_are_deterministic() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..200 {
        assert!(prob(&mut rng, 1.0));
        assert!(!prob(&mut rng, 0.0));
    }
}

#[test]
fn empty_ranges_collapse_to_low_bound() {
    let mut rng = StdRng::seed_from_u64(2);
    assert_eq!(uniform(&mut rng, (0.5, 0.5)), 0.5);
    assert_eq!(randint(&mut rng, (3, 3)), 3);
    for _ in 0..100 {
        let v = randint(&mut rng, (2, 5));
        assert!((2..5).contains(&v));
        let f = uniform(&mut rng, (-1.0, 1.0));
        assert!((-1.0..1.0).contains(&f));
    }
}

#[test]
fn clipped_normal_stays_within_three_sigma() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..1000 {
        let v = clipped_normal(&mut rng, 0.0, 4.0);
        assert!((-4.0..=4.0).contains(&v));
    }
    assert_eq!(clipped_normal(&mut rng, 0.0, 0.0), 0.0);
}

#[test]
fn xy_offset_keeps_small_rect_inside() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..100 {
        let (x, y) = random_xy_offset(&mut rng, (10, 4), (25, 9));
        assert!(x + 10 <= 25);
        assert!(y + 4 <= 9);
    }
    assert_eq!(random_xy_offset(&mut rng, (30, 30), (10, 10)), (0, 0));
}

#[test]
fn weighted_index_skips_zero_weights() {
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..200 {
        let i = weighted_index(&mut rng, &[0.0, 0.5, 0.0, 0.5]).unwrap();
        assert!(i == 1 || i == 3);
    }
    assert_eq!(weighted_index(&mut rng, &[]), None);
    assert_eq!(weighted_index(&mut rng, &[0.0, 0.0]), None);
}
