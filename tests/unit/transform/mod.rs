use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

#[test]
fn distribution_tag_selects_variant() {
    let cfg: PerspectiveConfig =
        serde_json::from_str(r#"{"distribution":"uniform","x":20,"y":4}"#).unwrap();
    let PerspectiveConfig::Uniform(b) = cfg else {
        panic!("expected uniform, got {cfg:?}");
    };
    assert_eq!((b.x, b.y, b.z, b.scale, b.fovy), (20.0, 4.0, 1.5, 1.0, 50.0));
}

#[test]
fn fixed_uses_configured_angles() {
    let cfg = PerspectiveConfig::Fixed(PerspectiveBounds {
        x: 15.0,
        y: 15.0,
        z: 1.2,
        ..PerspectiveBounds::default()
    });
    let mut rng = StdRng::seed_from_u64(0);
    let p = cfg.sample(&mut rng);
    assert_eq!((p.x, p.y, p.z), (15.0, 15.0, 1.2));
    assert_eq!(p.fovy, 50.0);
}

#[test]
fn sampled_angles_stay_within_bounds() {
    let bounds = PerspectiveBounds::default();
    let mut rng = StdRng::seed_from_u64(3);
    for cfg in [PerspectiveConfig::Uniform(bounds), PerspectiveConfig::Normal(bounds)] {
        for _ in 0..200 {
            let p = cfg.sample(&mut rng);
            assert!(p.x.abs() <= bounds.x);
            assert!(p.y.abs() <= bounds.y);
            assert!(p.z.abs() <= bounds.z);
        }
    }
}
