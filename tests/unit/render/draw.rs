use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::test_support::sampled;

const BLACK: Rgba8 = [0, 0, 0, 255];

fn inked(canvas: &Canvas) -> usize {
    canvas.pixels().filter(|p| p.0[3] > 0).count()
}

#[test]
fn natural_run_is_cropped_to_ink() {
    let mut rng = StdRng::seed_from_u64(0);
    let canvas = draw_text(&sampled("Hello"), BLACK, None, &mut rng).unwrap();
    assert!(canvas.width() > canvas.height());
    assert!(inked(&canvas) > 0);
    let first_col = (0..canvas.height()).any(|y| canvas.get_pixel(0, y).0[3] > 0);
    let first_row = (0..canvas.width()).any(|x| canvas.get_pixel(x, 0).0[3] > 0);
    assert!(first_col && first_row);
}

#[test]
fn spacing_widens_the_canvas() {
    let mut rng = StdRng::seed_from_u64(1);
    let text = sampled("abc");
    let tight = draw_text(&text, BLACK, Some(&CharSpacing::Fixed(0.0)), &mut rng).unwrap();
    let wide = draw_text(&text, BLACK, Some(&CharSpacing::Fixed(1.0)), &mut rng).unwrap();
    assert_eq!(tight.height(), wide.height());
    assert_eq!(wide.width(), tight.width() + 2 * tight.height());
}

#[test]
fn negative_fixed_spacing_means_natural_run() {
    let mut rng = StdRng::seed_from_u64(2);
    let text = sampled("abc");
    let natural = draw_text(&text, BLACK, None, &mut rng).unwrap();
    let disabled = draw_text(&text, BLACK, Some(&CharSpacing::Fixed(-1.0)), &mut rng).unwrap();
    assert_eq!(natural.dimensions(), disabled.dimensions());
}

#[test]
fn vertical_text_is_rotated_into_a_wide_canvas() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut text = sampled("abcd");
    text.horizontal = false;
    let canvas = draw_text(&text, BLACK, None, &mut rng).unwrap();
    assert!(canvas.width() > canvas.height());
    assert!(inked(&canvas) > 0);
}

#[test]
fn blank_text_is_a_render_error() {
    let mut rng = StdRng::seed_from_u64(4);
    let err = draw_text(&sampled("   "), BLACK, None, &mut rng).unwrap_err();
    assert!(err.is_transient());
    assert!(draw_text(&sampled(""), BLACK, None, &mut rng).is_err());
}

#[test]
fn color_alpha_bounds_ink_alpha() {
    let mut rng = StdRng::seed_from_u64(5);
    let canvas = draw_text(&sampled("H"), [10, 20, 30, 128], None, &mut rng).unwrap();
    assert!(canvas.pixels().all(|p| p.0[3] <= 128));
    assert!(canvas.pixels().any(|p| p.0[3] == 128 && p.0[..3] == [10, 20, 30]));
}
