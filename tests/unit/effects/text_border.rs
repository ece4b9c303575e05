use image::Rgba;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::foundation::core::transparent_canvas;

const RED: Rgba8 = [255, 0, 0, 255];

fn square(color: Rgba8) -> (Canvas, BBox) {
    let mut canvas = transparent_canvas(30, 30);
    for x in 10..20 {
        for y in 10..20 {
            canvas.put_pixel(x, y, Rgba(color));
        }
    }
    (canvas, BBox::new(10, 10, 20, 20))
}

fn border(style: BorderStyle, color: Option<TextColorConfig>) -> TextBorder {
    TextBorder {
        border_width: (2, 3),
        style,
        blur_radius: 0.0,
        color,
        light_enable: true,
        dark_enable: true,
        light_fraction: 0.5,
    }
}

fn count(canvas: &Canvas, color: Rgba8) -> usize {
    canvas.pixels().filter(|p| p.0 == color).count()
}

#[test]
fn solid_border_surrounds_text_within_width() {
    let (canvas, bbox) = square([0, 0, 0, 255]);
    let effect = border(BorderStyle::Solid, Some(TextColorConfig::Fixed { rgba: RED }));
    let mut rng = StdRng::seed_from_u64(1);
    let (out, b) = effect.apply(canvas, bbox, &mut rng).unwrap();

    assert_eq!(out.get_pixel(15, 15).0, [0, 0, 0, 255]);
    assert_eq!(out.get_pixel(9, 15).0, RED);
    assert_eq!(out.get_pixel(8, 15).0, RED);
    assert_eq!(out.get_pixel(7, 15).0[3], 0);
    assert_eq!(out.get_pixel(9, 9).0, RED);
    assert_eq!(out.get_pixel(8, 8).0[3], 0);

    assert_eq!(b, BBox::new(8, 8, 22, 22));
    for (x, y, p) in out.enumerate_pixels() {
        if p[3] > 0 {
            let (x, y) = (x as i32, y as i32);
            assert!(x >= b.left && x < b.right && y >= b.top && y < b.bottom);
        }
    }
}

#[test]
fn dashed_and_dotted_draw_less_than_solid() {
    let fixed = Some(TextColorConfig::Fixed { rgba: RED });
    let mut drawn = Vec::new();
    for style in [BorderStyle::Solid, BorderStyle::Dashed, BorderStyle::Dotted] {
        let (canvas, bbox) = square([0, 0, 0, 255]);
        let mut rng = StdRng::seed_from_u64(4);
        let (out, _) = border(style, fixed.clone()).apply(canvas, bbox, &mut rng).unwrap();
        drawn.push(count(&out, RED));
    }
    assert!(drawn[0] > 0);
    assert!(drawn[1] > 0 && drawn[1] < drawn[0]);
    assert!(drawn[2] > 0 && drawn[2] < drawn[0]);
}

#[test]
fn default_color_is_a_darker_shade_of_the_text() {
    let (canvas, bbox) = square([100, 120, 140, 255]);
    let mut effect = border(BorderStyle::Solid, None);
    effect.light_enable = false;
    let mut rng = StdRng::seed_from_u64(9);
    let (out, _) = effect.apply(canvas, bbox, &mut rng).unwrap();
    assert_eq!(out.get_pixel(9, 15).0, [50, 60, 70, 255]);
}

#[test]
fn canvas_without_text_is_untouched() {
    let canvas = transparent_canvas(12, 12);
    let bbox = BBox::from_size(canvas.dimensions());
    let mut rng = StdRng::seed_from_u64(0);
    let (out, b) = border(BorderStyle::Solid, None)
        .apply(canvas.clone(), bbox, &mut rng)
        .unwrap();
    assert_eq!(out, canvas);
    assert_eq!(b, bbox);
}
