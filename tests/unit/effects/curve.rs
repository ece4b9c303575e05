use image::Rgba;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn ink_block() -> (Canvas, BBox) {
    let mut canvas = transparent_canvas(120, 20);
    for x in 10..110 {
        for y in 5..15 {
            canvas.put_pixel(x, y, Rgba([20, 20, 20, 255]));
        }
    }
    (canvas, BBox::new(10, 5, 110, 15))
}

fn ink(canvas: &Canvas) -> Vec<(u32, u32)> {
    canvas
        .enumerate_pixels()
        .filter(|(_, _, p)| p[3] > 0)
        .map(|(x, y, _)| (x, y))
        .collect()
}

#[test]
fn bbox_covers_every_shifted_pixel() {
    let (canvas, bbox) = ink_block();
    let curve = Curve {
        period: 60.0,
        amplitude: (3.0, 6.0),
    };
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..10 {
        let (out, b) = curve.apply(canvas.clone(), bbox, &mut rng).unwrap();
        assert_eq!(out.width(), canvas.width());
        assert!(out.height() > canvas.height());
        assert!(BBox::from_size(out.dimensions()).contains(&b));

        let pixels = ink(&out);
        assert_eq!(pixels.len(), 100 * 10);
        for (x, y) in pixels {
            let (x, y) = (x as i32, y as i32);
            assert!(
                x >= b.left && x < b.right && y >= b.top && y < b.bottom,
                "({x}, {y}) outside {b:?}"
            );
        }
    }
}

#[test]
fn sub_pixel_amplitude_leaves_text_in_place() {
    let (canvas, bbox) = ink_block();
    let curve = Curve {
        period: 60.0,
        amplitude: (0.0, 0.4),
    };
    let mut rng = StdRng::seed_from_u64(3);
    let (out, b) = curve.apply(canvas.clone(), bbox, &mut rng).unwrap();
    assert_eq!(out, canvas);
    assert_eq!(b, bbox);
}
