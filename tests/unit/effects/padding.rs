use image::Rgba;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

#[test]
fn padding_grows_canvas_and_moves_bbox_with_content() {
    let mut canvas = transparent_canvas(40, 20);
    for x in 5..35 {
        for y in 4..16 {
            canvas.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
    }
    let bbox = BBox::new(5, 4, 35, 16);
    let padding = Padding {
        w_ratio: (0.5, 0.6),
        h_ratio: (0.5, 0.6),
    };
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..20 {
        let (out, b) = padding.apply(canvas.clone(), bbox, &mut rng).unwrap();
        assert!(out.width() >= 60 && out.width() < 64);
        assert!(out.height() >= 30 && out.height() < 32);
        assert_eq!(b.size(), bbox.size());
        assert!(BBox::from_size(out.dimensions()).contains(&b));
        assert_eq!(out.get_pixel(b.left as u32, b.top as u32)[3], 255);
        assert_eq!(out.get_pixel(b.right as u32 - 1, b.bottom as u32 - 1)[3], 255);
    }
}
