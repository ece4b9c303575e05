use image::Rgba;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::math::mul_div255_u8;

/// Straight-alpha source-over.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255 - sa;
    let da = u16::from(mul_div255_u8(u16::from(dst[3]), inv));
    let out_a = sa + da;
    if out_a == 0 {
        return dst;
    }

    let mut out = [0u8; 4];
    out[3] = out_a.min(255) as u8;
    for i in 0..3 {
        let num = u32::from(src[i]) * u32::from(sa) + u32::from(dst[i]) * u32::from(da);
        out[i] = ((num + u32::from(out_a) / 2) / u32::from(out_a)).min(255) as u8;
    }
    out
}

/// Composite `src` over `dst` with its left-top corner at `at`; pixels outside `dst` are clipped.
pub fn paste_over(dst: &mut Canvas, src: &Canvas, at: (i64, i64)) {
    for_each_overlap(dst, src, at, |d, s| {
        d.0 = over(d.0, s.0);
    });
}

/// Copy `src` into `dst` at `at`, replacing pixels, alpha included.
pub fn paste(dst: &mut Canvas, src: &Canvas, at: (i64, i64)) {
    for_each_overlap(dst, src, at, |d, s| {
        *d = *s;
    });
}

fn for_each_overlap(
    dst: &mut Canvas,
    src: &Canvas,
    at: (i64, i64),
    mut f: impl FnMut(&mut Rgba<u8>, &Rgba<u8>),
) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));
    let x0 = at.0.max(0);
    let y0 = at.1.max(0);
    let x1 = (at.0 + sw).min(dw);
    let y1 = (at.1 + sh).min(dh);
    for y in y0..y1 {
        for x in x0..x1 {
            let s = src.get_pixel((x - at.0) as u32, (y - at.1) as u32);
            f(dst.get_pixel_mut(x as u32, y as u32), s);
        }
    }
}

/// Copy of the `(x, y, w, h)` region. The region must lie inside `canvas`.
pub fn crop(canvas: &Canvas, x: u32, y: u32, w: u32, h: u32) -> Canvas {
    image::imageops::crop_imm(canvas, x, y, w, h).to_image()
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
