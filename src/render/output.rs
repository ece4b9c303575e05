//! Final image assembly: background/mask triptych, grayscale and height normalization.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

use crate::foundation::core::Canvas;
use crate::foundation::math::mul_div255_u8;

/// Drop alpha. Rendered images are composited onto opaque backgrounds, so nothing is lost.
pub fn to_rgb(canvas: &Canvas) -> RgbImage {
    RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let [r, g, b, _] = canvas.get_pixel(x, y).0;
        Rgb([r, g, b])
    })
}

/// Gray level of `canvas` as if composited over white.
pub fn mask_gray(canvas: &Canvas) -> GrayImage {
    GrayImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let [r, g, b, a] = canvas.get_pixel(x, y).0;
        let inv = 255 - u16::from(a);
        let on_white =
            |c: u8| mul_div255_u8(u16::from(c), u16::from(a)).saturating_add(mul_div255_u8(255, inv));
        Luma([luma(on_white(r), on_white(g), on_white(b))])
    })
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let v = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((v + 500) / 1000).min(255) as u8
}

/// Threshold maximizing between-class variance of `gray`'s histogram.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut hist = [0u64; 256];
    for p in gray.pixels() {
        hist[usize::from(p.0[0])] += 1;
    }
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return 0;
    }
    let sum_all: f64 = hist.iter().enumerate().map(|(i, &n)| i as f64 * n as f64).sum();

    let mut best = (0u8, -1.0f64);
    let mut w_bg = 0u64;
    let mut sum_bg = 0.0f64;
    for (t, &n) in hist.iter().enumerate() {
        w_bg += n;
        if w_bg == 0 {
            continue;
        }
        let w_fg = total - w_bg;
        if w_fg == 0 {
            break;
        }
        sum_bg += t as f64 * n as f64;
        let mean_bg = sum_bg / w_bg as f64;
        let mean_fg = (sum_all - sum_bg) / w_fg as f64;
        let between = w_bg as f64 * w_fg as f64 * (mean_bg - mean_fg).powi(2);
        if between > best.1 {
            best = (t as u8, between);
        }
    }
    best.0
}

/// White text on black: pixels darker than or equal to the Otsu threshold become 255.
pub fn binarize_inverted(gray: &GrayImage) -> GrayImage {
    let t = otsu_threshold(gray);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([if gray.get_pixel(x, y).0[0] > t { 0 } else { 255 }])
    })
}

/// `[image | background | binarized mask]` side by side. All three share `image`'s size.
pub fn triptych(image: &Canvas, bg: &Canvas, mask: &Canvas) -> RgbImage {
    let (w, h) = image.dimensions();
    let mut out = RgbImage::new(w * 3, h);
    imageops::replace(&mut out, &to_rgb(image), 0, 0);
    imageops::replace(&mut out, &to_rgb(bg), i64::from(w), 0);
    let bin = DynamicImage::ImageLuma8(binarize_inverted(&mask_gray(mask))).to_rgb8();
    imageops::replace(&mut out, &bin, 2 * i64::from(w), 0);
    out
}

/// Optional grayscale conversion, then an aspect-preserving resize to `height` (`-1` skips it).
pub fn normalize(image: RgbImage, gray: bool, height: i32) -> DynamicImage {
    let img = if gray {
        DynamicImage::ImageLuma8(GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let [r, g, b] = image.get_pixel(x, y).0;
            Luma([luma(r, g, b)])
        }))
    } else {
        DynamicImage::ImageRgb8(image)
    };

    let (w, h) = (img.width(), img.height());
    if height <= 0 || height as u32 == h {
        return img;
    }
    let target_h = height as u32;
    let ratio = f64::from(h) / f64::from(target_h);
    let target_w = ((f64::from(w) / ratio).floor() as u32).max(1);
    img.resize_exact(target_w, target_h, FilterType::CatmullRom)
}

#[cfg(test)]
#[path = "../../tests/unit/render/output.rs"]
mod tests;
