use image::GrayImage;
use rand::RngCore;

use crate::effects::Effect;
use crate::foundation::core::{BBox, Canvas, Rgba8};
use crate::foundation::error::SynthResult;
use crate::foundation::random;
use crate::render::color::TextColorConfig;
use crate::render::composite::over;

/// Pixels at least this opaque count as text when outlining.
const TEXT_ALPHA: u8 = 128;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Outline the text with a border `border_width` pixels wide.
///
/// Without an explicit `color` the border is a lighter or darker shade of the mean text color.
/// The bbox grows by the border width, clipped to the canvas.
#[derive(Clone, Debug)]
pub struct TextBorder {
    pub border_width: (u32, u32), // [min, max)
    pub style: BorderStyle,
    pub blur_radius: f32,
    pub color: Option<TextColorConfig>,
    pub light_enable: bool,
    pub dark_enable: bool,
    pub light_fraction: f64,
}

pub(crate) fn default_border_width() -> (u32, u32) {
    (1, 3)
}

impl TextBorder {
    fn border_color(&self, canvas: &Canvas, text: &GrayImage, rng: &mut dyn RngCore) -> Rgba8 {
        if let Some(color) = &self.color {
            return color.get_color(canvas, rng);
        }
        let [r, g, b] = mean_text_color(canvas, text);
        let light = match (self.light_enable, self.dark_enable) {
            (false, false) => return [0, 0, 0, 255],
            (true, false) => true,
            (false, true) => false,
            (true, true) => random::prob(rng, self.light_fraction),
        };
        let factor = if light { 1.5 } else { 0.5 };
        let shade = |c: u8| (f64::from(c) * factor).min(255.0) as u8;
        [shade(r), shade(g), shade(b), 255]
    }

    fn keeps(&self, x: u32, y: u32, width: u32) -> bool {
        match self.style {
            BorderStyle::Solid => true,
            BorderStyle::Dashed => (x + y) % (3 * width) < 2 * width,
            BorderStyle::Dotted => {
                let dot = (width / 2).max(1);
                x % (2 * width) < dot && y % (2 * width) < dot
            }
        }
    }
}

fn text_mask(canvas: &Canvas) -> GrayImage {
    GrayImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        image::Luma([if canvas.get_pixel(x, y)[3] >= TEXT_ALPHA { 255 } else { 0 }])
    })
}

fn mean_text_color(canvas: &Canvas, text: &GrayImage) -> [u8; 3] {
    let mut sum = [0u64; 3];
    let mut n = 0u64;
    for (p, m) in canvas.pixels().zip(text.pixels()) {
        if m[0] > 0 {
            for i in 0..3 {
                sum[i] += u64::from(p[i]);
            }
            n += 1;
        }
    }
    if n == 0 {
        return [0, 0, 0];
    }
    sum.map(|s| (s / n) as u8)
}

/// One step of 4-connected binary dilation.
fn dilate(mask: &GrayImage) -> GrayImage {
    let (w, h) = mask.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let hit = mask.get_pixel(x, y)[0] > 0
            || (x > 0 && mask.get_pixel(x - 1, y)[0] > 0)
            || (y > 0 && mask.get_pixel(x, y - 1)[0] > 0)
            || (x + 1 < w && mask.get_pixel(x + 1, y)[0] > 0)
            || (y + 1 < h && mask.get_pixel(x, y + 1)[0] > 0);
        image::Luma([if hit { 255 } else { 0 }])
    })
}

impl Effect for TextBorder {
    fn name(&self) -> &'static str {
        "text_border"
    }

    fn apply(
        &self,
        canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> SynthResult<(Canvas, BBox)> {
        let width = random::randint(
            rng,
            (i64::from(self.border_width.0), i64::from(self.border_width.1)),
        )
        .max(1) as u32;
        let text = text_mask(&canvas);
        if !text.pixels().any(|p| p[0] > 0) {
            return Ok((canvas, bbox));
        }
        let color = self.border_color(&canvas, &text, rng);

        let mut grown = text.clone();
        for _ in 0..width {
            grown = dilate(&grown);
        }

        let mut out = canvas;
        for (x, y, px) in out.enumerate_pixels_mut() {
            let border = grown.get_pixel(x, y)[0] > 0 && text.get_pixel(x, y)[0] == 0;
            if border && self.keeps(x, y, width) {
                px.0 = over(px.0, color);
            }
        }
        if self.blur_radius > 0.0 {
            out = image::imageops::blur(&out, self.blur_radius);
        }

        let (w, h) = (out.width() as i32, out.height() as i32);
        let pad = width as i32;
        let out_bbox = BBox::new(
            (bbox.left - pad).max(0),
            (bbox.top - pad).max(0),
            (bbox.right + pad).min(w),
            (bbox.bottom + pad).min(h),
        );
        Ok((out, out_bbox))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/text_border.rs"]
mod tests;
