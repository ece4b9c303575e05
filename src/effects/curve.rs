use std::f64::consts::TAU;

use rand::RngCore;

use crate::effects::Effect;
use crate::foundation::core::{BBox, Canvas, transparent_canvas};
use crate::foundation::error::SynthResult;
use crate::foundation::random;

/// Bend the text along a sine wave: column `x` moves down by `amplitude * sin(2π x / period)`.
///
/// The canvas grows vertically by the extreme shifts so nothing is clipped, and the bbox spans
/// the shifted text columns.
#[derive(Clone, Debug)]
pub struct Curve {
    pub period: f64, // pixels per full wave
    pub amplitude: (f64, f64), // [min, max)
}

pub(crate) fn default_period() -> f64 {
    180.0
}

pub(crate) fn default_amplitude() -> (f64, f64) {
    (1.0, 5.0)
}

impl Curve {
    fn column_offsets(&self, width: u32, amplitude: f64) -> Vec<i32> {
        (0..width)
            .map(|x| (amplitude * (TAU * f64::from(x) / self.period).sin()).round() as i32)
            .collect()
    }
}

impl Effect for Curve {
    fn name(&self) -> &'static str {
        "curve"
    }

    fn apply(
        &self,
        canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> SynthResult<(Canvas, BBox)> {
        let amplitude = random::uniform(rng, self.amplitude);
        let (w, h) = canvas.dimensions();
        let offsets = self.column_offsets(w, amplitude);
        let lowest = offsets.iter().copied().min().unwrap_or(0).min(0);
        let highest = offsets.iter().copied().max().unwrap_or(0).max(0);
        let shift = -lowest;

        let mut out = transparent_canvas(w, h + (highest - lowest) as u32);
        for (x, off) in (0..w).zip(&offsets) {
            let dy = shift + off;
            for y in 0..h {
                out.put_pixel(x, (y as i32 + dy) as u32, *canvas.get_pixel(x, y));
            }
        }

        let left = bbox.left.clamp(0, w as i32) as usize;
        let right = (bbox.right.clamp(0, w as i32) as usize).max(left);
        let text_offsets = &offsets[left..right];
        let top = text_offsets.iter().copied().min().unwrap_or(0);
        let bottom = text_offsets.iter().copied().max().unwrap_or(0);
        let out_bbox = BBox::new(
            bbox.left,
            bbox.top + shift + top,
            bbox.right,
            bbox.bottom + shift + bottom,
        );
        Ok((out, out_bbox))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/curve.rs"]
mod tests;
