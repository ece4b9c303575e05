use rand::RngCore;

use crate::effects::Effect;
use crate::foundation::core::{BBox, Canvas, transparent_canvas};
use crate::foundation::error::SynthResult;
use crate::foundation::random;
use crate::render::composite::paste;

/// Grow the canvas by a random transparent margin and place the old canvas randomly inside it.
#[derive(Clone, Debug)]
pub struct Padding {
    pub w_ratio: (f64, f64), // [min, max)
    pub h_ratio: (f64, f64), // [min, max)
}

pub(crate) fn default_w_ratio() -> (f64, f64) {
    (0.0, 0.05)
}

pub(crate) fn default_h_ratio() -> (f64, f64) {
    (0.0, 0.3)
}

impl Effect for Padding {
    fn name(&self) -> &'static str {
        "padding"
    }

    fn apply(
        &self,
        canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> SynthResult<(Canvas, BBox)> {
        let (w, h) = canvas.dimensions();
        let w_ratio = random::uniform(rng, self.w_ratio);
        let h_ratio = random::uniform(rng, self.h_ratio);
        let new_w = (w as f64 + w as f64 * w_ratio) as u32;
        let new_h = (h as f64 + h as f64 * h_ratio) as u32;

        let mut out = transparent_canvas(new_w.max(w), new_h.max(h));
        let (x, y) = random::random_xy_offset(rng, (w, h), out.dimensions());
        paste(&mut out, &canvas, (i64::from(x), i64::from(y)));
        Ok((out, bbox.move_origin((x as i32, y as i32))))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/padding.rs"]
mod tests;
