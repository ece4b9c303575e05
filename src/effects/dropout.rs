use image::Rgba;
use rand::RngCore;

use crate::effects::Effect;
use crate::foundation::core::{BBox, Canvas};
use crate::foundation::error::SynthResult;
use crate::foundation::random;

pub(crate) fn default_dropout_p() -> (f64, f64) {
    (0.2, 0.4)
}

pub(crate) fn default_num_line_horizontal() -> u32 {
    3
}

pub(crate) fn default_num_line_vertical() -> u32 {
    8
}

pub(crate) fn default_thickness() -> u32 {
    3
}

/// Each channel drops to a uniform value in `[0, v]`.
fn rand_pick(px: &mut Rgba<u8>, rng: &mut dyn RngCore) {
    for v in px.0.iter_mut() {
        *v = random::randint(rng, (0, i64::from(*v) + 1)) as u8;
    }
}

/// All four channels set to one low value; the pixel becomes nearly transparent.
fn fix_pick(px: &mut Rgba<u8>, rng: &mut dyn RngCore) {
    let v = random::randint(rng, (0, 21)) as u8;
    px.0 = [v, v, v, v];
}

/// Damage a random share of the non-transparent pixels.
#[derive(Clone, Debug)]
pub struct DropoutRand {
    pub dropout_p: (f64, f64),
}

impl Effect for DropoutRand {
    fn name(&self) -> &'static str {
        "dropout_rand"
    }

    fn apply(
        &self,
        mut canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> SynthResult<(Canvas, BBox)> {
        let visible = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p[3] != 0)
            .map(|(x, y, _)| (x, y))
            .collect::<Vec<_>>();
        let n = visible.len();
        let lo = (n as f64 * self.dropout_p.0) as i64;
        let hi = (n as f64 * self.dropout_p.1) as i64;
        let count = (random::randint(rng, (lo, hi + 1)) as usize).min(n);

        for i in rand::seq::index::sample(rng, n, count) {
            let (x, y) = visible[i];
            rand_pick(canvas.get_pixel_mut(x, y), rng);
        }
        Ok((canvas, bbox))
    }
}

/// Wipe full-width bands of rows.
#[derive(Clone, Debug)]
pub struct DropoutHorizontal {
    pub num_line: u32,
    pub thickness: u32,
}

impl Effect for DropoutHorizontal {
    fn name(&self) -> &'static str {
        "dropout_horizontal"
    }

    fn apply(
        &self,
        mut canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> SynthResult<(Canvas, BBox)> {
        let (w, h) = canvas.dimensions();
        if h <= self.thickness + 1 {
            return Ok((canvas, bbox));
        }
        for _ in 0..self.num_line {
            let row = random::randint(rng, (1, i64::from(h - self.thickness))) as u32;
            for y in row..row + self.thickness {
                for x in 0..w {
                    fix_pick(canvas.get_pixel_mut(x, y), rng);
                }
            }
        }
        Ok((canvas, bbox))
    }
}

/// Wipe full-height bands of columns.
#[derive(Clone, Debug)]
pub struct DropoutVertical {
    pub num_line: u32,
    pub thickness: u32,
}

impl Effect for DropoutVertical {
    fn name(&self) -> &'static str {
        "dropout_vertical"
    }

    fn apply(
        &self,
        mut canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> SynthResult<(Canvas, BBox)> {
        let (w, h) = canvas.dimensions();
        if w <= self.thickness + 1 {
            return Ok((canvas, bbox));
        }
        for _ in 0..self.num_line {
            let col = random::randint(rng, (1, i64::from(w - self.thickness))) as u32;
            for x in col..col + self.thickness {
                for y in 0..h {
                    fix_pick(canvas.get_pixel_mut(x, y), rng);
                }
            }
        }
        Ok((canvas, bbox))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/dropout.rs"]
mod tests;
