use image::Rgba;
use rand::RngCore;

use crate::effects::Effect;
use crate::foundation::core::{BBox, Canvas, Rgba8, transparent_canvas};
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random;
use crate::render::color::TextColorConfig;
use crate::render::composite::paste;

pub(crate) fn default_thickness() -> (u32, u32) {
    (1, 3)
}

pub(crate) fn default_lr_in_offset() -> (u32, u32) {
    (0, 10)
}

pub(crate) fn default_lr_out_offset() -> (u32, u32) {
    (0, 5)
}

pub(crate) fn default_tb_in_offset() -> (u32, u32) {
    (0, 3)
}

pub(crate) fn default_tb_out_offset() -> (u32, u32) {
    (0, 3)
}

pub(crate) fn default_line_pos_p() -> [f64; 10] {
    [0.1; 10]
}

/// Where a [`Line`] is drawn, in `line_pos_p` order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinePosition {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    HorizontalMiddle,
    VerticalMiddle,
}

impl LinePosition {
    pub const ALL: [LinePosition; 10] = [
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::HorizontalMiddle,
        Self::VerticalMiddle,
    ];
}

/// Draw a line along (or across) the text. Edge lines grow the canvas and the bbox to include
/// themselves; middle lines are drawn in place.
#[derive(Clone, Debug)]
pub struct Line {
    pub thickness: (u32, u32),
    pub lr_in_offset: (u32, u32),
    pub lr_out_offset: (u32, u32),
    pub tb_in_offset: (u32, u32),
    pub tb_out_offset: (u32, u32),
    pub line_pos_p: [f64; 10],
    pub color: Option<TextColorConfig>,
}

struct Band {
    inner: u32,
    thickness: u32,
    outer: u32,
}

impl Band {
    fn total(&self) -> u32 {
        self.inner + self.thickness + self.outer
    }
}

fn pick(rng: &mut dyn RngCore, r: (u32, u32)) -> u32 {
    random::randint(rng, (i64::from(r.0), i64::from(r.1))) as u32
}

/// Overwrite the `[x0, x1) x [y0, y1)` rectangle, clipped to the canvas.
fn fill_rect(canvas: &mut Canvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba8) {
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    for y in y0.max(0)..y1.min(h) {
        for x in x0.max(0)..x1.min(w) {
            canvas.put_pixel(x as u32, y as u32, Rgba(color));
        }
    }
}

impl Line {
    pub fn apply_at(
        &self,
        pos: LinePosition,
        canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> (Canvas, BBox) {
        match pos {
            LinePosition::Top => self.top(canvas, bbox, rng),
            LinePosition::Bottom => self.bottom(canvas, bbox, rng),
            LinePosition::Left => self.left(canvas, bbox, rng),
            LinePosition::Right => self.right(canvas, bbox, rng),
            LinePosition::TopLeft => {
                let (c, b) = self.top(canvas, bbox, rng);
                self.left(c, b, rng)
            }
            LinePosition::TopRight => {
                let (c, b) = self.top(canvas, bbox, rng);
                self.right(c, b, rng)
            }
            LinePosition::BottomLeft => {
                let (c, b) = self.bottom(canvas, bbox, rng);
                self.left(c, b, rng)
            }
            LinePosition::BottomRight => {
                let (c, b) = self.bottom(canvas, bbox, rng);
                self.right(c, b, rng)
            }
            LinePosition::HorizontalMiddle => self.horizontal_middle(canvas, bbox, rng),
            LinePosition::VerticalMiddle => self.vertical_middle(canvas, bbox, rng),
        }
    }

    fn tb_band(&self, rng: &mut dyn RngCore) -> Band {
        Band {
            inner: pick(rng, self.tb_in_offset),
            thickness: pick(rng, self.thickness),
            outer: pick(rng, self.tb_out_offset),
        }
    }

    fn lr_band(&self, rng: &mut dyn RngCore) -> Band {
        Band {
            inner: pick(rng, self.lr_in_offset),
            thickness: pick(rng, self.thickness),
            outer: pick(rng, self.lr_out_offset),
        }
    }

    fn line_color(&self, canvas: &Canvas, rng: &mut dyn RngCore) -> Rgba8 {
        match &self.color {
            Some(cfg) => cfg.get_color(canvas, rng),
            None => [
                random::randint(rng, (0, 170)) as u8,
                random::randint(rng, (0, 170)) as u8,
                random::randint(rng, (0, 170)) as u8,
                random::randint(rng, (90, 255)) as u8,
            ],
        }
    }

    fn top(&self, canvas: Canvas, mut bbox: BBox, rng: &mut dyn RngCore) -> (Canvas, BBox) {
        let band = self.tb_band(rng);
        let shift = band.total();
        let mut out = transparent_canvas(canvas.width(), canvas.height() + shift);
        paste(&mut out, &canvas, (0, i64::from(shift)));
        bbox.move_origin_mut((0, shift as i32));

        let color = self.line_color(&canvas, rng);
        let y1 = bbox.top - band.inner as i32;
        let y0 = y1 - band.thickness as i32;
        fill_rect(&mut out, bbox.left, y0, bbox.right, y1, color);
        bbox.top -= shift as i32;
        (out, bbox)
    }

    fn bottom(&self, canvas: Canvas, mut bbox: BBox, rng: &mut dyn RngCore) -> (Canvas, BBox) {
        let band = self.tb_band(rng);
        let mut out = transparent_canvas(canvas.width(), canvas.height() + band.total());
        paste(&mut out, &canvas, (0, 0));

        let color = self.line_color(&canvas, rng);
        let y0 = bbox.bottom + band.inner as i32;
        let y1 = y0 + band.thickness as i32;
        fill_rect(&mut out, bbox.left, y0, bbox.right, y1, color);
        bbox.bottom += band.total() as i32;
        (out, bbox)
    }

    fn left(&self, canvas: Canvas, mut bbox: BBox, rng: &mut dyn RngCore) -> (Canvas, BBox) {
        let band = self.lr_band(rng);
        let shift = band.total();
        let mut out = transparent_canvas(canvas.width() + shift, canvas.height());
        paste(&mut out, &canvas, (i64::from(shift), 0));
        bbox.move_origin_mut((shift as i32, 0));

        let color = self.line_color(&canvas, rng);
        let x1 = bbox.left - band.inner as i32;
        let x0 = x1 - band.thickness as i32;
        fill_rect(&mut out, x0, bbox.top, x1, bbox.bottom, color);
        bbox.left -= shift as i32;
        (out, bbox)
    }

    fn right(&self, canvas: Canvas, mut bbox: BBox, rng: &mut dyn RngCore) -> (Canvas, BBox) {
        let band = self.lr_band(rng);
        let mut out = transparent_canvas(canvas.width() + band.total(), canvas.height());
        paste(&mut out, &canvas, (0, 0));

        let color = self.line_color(&canvas, rng);
        let x0 = bbox.right + band.inner as i32;
        let x1 = x0 + band.thickness as i32;
        fill_rect(&mut out, x0, bbox.top, x1, bbox.bottom, color);
        bbox.right += band.total() as i32;
        (out, bbox)
    }

    fn horizontal_middle(
        &self,
        mut canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> (Canvas, BBox) {
        let (w, h) = canvas.dimensions();
        if h <= 2 {
            return (canvas, bbox);
        }
        let row = random::randint(rng, (1, i64::from(h - 1))) as i32;
        let thickness = pick(rng, self.thickness) as i32;
        let color = self.line_color(&canvas, rng);
        let y0 = row - (thickness - 1) / 2;
        fill_rect(&mut canvas, 0, y0, w as i32, y0 + thickness, color);
        (canvas, bbox)
    }

    fn vertical_middle(
        &self,
        mut canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> (Canvas, BBox) {
        let (w, h) = canvas.dimensions();
        if w <= 2 {
            return (canvas, bbox);
        }
        let col = random::randint(rng, (1, i64::from(w - 1))) as i32;
        let thickness = pick(rng, self.thickness) as i32;
        let color = self.line_color(&canvas, rng);
        let x0 = col - (thickness - 1) / 2;
        fill_rect(&mut canvas, x0, 0, x0 + thickness, h as i32, color);
        (canvas, bbox)
    }
}

impl Effect for Line {
    fn name(&self) -> &'static str {
        "line"
    }

    fn apply(
        &self,
        canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> SynthResult<(Canvas, BBox)> {
        let idx = random::weighted_index(rng, &self.line_pos_p)
            .ok_or_else(|| SynthError::config("line_pos_p must have a positive sum"))?;
        Ok(self.apply_at(LinePosition::ALL[idx], canvas, bbox, rng))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/line.rs"]
mod tests;
