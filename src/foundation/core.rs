use image::{Rgba, RgbaImage};

/// Integer pixel position `(x, y)`.
pub type Point = (i32, i32);

/// RGBA8 pixel buffer with straight (non-premultiplied) alpha.
pub type Canvas = RgbaImage;

/// Straight-alpha RGBA8 color.
pub type Rgba8 = [u8; 4];

/// Fill of every transparent pixel this crate produces: white under zero alpha, so resampling and
/// gray conversion never pull dark fringes out of empty space.
pub const TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Allocate a fully transparent canvas.
///
/// Zero dimensions are clamped to one pixel so downstream crops and warps always have a
/// non-empty buffer to work with.
pub fn transparent_canvas(width: u32, height: u32) -> Canvas {
    RgbaImage::from_pixel(width.max(1), height.max(1), TRANSPARENT)
}

/// Axis-aligned integer rectangle tracking where text sits on a canvas.
///
/// `left <= right` and `top <= bottom` are maintained by every producer in this crate but are not
/// enforced by the type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BBox {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// `(0, 0, width, height)`.
    pub fn from_size(size: (u32, u32)) -> Self {
        Self::new(0, 0, size.0 as i32, size.1 as i32)
    }

    /// Hull of `boxes`. The low edges are clamped at 0, the high edges are not.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_bboxes(boxes: &[BBox]) -> Option<Self> {
        let left = boxes.iter().map(|b| b.left).min()?;
        let top = boxes.iter().map(|b| b.top).min()?;
        let right = boxes.iter().map(|b| b.right).max()?;
        let bottom = boxes.iter().map(|b| b.bottom).max()?;
        Some(Self::new(left.max(0), top.max(0), right, bottom))
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// `(width, height)`, negative extents clamped to zero.
    pub fn size(&self) -> (u32, u32) {
        (self.width().max(0) as u32, self.height().max(0) as u32)
    }

    pub fn cx(&self) -> i32 {
        (self.left + self.right).div_euclid(2)
    }

    pub fn cy(&self) -> i32 {
        (self.top + self.bottom).div_euclid(2)
    }

    pub fn center(&self) -> Point {
        (self.cx(), self.cy())
    }

    pub fn left_cnt(&self) -> Point {
        (self.left, self.cy())
    }

    pub fn top_cnt(&self) -> Point {
        (self.cx(), self.top)
    }

    pub fn right_cnt(&self) -> Point {
        (self.right, self.cy())
    }

    pub fn bottom_cnt(&self) -> Point {
        (self.cx(), self.bottom)
    }

    pub fn left_top(&self) -> Point {
        (self.left, self.top)
    }

    pub fn left_bottom(&self) -> Point {
        (self.left, self.bottom)
    }

    pub fn right_top(&self) -> Point {
        (self.right, self.top)
    }

    pub fn right_bottom(&self) -> Point {
        (self.right, self.bottom)
    }

    /// Corners in order left-top, right-top, right-bottom, left-bottom.
    pub fn pnts(&self) -> [Point; 4] {
        [
            self.left_top(),
            self.right_top(),
            self.right_bottom(),
            self.left_bottom(),
        ]
    }

    pub fn contains(&self, other: &BBox) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    /// Copy of this box translated so that `anchor` lands on `move_to`.
    pub fn offset(&self, anchor: Point, move_to: Point) -> Self {
        let mut out = *self;
        out.offset_mut(anchor, move_to);
        out
    }

    /// In-place variant of [`BBox::offset`].
    pub fn offset_mut(&mut self, anchor: Point, move_to: Point) {
        let dx = move_to.0 - anchor.0;
        let dy = move_to.1 - anchor.1;
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    /// `offset((0, 0), pnt)`.
    pub fn move_origin(&self, pnt: Point) -> Self {
        self.offset((0, 0), pnt)
    }

    pub fn move_origin_mut(&mut self, pnt: Point) {
        self.offset_mut((0, 0), pnt);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
