//! 3D-rotation driven perspective warp.
//!
//! A canvas is treated as a plane at `z = 0`, rotated about the x/y/z axes, pushed away from a
//! pinhole camera far enough that its diagonal fills the vertical field of view, and projected
//! back into a square working frame. The four projected corners define a planar homography that
//! warps the pixels.
//!
//! [`WarpPlan::new`] is the single pure entry point. [`WarpPlan::transformed_size`] and
//! [`WarpPlan::warp`] are views over the same plan, so the footprint reported before warping is
//! exactly the footprint of the warped canvas.

use glam::{DMat3, DMat4, DVec3, DVec4};
use image::Rgba;
use kurbo::Point;

use crate::foundation::core::{Canvas, Point as PixelPoint, TRANSPARENT, transparent_canvas};
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::math::{apply_homography, cubic_weight, homography_from_points};

/// Camera parameters for one warp. Angles are in degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PerspectiveParams {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub scale: f64,
    pub fovy: f64,
}

/// Everything derived from [`PerspectiveParams`] for one input size.
#[derive(Clone, Debug)]
pub struct WarpPlan {
    /// Maps input canvas coordinates into the square working frame.
    pub homography: DMat3,
    /// Side length of the square working frame.
    pub side_length: f64,
    /// Input canvas corners.
    pub src_pts: [Point; 4],
    /// Projected corners in the working frame, `dst_pts[i]` is the image of `src_pts[i]`.
    pub dst_pts: [Point; 4],
}

/// `R = Rx * Ry * Rz`, angles in degrees.
pub fn rotation_matrix(x: f64, y: f64, z: f64) -> DMat4 {
    DMat4::from_rotation_x(x.to_radians())
        * DMat4::from_rotation_y(y.to_radians())
        * DMat4::from_rotation_z(z.to_radians())
}

fn from_rows(rows: [[f64; 4]; 4]) -> DMat4 {
    DMat4::from_cols_array_2d(&rows).transpose()
}

impl WarpPlan {
    pub fn new(params: &PerspectiveParams, size: (u32, u32)) -> SynthResult<Self> {
        let (width, height) = (f64::from(size.0), f64::from(size.1));
        if size.0 == 0 || size.1 == 0 {
            return Err(SynthError::render(format!(
                "cannot warp empty canvas {}x{}",
                size.0, size.1
            )));
        }
        if !(params.fovy > 0.0 && params.fovy < 180.0) || params.scale <= 0.0 {
            return Err(SynthError::config(format!(
                "perspective fovy must be in (0, 180) and scale > 0, got fovy={} scale={}",
                params.fovy, params.scale
            )));
        }

        let half_fovy = (params.fovy / 2.0).to_radians();
        let diagonal = (width * width + height * height).sqrt();
        let side_length = params.scale * diagonal / half_fovy.cos();
        let h = diagonal / (2.0 * half_fovy.sin());
        let near = h - diagonal / 2.0;
        let far = h + diagonal / 2.0;

        let translate = DMat4::from_translation(DVec3::new(0.0, 0.0, -h));
        let rotate = rotation_matrix(params.x, params.y, params.z);
        let focal = 1.0 / half_fovy.tan();
        let project = from_rows([
            [focal, 0.0, 0.0, 0.0],
            [0.0, focal, 0.0, 0.0],
            [0.0, 0.0, -(far + near) / (far - near), -(2.0 * far * near) / (far - near)],
            [0.0, 0.0, -1.0, 1.0],
        ]);
        let m44 = project * translate * rotate;

        let corners_3d = [
            DVec4::new(-width / 2.0, height / 2.0, 0.0, 1.0),
            DVec4::new(width / 2.0, height / 2.0, 0.0, 1.0),
            DVec4::new(width / 2.0, -height / 2.0, 0.0, 1.0),
            DVec4::new(-width / 2.0, -height / 2.0, 0.0, 1.0),
        ];

        let mut src_pts = [Point::ZERO; 4];
        let mut dst_pts = [Point::ZERO; 4];
        for (i, c) in corners_3d.iter().enumerate() {
            let p = m44 * *c;
            if p.w.abs() < f64::EPSILON {
                return Err(SynthError::render("perspective projection degenerated"));
            }
            src_pts[i] = Point::new(c.x + width / 2.0, c.y + height / 2.0);
            dst_pts[i] = Point::new(
                (p.x / p.w + 1.0) * 0.5 * side_length,
                (p.y / p.w + 1.0) * 0.5 * side_length,
            );
        }

        let homography = homography_from_points(&src_pts, &dst_pts)
            .ok_or_else(|| SynthError::render("perspective homography is singular"))?;

        Ok(Self {
            homography,
            side_length,
            src_pts,
            dst_pts,
        })
    }

    /// `(x, y, width, height)` of the integer rectangle enclosing the projected corners.
    pub fn bounding_rect(&self) -> (i32, i32, u32, u32) {
        bounding_rect(&self.dst_pts)
    }

    /// Footprint of the warped canvas, without warping any pixels.
    pub fn transformed_size(&self) -> (u32, u32) {
        let (_, _, w, h) = self.bounding_rect();
        (w, h)
    }

    /// Warp `canvas` and crop to the transformed footprint.
    ///
    /// Sampling is bicubic; anything mapping outside the source is fully transparent. The returned
    /// corners (left-top, right-top, right-bottom, left-bottom of the input) are expressed in the
    /// cropped frame.
    pub fn warp(&self, canvas: &Canvas) -> SynthResult<(Canvas, [PixelPoint; 4])> {
        let inverse = self.homography.inverse();
        if !inverse.is_finite() {
            return Err(SynthError::render("perspective homography is not invertible"));
        }

        let (x0, y0, w, h) = self.bounding_rect();
        let side = self.side_length as i64;
        let mut out = transparent_canvas(w, h);
        for oy in 0..h {
            for ox in 0..w {
                let fx = i64::from(x0) + i64::from(ox);
                let fy = i64::from(y0) + i64::from(oy);
                if fx < 0 || fy < 0 || fx >= side || fy >= side {
                    out.put_pixel(ox, oy, TRANSPARENT);
                    continue;
                }
                let src = apply_homography(&inverse, Point::new(fx as f64, fy as f64));
                out.put_pixel(ox, oy, sample_bicubic(canvas, src));
            }
        }

        // dst_pts follow src_pts order: left-bottom, right-bottom, right-top, left-top.
        let ordered = [self.dst_pts[3], self.dst_pts[2], self.dst_pts[1], self.dst_pts[0]];
        let pts = ordered.map(|p| (p.x.floor() as i32 - x0, p.y.floor() as i32 - y0));
        Ok((out, pts))
    }
}

/// Integer bounding rectangle of a float point set: floored corners, inclusive extent.
pub fn bounding_rect(pts: &[Point]) -> (i32, i32, u32, u32) {
    let min_x = pts.iter().map(|p| p.x.floor()).fold(f64::INFINITY, f64::min);
    let min_y = pts.iter().map(|p| p.y.floor()).fold(f64::INFINITY, f64::min);
    let max_x = pts.iter().map(|p| p.x.floor()).fold(f64::NEG_INFINITY, f64::max);
    let max_y = pts.iter().map(|p| p.y.floor()).fold(f64::NEG_INFINITY, f64::max);
    if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
        return (0, 0, 0, 0);
    }
    (
        min_x as i32,
        min_y as i32,
        (max_x - min_x) as u32 + 1,
        (max_y - min_y) as u32 + 1,
    )
}

fn sample_bicubic(canvas: &Canvas, p: Point) -> Rgba<u8> {
    let border = TRANSPARENT.0.map(f64::from);
    if !p.x.is_finite() || !p.y.is_finite() {
        return TRANSPARENT;
    }
    let (w, h) = canvas.dimensions();
    let ix = p.x.floor();
    let iy = p.y.floor();
    let tx = p.x - ix;
    let ty = p.y - iy;
    let (ix, iy) = (ix as i64, iy as i64);
    if ix < -2 || iy < -2 || ix > i64::from(w) + 1 || iy > i64::from(h) + 1 {
        return TRANSPARENT;
    }

    let mut acc = [0.0f64; 4];
    for dy in -1..=2i64 {
        let wy = cubic_weight(ty - dy as f64);
        for dx in -1..=2i64 {
            let weight = wy * cubic_weight(tx - dx as f64);
            if weight == 0.0 {
                continue;
            }
            let (sx, sy) = (ix + dx, iy + dy);
            let px = if sx >= 0 && sy >= 0 && sx < i64::from(w) && sy < i64::from(h) {
                let v = canvas.get_pixel(sx as u32, sy as u32).0;
                [f64::from(v[0]), f64::from(v[1]), f64::from(v[2]), f64::from(v[3])]
            } else {
                border
            };
            for c in 0..4 {
                acc[c] += weight * px[c];
            }
        }
    }
    Rgba(acc.map(|v| v.round().clamp(0.0, 255.0) as u8))
}

#[cfg(test)]
#[path = "../../tests/unit/transform/perspective.rs"]
mod tests;
