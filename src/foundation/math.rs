use glam::{DMat3, DVec3};
use kurbo::Point;

/// Solve `a * x = b` for an `n x n` system by Gaussian elimination with partial pivoting.
///
/// Returns `None` when the system is singular.
pub(crate) fn solve_linear<const N: usize>(mut a: [[f64; N]; N], mut b: [f64; N]) -> Option<[f64; N]> {
    for col in 0..N {
        let pivot = (col..N).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..N {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; N];
    for row in (0..N).rev() {
        let mut acc = b[row];
        for k in (row + 1)..N {
            acc -= a[row][k] * x[k];
        }
        x[row] = acc / a[row][row];
    }
    Some(x)
}

/// Planar homography mapping each `src[i]` onto `dst[i]`, normalized so that `h33 == 1`.
pub(crate) fn homography_from_points(src: &[Point; 4], dst: &[Point; 4]) -> Option<DMat3> {
    let mut a = [[0.0; 8]; 8];
    let mut b = [0.0; 8];
    for i in 0..4 {
        let (x, y) = (src[i].x, src[i].y);
        let (u, v) = (dst[i].x, dst[i].y);
        a[i] = [x, y, 1.0, 0.0, 0.0, 0.0, -x * u, -y * u];
        b[i] = u;
        a[i + 4] = [0.0, 0.0, 0.0, x, y, 1.0, -x * v, -y * v];
        b[i + 4] = v;
    }
    let h = solve_linear(a, b)?;
    let rows = [[h[0], h[1], h[2]], [h[3], h[4], h[5]], [h[6], h[7], 1.0]];
    Some(DMat3::from_cols_array_2d(&rows).transpose())
}

/// Map a 2D point through a homography, dividing by the projective coordinate.
pub(crate) fn apply_homography(m: &DMat3, p: Point) -> Point {
    let v = *m * DVec3::new(p.x, p.y, 1.0);
    if v.z.abs() < f64::EPSILON {
        return Point::new(f64::INFINITY, f64::INFINITY);
    }
    Point::new(v.x / v.z, v.y / v.z)
}

/// Cubic convolution weight with `a = -0.75`.
pub(crate) fn cubic_weight(t: f64) -> f64 {
    const A: f64 = -0.75;
    let t = t.abs();
    if t <= 1.0 {
        ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((A * t - 5.0 * A) * t + 8.0 * A) * t - 4.0 * A
    } else {
        0.0
    }
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
