use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

/// `true` with probability `p` (clamped to `[0, 1]`).
pub fn prob(rng: &mut dyn RngCore, p: f64) -> bool {
    let p = p.clamp(0.0, 1.0);
    rng.random::<f64>() < p
}

/// Uniform float in `[lo, hi)`; returns `lo` when the range is empty.
pub fn uniform(rng: &mut dyn RngCore, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

/// Uniform integer in `[lo, hi)`; returns `lo` when the range is empty.
pub fn randint(rng: &mut dyn RngCore, (lo, hi): (i64, i64)) -> i64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Uniform index into a collection of `len` items. `len` must be non-zero.
pub fn index(rng: &mut dyn RngCore, len: usize) -> usize {
    rng.random_range(0..len)
}

/// Index `i` with probability `weights[i] / sum(weights)`.
///
/// Returns `None` when `weights` is empty or does not sum to a positive finite value.
pub fn weighted_index(rng: &mut dyn RngCore, weights: &[f64]) -> Option<usize> {
    let total: f64 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }
    let pick = rng.random::<f64>() * total;
    let mut acc = 0.0;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        if pick < acc {
            return Some(i);
        }
    }
    weights.iter().rposition(|w| *w > 0.0)
}

/// Normal sample with mean `mu` and standard deviation `sigma3 / 3`, clipped to
/// `[-sigma3, sigma3]`.
pub fn clipped_normal(rng: &mut dyn RngCore, mu: f64, sigma3: f64) -> f64 {
    let sigma3 = sigma3.abs();
    if sigma3 == 0.0 {
        return mu.clamp(-sigma3, sigma3);
    }
    let v = match Normal::new(mu, sigma3 / 3.0) {
        Ok(dist) => dist.sample(rng),
        Err(_) => mu,
    };
    v.clamp(-sigma3, sigma3)
}

/// Random left-top position for placing a `small` rectangle inside a `big` one.
///
/// Axes where `small` does not fit get offset 0.
pub fn random_xy_offset(rng: &mut dyn RngCore, small: (u32, u32), big: (u32, u32)) -> (u32, u32) {
    fn pick(rng: &mut dyn RngCore, s: u32, b: u32) -> u32 {
        if b > s { rng.random_range(0..=b - s) } else { 0 }
    }
    let x = pick(&mut *rng, small.0, big.0);
    let y = pick(&mut *rng, small.1, big.1);
    (x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/random.rs"]
mod tests;
