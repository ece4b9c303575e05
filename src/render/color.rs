use std::collections::BTreeMap;

use rand::{Rng, RngCore};

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random;

/// How the text color of a sample is chosen.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextColorConfig {
    /// Always the same color.
    Fixed {
        #[serde(default = "default_fixed_rgba")]
        rgba: Rgba8,
    },
    /// Random dark color below 70% of the background mean.
    Simple {
        #[serde(default = "default_simple_alpha")]
        alpha: (u8, u8), // [lo, hi)
    },
    /// Random color inside one of several weighted RGB boxes.
    Range {
        ranges: BTreeMap<String, ColorRange>,
        #[serde(default = "default_range_alpha")]
        alpha: (u8, u8), // [lo, hi)
    },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ColorRange {
    pub fraction: f64,
    pub low: [u8; 3],  // inclusive
    pub high: [u8; 3], // inclusive
}

fn default_fixed_rgba() -> Rgba8 {
    [255, 50, 0, 255]
}

fn default_simple_alpha() -> (u8, u8) {
    (110, 255)
}

fn default_range_alpha() -> (u8, u8) {
    (200, 255)
}

impl Default for TextColorConfig {
    fn default() -> Self {
        Self::Simple {
            alpha: default_simple_alpha(),
        }
    }
}

impl TextColorConfig {
    pub fn validate(&self) -> SynthResult<()> {
        match self {
            Self::Fixed { .. } => Ok(()),
            Self::Simple { alpha } => validate_alpha(*alpha),
            Self::Range { ranges, alpha } => {
                validate_alpha(*alpha)?;
                if ranges.is_empty() {
                    return Err(SynthError::config("text color ranges must not be empty"));
                }
                let mut total = 0.0;
                for (name, r) in ranges {
                    if !(r.fraction >= 0.0 && r.fraction.is_finite()) {
                        return Err(SynthError::config(format!(
                            "color range '{name}' has invalid fraction {}",
                            r.fraction
                        )));
                    }
                    if (0..3).any(|i| r.low[i] > r.high[i]) {
                        return Err(SynthError::config(format!(
                            "color range '{name}' has low > high"
                        )));
                    }
                    total += r.fraction;
                }
                if total <= 0.0 {
                    return Err(SynthError::config("color range fractions sum to 0"));
                }
                Ok(())
            }
        }
    }

    /// Pick a color for text drawn over `bg`.
    pub fn get_color(&self, bg: &Canvas, rng: &mut dyn RngCore) -> Rgba8 {
        match self {
            Self::Fixed { rgba } => *rgba,
            Self::Simple { alpha } => {
                let hi = (mean_value(bg) * 0.7) as i64;
                let r = random::randint(rng, (0, hi)) as u8;
                let g = random::randint(rng, (0, hi)) as u8;
                let b = random::randint(rng, (0, hi)) as u8;
                let a = random::randint(rng, (i64::from(alpha.0), i64::from(alpha.1))) as u8;
                [r, g, b, a]
            }
            Self::Range { ranges, alpha } => {
                let total: f64 = ranges.values().map(|r| r.fraction).sum();
                let pick = rng.random::<f64>() * total;
                let mut acc = 0.0;
                let mut selected = ranges.values().next();
                for r in ranges.values() {
                    acc += r.fraction;
                    if pick <= acc {
                        selected = Some(r);
                        break;
                    }
                }
                let mut out = [0, 0, 0, 255];
                if let Some(r) = selected {
                    for i in 0..3 {
                        out[i] = rng.random_range(r.low[i]..=r.high[i]);
                    }
                }
                out[3] = random::randint(rng, (i64::from(alpha.0), i64::from(alpha.1))) as u8;
                out
            }
        }
    }
}

fn validate_alpha(alpha: (u8, u8)) -> SynthResult<()> {
    if alpha.0 >= alpha.1 {
        return Err(SynthError::config(format!(
            "text color alpha range must be increasing, got {alpha:?}"
        )));
    }
    Ok(())
}

/// Mean over every channel, alpha included.
fn mean_value(img: &Canvas) -> f64 {
    let raw = img.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    raw.iter().map(|v| u64::from(*v)).sum::<u64>() as f64 / raw.len() as f64
}

#[cfg(test)]
#[path = "../../tests/unit/render/color.rs"]
mod tests;
