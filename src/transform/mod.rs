//! Geometric transforms applied to whole text canvases.

use rand::RngCore;

use crate::foundation::random;

pub mod perspective;

pub use perspective::{PerspectiveParams, WarpPlan};

/// Rotation bounds and camera settings shared by every perspective distribution.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PerspectiveBounds {
    #[serde(default = "default_x")]
    pub x: f64, // degrees
    #[serde(default = "default_y")]
    pub y: f64,
    #[serde(default = "default_z")]
    pub z: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_fovy")]
    pub fovy: f64, // degrees
}

impl Default for PerspectiveBounds {
    fn default() -> Self {
        Self {
            x: default_x(),
            y: default_y(),
            z: default_z(),
            scale: default_scale(),
            fovy: default_fovy(),
        }
    }
}

fn default_x() -> f64 {
    10.0
}

fn default_y() -> f64 {
    5.0
}

fn default_z() -> f64 {
    1.5
}

fn default_scale() -> f64 {
    1.0
}

fn default_fovy() -> f64 {
    50.0
}

/// How rotation angles are drawn for each render, tagged by `distribution`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "distribution", rename_all = "snake_case")]
pub enum PerspectiveConfig {
    /// The configured angles, every time.
    Fixed(PerspectiveBounds),
    /// Each angle uniform in `[-bound, bound)`.
    Uniform(PerspectiveBounds),
    /// Each angle normal around 0 with `3 * sigma = bound`, clipped to `[-bound, bound]`.
    Normal(PerspectiveBounds),
}

impl PerspectiveConfig {
    pub fn bounds(&self) -> &PerspectiveBounds {
        match self {
            Self::Fixed(b) | Self::Uniform(b) | Self::Normal(b) => b,
        }
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> PerspectiveParams {
        let b = *self.bounds();
        let (x, y, z) = match self {
            Self::Fixed(_) => (b.x, b.y, b.z),
            Self::Uniform(_) => (
                random::uniform(rng, (-b.x, b.x)),
                random::uniform(rng, (-b.y, b.y)),
                random::uniform(rng, (-b.z, b.z)),
            ),
            Self::Normal(_) => (
                random::clipped_normal(rng, 0.0, b.x),
                random::clipped_normal(rng, 0.0, b.y),
                random::clipped_normal(rng, 0.0, b.z),
            ),
        };
        PerspectiveParams {
            x,
            y,
            z,
            scale: b.scale,
            fovy: b.fovy,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/mod.rs"]
mod tests;
