//! Synthetic text-line images for training text-recognition models.
//!
//! A [`Renderer`] samples text from one or more corpora, pairs it with a font that covers every
//! character, draws it on a transparent canvas, runs the configured effect chains and an optional
//! perspective warp, and composites the result onto a random background crop. The
//! [`generator`] fans rendering out over worker threads and streams samples into a [`dataset`].
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod corpus;
pub mod dataset;
pub mod effects;
pub mod foundation;
pub mod generator;
pub mod layout;
pub mod render;
pub mod transform;

pub use crate::config::{GeneratorConfig, RenderConfig};
pub use crate::foundation::core::{BBox, Canvas};
pub use crate::foundation::error::{SynthError, SynthResult};
pub use crate::generator::{GenerateOptions, GenerateStats, generate};
pub use crate::render::{RenderOutput, Renderer};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
