//! Text drawing, compositing and the end-to-end [`Renderer`].

pub mod color;
pub mod composite;
pub mod draw;
pub mod output;
pub mod renderer;

pub use renderer::{RenderOutput, Renderer};
