//! Fonts, character sets and background images.

pub mod background;
pub mod charset;
pub mod fonts;
