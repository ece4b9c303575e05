//! Placement of several text canvases on one shared canvas.

use rand::RngCore;

use crate::corpus::SampledText;
use crate::foundation::core::BBox;
use crate::foundation::error::{SynthError, SynthResult};

pub mod extra_text_line;
pub mod same_line;

pub use extra_text_line::ExtraTextLineLayout;
pub use same_line::SameLineLayout;

pub trait Layout: std::fmt::Debug {
    /// Reposition `mask_bboxes` (one per canvas, each at its own origin) into one coordinate
    /// space. `text_bboxes[i]` is where the text sits inside canvas `i`.
    fn apply(
        &self,
        text_bboxes: &[BBox],
        mask_bboxes: Vec<BBox>,
        rng: &mut dyn RngCore,
    ) -> SynthResult<Vec<BBox>>;

    /// Label for the merged sample. Concatenation by default.
    fn merge_texts(&self, texts: &[SampledText]) -> String {
        texts.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Run `layout` and check that it returned one box per canvas.
pub fn apply_layout(
    layout: &dyn Layout,
    texts: &[SampledText],
    text_bboxes: &[BBox],
    mask_bboxes: Vec<BBox>,
    rng: &mut dyn RngCore,
) -> SynthResult<(Vec<BBox>, String)> {
    let expected = mask_bboxes.len();
    let placed = layout.apply(text_bboxes, mask_bboxes, rng)?;
    if placed.len() != expected || placed.len() != text_bboxes.len() {
        return Err(SynthError::config(format!(
            "layout returned {} boxes for {expected} canvases",
            placed.len()
        )));
    }
    Ok((placed, layout.merge_texts(texts)))
}

/// Layout configuration, tagged by `type`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutConfig {
    SameLine {
        #[serde(default = "same_line::default_h_spacing")]
        h_spacing: (f64, f64),
    },
    ExtraTextLine {
        #[serde(default = "extra_text_line::default_bottom_prob")]
        bottom_prob: f64,
    },
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::SameLine {
            h_spacing: same_line::default_h_spacing(),
        }
    }
}

impl LayoutConfig {
    pub fn build(&self) -> SynthResult<Box<dyn Layout>> {
        Ok(match *self {
            Self::SameLine { h_spacing } => {
                if h_spacing.0 > h_spacing.1 || h_spacing.0 < 0.0 {
                    return Err(SynthError::config(format!(
                        "h_spacing must satisfy 0 <= min <= max, got {h_spacing:?}"
                    )));
                }
                Box::new(SameLineLayout { h_spacing })
            }
            Self::ExtraTextLine { bottom_prob } => {
                if !(0.0..=1.0).contains(&bottom_prob) {
                    return Err(SynthError::config(format!(
                        "bottom_prob must be in [0, 1], got {bottom_prob}"
                    )));
                }
                Box::new(ExtraTextLineLayout { bottom_prob })
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/mod.rs"]
mod tests;
