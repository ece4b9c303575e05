use rand::RngCore;

use crate::corpus::SampledText;
use crate::foundation::core::BBox;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random;
use crate::layout::Layout;

pub(crate) fn default_bottom_prob() -> f64 {
    0.5
}

/// Share of the extra line's height hidden behind the merged canvas edge.
const HIDDEN_FRACTION: (f64, f64) = (0.6, 0.8);
/// Overlap of an above-placed extra line with the main line, as a share of the extra height.
const ABOVE_OVERLAP: (f64, f64) = (0.0, 0.1);

/// A main line plus a partially visible extra line above or below it.
///
/// Exactly two canvases: the first is the main line, the second the extra line. Only the main
/// line's text ends up in the label.
#[derive(Clone, Debug)]
pub struct ExtraTextLineLayout {
    pub bottom_prob: f64,
}

impl Layout for ExtraTextLineLayout {
    fn apply(
        &self,
        text_bboxes: &[BBox],
        boxes: Vec<BBox>,
        rng: &mut dyn RngCore,
    ) -> SynthResult<Vec<BBox>> {
        let [mut main, mut extra] = boxes[..] else {
            return Err(SynthError::config(format!(
                "extra text line layout needs exactly two boxes, got {}",
                boxes.len()
            )));
        };
        if text_bboxes.len() != 2 {
            return Err(SynthError::config(
                "extra text line layout needs exactly two text boxes",
            ));
        }

        let extra_h = f64::from(extra.height());
        let hidden = (extra_h * random::uniform(rng, HIDDEN_FRACTION)) as i32;
        if random::prob(rng, self.bottom_prob) {
            extra.offset_mut(extra.left_top(), main.left_bottom());
            extra.bottom -= hidden;
        } else {
            let visible = extra.height() - hidden;
            main.offset_mut(main.left_top(), (main.left, main.top + visible));
            let overlap = (extra_h * random::uniform(rng, ABOVE_OVERLAP)) as i32;
            extra.offset_mut(extra.left_bottom(), (main.left, main.top + overlap));
        }

        if extra.width() > main.width() {
            extra.right -= extra.width() - main.width();
        }
        Ok(vec![main, extra])
    }

    fn merge_texts(&self, texts: &[SampledText]) -> String {
        texts.first().map(|t| t.text.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/extra_text_line.rs"]
mod tests;
