use rand::RngCore;

use crate::foundation::core::BBox;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random;
use crate::layout::Layout;

pub(crate) fn default_h_spacing() -> (f64, f64) {
    (0.0, 1.0)
}

/// Chain canvases left to right, vertically centered, with random gaps scaled by the average
/// canvas height.
#[derive(Clone, Debug)]
pub struct SameLineLayout {
    pub h_spacing: (f64, f64), // [min, max) * average height
}

impl Layout for SameLineLayout {
    fn apply(
        &self,
        _text_bboxes: &[BBox],
        mut boxes: Vec<BBox>,
        rng: &mut dyn RngCore,
    ) -> SynthResult<Vec<BBox>> {
        if boxes.is_empty() {
            return Err(SynthError::config("same line layout needs at least one box"));
        }
        let avg_height = boxes.iter().map(|b| f64::from(b.height())).sum::<f64>() / boxes.len() as f64;

        let last = boxes.len() - 1;
        for b in &mut boxes[..last] {
            let scale = random::uniform(rng, self.h_spacing);
            b.right += (avg_height * scale) as i32;
        }

        let merged = BBox::from_bboxes(&boxes).unwrap_or_default();
        let first = boxes[0];
        boxes[0].offset_mut(first.left_cnt(), merged.left_cnt());
        for i in 1..boxes.len() {
            let anchor = boxes[i].left_cnt();
            let target = boxes[i - 1].right_cnt();
            boxes[i].offset_mut(anchor, target);
        }
        Ok(boxes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/same_line.rs"]
mod tests;
