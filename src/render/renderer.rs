use image::DynamicImage;
use rand::RngCore;

use crate::assets::background::{BgManager, guard_bg_size};
use crate::config::{CorpusEffects, CorpusSet, RenderConfig};
use crate::corpus::{self, Corpus, SampledText};
use crate::effects::Effects;
use crate::foundation::core::{BBox, Canvas, Rgba8, transparent_canvas};
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random;
use crate::foundation::retry::retry;
use crate::layout::{Layout, apply_layout};
use crate::render::color::TextColorConfig;
use crate::render::composite::{crop, paste_over};
use crate::render::draw::draw_text;
use crate::render::output;
use crate::transform::{PerspectiveConfig, WarpPlan};

/// One generated sample.
#[derive(Clone, Debug)]
pub struct RenderOutput {
    pub image: DynamicImage,
    pub label: String,
}

/// A corpus and the effects applied to its text canvas.
struct CorpusSlot {
    corpus: Box<dyn Corpus>,
    effects: Effects,
}

enum Corpora {
    Single(CorpusSlot),
    Multi(Vec<CorpusSlot>),
}

/// Result of the text stage: a text canvas ready to be pasted, its label and the background.
struct TextStage {
    mask: Canvas,
    label: String,
    bg: std::sync::Arc<Canvas>,
}

/// End-to-end sample generator built once from a [`RenderConfig`].
///
/// A renderer owns all of its mutable state (font and background caches), so each worker builds
/// its own.
pub struct Renderer {
    corpora: Corpora,
    bg: BgManager,
    layout: Box<dyn Layout>,
    layout_effects: Effects,
    render_effects: Effects,
    text_color: Option<TextColorConfig>,
    perspective: Option<PerspectiveConfig>,
    height: i32,
    gray: bool,
    return_bg_and_mask: bool,
    max_attempts: usize,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let corpora = match &self.corpora {
            Corpora::Single(slot) => vec![slot.corpus.name()],
            Corpora::Multi(slots) => slots.iter().map(|s| s.corpus.name()).collect(),
        };
        f.debug_struct("Renderer")
            .field("corpora", &corpora)
            .field("backgrounds", &self.bg.len())
            .field("layout", &self.layout)
            .field("height", &self.height)
            .field("gray", &self.gray)
            .finish()
    }
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> SynthResult<Self> {
        config.validate()?;
        let corpora = build_corpora(&config.corpus, config.corpus_effects.as_ref())?;
        let bg = BgManager::new(&config.bg_dir, config.pre_load_bg_img, config.bg_cache_size)?;
        Ok(Self {
            corpora,
            bg,
            layout: config.layout.build()?,
            layout_effects: Effects::from_configs(&config.layout_effects)?,
            render_effects: Effects::from_configs(&config.render_effects)?,
            text_color: config.text_color.clone(),
            perspective: config.perspective_transform,
            height: config.height,
            gray: config.gray,
            return_bg_and_mask: config.return_bg_and_mask,
            max_attempts: config.max_attempts,
        })
    }

    /// Generate one sample, retrying transient failures from scratch.
    pub fn render(&mut self, rng: &mut dyn RngCore) -> SynthResult<RenderOutput> {
        let max_attempts = self.max_attempts;
        retry(max_attempts, "render", |_| self.render_once(&mut *rng))
    }

    fn render_once(&mut self, rng: &mut dyn RngCore) -> SynthResult<RenderOutput> {
        let TextStage { mask, label, bg } = match &mut self.corpora {
            Corpora::Single(slot) => gen_single(
                slot,
                &mut self.bg,
                self.text_color.as_ref(),
                self.perspective.as_ref(),
                rng,
            )?,
            Corpora::Multi(slots) => {
                let mut stage = gen_multi(
                    slots,
                    &mut self.bg,
                    self.layout.as_ref(),
                    self.text_color.as_ref(),
                    self.perspective.as_ref(),
                    rng,
                )?;
                let bbox = BBox::from_size(stage.mask.dimensions());
                (stage.mask, _) = self.layout_effects.apply_effects(stage.mask, bbox, rng)?;
                stage
            }
        };

        let (img, cropped_bg) = paste_on_bg(&bg, &mask, rng);
        let bbox = BBox::from_size(img.dimensions());
        let (img, _) = self.render_effects.apply_effects(img, bbox, rng)?;

        let rgb = if self.return_bg_and_mask {
            output::triptych(&img, &cropped_bg, &mask)
        } else {
            output::to_rgb(&img)
        };
        Ok(RenderOutput {
            image: output::normalize(rgb, self.gray, self.height),
            label,
        })
    }
}

fn build_corpora(set: &CorpusSet, effects: Option<&CorpusEffects>) -> SynthResult<Corpora> {
    match set {
        CorpusSet::Single(cfg) => {
            let effects = match effects {
                None => Effects::none(),
                Some(CorpusEffects::Single(list)) => Effects::from_configs(list)?,
                Some(CorpusEffects::PerCorpus(_)) => {
                    return Err(SynthError::config("corpus_effects is list, corpus is not list"));
                }
            };
            Ok(Corpora::Single(CorpusSlot {
                corpus: cfg.build()?,
                effects,
            }))
        }
        CorpusSet::Multi(cfgs) => {
            if cfgs.is_empty() {
                return Err(SynthError::config("corpus list is empty"));
            }
            let per_corpus = match effects {
                None => vec![None; cfgs.len()],
                Some(CorpusEffects::Single(list)) if list.is_empty() => vec![None; cfgs.len()],
                Some(CorpusEffects::Single(_)) => {
                    return Err(SynthError::config("corpus is list, corpus_effects is not list"));
                }
                Some(CorpusEffects::PerCorpus(lists)) => {
                    if lists.len() != cfgs.len() {
                        return Err(SynthError::config(format!(
                            "corpus length({}) is not equal to corpus_effects length({})",
                            cfgs.len(),
                            lists.len()
                        )));
                    }
                    lists.clone()
                }
            };
            let mut slots = cfgs
                .iter()
                .zip(per_corpus)
                .map(|(cfg, effects)| -> SynthResult<CorpusSlot> {
                    Ok(CorpusSlot {
                        corpus: cfg.build()?,
                        effects: match effects {
                            Some(list) => Effects::from_configs(&list)?,
                            None => Effects::none(),
                        },
                    })
                })
                .collect::<SynthResult<Vec<_>>>()?;
            if slots.len() == 1 {
                return Ok(Corpora::Single(slots.remove(0)));
            }
            Ok(Corpora::Multi(slots))
        }
    }
}

fn text_color(
    override_color: Option<&TextColorConfig>,
    corpus: &dyn Corpus,
    bg: &Canvas,
    rng: &mut dyn RngCore,
) -> Rgba8 {
    override_color
        .unwrap_or(&corpus.base().config.text_color)
        .get_color(bg, rng)
}

/// Draw one sampled text and run its corpus effects. Returns the canvas and the text bbox in it.
fn draw_slot(
    slot: &CorpusSlot,
    sample: &SampledText,
    color: Rgba8,
    rng: &mut dyn RngCore,
) -> SynthResult<(Canvas, BBox)> {
    let spacing = slot.corpus.base().config.char_spacing.as_ref();
    let mask = draw_text(sample, color, spacing, &mut *rng)?;
    let bbox = BBox::from_size(mask.dimensions());
    slot.effects.apply_effects(mask, bbox, rng)
}

fn gen_single(
    slot: &mut CorpusSlot,
    bgs: &mut BgManager,
    override_color: Option<&TextColorConfig>,
    perspective: Option<&PerspectiveConfig>,
    rng: &mut dyn RngCore,
) -> SynthResult<TextStage> {
    let sample = corpus::sample(slot.corpus.as_mut(), &mut *rng)?;
    let bg = bgs.get_bg(&mut *rng)?;
    let color = text_color(override_color, slot.corpus.as_ref(), &bg, &mut *rng);
    let (mask, _) = draw_slot(slot, &sample, color, &mut *rng)?;
    let mask = warp(perspective, mask, rng).inspect_err(|e| {
        tracing::error!(
            font = %sample.font_path.display(),
            text = %sample.text,
            "perspective transform failed: {e}"
        );
    })?;
    Ok(TextStage {
        mask,
        label: sample.text,
        bg,
    })
}

fn gen_multi(
    slots: &mut [CorpusSlot],
    bgs: &mut BgManager,
    layout: &dyn Layout,
    override_color: Option<&TextColorConfig>,
    perspective: Option<&PerspectiveConfig>,
    rng: &mut dyn RngCore,
) -> SynthResult<TextStage> {
    let samples = slots
        .iter_mut()
        .map(|slot| corpus::sample(slot.corpus.as_mut(), &mut *rng))
        .collect::<SynthResult<Vec<_>>>()?;
    let bg = bgs.get_bg(&mut *rng)?;
    let shared_color = override_color.map(|c| c.get_color(&bg, &mut *rng));

    let mut masks = Vec::with_capacity(slots.len());
    let mut text_bboxes = Vec::with_capacity(slots.len());
    for (slot, sample) in slots.iter().zip(&samples) {
        let color = match shared_color {
            Some(c) => c,
            None => text_color(None, slot.corpus.as_ref(), &bg, &mut *rng),
        };
        let (mask, bbox) = draw_slot(slot, sample, color, &mut *rng)?;
        masks.push(mask);
        text_bboxes.push(bbox);
    }

    let mask_bboxes = masks
        .iter()
        .map(|m| BBox::from_size(m.dimensions()))
        .collect();
    let (placed, label) = apply_layout(layout, &samples, &text_bboxes, mask_bboxes, &mut *rng)?;
    let merged = BBox::from_bboxes(&placed)
        .ok_or_else(|| SynthError::render("layout produced no boxes"))?;
    let (w, h) = merged.size();
    let mut canvas = transparent_canvas(w, h);
    for (mask, b) in masks.iter().zip(&placed) {
        let at = (i64::from(b.left - merged.left), i64::from(b.top - merged.top));
        paste_over(&mut canvas, mask, at);
    }

    Ok(TextStage {
        mask: warp(perspective, canvas, rng)?,
        label,
        bg,
    })
}

fn warp(
    perspective: Option<&PerspectiveConfig>,
    canvas: Canvas,
    rng: &mut dyn RngCore,
) -> SynthResult<Canvas> {
    let Some(perspective) = perspective else {
        return Ok(canvas);
    };
    let params = perspective.sample(rng);
    let plan = WarpPlan::new(&params, canvas.dimensions())?;
    let (warped, _) = plan.warp(&canvas)?;
    Ok(warped)
}

/// Paste `mask` onto a random crop of `bg` (upscaled first if too small).
///
/// Returns the composited image and the untouched crop.
fn paste_on_bg(bg: &Canvas, mask: &Canvas, rng: &mut dyn RngCore) -> (Canvas, Canvas) {
    let (w, h) = mask.dimensions();
    let (x, y) = random::random_xy_offset(rng, (w, h), bg.dimensions());
    let guarded = guard_bg_size(bg, (w, h));
    let cropped = crop(guarded.as_ref().unwrap_or(bg), x, y, w, h);
    let mut img = cropped.clone();
    paste_over(&mut img, mask, (0, 0));
    (img, cropped)
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
