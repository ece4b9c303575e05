//! JSON-facing generator configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assets::background::DEFAULT_BG_CACHE_SIZE;
use crate::corpus::CorpusConfig;
use crate::effects::EffectConfig;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::retry::DEFAULT_MAX_ATTEMPTS;
use crate::layout::LayoutConfig;
use crate::render::color::TextColorConfig;
use crate::transform::PerspectiveConfig;

/// One generation job: how many images, where they go, how they are rendered.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GeneratorConfig {
    pub num_image: usize,
    pub save_dir: PathBuf,
    pub render: RenderConfig,
}

/// A single corpus, or several corpora merged by a layout.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum CorpusSet {
    Single(Box<CorpusConfig>),
    Multi(Vec<CorpusConfig>),
}

/// Effects on each corpus's text canvas, shaped like [`CorpusSet`].
///
/// `PerCorpus` entries of `null` skip effects for that corpus.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum CorpusEffects {
    Single(Vec<EffectConfig>),
    PerCorpus(Vec<Option<Vec<EffectConfig>>>),
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderConfig {
    pub corpus: CorpusSet,
    #[serde(default)]
    pub corpus_effects: Option<CorpusEffects>,
    pub bg_dir: PathBuf,
    #[serde(default = "default_true")]
    pub pre_load_bg_img: bool,
    #[serde(default = "default_bg_cache_size")]
    pub bg_cache_size: usize, // on-demand loading only
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub perspective_transform: Option<PerspectiveConfig>,
    /// Applied to the merged canvas of a multi-corpus render.
    #[serde(default)]
    pub layout_effects: Vec<EffectConfig>,
    /// Applied to the final image, background included.
    #[serde(default)]
    pub render_effects: Vec<EffectConfig>,
    #[serde(default = "default_height")]
    pub height: i32, // -1 keeps the rendered height
    #[serde(default = "default_true")]
    pub gray: bool,
    /// Overrides every corpus's own text color.
    #[serde(default)]
    pub text_color: Option<TextColorConfig>,
    /// Output `[image | background | text mask]` side by side.
    #[serde(default)]
    pub return_bg_and_mask: bool,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl RenderConfig {
    /// Minimal config: one corpus, default everything else.
    pub fn new(corpus: CorpusConfig, bg_dir: impl Into<PathBuf>) -> Self {
        Self {
            corpus: CorpusSet::Single(Box::new(corpus)),
            corpus_effects: None,
            bg_dir: bg_dir.into(),
            pre_load_bg_img: true,
            bg_cache_size: DEFAULT_BG_CACHE_SIZE,
            layout: LayoutConfig::default(),
            perspective_transform: None,
            layout_effects: Vec::new(),
            render_effects: Vec::new(),
            height: default_height(),
            gray: true,
            text_color: None,
            return_bg_and_mask: false,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn validate(&self) -> SynthResult<()> {
        if self.height == 0 || self.height < -1 {
            return Err(SynthError::config(format!(
                "height must be positive or -1, got {}",
                self.height
            )));
        }
        if let Some(color) = &self.text_color {
            color.validate()?;
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_bg_cache_size() -> usize {
    DEFAULT_BG_CACHE_SIZE
}

fn default_height() -> i32 {
    32
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

/// Parse a list of generator configs from JSON.
pub fn from_reader<R: std::io::Read>(r: R) -> SynthResult<Vec<GeneratorConfig>> {
    let configs: Vec<GeneratorConfig> = serde_json::from_reader(r)
        .map_err(|e| SynthError::config(format!("parse generator config JSON: {e}")))?;
    if configs.is_empty() {
        return Err(SynthError::config("generator config list is empty"));
    }
    for cfg in &configs {
        cfg.render.validate()?;
    }
    Ok(configs)
}

/// Parse a list of generator configs from a JSON file on disk.
pub fn from_path(path: impl AsRef<Path>) -> SynthResult<Vec<GeneratorConfig>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        SynthError::config(format!("open generator config '{}': {e}", path.display()))
    })?;
    from_reader(BufReader::new(f))
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
