//! Text sources.
//!
//! Every corpus owns a [`FontCatalog`]. [`sample`] draws text from a corpus, pairs it with a
//! random font and retries the pair until the font covers every character of the text.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::RngCore;

use crate::assets::charset::CharSet;
use crate::assets::fonts::{DEFAULT_FONT_CACHE_SIZE, FontCatalog, FontHandle};
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random;
use crate::foundation::retry::{DEFAULT_MAX_ATTEMPTS, retry};
use crate::render::color::TextColorConfig;

pub mod char_corpus;
pub mod enum_corpus;
pub mod rand_corpus;
pub mod word_corpus;

pub use char_corpus::{CharCorpus, CharCorpusConfig};
pub use enum_corpus::{EnumCorpus, EnumCorpusConfig};
pub use rand_corpus::{RandCorpus, RandCorpusConfig};
pub use word_corpus::{WordCorpus, WordCorpusConfig};

/// Text paired with a font able to draw all of it.
#[derive(Clone, Debug)]
pub struct SampledText {
    pub text: String,
    pub font: FontHandle,
    pub font_path: PathBuf,
    pub horizontal: bool,
}

/// Inter-character spacing as a fraction of the text height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum CharSpacing {
    Fixed(f64),
    Range((f64, f64)), // [lo, hi)
}

impl CharSpacing {
    /// A negative fixed value turns spacing off.
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Fixed(v) if *v < 0.0)
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        match *self {
            Self::Fixed(v) => v,
            Self::Range(range) => random::uniform(rng, range),
        }
    }
}

/// Settings shared by every corpus kind.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CorpusBaseConfig {
    pub font_dir: PathBuf,
    #[serde(default)]
    pub font_list_file: Option<PathBuf>,
    pub font_size: (u32, u32), // [min, max)
    #[serde(default)]
    pub clip_length: Option<usize>,
    #[serde(default)]
    pub char_spacing: Option<CharSpacing>,
    #[serde(default)]
    pub text_color: TextColorConfig,
    #[serde(default = "default_true")]
    pub horizontal: bool,
    #[serde(default = "default_font_cache_size")]
    pub font_cache_size: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl CorpusBaseConfig {
    pub fn new(font_dir: impl Into<PathBuf>, font_size: (u32, u32)) -> Self {
        Self {
            font_dir: font_dir.into(),
            font_list_file: None,
            font_size,
            clip_length: None,
            char_spacing: None,
            text_color: TextColorConfig::default(),
            horizontal: true,
            font_cache_size: DEFAULT_FONT_CACHE_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Optional charset restriction of a corpus.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct CharFilterConfig {
    /// Drop source characters missing from `chars_file`.
    #[serde(default)]
    pub filter_by_chars: bool,
    /// Also used to refine font coverage whenever set.
    #[serde(default)]
    pub chars_file: Option<PathBuf>,
    /// Drop fonts supporting fewer than `filter_font_min_support_chars` chars of the charset.
    #[serde(default)]
    pub filter_font: bool,
    #[serde(default = "default_min_support")]
    pub filter_font_min_support_chars: usize,
}

fn default_true() -> bool {
    true
}

fn default_font_cache_size() -> usize {
    DEFAULT_FONT_CACHE_SIZE
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_min_support() -> usize {
    100
}

/// Corpus configuration, tagged by `kind`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorpusConfig {
    Char(CharCorpusConfig),
    Word(WordCorpusConfig),
    Enum(EnumCorpusConfig),
    Rand(RandCorpusConfig),
}

impl CorpusConfig {
    pub fn base(&self) -> &CorpusBaseConfig {
        match self {
            Self::Char(c) => &c.base,
            Self::Word(c) => &c.base,
            Self::Enum(c) => &c.base,
            Self::Rand(c) => &c.base,
        }
    }

    pub fn build(&self) -> SynthResult<Box<dyn Corpus>> {
        Ok(match self {
            Self::Char(c) => Box::new(CharCorpus::new(c.clone())?),
            Self::Word(c) => Box::new(WordCorpus::new(c.clone())?),
            Self::Enum(c) => Box::new(EnumCorpus::new(c.clone())?),
            Self::Rand(c) => Box::new(RandCorpus::new(c.clone())?),
        })
    }
}

/// State every corpus carries: its base settings and its fonts.
#[derive(Debug)]
pub struct CorpusBase {
    pub config: CorpusBaseConfig,
    pub fonts: FontCatalog,
}

impl CorpusBase {
    pub fn new(config: CorpusBaseConfig) -> SynthResult<Self> {
        let fonts = FontCatalog::new(
            &config.font_dir,
            config.font_list_file.as_deref(),
            config.font_size,
            config.font_cache_size,
        )?;
        Ok(Self { config, fonts })
    }

    /// Load the charset named by `filter`, if any, and refine font coverage against it.
    pub fn refine_fonts(&mut self, filter: &CharFilterConfig) -> SynthResult<Option<CharSet>> {
        let Some(path) = &filter.chars_file else {
            return Ok(None);
        };
        let chars = CharSet::load(path)?;
        self.fonts.refine_for(&chars);
        Ok(Some(chars))
    }

    /// Text filtering and font filtering, as requested by `filter`.
    ///
    /// `chars` is the result of [`CorpusBase::refine_fonts`] for the same `filter`.
    pub fn apply_char_filter(
        &mut self,
        filter: &CharFilterConfig,
        chars: Option<&CharSet>,
        texts: &mut [String],
    ) -> SynthResult<()> {
        if !filter.filter_by_chars {
            return Ok(());
        }
        let chars = chars.ok_or_else(|| match &filter.chars_file {
            Some(p) => SynthError::config(format!("chars_file not exists: {}", p.display())),
            None => SynthError::config("filter_by_chars requires chars_file"),
        })?;
        filter_by_chars(texts, chars);
        if filter.filter_font {
            self.fonts
                .filter_by_min_support(filter.filter_font_min_support_chars)?;
        }
        Ok(())
    }
}

/// A source of candidate text.
pub trait Corpus {
    /// Short kind name used in logs.
    fn name(&self) -> &'static str;

    fn base(&self) -> &CorpusBase;

    fn base_mut(&mut self) -> &mut CorpusBase;

    /// Raw text for one sample, before clipping and coverage checks.
    fn get_text(&mut self, rng: &mut dyn RngCore) -> SynthResult<String>;
}

/// Draw text and a font covering it, retrying transient failures up to the corpus's attempt cap.
pub fn sample(corpus: &mut dyn Corpus, rng: &mut dyn RngCore) -> SynthResult<SampledText> {
    let max_attempts = corpus.base().config.max_attempts;
    let what = format!("{} corpus sample", corpus.name());
    retry(max_attempts, &what, |_| sample_once(&mut *corpus, &mut *rng))
}

fn sample_once(corpus: &mut dyn Corpus, rng: &mut dyn RngCore) -> SynthResult<SampledText> {
    let mut text = corpus.get_text(rng)?;

    let base = corpus.base_mut();
    if let Some(clip) = base.config.clip_length
        && text.chars().count() > clip
    {
        text = text.chars().take(clip).collect();
    }

    let selected = base.fonts.get_font(rng)?;
    let (ok, missing) = FontCatalog::check_support(&text, &selected.code_points);
    if !ok {
        tracing::debug!(
            corpus = corpus.name(),
            font = %selected.path.display(),
            "font does not support chars: {missing:?}"
        );
        return Err(SynthError::Coverage {
            font: selected.path.display().to_string(),
            missing,
        });
    }

    Ok(SampledText {
        text,
        font: selected.handle,
        font_path: selected.path,
        horizontal: corpus.base().config.horizontal,
    })
}

/// Remove characters missing from `chars` in place and log what was dropped.
pub fn filter_by_chars(texts: &mut [String], chars: &CharSet) {
    tracing::info!("filtering text by chars...");
    let mut total = 0usize;
    let mut filtered = 0usize;
    let mut unique = BTreeSet::new();
    for text in texts.iter_mut() {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            total += 1;
            if chars.contains(c) {
                out.push(c);
            } else {
                filtered += 1;
                unique.insert(c);
            }
        }
        *text = out;
    }
    let pct = if total == 0 {
        0.0
    } else {
        filtered as f64 / total as f64 * 100.0
    };
    tracing::info!(
        "filter {pct:.2}%({filtered}) chars in input text, unique chars({}): {unique:?}",
        unique.len()
    );
}

/// Read every file in `paths`; each must exist. An empty list is fatal.
pub(crate) fn read_text_files(paths: &[PathBuf], what: &str) -> SynthResult<Vec<String>> {
    if paths.is_empty() {
        return Err(SynthError::config(format!("{what}: text_paths must not be empty")));
    }
    paths.iter().map(|p| read_text_file(p)).collect()
}

fn read_text_file(path: &Path) -> SynthResult<String> {
    if !path.is_file() {
        return Err(SynthError::config(format!(
            "text_path not exists: {}",
            path.display()
        )));
    }
    tracing::info!(path = %path.display(), "load text");
    Ok(std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?)
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/mod.rs"]
mod tests;
