use std::path::PathBuf;

use rand::RngCore;

use crate::assets::charset::CharSet;
use crate::corpus::{Corpus, CorpusBase, CorpusBaseConfig};
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RandCorpusConfig {
    #[serde(flatten)]
    pub base: CorpusBaseConfig,
    pub chars_file: PathBuf,
    #[serde(default = "default_length")]
    pub length: (usize, usize), // [min, max)
    #[serde(default)]
    pub filter_font: bool,
    #[serde(default = "default_min_support")]
    pub filter_font_min_support_chars: usize,
}

fn default_length() -> (usize, usize) {
    (5, 10)
}

fn default_min_support() -> usize {
    100
}

/// Characters drawn independently, with replacement, from a charset.
#[derive(Debug)]
pub struct RandCorpus {
    base: CorpusBase,
    length: (usize, usize),
    chars: Vec<char>,
}

impl RandCorpus {
    pub fn new(config: RandCorpusConfig) -> SynthResult<Self> {
        if config.length.0 >= config.length.1 {
            return Err(SynthError::config(format!(
                "rand corpus length must be [min, max) with min < max, got {:?}",
                config.length
            )));
        }
        let charset = CharSet::load(&config.chars_file)?;
        if charset.is_empty() {
            return Err(SynthError::config(format!(
                "chars file is empty: {}",
                config.chars_file.display()
            )));
        }

        let mut base = CorpusBase::new(config.base)?;
        base.fonts.refine_for(&charset);
        if config.filter_font {
            base.fonts
                .filter_by_min_support(config.filter_font_min_support_chars)?;
        }

        Ok(Self {
            base,
            length: config.length,
            chars: charset.iter().collect(),
        })
    }
}

impl Corpus for RandCorpus {
    fn name(&self) -> &'static str {
        "rand"
    }

    fn base(&self) -> &CorpusBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CorpusBase {
        &mut self.base
    }

    fn get_text(&mut self, rng: &mut dyn RngCore) -> SynthResult<String> {
        let (lo, hi) = self.length;
        let length = random::randint(rng, (lo as i64, hi as i64)) as usize;
        Ok((0..length)
            .map(|_| self.chars[random::index(rng, self.chars.len())])
            .collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/rand_corpus.rs"]
mod tests;
