use std::path::PathBuf;

use rand::RngCore;

use crate::corpus::{CharFilterConfig, Corpus, CorpusBase, CorpusBaseConfig, read_text_files};
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CharCorpusConfig {
    #[serde(flatten)]
    pub base: CorpusBaseConfig,
    #[serde(flatten)]
    pub filter: CharFilterConfig,
    pub text_paths: Vec<PathBuf>,
    #[serde(default = "default_length")]
    pub length: (usize, usize), // [min, max)
}

fn default_length() -> (usize, usize) {
    (5, 10)
}

/// Random contiguous substrings of the concatenated source texts.
#[derive(Debug)]
pub struct CharCorpus {
    base: CorpusBase,
    length: (usize, usize),
    text: Vec<char>,
}

impl CharCorpus {
    pub fn new(config: CharCorpusConfig) -> SynthResult<Self> {
        let CharCorpusConfig {
            base,
            filter,
            text_paths,
            length,
        } = config;
        if length.0 >= length.1 {
            return Err(SynthError::config(format!(
                "char corpus length must be [min, max) with min < max, got {length:?}"
            )));
        }

        let mut texts = vec![read_text_files(&text_paths, "char corpus")?.concat()];
        let mut base = CorpusBase::new(base)?;
        let chars = base.refine_fonts(&filter)?;
        base.apply_char_filter(&filter, chars.as_ref(), &mut texts)?;

        let text = texts.concat().chars().collect::<Vec<_>>();
        if text.len() < length.1 {
            return Err(SynthError::config(format!(
                "too few texts: {} chars, need at least {}",
                text.len(),
                length.1
            )));
        }
        Ok(Self { base, length, text })
    }
}

impl Corpus for CharCorpus {
    fn name(&self) -> &'static str {
        "char"
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
        let start = random::randint(rng, (0, (self.text.len() - length) as i64)) as usize;
        Ok(self.text[start..start + length].iter().collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/char_corpus.rs"]
mod tests;
