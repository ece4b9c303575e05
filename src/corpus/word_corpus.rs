use std::path::PathBuf;

use rand::RngCore;

use crate::corpus::{CharFilterConfig, Corpus, CorpusBase, CorpusBaseConfig, read_text_files};
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct WordCorpusConfig {
    #[serde(flatten)]
    pub base: CorpusBaseConfig,
    #[serde(flatten)]
    pub filter: CharFilterConfig,
    pub text_paths: Vec<PathBuf>,
    #[serde(default = "default_separator")]
    pub separator: String,
    /// `[min, max)`, or exactly `min` words when both ends are equal.
    #[serde(default = "default_num_word")]
    pub num_word: (usize, usize),
}

fn default_separator() -> String {
    " ".to_string()
}

fn default_num_word() -> (usize, usize) {
    (1, 5)
}

/// Runs of contiguous words re-joined by the separator.
#[derive(Debug)]
pub struct WordCorpus {
    base: CorpusBase,
    separator: String,
    num_word: (usize, usize),
    words: Vec<String>,
}

impl WordCorpus {
    pub fn new(config: WordCorpusConfig) -> SynthResult<Self> {
        let WordCorpusConfig {
            base,
            filter,
            text_paths,
            separator,
            num_word,
        } = config;
        if separator.is_empty() {
            return Err(SynthError::config("word corpus separator must not be empty"));
        }
        if num_word.0 == 0 || num_word.0 > num_word.1 {
            return Err(SynthError::config(format!(
                "word corpus num_word must satisfy 0 < min <= max, got {num_word:?}"
            )));
        }

        let mut texts = read_text_files(&text_paths, "word corpus")?
            .into_iter()
            .map(|t| t.trim().to_string())
            .collect::<Vec<_>>();
        let mut base = CorpusBase::new(base)?;
        let chars = base.refine_fonts(&filter)?;
        base.apply_char_filter(&filter, chars.as_ref(), &mut texts)?;

        let words = texts
            .iter()
            .flat_map(|t| t.split(separator.as_str()))
            .map(str::to_string)
            .collect::<Vec<_>>();
        tracing::info!("load {} words", words.len());

        if words.len() < num_word.1 {
            return Err(SynthError::config(format!(
                "too few words: {}, need at least {}",
                words.len(),
                num_word.1
            )));
        }
        Ok(Self {
            base,
            separator,
            num_word,
            words,
        })
    }
}

impl Corpus for WordCorpus {
    fn name(&self) -> &'static str {
        "word"
    }

    fn base(&self) -> &CorpusBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CorpusBase {
        &mut self.base
    }

    fn get_text(&mut self, rng: &mut dyn RngCore) -> SynthResult<String> {
        let (lo, hi) = self.num_word;
        let length = if lo == hi {
            lo
        } else {
            random::randint(rng, (lo as i64, hi as i64)) as usize
        };
        let start = random::randint(rng, (0, (self.words.len() - length + 1) as i64)) as usize;
        Ok(self.words[start..start + length].join(&self.separator))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/word_corpus.rs"]
mod tests;
