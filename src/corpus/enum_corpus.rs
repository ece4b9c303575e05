use std::path::PathBuf;

use rand::RngCore;

use crate::corpus::{CharFilterConfig, Corpus, CorpusBase, CorpusBaseConfig, read_text_files};
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random;

/// Exactly one of `text_paths` and `items` must be non-empty.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EnumCorpusConfig {
    #[serde(flatten)]
    pub base: CorpusBaseConfig,
    #[serde(flatten)]
    pub filter: CharFilterConfig,
    #[serde(default)]
    pub text_paths: Vec<PathBuf>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default = "default_num_pick")]
    pub num_pick: usize,
    #[serde(default)]
    pub join_str: String,
}

fn default_num_pick() -> usize {
    1
}

/// Items picked from a fixed list.
#[derive(Debug)]
pub struct EnumCorpus {
    base: CorpusBase,
    num_pick: usize,
    join_str: String,
    texts: Vec<String>,
}

impl EnumCorpus {
    pub fn new(config: EnumCorpusConfig) -> SynthResult<Self> {
        let EnumCorpusConfig {
            base,
            filter,
            text_paths,
            items,
            num_pick,
            join_str,
        } = config;
        let mut texts = match (text_paths.is_empty(), items.is_empty()) {
            (true, true) => {
                return Err(SynthError::config("text_paths or items must not be empty"));
            }
            (false, false) => {
                return Err(SynthError::config(
                    "only one of text_paths or items can be set",
                ));
            }
            (false, true) => read_text_files(&text_paths, "enum corpus")?
                .iter()
                .flat_map(|t| t.lines())
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>(),
            (true, false) => items,
        };
        if num_pick == 0 {
            return Err(SynthError::config("enum corpus num_pick must be > 0"));
        }

        let mut base = CorpusBase::new(base)?;
        let chars = base.refine_fonts(&filter)?;
        base.apply_char_filter(&filter, chars.as_ref(), &mut texts)?;
        if texts.is_empty() {
            return Err(SynthError::config("enum corpus has no items"));
        }

        Ok(Self {
            base,
            num_pick,
            join_str,
            texts,
        })
    }
}

impl Corpus for EnumCorpus {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn base(&self) -> &CorpusBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CorpusBase {
        &mut self.base
    }

    fn get_text(&mut self, rng: &mut dyn RngCore) -> SynthResult<String> {
        let picked = (0..self.num_pick)
            .map(|_| self.texts[random::index(rng, self.texts.len())].as_str())
            .collect::<Vec<_>>();
        Ok(picked.join(&self.join_str))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/enum_corpus.rs"]
mod tests;
