use std::{collections::BTreeSet, path::Path};

use anyhow::Context;

use crate::foundation::error::{SynthError, SynthResult};

pub const SPACE_CHAR: char = ' ';

/// Immutable character inventory loaded from a one-char-per-line file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharSet {
    chars: BTreeSet<char>,
}

impl CharSet {
    /// Load `path`: every line holds exactly one character after trimming. A single line that is
    /// blank but contains a space encodes the space character; a second one is an error.
    pub fn load(path: &Path) -> SynthResult<Self> {
        if !path.is_file() {
            return Err(SynthError::config(format!(
                "chars file does not exist: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read chars file '{}'", path.display()))?;
        let set = Self::parse(&text).map_err(|e| match e {
            SynthError::Config(msg) => SynthError::config(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        tracing::info!(count = set.len(), path = %path.display(), "loaded chars");
        Ok(set)
    }

    pub fn parse(text: &str) -> SynthResult<Self> {
        let mut chars = BTreeSet::new();
        let mut seen_space = false;
        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            let mut it = trimmed.chars();
            match (it.next(), it.next()) {
                (Some(c), None) => {
                    chars.insert(c);
                }
                (Some(_), Some(_)) => {
                    return Err(SynthError::config(format!(
                        "line {idx} is invalid, make sure one char one line"
                    )));
                }
                (None, _) if line.contains(SPACE_CHAR) => {
                    if seen_space {
                        return Err(SynthError::config(format!(
                            "found two space lines (second at line {idx})"
                        )));
                    }
                    tracing::debug!(line = idx, "found space line");
                    seen_space = true;
                    chars.insert(SPACE_CHAR);
                }
                (None, _) => {}
            }
        }
        Ok(Self { chars })
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    pub fn as_set(&self) -> &BTreeSet<char> {
        &self.chars
    }

    /// Keep only characters of `text` present in this set.
    pub fn filter_text(&self, text: &str) -> String {
        text.chars().filter(|c| self.contains(*c)).collect()
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/charset.rs"]
mod tests;
