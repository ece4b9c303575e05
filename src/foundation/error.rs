use std::collections::BTreeSet;

pub type SynthResult<T> = Result<T, SynthError>;

#[derive(thiserror::Error, Debug)]
pub enum SynthError {
    /// Invalid configuration or violated invariant. Never retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// The sampled font cannot draw every character of the sampled text.
    #[error("font '{font}' does not support chars: {missing:?}")]
    Coverage {
        font: String,
        missing: BTreeSet<char>,
    },

    /// Drawing or transforming a sample failed; a fresh attempt may succeed.
    #[error("render error: {0}")]
    Render(String),

    #[error("gave up after {attempts} attempts, last error: {last}")]
    RetryExhausted {
        attempts: usize,
        last: Box<SynthError>,
    },

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SynthError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Whether a fresh attempt with re-randomized inputs may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Coverage { .. } | Self::Render(_))
    }
}

impl From<redb::Error> for SynthError {
    fn from(e: redb::Error) -> Self {
        Self::Dataset(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
