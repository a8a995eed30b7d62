//! Free-text document configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextConfig {
    /// How non-tabular documents become records
    #[serde(default)]
    pub strategy: TextStrategy,

    /// Maximum tokens per part when `strategy = "split"`
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Overlap tokens between consecutive parts
    #[serde(default = "default_overlap")]
    pub overlap_tokens: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextStrategy {
    /// One record per document, id = file name
    #[default]
    Whole,
    /// Token-bounded parts, ids `<file>_part_<n>`
    Split,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            strategy: TextStrategy::default(),
            max_tokens: default_max_tokens(),
            overlap_tokens: default_overlap(),
        }
    }
}

impl crate::validation::Validate for TextConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("text.max_tokens", self.max_tokens, 0)?;

        if self.overlap_tokens >= self.max_tokens {
            return Err(ConfigError::invalid(
                "text.overlap_tokens",
                format!(
                    "overlap ({}) must be smaller than max_tokens ({})",
                    self.overlap_tokens, self.max_tokens
                ),
            ));
        }
        Ok(())
    }
}

fn default_max_tokens() -> usize {
    512
}

fn default_overlap() -> usize {
    64
}
