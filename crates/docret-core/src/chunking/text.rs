use super::tokenizer::{count_tokens, TOKENIZER};
use anyhow::{anyhow, Result};
use docret_config::TextConfig;
use text_splitter::ChunkConfig;

/// Token-bounded splitting of free-text documents with overlap.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    max_tokens: usize,
    overlap_tokens: usize,
}

impl TextSplitter {
    pub fn new(config: &TextConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            overlap_tokens: config.overlap_tokens,
        }
    }

    /// Split `text` on semantic boundaries. Text that already fits comes back
    /// as a single part.
    pub fn split(&self, text: &str) -> Result<Vec<String>> {
        if count_tokens(text) <= self.max_tokens {
            return Ok(vec![text.to_string()]);
        }

        let parts: Vec<String> = match TOKENIZER.as_ref() {
            Some(bpe) => {
                let config = ChunkConfig::new(self.max_tokens)
                    .with_sizer(bpe.clone())
                    .with_overlap(self.overlap_tokens)
                    .map_err(|e| anyhow!("Invalid chunk config: {}", e))?;
                text_splitter::TextSplitter::new(config)
                    .chunks(text)
                    .map(str::to_string)
                    .collect()
            }
            None => {
                // Character sizing is a rough stand-in for tokens.
                let config = ChunkConfig::new(self.max_tokens * 4)
                    .with_overlap(self.overlap_tokens * 4)
                    .map_err(|e| anyhow!("Invalid chunk config: {}", e))?;
                text_splitter::TextSplitter::new(config)
                    .chunks(text)
                    .map(str::to_string)
                    .collect()
            }
        };

        Ok(parts)
    }
}
