//! Embedding provider configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding backend to use
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Model name for the selected backend
    ///
    /// Examples:
    /// - Ollama: "nomic-embed-text", "mxbai-embed-large"
    /// - OpenAI: "text-embedding-3-small"
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Texts sent per embedding request batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Local Ollama server (`/api/embeddings`)
    #[default]
    Ollama,

    /// OpenAI-compatible `/embeddings` endpoint (requires OPENAI_API_KEY)
    #[serde(rename = "openai")]
    OpenAi,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model_name: default_model_name(),
            base_url: default_base_url(),
            batch_size: default_batch_size(),
        }
    }
}

impl crate::validation::Validate for EmbeddingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::{validate_positive, validate_url};

        if self.model_name.is_empty() {
            return Err(ConfigError::invalid(
                "embedding.model_name",
                "Model name cannot be empty",
            ));
        }
        validate_url("embedding.base_url", &self.base_url)?;
        validate_positive("embedding.batch_size", self.batch_size, 0)?;
        Ok(())
    }
}

fn default_model_name() -> String {
    "nomic-embed-text".to_string()
}

pub(crate) fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_batch_size() -> usize {
    64
}
