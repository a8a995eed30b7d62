//! LLM configuration

use serde::{Deserialize, Serialize};

/// Generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub backend: LlmBackend,

    /// Model name
    ///
    /// Examples: "llama3.2" (Ollama), "gpt-4o-mini" (OpenAI)
    #[serde(default = "default_model")]
    pub model: String,

    /// Service base URL
    #[serde(default = "super::embedding::default_base_url")]
    pub base_url: String,

    /// Maximum tokens for responses
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub temperature: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Ollama `/api/generate`
    #[default]
    Ollama,
    /// OpenAI-compatible `/chat/completions` (requires OPENAI_API_KEY)
    #[serde(rename = "openai")]
    OpenAi,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::default(),
            model: default_model(),
            base_url: super::embedding::default_base_url(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
        }
    }
}

impl crate::validation::Validate for LlmConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::{validate_range, validate_url};

        if self.model.is_empty() {
            return Err(ConfigError::invalid("llm.model", "Model name cannot be empty"));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("llm.max_tokens", "max_tokens must be > 0"));
        }

        validate_url("llm.base_url", &self.base_url)?;
        validate_range("llm.temperature", self.temperature, 0.0, 2.0)?;

        Ok(())
    }
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_max_tokens() -> u32 {
    512
}
