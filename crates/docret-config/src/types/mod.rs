//! Configuration type definitions
//!
//! One module per concern. Each type carries its own defaults and validation.

pub mod core;
pub mod embedding;
pub mod llm;
pub mod prompt;
pub mod retrieval;
pub mod table;
pub mod text;

pub use core::CoreConfig;
pub use embedding::{EmbeddingBackend, EmbeddingConfig};
pub use llm::{LlmBackend, LlmConfig};
pub use prompt::{Instructions, PromptConfig};
pub use retrieval::RetrievalConfig;
pub use table::TableConfig;
pub use text::{TextConfig, TextStrategy};

use serde::{Deserialize, Serialize};

/// Top-level configuration, constructed once at process start and passed
/// by reference into each component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Document directory and index location
    #[serde(default)]
    pub core: CoreConfig,

    /// Spreadsheet row chunking
    #[serde(default)]
    pub table: TableConfig,

    /// Free-text document units
    #[serde(default)]
    pub text: TextConfig,

    /// Embedding service
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Generation service
    #[serde(default)]
    pub llm: LlmConfig,

    /// Query and admission threshold
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Generation prompt layout
    #[serde(default)]
    pub prompt: PromptConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.core.validate()?;
        self.table.validate()?;
        self.text.validate()?;
        self.embedding.validate()?;
        self.llm.validate()?;
        self.retrieval.validate()?;
        self.prompt.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip_keeps_sections() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("table:"));
        assert!(yaml.contains("retrieval:"));
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.table.split_column, config.table.split_column);
    }
}
