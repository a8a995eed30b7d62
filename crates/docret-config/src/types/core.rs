//! Core configuration (document directory, index storage)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Directory scanned (non-recursively) for documents to ingest
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    /// Directory holding the vector index
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Collection name; the index lives at `<index_dir>/<collection>.lance`
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl CoreConfig {
    pub fn collection_path(&self) -> PathBuf {
        self.index_dir.join(format!("{}.lance", self.collection))
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            index_dir: default_index_dir(),
            collection: default_collection(),
        }
    }
}

impl crate::validation::Validate for CoreConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.docs_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("core.docs_dir", "cannot be empty"));
        }
        if self.index_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("core.index_dir", "cannot be empty"));
        }
        let valid_name = !self.collection.is_empty()
            && self
                .collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid_name {
            return Err(ConfigError::invalid(
                "core.collection",
                format!(
                    "collection must be non-empty and use [A-Za-z0-9_-], got '{}'",
                    self.collection
                ),
            ));
        }
        Ok(())
    }
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_index_dir() -> PathBuf {
    PathBuf::from(".docindex")
}

fn default_collection() -> String {
    "my_documents".to_string()
}
