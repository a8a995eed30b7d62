use crate::embedder::select_embedder;
use crate::llm::select_llm;
use anyhow::{Context, Result};
use docret_config::Config;
use docret_core::traits::{Embedder, Llm, VectorStore};
use docret_index::VectorIndex;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Services shared by the ingest and query paths, built once from the
/// configuration at process start.
pub struct DocContext {
    pub config: Config,
    pub embedder: Arc<dyn Embedder>,
    pub llm: Arc<dyn Llm>,
    pub index: Arc<Mutex<dyn VectorStore>>,
}

impl DocContext {
    /// Load configuration (explicit file, or the default lookup) and open
    /// the collection's vector index.
    pub async fn from_env(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::from_file(path)?,
            None => Config::load()?,
        };
        Self::open(config).await
    }

    pub async fn open(config: Config) -> Result<Self> {
        let index_path = config.core.collection_path();
        debug!("Opening collection at {}", index_path.display());
        let index = VectorIndex::new(&index_path)
            .await
            .with_context(|| format!("failed to open index at {}", index_path.display()))?;
        Self::with_services(config, Arc::new(Mutex::new(index)))
    }

    /// Use a caller-supplied store, e.g. an in-memory index.
    pub fn with_services(config: Config, index: Arc<Mutex<dyn VectorStore>>) -> Result<Self> {
        let embedder = select_embedder(&config.embedding)?;
        let llm = select_llm(&config.llm)?;
        Ok(Self {
            config,
            embedder,
            llm,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_nothing_until_first_write() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut config = Config::default();
        config.core.index_dir = dir.path().join(".docindex");

        let ctx = DocContext::open(config).await?;
        assert_eq!(ctx.index.lock().await.count().await?, 0);
        assert!(!dir.path().join(".docindex").exists());
        Ok(())
    }
}
