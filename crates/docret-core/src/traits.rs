use crate::error::ServiceError;
use crate::models::{QueryResult, Record};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ServiceError>;
}

#[async_trait]
pub trait Llm: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Nearest-neighbour store keyed by record id.
///
/// `upsert` replaces any record that shares an id with the incoming batch;
/// a failed upsert leaves previously stored records in place.
/// `query` returns at most `top_k` hits ordered by ascending distance.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(&mut self, records: &[Record], vectors: &[Vec<f32>]) -> Result<()>;
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryResult>>;
    /// Remove every record of `source` whose id is not in `keep`.
    async fn retain_source(&mut self, source: &str, keep: &[String]) -> Result<()>;
    async fn count(&self) -> Result<usize>;

    async fn delete_source(&mut self, source: &str) -> Result<()> {
        self.retain_source(source, &[]).await
    }
}
