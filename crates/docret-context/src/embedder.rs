use async_trait::async_trait;
use docret_config::{EmbeddingBackend, EmbeddingConfig};
use docret_core::error::ServiceError;
use docret_core::traits::Embedder;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use tracing::debug;

pub(crate) const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";
pub(crate) const OPENAI_DEFAULT_URL: &str = "https://api.openai.com/v1";

/// Build the embedder named by the configuration.
pub fn select_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>, ServiceError> {
    match config.backend {
        EmbeddingBackend::Ollama => Ok(Arc::new(OllamaEmbedder::new(
            config.model_name.clone(),
            config.base_url.clone(),
        ))),
        EmbeddingBackend::OpenAi => {
            let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
                ServiceError::Embedding("OPENAI_API_KEY is not set".to_string())
            })?;
            Ok(Arc::new(OpenAiEmbedder::new(
                config.model_name.clone(),
                openai_base_url(&config.base_url),
                api_key,
            )))
        }
    }
}

/// The Ollama default URL means "unset" for OpenAI backends.
pub(crate) fn openai_base_url(base_url: &str) -> String {
    if base_url.trim_end_matches('/') == OLLAMA_DEFAULT_URL {
        OPENAI_DEFAULT_URL.to_string()
    } else {
        base_url.trim_end_matches('/').to_string()
    }
}

fn embedding_error(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Embedding(e.to_string())
}

pub struct OpenAiEmbedder {
    model: String,
    base_url: String,
    api_key: String,
    client: Client,
}

impl OpenAiEmbedder {
    pub fn new(model: String, base_url: String, api_key: String) -> Self {
        Self {
            model,
            base_url,
            api_key,
            client: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingItem {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError> {
        let mut list = self.embed_batch(&[text.to_string()]).await?;
        list.pop()
            .ok_or_else(|| embedding_error("Empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ServiceError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let resp = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": texts,
            }))
            .send()
            .await
            .map_err(embedding_error)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(embedding_error(format!(
                "OpenAI embeddings failed ({}): {}",
                status, body
            )));
        }

        let parsed: OpenAiEmbeddingResponse = resp.json().await.map_err(embedding_error)?;
        if parsed.data.len() != texts.len() {
            return Err(embedding_error(format!(
                "Mismatch embedding count: got {}, expected {}",
                parsed.data.len(),
                texts.len()
            )));
        }
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

pub struct OllamaEmbedder {
    model: String,
    base_url: String,
    client: Client,
}

impl OllamaEmbedder {
    pub fn new(model: String, base_url: String) -> Self {
        Self {
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Option<Vec<f32>>,
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError> {
        let resp = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": text,
            }))
            .send()
            .await
            .map_err(embedding_error)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(embedding_error(format!(
                "Ollama embeddings failed ({}): {}",
                status, body
            )));
        }

        let parsed: OllamaEmbeddingResponse = resp.json().await.map_err(embedding_error)?;
        match parsed.embedding {
            Some(embedding) if !embedding.is_empty() => Ok(embedding),
            _ => Err(embedding_error("No embedding field in Ollama response")),
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ServiceError> {
        debug!("Embedding {} texts with {}", texts.len(), self.model);
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}
