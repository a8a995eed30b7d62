use crate::embedder::openai_base_url;
use async_trait::async_trait;
use docret_config::{LlmBackend, LlmConfig};
use docret_core::error::ServiceError;
use docret_core::traits::Llm;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use tracing::debug;

/// Build the generation client named by the configuration.
pub fn select_llm(config: &LlmConfig) -> Result<Arc<dyn Llm>, ServiceError> {
    match config.backend {
        LlmBackend::Ollama => Ok(Arc::new(OllamaGenerator::new(config))),
        LlmBackend::OpenAi => {
            let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
                ServiceError::Generation("OPENAI_API_KEY is not set".to_string())
            })?;
            Ok(Arc::new(OpenAiChat::new(config, api_key)))
        }
    }
}

fn generation_error(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Generation(e.to_string())
}

/// Ollama `/api/generate` in non-streaming mode.
pub struct OllamaGenerator {
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
    client: Client,
}

impl OllamaGenerator {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            client: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[async_trait]
impl Llm for OllamaGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        debug!("Generating with {} ({} prompt chars)", self.model, prompt.len());
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "num_predict": self.max_tokens,
                "temperature": self.temperature,
            }
        });
        let resp = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(generation_error)?;
        if !resp.status().is_success() {
            let status = resp.status();
            let txt = resp.text().await.unwrap_or_default();
            return Err(generation_error(format!("Ollama error {}: {}", status, txt)));
        }
        let parsed: GenerateResponse = resp.json().await.map_err(generation_error)?;
        parsed
            .response
            .map(|r| r.trim().to_string())
            .ok_or_else(|| generation_error("No response field in Ollama reply"))
    }
}

/// OpenAI-compatible `/chat/completions`.
pub struct OpenAiChat {
    model: String,
    base_url: String,
    api_key: String,
    max_tokens: u32,
    temperature: f32,
    client: Client,
}

impl OpenAiChat {
    pub fn new(config: &LlmConfig, api_key: String) -> Self {
        Self {
            model: config.model.clone(),
            base_url: openai_base_url(&config.base_url),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            client: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatRespChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResp {
    choices: Vec<ChatRespChoice>,
}

#[async_trait]
impl Llm for OpenAiChat {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(generation_error)?;
        if !resp.status().is_success() {
            let status = resp.status();
            let txt = resp.text().await.unwrap_or_default();
            return Err(generation_error(format!("OpenAI error {}: {}", status, txt)));
        }
        let parsed: ChatResp = resp.json().await.map_err(generation_error)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .ok_or_else(|| generation_error("OpenAI reply had no content"))
    }
}
