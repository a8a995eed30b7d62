//! Read path: question -> embedding -> nearest records -> threshold ->
//! prompt -> generation.

use anyhow::Result;
use docret_config::{Config, RetrievalConfig, Validate};
use docret_context::DocContext;
use docret_core::error::ServiceError;
use docret_core::models::QueryResult;
use docret_core::prompt::PromptAssembler;
use docret_core::retrieval::{self, RetrievalOutcome};
use docret_core::traits::{Embedder, Llm, VectorStore};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Record that grounded an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    pub id: String,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Generated from admitted context, most relevant source first
    Grounded { text: String, sources: Vec<Source> },
    /// No stored record was close enough; generation was not attempted
    NoConfidentMatch { closest: Option<f32> },
    /// An external service failed; no answer could be produced
    Unavailable { reason: String },
}

pub struct Responder {
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn Llm>,
    index: Arc<Mutex<dyn VectorStore>>,
    prompt: PromptAssembler,
    top_k: usize,
    max_distance: f32,
}

impl Responder {
    pub fn new(
        config: &Config,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn Llm>,
        index: Arc<Mutex<dyn VectorStore>>,
    ) -> Self {
        Self {
            embedder,
            llm,
            index,
            prompt: PromptAssembler::new(config.prompt.clone()),
            top_k: config.retrieval.top_k,
            max_distance: config.retrieval.max_distance,
        }
    }

    pub fn from_context(ctx: &DocContext) -> Self {
        Self::new(
            &ctx.config,
            ctx.embedder.clone(),
            ctx.llm.clone(),
            ctx.index.clone(),
        )
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Apply caller overrides, validated with the same rules as the
    /// `retrieval` config section.
    pub fn with_overrides(self, top_k: Option<usize>, max_distance: Option<f32>) -> Result<Self> {
        let retrieval = RetrievalConfig {
            top_k: top_k.unwrap_or(self.top_k),
            max_distance: max_distance.unwrap_or(self.max_distance),
        };
        retrieval.validate()?;
        Ok(self
            .with_top_k(retrieval.top_k)
            .with_max_distance(retrieval.max_distance))
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Nearest stored records for `question`, before thresholding.
    pub async fn candidates(&self, question: &str) -> Result<Vec<QueryResult>> {
        let vector = self.embedder.embed(question).await?;
        let index = self.index.lock().await;
        let hits = index.query(&vector, self.top_k).await?;
        debug!("{} candidates for query", hits.len());
        Ok(hits)
    }

    /// Candidates filtered by the admission threshold.
    pub async fn retrieve(&self, question: &str) -> Result<RetrievalOutcome> {
        let hits = self.candidates(question).await?;
        Ok(retrieval::filter(hits, self.max_distance))
    }

    /// Answer `question` from the index. Service failures become
    /// [`Answer::Unavailable`]; only index errors are returned as `Err`.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let outcome = match self.retrieve(question).await {
            Ok(outcome) => outcome,
            Err(err) => match err.downcast::<ServiceError>() {
                Ok(service) => return Ok(unavailable(service)),
                Err(other) => return Err(other),
            },
        };

        let admitted = match outcome {
            RetrievalOutcome::Admitted(admitted) => admitted,
            RetrievalOutcome::NoConfidentMatch {
                candidates,
                closest,
            } => {
                info!(
                    "No confident match among {} candidates (max_distance {})",
                    candidates, self.max_distance
                );
                return Ok(Answer::NoConfidentMatch { closest });
            }
        };

        let prompt = self.prompt.assemble(&admitted, question);
        debug!("Prompt: {} chars from {} records", prompt.len(), admitted.len());

        match self.llm.complete(&prompt).await {
            Ok(text) => Ok(Answer::Grounded {
                text,
                sources: admitted
                    .iter()
                    .map(|r| Source {
                        id: r.id.clone(),
                        distance: r.distance,
                    })
                    .collect(),
            }),
            Err(err) => Ok(unavailable(err)),
        }
    }
}

fn unavailable(err: ServiceError) -> Answer {
    warn!("{}", err);
    Answer::Unavailable {
        reason: err.to_string(),
    }
}
