use anyhow::Result;
use async_trait::async_trait;
use docret_agent::{Answer, Responder};
use docret_config::{Config, Instructions};
use docret_core::error::ServiceError;
use docret_core::models::{Metadata, Record};
use docret_core::traits::{Embedder, Llm, VectorStore};
use docret_index::MemoryIndex;
use std::sync::Mutex as StdMutex;
use std::sync::Arc;
use tokio::sync::Mutex;

struct FixedEmbedder(Vec<f32>);

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, ServiceError> {
        Ok(self.0.clone())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ServiceError> {
        Ok(texts.iter().map(|_| self.0.clone()).collect())
    }
}

struct DownEmbedder;

#[async_trait]
impl Embedder for DownEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, ServiceError> {
        Err(ServiceError::Embedding("connection refused".into()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, ServiceError> {
        Err(ServiceError::Embedding("connection refused".into()))
    }
}

/// Records every prompt it receives.
#[derive(Default)]
struct RecordingLlm {
    prompts: StdMutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl Llm for RecordingLlm {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            Err(ServiceError::Generation("model not found".into()))
        } else {
            Ok("Ja".to_string())
        }
    }
}

fn record(id: &str, context: &str) -> Record {
    Record {
        id: id.to_string(),
        source: "orders.xlsx".to_string(),
        embed_text: context.to_string(),
        context_text: context.to_string(),
        metadata: Metadata::new(),
    }
}

/// Three records at squared distances 0.2, 0.6 and 0.45 from the origin.
async fn seeded_index() -> Result<Arc<Mutex<MemoryIndex>>> {
    let mut index = MemoryIndex::new();
    index
        .upsert(
            &[
                record("row_a", "J | shipped"),
                record("row_b", "N | cancelled"),
                record("row_c", "J | invoiced"),
            ],
            &[
                vec![0.2f32.sqrt(), 0.0],
                vec![0.6f32.sqrt(), 0.0],
                vec![0.45f32.sqrt(), 0.0],
            ],
        )
        .await?;
    Ok(Arc::new(Mutex::new(index)))
}

fn config(max_distance: f32) -> Config {
    let mut config = Config::default();
    config.retrieval.top_k = 3;
    config.retrieval.max_distance = max_distance;
    config
}

#[tokio::test]
async fn test_grounded_answer_uses_admitted_context_in_order() -> Result<()> {
    let llm = Arc::new(RecordingLlm::default());
    let responder = Responder::new(
        &config(0.5),
        Arc::new(FixedEmbedder(vec![0.0, 0.0])),
        llm.clone(),
        seeded_index().await?,
    );

    match responder.ask("Was the order shipped?").await? {
        Answer::Grounded { text, sources } => {
            assert_eq!(text, "Ja");
            let ids: Vec<&str> = sources.iter().map(|s| s.id.as_str()).collect();
            assert_eq!(ids, vec!["row_a", "row_c"]);
        }
        other => panic!("expected grounded answer, got {other:?}"),
    }

    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.find("shipped").unwrap() < prompt.find("invoiced").unwrap());
    assert!(!prompt.contains("cancelled"));
    assert!(prompt.contains("Question: Was the order shipped?"));
    Ok(())
}

#[tokio::test]
async fn test_no_confident_match_skips_generation() -> Result<()> {
    let llm = Arc::new(RecordingLlm::default());
    let responder = Responder::new(
        &config(0.1),
        Arc::new(FixedEmbedder(vec![0.0, 0.0])),
        llm.clone(),
        seeded_index().await?,
    );

    match responder.ask("Anything?").await? {
        Answer::NoConfidentMatch { closest } => {
            let closest = closest.unwrap();
            assert!((closest - 0.2).abs() < 1e-5);
        }
        other => panic!("expected no confident match, got {other:?}"),
    }
    assert!(llm.prompts.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_empty_index_is_no_confident_match() -> Result<()> {
    let llm = Arc::new(RecordingLlm::default());
    let responder = Responder::new(
        &config(1.0),
        Arc::new(FixedEmbedder(vec![0.0, 0.0])),
        llm.clone(),
        Arc::new(Mutex::new(MemoryIndex::new())),
    );
    assert_eq!(
        responder.ask("q").await?,
        Answer::NoConfidentMatch { closest: None }
    );
    assert!(llm.prompts.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_embedding_failure_is_unavailable() -> Result<()> {
    let responder = Responder::new(
        &config(0.5),
        Arc::new(DownEmbedder),
        Arc::new(RecordingLlm::default()),
        seeded_index().await?,
    );
    match responder.ask("q").await? {
        Answer::Unavailable { reason } => assert!(reason.contains("embedding")),
        other => panic!("expected unavailable, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_generation_failure_is_unavailable() -> Result<()> {
    let llm = Arc::new(RecordingLlm {
        fail: true,
        ..Default::default()
    });
    let responder = Responder::new(
        &config(0.5),
        Arc::new(FixedEmbedder(vec![0.0, 0.0])),
        llm,
        seeded_index().await?,
    );
    match responder.ask("q").await? {
        Answer::Unavailable { reason } => assert!(reason.contains("model not found")),
        other => panic!("expected unavailable, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_overrides_and_yes_no_prompt() -> Result<()> {
    let mut cfg = config(0.1);
    cfg.prompt.instructions = Instructions::yes_no();
    let llm = Arc::new(RecordingLlm::default());
    let responder = Responder::new(
        &cfg,
        Arc::new(FixedEmbedder(vec![0.0, 0.0])),
        llm.clone(),
        seeded_index().await?,
    )
    .with_top_k(1)
    .with_max_distance(0.25);

    let outcome = responder.retrieve("q").await?;
    assert!(outcome.is_admitted());
    assert!(matches!(responder.ask("q").await?, Answer::Grounded { .. }));
    assert!(llm.prompts.lock().unwrap()[0].contains("'Ja' or 'Nej'"));
    Ok(())
}

async fn responder() -> Result<Responder> {
    Ok(Responder::new(
        &config(0.5),
        Arc::new(FixedEmbedder(vec![0.0, 0.0])),
        Arc::new(RecordingLlm::default()),
        seeded_index().await?,
    ))
}

#[tokio::test]
async fn test_invalid_overrides_are_rejected() -> Result<()> {
    assert!(responder().await?.with_overrides(None, Some(-0.1)).is_err());
    assert!(responder().await?.with_overrides(None, Some(f32::NAN)).is_err());
    assert!(responder().await?.with_overrides(Some(0), None).is_err());

    let tuned = responder().await?.with_overrides(Some(1), Some(0.3))?;
    assert_eq!(tuned.max_distance(), 0.3);
    match tuned.ask("q").await? {
        Answer::Grounded { sources, .. } => assert_eq!(sources.len(), 1),
        other => panic!("expected grounded answer, got {other:?}"),
    }
    Ok(())
}
