//! Write path: directory listing -> records -> embeddings -> vector index.
//!
//! Files are processed one at a time. A file's records reach the index as a
//! single batch after all of its embeddings succeeded, or not at all. Records
//! from an earlier ingest of the same file are only removed once the new
//! batch is stored.

use anyhow::{anyhow, Result};
use docret_config::Config;
use docret_context::DocContext;
use docret_core::assembler::{file_name, FileUnits, UnitAssembler};
use docret_core::error::ServiceError;
use docret_core::models::Record;
use docret_core::scanner::scan_docs;
use docret_core::traits::{Embedder, VectorStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Progress notification, one per file.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    Indexed { file: String, units: usize },
    Skipped { file: String, reason: String },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// `(file, records written)` per indexed file
    pub indexed: Vec<(String, usize)>,
    /// `(file, reason)` per skipped file
    pub skipped: Vec<(String, String)>,
    /// Every record id written, in processing order
    pub ids: Vec<String>,
}

impl IngestReport {
    pub fn total_units(&self) -> usize {
        self.indexed.iter().map(|(_, n)| n).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub struct IngestPipeline {
    assembler: UnitAssembler,
    embedder: Arc<dyn Embedder>,
    index: Arc<Mutex<dyn VectorStore>>,
    batch_size: usize,
}

impl IngestPipeline {
    pub fn new(
        config: &Config,
        embedder: Arc<dyn Embedder>,
        index: Arc<Mutex<dyn VectorStore>>,
    ) -> Self {
        Self {
            assembler: UnitAssembler::new(config),
            embedder,
            index,
            batch_size: config.embedding.batch_size.max(1),
        }
    }

    pub fn from_context(ctx: &DocContext) -> Self {
        Self::new(&ctx.config, ctx.embedder.clone(), ctx.index.clone())
    }

    /// Ingest every file directly inside `dir`. A missing directory is the
    /// only failure that aborts the run.
    pub async fn ingest_dir<F>(&self, dir: &Path, on_event: F) -> Result<IngestReport>
    where
        F: FnMut(&IngestEvent),
    {
        if !dir.is_dir() {
            return Err(anyhow!("Document directory not found: {}", dir.display()));
        }
        let paths = scan_docs(dir);
        info!("Found {} files in {}", paths.len(), dir.display());
        Ok(self.ingest_paths(&paths, on_event).await)
    }

    pub async fn ingest_paths<F>(&self, paths: &[PathBuf], mut on_event: F) -> IngestReport
    where
        F: FnMut(&IngestEvent),
    {
        let mut report = IngestReport::default();

        for path in paths {
            let file = file_name(path);
            match self.ingest_file(path).await {
                Ok(ids) => {
                    info!("Indexed {} ({} units)", file, ids.len());
                    on_event(&IngestEvent::Indexed {
                        file: file.clone(),
                        units: ids.len(),
                    });
                    report.indexed.push((file, ids.len()));
                    report.ids.extend(ids);
                }
                Err(err) => {
                    let reason = format!("{:#}", err);
                    warn!("Skipping {}: {}", file, reason);
                    on_event(&IngestEvent::Skipped {
                        file: file.clone(),
                        reason: reason.clone(),
                    });
                    report.skipped.push((file, reason));
                }
            }
        }

        report
    }

    /// Assemble, embed and write one file. Returns the ids written.
    pub async fn ingest_file(&self, path: &Path) -> Result<Vec<String>> {
        let units = self.assemble(path).await?;
        let vectors = self.embed_records(&units.records).await?;

        let ids: Vec<String> = units.records.iter().map(|r| r.id.clone()).collect();
        let mut index = self.index.lock().await;
        index.upsert(&units.records, &vectors).await?;
        // Parts left over from a longer, earlier version of the file.
        index.retain_source(&units.file, &ids).await?;

        Ok(ids)
    }

    async fn assemble(&self, path: &Path) -> Result<FileUnits> {
        let assembler = self.assembler.clone();
        let owned = path.to_path_buf();
        let units = tokio::task::spawn_blocking(move || assembler.assemble_file(&owned))
            .await
            .map_err(|e| anyhow!("Extraction task failed: {}", e))??;
        Ok(units)
    }

    async fn embed_records(&self, records: &[Record]) -> Result<Vec<Vec<f32>>, ServiceError> {
        let mut vectors = Vec::with_capacity(records.len());
        for batch in records.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|r| r.embed_text.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(ServiceError::Embedding(format!(
                    "Embedding count mismatch (got {}, expected {})",
                    embeddings.len(),
                    batch.len()
                )));
            }
            vectors.extend(embeddings);
        }
        Ok(vectors)
    }
}
