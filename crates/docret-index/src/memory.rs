//! In-memory vector store for tests and dry runs.
//!
//! Brute-force search over every stored vector with the same squared-L2
//! distance the lance index reports, so thresholds carry over unchanged.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use docret_core::models::{QueryResult, Record};
use docret_core::traits::VectorStore;

#[derive(Debug, Default)]
pub struct MemoryIndex {
    entries: Vec<(Record, Vec<f32>)>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|(r, _)| r)
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records().find(|r| r.id == id)
    }
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[async_trait]
impl VectorStore for MemoryIndex {
    async fn upsert(&mut self, records: &[Record], vectors: &[Vec<f32>]) -> Result<()> {
        if records.len() != vectors.len() {
            return Err(anyhow!(
                "Got {} vectors for {} records",
                vectors.len(),
                records.len()
            ));
        }
        for (record, vector) in records.iter().zip(vectors) {
            match self.entries.iter_mut().find(|(r, _)| r.id == record.id) {
                Some(slot) => *slot = (record.clone(), vector.clone()),
                None => self.entries.push((record.clone(), vector.clone())),
            }
        }
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryResult>> {
        let mut hits: Vec<QueryResult> = self
            .entries
            .iter()
            .filter(|(_, v)| v.len() == vector.len())
            .map(|(record, v)| QueryResult {
                id: record.id.clone(),
                context_text: record.context_text.clone(),
                metadata: record.metadata.clone(),
                distance: squared_l2(v, vector),
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn retain_source(&mut self, source: &str, keep: &[String]) -> Result<()> {
        self.entries
            .retain(|(r, _)| r.source != source || keep.contains(&r.id));
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.entries.len())
    }
}
