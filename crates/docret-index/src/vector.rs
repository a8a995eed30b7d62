use anyhow::{anyhow, Result};
use arrow::array::{
    Array, ArrayRef, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator,
    StringArray, UInt64Array,
};
use arrow::datatypes::{DataType, Field, Schema};
use async_trait::async_trait;
use docret_core::models::{Metadata, QueryResult, Record};
use docret_core::traits::VectorStore;
use futures::stream::TryStreamExt;
use lance::dataset::{Dataset, WriteMode, WriteParams};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Lance-backed vector index. One dataset per collection.
///
/// Every upsert stamps its rows with a fresh `batch` value. New rows are
/// appended first and older rows sharing their ids are deleted afterwards,
/// so a failed write never removes what was already stored.
pub struct VectorIndex {
    dataset: Option<Dataset>,
    index_path: PathBuf,
    last_batch: u64,
}

impl VectorIndex {
    pub async fn new(index_path: &Path) -> Result<Self> {
        let dataset = if index_path.exists() {
            match Dataset::open(path_str(index_path)?).await {
                Ok(ds) => Some(ds),
                Err(err) => {
                    warn!("Ignoring unreadable index at {}: {}", index_path.display(), err);
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            dataset,
            index_path: index_path.to_path_buf(),
            last_batch: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.index_path
    }

    fn next_batch(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        self.last_batch = now.max(self.last_batch + 1);
        self.last_batch
    }

    async fn delete_where(&mut self, predicate: &str) -> Result<()> {
        if let Some(dataset) = self.dataset.as_mut() {
            dataset.delete(predicate).await?;
        }
        Ok(())
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow!("Index path is not valid UTF-8: {}", path.display()))
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn id_list(ids: &[String]) -> String {
    ids.iter().map(|id| quote(id)).collect::<Vec<_>>().join(",")
}

fn schema(dim: usize) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("embed_text", DataType::Utf8, false),
        Field::new("context", DataType::Utf8, false),
        Field::new("metadata", DataType::Utf8, false),
        Field::new("batch", DataType::UInt64, false),
        Field::new(
            "embedding",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                dim as i32,
            ),
            false,
        ),
    ]))
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("Missing {} column", name))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| anyhow!("Failed to cast {} column", name))
}

#[async_trait]
impl VectorStore for VectorIndex {
    async fn upsert(&mut self, records: &[Record], vectors: &[Vec<f32>]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        if records.len() != vectors.len() {
            return Err(anyhow!(
                "Got {} vectors for {} records",
                vectors.len(),
                records.len()
            ));
        }
        let dim = vectors[0].len();
        if dim == 0 || vectors.iter().any(|v| v.len() != dim) {
            return Err(anyhow!("Embeddings must share one non-zero dimension"));
        }

        let stamp = self.next_batch();
        let schema = schema(dim);
        let metadata = records
            .iter()
            .map(|r| serde_json::to_string(&r.metadata))
            .collect::<Result<Vec<_>, _>>()?;

        let id_array: ArrayRef = Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.id.as_str()),
        ));
        let source_array: ArrayRef = Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.source.as_str()),
        ));
        let embed_array: ArrayRef = Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.embed_text.as_str()),
        ));
        let context_array: ArrayRef = Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.context_text.as_str()),
        ));
        let metadata_array: ArrayRef = Arc::new(StringArray::from(metadata));
        let batch_array: ArrayRef = Arc::new(UInt64Array::from(vec![stamp; records.len()]));
        let embedding_array: ArrayRef = {
            let values = Float32Array::from(vectors.concat());
            let field = Arc::new(Field::new("item", DataType::Float32, true));
            Arc::new(FixedSizeListArray::new(
                field,
                dim as i32,
                Arc::new(values),
                None,
            ))
        };

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                id_array,
                source_array,
                embed_array,
                context_array,
                metadata_array,
                batch_array,
                embedding_array,
            ],
        )?;

        let write_mode = if self.dataset.is_some() {
            WriteMode::Append
        } else {
            WriteMode::Create
        };

        if let Some(parent) = self.index_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let reader = RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema);
        let dataset = Dataset::write(
            reader,
            path_str(&self.index_path)?,
            Some(WriteParams {
                mode: write_mode,
                ..Default::default()
            }),
        )
        .await?;

        debug!("Wrote {} records to {}", records.len(), self.index_path.display());
        self.dataset = Some(dataset);

        // Last write wins by id.
        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        self.delete_where(&format!("id IN ({}) AND batch <> {}", id_list(&ids), stamp))
            .await
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryResult>> {
        let dataset = match self.dataset.as_ref() {
            Some(ds) => ds,
            None => return Ok(Vec::new()),
        };
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let query_array = Float32Array::from(vector.to_vec());
        let mut stream = dataset
            .scan()
            .nearest("embedding", &query_array, top_k)?
            .try_into_stream()
            .await?;

        let mut results = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            let ids = string_column(&batch, "id")?;
            let contexts = string_column(&batch, "context")?;
            let metadata = string_column(&batch, "metadata")?;
            let distances = batch
                .column_by_name("_distance")
                .ok_or_else(|| anyhow!("Missing _distance column"))?
                .as_any()
                .downcast_ref::<Float32Array>()
                .ok_or_else(|| anyhow!("Failed to cast _distance column"))?;

            for i in 0..batch.num_rows() {
                let meta: Metadata = if metadata.is_null(i) {
                    Metadata::new()
                } else {
                    serde_json::from_str(metadata.value(i))?
                };
                results.push(QueryResult {
                    id: ids.value(i).to_string(),
                    context_text: contexts.value(i).to_string(),
                    metadata: meta,
                    distance: distances.value(i),
                });
            }
        }

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(top_k);
        Ok(results)
    }

    async fn retain_source(&mut self, source: &str, keep: &[String]) -> Result<()> {
        let mut predicate = format!("source = {}", quote(source));
        if !keep.is_empty() {
            predicate.push_str(&format!(" AND id NOT IN ({})", id_list(keep)));
        }
        self.delete_where(&predicate).await
    }

    async fn count(&self) -> Result<usize> {
        match self.dataset.as_ref() {
            Some(ds) => Ok(ds.count_rows(None).await?),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_single_quotes() {
        assert_eq!(quote("o'brien.txt"), "'o''brien.txt'");
    }

    #[test]
    fn test_id_list_quotes_each_id() {
        let ids = vec!["a.txt".to_string(), "o'neil.txt".to_string()];
        assert_eq!(id_list(&ids), "'a.txt','o''neil.txt'");
    }

    #[test]
    fn test_next_batch_is_strictly_increasing() {
        let mut index = VectorIndex {
            dataset: None,
            index_path: PathBuf::from("unused.lance"),
            last_batch: u64::MAX - 1,
        };
        assert_eq!(index.next_batch(), u64::MAX);
    }

    #[test]
    fn test_schema_embedding_dimension() {
        let schema = schema(3);
        let field = schema.field_with_name("embedding").unwrap();
        assert!(matches!(field.data_type(), DataType::FixedSizeList(_, 3)));
    }
}
