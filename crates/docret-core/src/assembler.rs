//! Unit assembler: turns files into index records.
//!
//! Tabular files yield one record per row (`<file>_row_<index>`); every other
//! supported format yields one record per document (id = file name) or, with
//! the `split` text strategy, one per token-bounded part
//! (`<file>_part_<index>`).

use crate::chunking::{RowChunker, TextSplitter};
use crate::error::IngestError;
use crate::extract::{self, DocumentFormat, Extracted};
use crate::models::{Metadata, RawTable, Record};
use docret_config::{Config, TableConfig, TextConfig, TextStrategy};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Records produced from one file.
#[derive(Debug, Clone)]
pub struct FileUnits {
    pub file: String,
    pub path: PathBuf,
    pub format: DocumentFormat,
    pub records: Vec<Record>,
}

/// Progress notification, one per file.
#[derive(Debug, Clone, PartialEq)]
pub enum AssemblyEvent {
    Assembled { file: String, units: usize },
    Skipped { file: String, reason: String },
}

/// Outcome of assembling a directory listing.
#[derive(Debug, Default)]
pub struct AssemblyReport {
    pub assembled: Vec<FileUnits>,
    pub skipped: Vec<IngestError>,
    /// Every record id produced, in processing order
    pub ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UnitAssembler {
    table: TableConfig,
    text: TextConfig,
    chunker: RowChunker,
    splitter: TextSplitter,
}

impl UnitAssembler {
    pub fn new(config: &Config) -> Self {
        Self {
            table: config.table.clone(),
            text: config.text.clone(),
            chunker: RowChunker::new(config.table.clone()),
            splitter: TextSplitter::new(&config.text),
        }
    }

    pub fn assemble_file(&self, path: &Path) -> Result<FileUnits, IngestError> {
        let format = DocumentFormat::from_path(path)?;
        let file = file_name(path);

        let records = match extract::extract(path, format, &self.table)? {
            Extracted::Table(table) => self.table_records(&file, &table),
            Extracted::Text(text) => self.text_records(path, &file, &text)?,
        };

        debug!("{}: {} records ({})", file, records.len(), format);
        Ok(FileUnits {
            file,
            path: path.to_path_buf(),
            format,
            records,
        })
    }

    /// Assemble every path, isolating failures to the file that caused them.
    pub fn assemble_listing<F>(&self, paths: &[PathBuf], mut on_event: F) -> AssemblyReport
    where
        F: FnMut(&AssemblyEvent),
    {
        let mut report = AssemblyReport::default();

        for path in paths {
            match self.assemble_file(path) {
                Ok(units) => {
                    info!("Assembled {} ({} units)", units.file, units.records.len());
                    on_event(&AssemblyEvent::Assembled {
                        file: units.file.clone(),
                        units: units.records.len(),
                    });
                    report
                        .ids
                        .extend(units.records.iter().map(|r| r.id.clone()));
                    report.assembled.push(units);
                }
                Err(err) => {
                    warn!("Skipping {}: {}", path.display(), err);
                    on_event(&AssemblyEvent::Skipped {
                        file: file_name(path),
                        reason: err.to_string(),
                    });
                    report.skipped.push(err);
                }
            }
        }

        report
    }

    fn table_records(&self, file: &str, table: &RawTable) -> Vec<Record> {
        self.chunker
            .chunk(table)
            .into_iter()
            .enumerate()
            .map(|(idx, chunk)| Record {
                id: format!("{}_row_{}", file, idx),
                source: file.to_string(),
                embed_text: chunk.embed_text,
                context_text: chunk.context_text,
                metadata: chunk.metadata,
            })
            .collect()
    }

    fn text_records(&self, path: &Path, file: &str, text: &str) -> Result<Vec<Record>, IngestError> {
        if text.trim().is_empty() {
            return Err(IngestError::extraction(path, "document contains no text"));
        }

        match self.text.strategy {
            TextStrategy::Whole => {
                let mut metadata = Metadata::new();
                metadata.insert("source", file);
                Ok(vec![Record {
                    id: file.to_string(),
                    source: file.to_string(),
                    embed_text: text.to_string(),
                    context_text: text.to_string(),
                    metadata,
                }])
            }
            TextStrategy::Split => {
                let parts = self
                    .splitter
                    .split(text)
                    .map_err(|e| IngestError::extraction(path, e))?;
                Ok(parts
                    .into_iter()
                    .enumerate()
                    .map(|(idx, part)| {
                        let mut metadata = Metadata::new();
                        metadata.insert("source", file);
                        metadata.insert("part", idx.to_string());
                        Record {
                            id: format!("{}_part_{}", file, idx),
                            source: file.to_string(),
                            embed_text: part.clone(),
                            context_text: part,
                            metadata,
                        }
                    })
                    .collect())
            }
        }
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
