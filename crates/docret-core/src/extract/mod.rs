//! Format extractors.
//!
//! Every supported format maps to one variant of [`DocumentFormat`]; the
//! match in [`extract`] is the whole dispatch table. Extraction is blocking
//! and is expected to run on a blocking thread when called from async code.

mod docx;
mod html;
mod pdf;
mod text;
mod xlsx;

#[cfg(any(test, feature = "fixtures"))]
pub mod test_fixtures;

use crate::error::IngestError;
use crate::models::RawTable;
use docret_config::TableConfig;
use std::fmt;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Html,
    Text,
    Xlsx,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "html" | "htm" => Some(DocumentFormat::Html),
            "txt" => Some(DocumentFormat::Text),
            "xlsx" => Some(DocumentFormat::Xlsx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: ext.to_string(),
        })
    }

    /// Formats that yield one unit per row instead of one per document.
    pub fn is_tabular(&self) -> bool {
        matches!(self, DocumentFormat::Xlsx)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Html => "html",
            DocumentFormat::Text => "text",
            DocumentFormat::Xlsx => "xlsx",
        };
        f.write_str(name)
    }
}

/// Output of a format extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Text(String),
    Table(RawTable),
}

pub fn extract(
    path: &Path,
    format: DocumentFormat,
    table: &TableConfig,
) -> Result<Extracted, IngestError> {
    debug!("Extracting {} as {}", path.display(), format);
    match format {
        DocumentFormat::Pdf => pdf::extract(path).map(Extracted::Text),
        DocumentFormat::Docx => docx::extract(path).map(Extracted::Text),
        DocumentFormat::Html => html::extract(path).map(Extracted::Text),
        DocumentFormat::Text => text::extract(path).map(Extracted::Text),
        DocumentFormat::Xlsx => xlsx::extract(path, table).map(Extracted::Table),
    }
}
