use crate::error::IngestError;
use std::fs;
use std::path::Path;

/// Concatenated text of every page.
pub(super) fn extract(path: &Path) -> Result<String, IngestError> {
    let bytes = fs::read(path).map_err(|e| IngestError::io(path, e))?;
    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| IngestError::extraction(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"%PDF-1.4 truncated").unwrap();
        assert!(matches!(
            extract(&path).unwrap_err(),
            IngestError::ExtractionFailure { .. }
        ));
    }
}
