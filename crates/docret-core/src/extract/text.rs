use crate::error::IngestError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub(super) fn extract(path: &Path) -> Result<String, IngestError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => IngestError::extraction(path, "file is not valid UTF-8"),
        _ => IngestError::io(path, e),
    })
}
