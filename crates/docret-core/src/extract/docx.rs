use crate::error::IngestError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// Paragraph texts of the main document part, one paragraph per line.
pub(super) fn extract(path: &Path) -> Result<String, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| IngestError::extraction(path, e))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| IngestError::extraction(path, format!("{DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| IngestError::extraction(path, e))?;

    paragraphs(&xml).map_err(|e| IngestError::extraction(path, e))
}

fn paragraphs(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:t" => in_run_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                // Self-closing paragraph: still one (empty) line.
                b"w:p" => out.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_run_text => current.push_str(&t.unescape()?),
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => out.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Quarterly</w:t></w:r><w:r><w:t xml:space="preserve"> report</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>R&amp;D</w:t><w:tab/><w:t>42</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_paragraph_runs_are_concatenated() {
        assert_eq!(paragraphs(BODY).unwrap(), "Quarterly report\n\nR&D\t42");
    }

    #[test]
    fn test_reads_document_part_from_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.docx");
        let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
        writer
            .start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(BODY.as_bytes()).unwrap();
        writer.finish().unwrap();

        assert_eq!(extract(&path).unwrap(), "Quarterly report\n\nR&D\t42");
    }

    #[test]
    fn test_zip_without_document_part() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        let writer = zip::ZipWriter::new(File::create(&path).unwrap());
        writer.finish().unwrap();
        assert!(matches!(
            extract(&path).unwrap_err(),
            IngestError::ExtractionFailure { .. }
        ));
    }
}
