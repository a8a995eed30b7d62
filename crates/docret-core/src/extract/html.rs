use crate::error::IngestError;
use scraper::Html;
use std::path::Path;

/// Visible text nodes, one per line.
pub(super) fn extract(path: &Path) -> Result<String, IngestError> {
    let source = super::text::extract(path)?;
    Ok(html_to_text(&source))
}

fn html_to_text(source: &str) -> String {
    let document = Html::parse_document(source);
    document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_nodes_joined_by_newline() {
        let html = "<html><head><title>Report</title></head>\
                    <body><h1>Q3</h1>\n  <p>Revenue <b>up</b></p></body></html>";
        assert_eq!(html_to_text(html), "Report\nQ3\nRevenue\nup");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(html_to_text("<html><body>   </body></html>"), "");
    }
}
