//! Row chunker for spreadsheet tables.
//!
//! Each row becomes one [`Chunk`]: the first `split_column` cells become
//! metadata, the rest are joined into the context text, and the part of the
//! context before the first delimiter is what gets embedded.

use crate::models::{Chunk, Metadata, RawTable, Row};
use docret_config::TableConfig;

#[derive(Debug, Clone)]
pub struct RowChunker {
    config: TableConfig,
    delimiter: Option<char>,
}

impl RowChunker {
    pub fn new(config: TableConfig) -> Self {
        let delimiter = config.delimiter();
        Self { config, delimiter }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// One chunk per row, in row order. Pure; the same table always yields
    /// the same chunks.
    pub fn chunk(&self, table: &RawTable) -> Vec<Chunk> {
        let keys = self.metadata_keys(&table.header);
        table
            .rows
            .iter()
            .map(|row| self.chunk_row(&keys, row))
            .collect()
    }

    /// Metadata keys for the leading columns. Missing or blank header cells
    /// are named `column_<n>`; repeated names get a `_<n>` suffix so every
    /// leading column keeps its own entry.
    pub fn metadata_keys(&self, header: &[String]) -> Vec<String> {
        let leading = self.config.split_column.min(self.config.max_columns);
        let mut keys: Vec<String> = Vec::with_capacity(leading);

        for i in 0..leading {
            let name = match header.get(i).map(|h| h.trim()) {
                Some(h) if !h.is_empty() => h.to_string(),
                _ => format!("column_{}", i + 1),
            };
            let mut key = format!("{}{}", self.config.metadata_prefix, name);
            let mut n = 2;
            while keys.contains(&key) {
                key = format!("{}{}_{}", self.config.metadata_prefix, name, n);
                n += 1;
            }
            keys.push(key);
        }

        keys
    }

    fn chunk_row(&self, keys: &[String], row: &Row) -> Chunk {
        let width = row.len().min(self.config.max_columns);
        let split = keys.len().min(width);

        let mut metadata = Metadata::with_capacity(split);
        for (key, cell) in keys.iter().zip(&row[..split]) {
            let value = cell.as_ref().map(|c| c.to_string()).unwrap_or_default();
            metadata.insert(key.as_str(), value);
        }

        let joined = row
            .get(keys.len()..width)
            .unwrap_or_default()
            .iter()
            .flatten()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(&self.config.separator);

        let context_text = if joined.is_empty() {
            self.config.empty_placeholder.clone()
        } else {
            joined
        };

        let embed_text = match self.delimiter.and_then(|d| context_text.find(d)) {
            Some(pos) => context_text[..pos].trim().to_string(),
            None => context_text.clone(),
        };

        Chunk {
            embed_text,
            context_text,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Option<CellValue> {
        Some(CellValue::Text(s.to_string()))
    }

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn chunker() -> RowChunker {
        RowChunker::new(TableConfig::default())
    }

    fn wide_header() -> Vec<String> {
        header(&["id", "name", "flag", "a", "b", "c", "d", "e", "f", "x", "y"])
    }

    #[test]
    fn test_row_split_into_metadata_embed_and_context() {
        let row = vec![
            Some(CellValue::Int(1)),
            text("Acme"),
            text("J"),
            text("a1"),
            text("b1"),
            text("c1"),
            text("d1"),
            text("e1"),
            text("f1"),
            text("foo"),
            text("bar"),
        ];
        let table = RawTable::bounded(wide_header(), vec![row], 64);
        let chunks = chunker().chunk(&table);

        assert_eq!(chunks.len(), 1);
        let chunk = &chunks[0];
        assert_eq!(chunk.metadata.len(), 9);
        assert_eq!(chunk.metadata.get("col_id"), Some("1"));
        assert_eq!(chunk.metadata.get("col_name"), Some("Acme"));
        assert_eq!(chunk.metadata.get("col_flag"), Some("J"));
        assert_eq!(chunk.metadata.get("col_f"), Some("f1"));
        assert!(!chunk.metadata.contains_key("col_x"));
        assert_eq!(chunk.context_text, "foo | bar");
        assert_eq!(chunk.embed_text, "foo");
    }

    #[test]
    fn test_short_row_gets_placeholder() {
        let row = vec![
            Some(CellValue::Int(2)),
            text("Beta"),
            text("N"),
            text("a2"),
            text("b2"),
        ];
        let table = RawTable::bounded(wide_header(), vec![row], 64);
        let chunk = &chunker().chunk(&table)[0];

        assert_eq!(chunk.metadata.len(), 5);
        let keys: Vec<&str> = chunk.metadata.keys().collect();
        assert_eq!(keys, vec!["col_id", "col_name", "col_flag", "col_a", "col_b"]);
        assert_eq!(chunk.context_text, "No content");
        assert_eq!(chunk.embed_text, "No content");
    }

    #[test]
    fn test_metadata_count_is_min_of_split_and_width() {
        let chunker = chunker();
        for width in 0..=11 {
            let row: Row = (0..width).map(|i| Some(CellValue::Int(i as i64))).collect();
            let table = RawTable::bounded(wide_header(), vec![row], 64);
            let chunk = &chunker.chunk(&table)[0];
            assert_eq!(chunk.metadata.len(), width.min(9), "width {width}");
        }
    }

    #[test]
    fn test_remainder_without_delimiter_embeds_everything() {
        let mut row: Row = vec![text("k"); 9];
        row.push(text("single value"));
        let table = RawTable::bounded(header(&[]), vec![row], 64);
        let chunk = &chunker().chunk(&table)[0];
        assert_eq!(chunk.embed_text, chunk.context_text);
        assert_eq!(chunk.context_text, "single value");
    }

    #[test]
    fn test_absent_cells() {
        let row = vec![
            text("1"),
            None,
            text("J"),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            text("only"),
        ];
        let table = RawTable::bounded(wide_header(), vec![row], 64);
        let chunk = &chunker().chunk(&table)[0];
        assert_eq!(chunk.metadata.get("col_name"), Some(""));
        assert_eq!(chunk.context_text, "only");
        assert_eq!(chunk.embed_text, "only");
    }

    #[test]
    fn test_all_remainder_cells_absent() {
        let mut row: Row = vec![text("v"); 9];
        row.extend([None, None]);
        let table = RawTable::bounded(wide_header(), vec![row], 64);
        assert_eq!(chunker().chunk(&table)[0].context_text, "No content");
    }

    #[test]
    fn test_chunking_is_idempotent() {
        let rows: Vec<Row> = (0..4)
            .map(|r| (0..11).map(|c| text(&format!("r{r}c{c}"))).collect())
            .collect();
        let table = RawTable::bounded(wide_header(), rows, 64);
        let chunker = chunker();
        assert_eq!(chunker.chunk(&table), chunker.chunk(&table));
    }

    #[test]
    fn test_oversized_rows_truncated() {
        let chunker = RowChunker::new(TableConfig {
            split_column: 2,
            max_columns: 4,
            ..Default::default()
        });
        let table = RawTable {
            header: header(&["a", "b", "c", "d", "e", "f"]),
            rows: vec![(0..6).map(|i| text(&format!("v{i}"))).collect()],
        };
        let chunk = &chunker.chunk(&table)[0];
        assert_eq!(chunk.metadata.len(), 2);
        assert_eq!(chunk.context_text, "v2 | v3");
        assert_eq!(chunk.embed_text, "v2");
    }

    #[test]
    fn test_duplicate_and_missing_header_names() {
        let chunker = RowChunker::new(TableConfig {
            split_column: 4,
            ..Default::default()
        });
        let keys = chunker.metadata_keys(&header(&["id", "id", ""]));
        assert_eq!(keys, vec!["col_id", "col_id_2", "col_column_3", "col_column_4"]);
    }

    #[test]
    fn test_custom_prefix_and_separator() {
        let chunker = RowChunker::new(TableConfig {
            split_column: 1,
            metadata_prefix: "meta.".into(),
            separator: " ; ".into(),
            ..Default::default()
        });
        let table = RawTable::bounded(
            header(&["key", "x", "y"]),
            vec![vec![text("k1"), text("left"), text("right")]],
            64,
        );
        let chunk = &chunker.chunk(&table)[0];
        assert_eq!(chunk.metadata.get("meta.key"), Some("k1"));
        assert_eq!(chunk.context_text, "left ; right");
        assert_eq!(chunk.embed_text, "left");
    }

    #[test]
    fn test_rows_keep_source_order() {
        let rows: Vec<Row> = (0..3)
            .map(|i| {
                let mut row: Row = vec![text("m"); 9];
                row.push(text(&format!("row{i}")));
                row
            })
            .collect();
        let table = RawTable::bounded(wide_header(), rows, 64);
        let contexts: Vec<String> = chunker()
            .chunk(&table)
            .into_iter()
            .map(|c| c.context_text)
            .collect();
        assert_eq!(contexts, vec!["row0", "row1", "row2"]);
    }
}
