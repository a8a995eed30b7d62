use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// String-keyed mapping that keeps insertion order.
///
/// Built once per row from a bounded loop over the leading columns, so the
/// entry order always follows the column order of the source sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace; returns the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (k, v) in iter {
            metadata.insert(k, v);
        }
        metadata
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetadataVisitor;

        impl<'de> Visitor<'de> for MetadataVisitor {
            type Value = Metadata;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of string keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Metadata, A::Error> {
                let mut metadata = Metadata::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    metadata.insert(k, v);
                }
                Ok(metadata)
            }
        }

        deserializer.deserialize_map(MetadataVisitor)
    }
}

/// A single spreadsheet cell value. Empty cells are represented as `None`
/// at the row level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Float(x)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

pub type Row = Vec<Option<CellValue>>;

/// Header plus data rows of one worksheet, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl RawTable {
    /// Build a table with the header and every row truncated to `max_width`.
    pub fn bounded(mut header: Vec<String>, mut rows: Vec<Row>, max_width: usize) -> Self {
        header.truncate(max_width);
        for row in &mut rows {
            row.truncate(max_width);
        }
        Self { header, rows }
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }
}

/// Retrieval unit derived from exactly one table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Similarity-search target
    pub embed_text: String,
    /// Evidence shown to the generation step
    pub context_text: String,
    /// Leading columns, keyed `prefix + header`
    pub metadata: Metadata,
}

/// Unit submitted to the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique within a collection
    pub id: String,
    /// File name the record was produced from
    pub source: String,
    /// Text that gets embedded
    pub embed_text: String,
    /// Text stored and handed to the prompt
    pub context_text: String,
    pub metadata: Metadata,
}

/// One nearest-neighbour hit. Lower distance means more similar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub id: String,
    pub context_text: String,
    pub metadata: Metadata,
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_keeps_insertion_order_and_replaces() {
        let mut m = Metadata::new();
        m.insert("col_id", "1");
        m.insert("col_name", "Acme");
        assert_eq!(m.insert("col_id", "2"), Some("1".to_string()));
        let keys: Vec<&str> = m.keys().collect();
        assert_eq!(keys, vec!["col_id", "col_name"]);
        assert_eq!(m.get("col_id"), Some("2"));
    }

    #[test]
    fn metadata_serializes_as_json_object_in_order() {
        let m: Metadata = [("b", "2"), ("a", "1")].into_iter().collect();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"b":"2","a":"1"}"#);
        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn cell_display() {
        assert_eq!(CellValue::Int(1).to_string(), "1");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::from("Acme").to_string(), "Acme");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
    }

    #[test]
    fn bounded_table_truncates_everything() {
        let table = RawTable::bounded(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![
                Some(CellValue::Int(1)),
                Some(CellValue::Int(2)),
                Some(CellValue::Int(3)),
            ]],
            2,
        );
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows[0].len(), 2);
    }
}
