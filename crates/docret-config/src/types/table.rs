//! Spreadsheet row chunking configuration

use serde::{Deserialize, Serialize};

/// How tabular rows are split into metadata, embed text and context text.
///
/// Columns `[0, split_column)` become metadata entries keyed
/// `metadata_prefix + header`; the remaining columns are joined with
/// `separator` into the context text. The embed text is the part of the
/// context before the first delimiter character of `separator`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableConfig {
    /// Number of leading columns mapped to metadata (K)
    #[serde(default = "default_split_column")]
    pub split_column: usize,

    /// Hard width bound applied to the header and every row
    #[serde(default = "default_max_columns")]
    pub max_columns: usize,

    /// Prefix for metadata keys
    #[serde(default = "default_metadata_prefix")]
    pub metadata_prefix: String,

    /// Separator used to join content cells
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Context text used when a row has no content cells
    #[serde(default = "default_empty_placeholder")]
    pub empty_placeholder: String,

    /// Worksheet to read; the first sheet when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl TableConfig {
    /// First non-whitespace character of the separator.
    pub fn delimiter(&self) -> Option<char> {
        self.separator.chars().find(|c| !c.is_whitespace())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            split_column: default_split_column(),
            max_columns: default_max_columns(),
            metadata_prefix: default_metadata_prefix(),
            separator: default_separator(),
            empty_placeholder: default_empty_placeholder(),
            sheet: None,
        }
    }
}

impl crate::validation::Validate for TableConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("table.max_columns", self.max_columns, 0)?;

        if self.split_column > self.max_columns {
            return Err(ConfigError::invalid(
                "table.split_column",
                format!(
                    "split_column ({}) cannot exceed max_columns ({})",
                    self.split_column, self.max_columns
                ),
            ));
        }

        if self.delimiter().is_none() {
            return Err(ConfigError::invalid(
                "table.separator",
                "separator must contain a non-whitespace delimiter character",
            ));
        }

        if let Some(d) = self.delimiter() {
            if self.empty_placeholder.contains(d) {
                return Err(ConfigError::invalid(
                    "table.empty_placeholder",
                    format!("placeholder must not contain the delimiter '{}'", d),
                ));
            }
        }

        if self.empty_placeholder.trim().is_empty() {
            return Err(ConfigError::invalid(
                "table.empty_placeholder",
                "placeholder cannot be blank",
            ));
        }

        Ok(())
    }
}

fn default_split_column() -> usize {
    9
}

fn default_max_columns() -> usize {
    64
}

fn default_metadata_prefix() -> String {
    "col_".to_string()
}

fn default_separator() -> String {
    " | ".to_string()
}

fn default_empty_placeholder() -> String {
    "No content".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = TableConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.delimiter(), Some('|'));
    }

    #[test]
    fn test_split_beyond_width_invalid() {
        let config = TableConfig {
            split_column: 10,
            max_columns: 8,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_separator_invalid() {
        let config = TableConfig {
            separator: "   ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_placeholder_with_delimiter_invalid() {
        let config = TableConfig {
            empty_placeholder: "n/a | none".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_split_allowed() {
        let config = TableConfig {
            split_column: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
