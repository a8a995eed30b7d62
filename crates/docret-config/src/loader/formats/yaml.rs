//! YAML format parser

use crate::{error::ConfigError, Config, Result};

/// Parse configuration from YAML string
pub fn parse(content: &str) -> Result<Config> {
    parse_with_path(content, None)
}

/// Parse configuration from YAML string with file path for better errors
pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<Config> {
    serde_yaml::from_str(content).map_err(|e| ConfigError::from_yaml_error(e, content, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = r#"
retrieval:
  top_k: 5
  max_distance: 0.5
"#;
        let config = parse(yaml).unwrap();
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.table.split_column, 9);
    }

    #[test]
    fn test_parse_error_has_location() {
        let yaml = "retrieval:\n  top_k: [not, a, number]\n";
        let err = parse_with_path(yaml, Some(".docret.yml")).unwrap_err();
        assert!(err.to_string().contains(".docret.yml"));
    }
}
