//! Retrieval configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Candidates requested from the vector index per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Admission threshold: candidates with `distance <= max_distance` ground
    /// the answer, the rest are dropped
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_distance: default_max_distance(),
        }
    }
}

impl crate::validation::Validate for RetrievalConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.top_k == 0 {
            return Err(ConfigError::InvalidInteger {
                field: "retrieval.top_k".to_string(),
                value: self.top_k,
                min: 0,
            });
        }

        if self.top_k > 1000 {
            return Err(ConfigError::invalid(
                "retrieval.top_k",
                format!("top_k too large ({}), consider using <= 1000", self.top_k),
            ));
        }

        if !self.max_distance.is_finite() || self.max_distance < 0.0 {
            return Err(ConfigError::invalid(
                "retrieval.max_distance",
                format!("must be a finite value >= 0, got {}", self.max_distance),
            ));
        }

        Ok(())
    }
}

fn default_top_k() -> usize {
    2
}

fn default_max_distance() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = RetrievalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_k, 2);
    }

    #[test]
    fn test_zero_top_k_invalid() {
        let config = RetrievalConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_threshold_invalid() {
        let config = RetrievalConfig {
            max_distance: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_infinite_threshold_invalid() {
        let config = RetrievalConfig {
            max_distance: f32::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
