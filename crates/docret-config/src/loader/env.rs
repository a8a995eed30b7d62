//! Environment variable configuration overlay
//!
//! Supports environment variables in the format
//! `DOCRET_<section>_<field>=value`, for example:
//! - `DOCRET_RETRIEVAL_MAX_DISTANCE=0.5`
//! - `DOCRET_TABLE_SPLIT_COLUMN=7`
//! - `DOCRET_LLM_MODEL=mistral`
//!
//! The plain `OLLAMA_BASE_URL` and `DEFAULT_MODEL` variables are honoured as
//! well; they set both service base URLs and the generation model.

use crate::{error::ConfigError, types::*, Config, Result};
use std::env;
use std::path::PathBuf;

const PREFIX: &str = "DOCRET_";

/// Parse configuration from the process environment
pub fn from_env() -> Result<Option<Config>> {
    from_vars(env::vars())
}

/// Parse configuration from an explicit variable list
pub fn from_vars<I>(vars: I) -> Result<Option<Config>>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut config = Config::default();
    let mut found_any = false;

    for (key, value) in vars {
        let applied = match key.as_str() {
            "OLLAMA_BASE_URL" => {
                config.embedding.base_url = value.clone();
                config.llm.base_url = value;
                Ok(())
            }
            "DEFAULT_MODEL" => {
                config.llm.model = value;
                Ok(())
            }
            k if k.starts_with(PREFIX) => apply_env_var(&mut config, k, &value),
            _ => continue,
        };
        found_any = true;
        // A malformed variable only loses its own value.
        if let Err(e) = applied {
            eprintln!("Warning: failed to parse {}: {}", key, e);
        }
    }

    Ok(found_any.then_some(config))
}

fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let key = key.strip_prefix(PREFIX).unwrap_or(key);

    let Some((section, field)) = key.split_once('_') else {
        return Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: "Expected format: DOCRET_<section>_<field>".to_string(),
        });
    };
    let section = section.to_lowercase();
    let field = field.to_lowercase();

    match section.as_str() {
        "core" => apply_core_var(&mut config.core, &field, value),
        "table" => apply_table_var(&mut config.table, &field, value),
        "text" => apply_text_var(&mut config.text, &field, value),
        "embedding" => apply_embedding_var(&mut config.embedding, &field, value),
        "llm" => apply_llm_var(&mut config.llm, &field, value),
        "retrieval" => apply_retrieval_var(&mut config.retrieval, &field, value),
        "prompt" => apply_prompt_var(&mut config.prompt, &field, value),
        _ => Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn var_name(section: &str, field: &str) -> String {
    format!("{}{}_{}", PREFIX, section.to_uppercase(), field.to_uppercase())
}

fn unknown(section: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: var_name(section, field),
        message: format!("Unknown field: {}", field),
    }
}

fn parse_usize(section: &str, field: &str, value: &str) -> Result<usize> {
    value.parse().map_err(|_| ConfigError::EnvVarError {
        var: var_name(section, field),
        message: format!("Invalid integer: {}", value),
    })
}

fn parse_f32(section: &str, field: &str, value: &str) -> Result<f32> {
    value.parse().map_err(|_| ConfigError::EnvVarError {
        var: var_name(section, field),
        message: format!("Invalid float: {}", value),
    })
}

fn apply_core_var(config: &mut CoreConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "docs_dir" => config.docs_dir = PathBuf::from(value),
        "index_dir" => config.index_dir = PathBuf::from(value),
        "collection" => config.collection = value.to_string(),
        _ => return Err(unknown("core", field)),
    }
    Ok(())
}

fn apply_table_var(config: &mut TableConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "split_column" => config.split_column = parse_usize("table", field, value)?,
        "max_columns" => config.max_columns = parse_usize("table", field, value)?,
        "metadata_prefix" => config.metadata_prefix = value.to_string(),
        "separator" => config.separator = value.to_string(),
        "empty_placeholder" => config.empty_placeholder = value.to_string(),
        "sheet" => config.sheet = Some(value.to_string()),
        _ => return Err(unknown("table", field)),
    }
    Ok(())
}

fn apply_text_var(config: &mut TextConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "strategy" => {
            config.strategy = match value.to_lowercase().as_str() {
                "whole" => TextStrategy::Whole,
                "split" => TextStrategy::Split,
                _ => {
                    return Err(ConfigError::invalid_enum(
                        "text.strategy",
                        value,
                        &["whole", "split"],
                    ))
                }
            }
        }
        "max_tokens" => config.max_tokens = parse_usize("text", field, value)?,
        "overlap_tokens" => config.overlap_tokens = parse_usize("text", field, value)?,
        _ => return Err(unknown("text", field)),
    }
    Ok(())
}

fn apply_embedding_var(config: &mut EmbeddingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "backend" => {
            config.backend = match value.to_lowercase().as_str() {
                "ollama" => EmbeddingBackend::Ollama,
                "openai" => EmbeddingBackend::OpenAi,
                _ => {
                    return Err(ConfigError::invalid_enum(
                        "embedding.backend",
                        value,
                        &["ollama", "openai"],
                    ))
                }
            }
        }
        "model_name" => config.model_name = value.to_string(),
        "base_url" => config.base_url = value.to_string(),
        "batch_size" => config.batch_size = parse_usize("embedding", field, value)?,
        _ => return Err(unknown("embedding", field)),
    }
    Ok(())
}

fn apply_llm_var(config: &mut LlmConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "backend" => {
            config.backend = match value.to_lowercase().as_str() {
                "ollama" => LlmBackend::Ollama,
                "openai" => LlmBackend::OpenAi,
                _ => {
                    return Err(ConfigError::invalid_enum(
                        "llm.backend",
                        value,
                        &["ollama", "openai"],
                    ))
                }
            }
        }
        "model" => config.model = value.to_string(),
        "base_url" => config.base_url = value.to_string(),
        "max_tokens" => {
            config.max_tokens = value.parse().map_err(|_| ConfigError::EnvVarError {
                var: var_name("llm", field),
                message: format!("Invalid integer: {}", value),
            })?
        }
        "temperature" => config.temperature = parse_f32("llm", field, value)?,
        _ => return Err(unknown("llm", field)),
    }
    Ok(())
}

fn apply_retrieval_var(config: &mut RetrievalConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "top_k" => config.top_k = parse_usize("retrieval", field, value)?,
        "max_distance" => config.max_distance = parse_f32("retrieval", field, value)?,
        _ => return Err(unknown("retrieval", field)),
    }
    Ok(())
}

fn apply_prompt_var(config: &mut PromptConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "context_separator" => config.context_separator = value.to_string(),
        "instructions" => {
            config.instructions = match value.to_lowercase().as_str() {
                "concise" => Instructions::default(),
                "yes_no" | "yesno" => Instructions::yes_no(),
                _ => {
                    return Err(ConfigError::invalid_enum(
                        "prompt.instructions",
                        value,
                        &["concise", "yes_no"],
                    ))
                }
            }
        }
        _ => return Err(unknown("prompt", field)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_relevant_vars() {
        let parsed = from_vars(vars(&[("PATH", "/usr/bin"), ("HOME", "/root")])).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_section_fields() {
        let config = from_vars(vars(&[
            ("DOCRET_TABLE_SPLIT_COLUMN", "7"),
            ("DOCRET_RETRIEVAL_MAX_DISTANCE", "0.5"),
            ("DOCRET_TEXT_STRATEGY", "split"),
            ("DOCRET_PROMPT_INSTRUCTIONS", "yes_no"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.table.split_column, 7);
        assert_eq!(config.retrieval.max_distance, 0.5);
        assert_eq!(config.text.strategy, TextStrategy::Split);
        assert!(matches!(
            config.prompt.instructions,
            Instructions::YesNo { .. }
        ));
    }

    #[test]
    fn test_legacy_ollama_vars() {
        let config = from_vars(vars(&[
            ("OLLAMA_BASE_URL", "http://gpu-box:11434"),
            ("DEFAULT_MODEL", "llama3.1"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.embedding.base_url, "http://gpu-box:11434");
        assert_eq!(config.llm.base_url, "http://gpu-box:11434");
        assert_eq!(config.llm.model, "llama3.1");
    }

    #[test]
    fn test_bad_value_keeps_default() {
        let config = from_vars(vars(&[("DOCRET_RETRIEVAL_TOP_K", "many")]))
            .unwrap()
            .unwrap();
        assert_eq!(config.retrieval.top_k, RetrievalConfig::default().top_k);
    }

    #[test]
    fn test_unknown_section_is_error() {
        let mut config = Config::default();
        assert!(apply_env_var(&mut config, "DOCRET_GRAPH_DEPTH", "3").is_err());
        assert!(apply_env_var(&mut config, "DOCRET_NOSECTION", "3").is_err());
    }
}
