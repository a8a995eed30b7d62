//! Configuration merging logic
//!
//! Merges configurations from multiple sources with proper precedence.

use crate::{types::*, Config};

/// Merge two configurations, with `overlay` taking precedence
///
/// Values in `overlay` that differ from the defaults replace the value in
/// `base`; values equal to the default leave `base` untouched.
pub fn merge(mut base: Config, overlay: Config) -> Config {
    base.core = merge_core(base.core, overlay.core);
    base.table = merge_table(base.table, overlay.table);
    base.text = merge_text(base.text, overlay.text);
    base.embedding = merge_embedding(base.embedding, overlay.embedding);
    base.llm = merge_llm(base.llm, overlay.llm);
    base.retrieval = merge_retrieval(base.retrieval, overlay.retrieval);
    base.prompt = merge_prompt(base.prompt, overlay.prompt);
    base
}

fn pick<T: PartialEq>(base: T, overlay: T, default: &T) -> T {
    if overlay != *default {
        overlay
    } else {
        base
    }
}

fn pick_f32(base: f32, overlay: f32, default: f32) -> f32 {
    if (overlay - default).abs() > f32::EPSILON {
        overlay
    } else {
        base
    }
}

fn merge_core(base: CoreConfig, overlay: CoreConfig) -> CoreConfig {
    let default = CoreConfig::default();
    CoreConfig {
        docs_dir: pick(base.docs_dir, overlay.docs_dir, &default.docs_dir),
        index_dir: pick(base.index_dir, overlay.index_dir, &default.index_dir),
        collection: pick(base.collection, overlay.collection, &default.collection),
    }
}

fn merge_table(base: TableConfig, overlay: TableConfig) -> TableConfig {
    let default = TableConfig::default();
    TableConfig {
        split_column: pick(base.split_column, overlay.split_column, &default.split_column),
        max_columns: pick(base.max_columns, overlay.max_columns, &default.max_columns),
        metadata_prefix: pick(
            base.metadata_prefix,
            overlay.metadata_prefix,
            &default.metadata_prefix,
        ),
        separator: pick(base.separator, overlay.separator, &default.separator),
        empty_placeholder: pick(
            base.empty_placeholder,
            overlay.empty_placeholder,
            &default.empty_placeholder,
        ),
        sheet: overlay.sheet.or(base.sheet),
    }
}

fn merge_text(base: TextConfig, overlay: TextConfig) -> TextConfig {
    let default = TextConfig::default();
    TextConfig {
        strategy: pick(base.strategy, overlay.strategy, &default.strategy),
        max_tokens: pick(base.max_tokens, overlay.max_tokens, &default.max_tokens),
        overlap_tokens: pick(
            base.overlap_tokens,
            overlay.overlap_tokens,
            &default.overlap_tokens,
        ),
    }
}

fn merge_embedding(base: EmbeddingConfig, overlay: EmbeddingConfig) -> EmbeddingConfig {
    let default = EmbeddingConfig::default();
    EmbeddingConfig {
        backend: pick(base.backend, overlay.backend, &default.backend),
        model_name: pick(base.model_name, overlay.model_name, &default.model_name),
        base_url: pick(base.base_url, overlay.base_url, &default.base_url),
        batch_size: pick(base.batch_size, overlay.batch_size, &default.batch_size),
    }
}

fn merge_llm(base: LlmConfig, overlay: LlmConfig) -> LlmConfig {
    let default = LlmConfig::default();
    LlmConfig {
        backend: pick(base.backend, overlay.backend, &default.backend),
        model: pick(base.model, overlay.model, &default.model),
        base_url: pick(base.base_url, overlay.base_url, &default.base_url),
        max_tokens: pick(base.max_tokens, overlay.max_tokens, &default.max_tokens),
        temperature: pick_f32(base.temperature, overlay.temperature, default.temperature),
    }
}

fn merge_retrieval(base: RetrievalConfig, overlay: RetrievalConfig) -> RetrievalConfig {
    let default = RetrievalConfig::default();
    RetrievalConfig {
        top_k: pick(base.top_k, overlay.top_k, &default.top_k),
        max_distance: pick_f32(base.max_distance, overlay.max_distance, default.max_distance),
    }
}

fn merge_prompt(base: PromptConfig, overlay: PromptConfig) -> PromptConfig {
    let default = PromptConfig::default();
    PromptConfig {
        context_separator: pick(
            base.context_separator,
            overlay.context_separator,
            &default.context_separator,
        ),
        instructions: pick(base.instructions, overlay.instructions, &default.instructions),
    }
}
