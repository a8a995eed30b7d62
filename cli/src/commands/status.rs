use anyhow::Result;
use docret_core::traits::VectorStore;
use docret_index::VectorIndex;
use std::path::Path;

use super::ui;
use super::utils::load_config;

pub async fn handle_status(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    ui::print_header("Configuration");
    ui::print_key_value("Documents", &config.core.docs_dir.display().to_string());
    ui::print_key_value(
        "Embedding",
        &format!("{:?} {} @ {}", config.embedding.backend, config.embedding.model_name, config.embedding.base_url),
    );
    ui::print_key_value(
        "Generation",
        &format!("{:?} {} @ {}", config.llm.backend, config.llm.model, config.llm.base_url),
    );
    ui::print_key_value(
        "Retrieval",
        &format!("top_k={}, max_distance={}", config.retrieval.top_k, config.retrieval.max_distance),
    );
    ui::print_key_value(
        "Rows",
        &format!(
            "split_column={}, max_columns={}, prefix={:?}",
            config.table.split_column, config.table.max_columns, config.table.metadata_prefix
        ),
    );

    ui::print_header("Index");
    let docs_present = config.core.docs_dir.is_dir();
    println!(
        " - Documents directory: {}",
        if docs_present { "present" } else { "missing" }
    );

    let collection = config.core.collection_path();
    ui::print_key_value("Collection", &collection.display().to_string());
    if collection.exists() {
        let index = VectorIndex::new(&collection).await?;
        println!(" - Records: {}", index.count().await?);
    } else {
        println!(" - Vector index: missing (run `docret index`)");
    }
    Ok(())
}
