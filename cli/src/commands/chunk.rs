use anyhow::{Context, Result};
use docret_core::assembler::UnitAssembler;
use std::path::{Path, PathBuf};

use super::ui;
use super::utils::load_config;

/// Offline preview: no services are contacted.
pub fn handle_chunk(file: PathBuf, limit: usize, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let units = UnitAssembler::new(&config)
        .assemble_file(&file)
        .with_context(|| format!("failed to assemble {}", file.display()))?;

    println!(
        "{} ({}): {} records",
        units.file,
        units.format,
        units.records.len()
    );

    for record in units.records.iter().take(limit) {
        ui::print_header(&record.id);
        ui::print_key_value("embed", &record.embed_text);
        ui::print_key_value("context", &record.context_text);
        ui::print_key_value("metadata", &serde_json::to_string(&record.metadata)?);
    }
    if units.records.len() > limit {
        println!("\n... {} more", units.records.len() - limit);
    }
    Ok(())
}
