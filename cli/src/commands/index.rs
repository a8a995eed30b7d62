use anyhow::{Context, Result};
use console::Style;
use docret_context::DocContext;
use docret_core::assembler::{AssemblyEvent, UnitAssembler};
use docret_core::scanner::scan_docs;
use docret_config::Config;
use docret_pipeline::{IngestEvent, IngestPipeline};
use std::path::{Path, PathBuf};
use tracing::info;

use super::ui;
use super::utils::{load_config, spinner};

pub async fn handle_index(
    dir: Option<PathBuf>,
    full: bool,
    dry_run: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(dir) = dir {
        config.core.docs_dir = dir;
    }
    let docs_dir = config.require_docs_dir()?.to_path_buf();

    if dry_run {
        return dry_run_listing(&config, &docs_dir);
    }

    let collection = config.core.collection_path();
    if full && collection.exists() {
        println!("Full rebuild requested; clearing {}...", collection.display());
        std::fs::remove_dir_all(&collection)
            .with_context(|| format!("failed to remove {}", collection.display()))?;
    } else if collection.exists() {
        info!("Updating existing collection at {}", collection.display());
    }

    let ctx = DocContext::open(config).await?;
    let pipeline = IngestPipeline::from_context(&ctx);

    let progress = spinner(&format!("Indexing {}...", docs_dir.display()));
    let ok = Style::new().green().bold();
    let warn = Style::new().yellow().bold();
    let report = pipeline
        .ingest_dir(&docs_dir, |event| match event {
            IngestEvent::Indexed { file, units } => {
                progress.println(format!("{} {} ({} units)", ok.apply_to("✓"), file, units));
            }
            IngestEvent::Skipped { file, reason } => {
                progress.println(format!("{} {}: {}", warn.apply_to("⚠"), file, reason));
            }
        })
        .await?;
    progress.finish_and_clear();

    let summary = format!(
        "Indexed {} units from {} files into {}",
        report.total_units(),
        report.indexed.len(),
        ctx.config.core.collection_path().display()
    );
    if report.is_clean() {
        ui::print_success(&summary);
    } else {
        ui::print_warning(&format!("{} ({} skipped)", summary, report.skipped.len()));
    }
    Ok(())
}

fn dry_run_listing(config: &Config, docs_dir: &Path) -> Result<()> {
    let paths = scan_docs(docs_dir);
    println!("Dry run: {} files in {}", paths.len(), docs_dir.display());

    let ok = Style::new().green().bold();
    let warn = Style::new().yellow().bold();
    let report = UnitAssembler::new(config).assemble_listing(&paths, |event| match event {
        AssemblyEvent::Assembled { file, units } => {
            println!("{} {} ({} units)", ok.apply_to("✓"), file, units);
        }
        AssemblyEvent::Skipped { file, reason } => {
            println!("{} {}: {}", warn.apply_to("⚠"), file, reason);
        }
    });

    ui::print_key_value("Files assembled", &report.assembled.len().to_string());
    ui::print_key_value("Files skipped", &report.skipped.len().to_string());
    ui::print_key_value("Records", &report.ids.len().to_string());
    Ok(())
}
