mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{handle_ask, handle_chunk, handle_index, handle_search, handle_status, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Index { dir, full, dry_run } => {
            handle_index(dir, full, dry_run, config_path).await?;
        }
        Commands::Ask {
            question,
            top_k,
            max_distance,
            sources,
        } => {
            handle_ask(question, top_k, max_distance, sources, config_path).await?;
        }
        Commands::Search { query, top_k } => {
            handle_search(query, top_k, config_path).await?;
        }
        Commands::Chunk { file, limit } => {
            handle_chunk(file, limit, config_path)?;
        }
        Commands::Status => {
            handle_status(config_path).await?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` selects info and `-vv` debug.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
