pub mod ask;
pub mod chunk;
pub mod index;
pub mod search;
pub mod status;
pub mod ui;
pub mod utils;

pub use ask::handle_ask;
pub use chunk::handle_chunk;
pub use index::handle_index;
pub use search::handle_search;
pub use status::handle_status;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docret")]
#[command(about = "Index a folder of documents and answer questions grounded in it")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest every supported file in the documents directory
    Index {
        /// Documents directory (overrides core.docs_dir)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Drop the collection before ingesting
        #[arg(long)]
        full: bool,

        /// Assemble records only; no embedding calls, no index writes
        #[arg(long)]
        dry_run: bool,
    },
    /// Answer a question from the indexed documents
    Ask {
        /// The question
        question: String,

        /// Number of nearest records to consider
        #[arg(long)]
        top_k: Option<usize>,

        /// Largest distance a record may have and still be used
        #[arg(long)]
        max_distance: Option<f32>,

        /// Print the records the answer was grounded on
        #[arg(long)]
        sources: bool,
    },
    /// Show nearest records and whether they pass the distance threshold
    Search {
        /// The query string
        query: String,

        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Preview the records a file would produce, without indexing
    Chunk {
        file: PathBuf,

        /// Show at most this many records
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Show configuration and index status
    Status,
}
