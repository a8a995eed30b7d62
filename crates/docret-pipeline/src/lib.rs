pub mod ingest;

pub use ingest::{IngestEvent, IngestPipeline, IngestReport};
