pub mod context;
pub mod embedder;
pub mod llm;

pub use context::DocContext;
pub use embedder::select_embedder;
pub use llm::select_llm;
