pub mod table;
pub mod text;
pub mod tokenizer;

pub use docret_config::{TableConfig, TextConfig, TextStrategy};
pub use table::RowChunker;
pub use text::TextSplitter;
