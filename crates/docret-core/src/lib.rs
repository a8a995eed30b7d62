pub mod assembler;
pub mod chunking;
pub mod error;
pub mod extract;
pub mod models;
pub mod prompt;
pub mod retrieval;
pub mod scanner;
pub mod traits;

pub use assembler::{AssemblyEvent, AssemblyReport, FileUnits, UnitAssembler};
pub use error::{IngestError, ServiceError};
pub use extract::DocumentFormat;
pub use models::{CellValue, Chunk, Metadata, QueryResult, RawTable, Record};
pub use prompt::PromptAssembler;
pub use retrieval::RetrievalOutcome;
