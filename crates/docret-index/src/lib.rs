pub mod memory;
pub mod vector;

pub use memory::MemoryIndex;
pub use vector::VectorIndex;
