mod in_memory;
mod qdrant;

pub use in_memory::InMemoryStore;
pub use qdrant::QdrantStore;
