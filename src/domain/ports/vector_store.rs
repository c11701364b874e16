use crate::domain::{errors::DomainError, Document, SearchResult};
use async_trait::async_trait;

/// Nearest-neighbor search over embedded documents, plus the write surface
/// used by the document-management endpoints. Implementations own their
/// embedding function; callers pass plain text.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn similarity_search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError>;

    async fn add_documents(&self, documents: &[Document], ids: &[String])
        -> Result<(), DomainError>;

    async fn delete_documents(&self, ids: &[String]) -> Result<(), DomainError>;
}
