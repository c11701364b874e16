use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// Maps text to a fixed-length vector for similarity comparison.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;
    fn dimension(&self) -> usize;
}
