use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// A generative model invoked with a system instruction and a single prompt
/// string. Model name, credential, and sampling temperature are fixed at
/// handle construction, not per call.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, DomainError>;
}
