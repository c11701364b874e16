use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingsBuilder;
use rig::providers::gemini;

use crate::domain::{ports::EmbeddingService, DomainError};
use crate::infrastructure::config::BotConfig;

pub struct GeminiEmbedding {
    client: gemini::Client,
    model: String,
    dimension: usize,
}

impl GeminiEmbedding {
    pub fn new(config: &BotConfig) -> Self {
        let client = match &config.api_key {
            Some(key) => gemini::Client::new(key).expect("valid gemini api key"),
            None => gemini::Client::from_env(),
        };

        Self {
            client,
            model: config.embedding_model.clone(),
            dimension: config.embedding_dimension,
        }
    }
}

#[async_trait]
impl EmbeddingService for GeminiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let model = self
            .client
            .embedding_model_with_ndims(&self.model, self.dimension);

        let embeddings = EmbeddingsBuilder::new(model)
            .document(text)
            .map_err(|e| DomainError::upstream(e.to_string()))?
            .build()
            .await
            .map_err(|e| DomainError::upstream(e.to_string()))?;

        embeddings
            .into_iter()
            .next()
            .map(|(_doc, emb)| emb.first().vec.into_iter().map(|x| x as f32).collect())
            .ok_or_else(|| DomainError::upstream("No embedding returned"))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
