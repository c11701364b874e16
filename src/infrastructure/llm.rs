use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::gemini;

use crate::domain::{ports::ChatModel, DomainError};
use crate::infrastructure::config::BotConfig;

pub struct GeminiChat {
    client: gemini::Client,
    model: String,
    temperature: f64,
}

impl GeminiChat {
    pub fn new(config: &BotConfig) -> Self {
        let client = match &config.api_key {
            Some(key) => gemini::Client::new(key).expect("valid gemini api key"),
            None => gemini::Client::from_env(),
        };

        Self {
            client,
            model: config.chat_model.clone(),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for GeminiChat {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, DomainError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(system)
            .temperature(self.temperature)
            .build();

        agent
            .prompt(prompt)
            .await
            .map_err(|e| DomainError::upstream(format!("Model call failed: {e}")))
    }
}
