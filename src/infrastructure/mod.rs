pub mod chatbot;
pub mod config;
pub mod embedding;
pub mod llm;
pub mod store;
pub mod vector_store;

pub use chatbot::ChatBot;
pub use config::{AppConfig, BotConfig, PromptOverrides, ServerConfig};
pub use embedding::GeminiEmbedding;
pub use llm::GeminiChat;
pub use store::SqliteAdminStore;
pub use vector_store::{InMemoryStore, QdrantStore};
