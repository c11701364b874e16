use std::sync::Arc;

use crate::domain::ports::{AdminStore, VectorStore};
use crate::infrastructure::{AppConfig, ChatBot};

#[derive(Clone)]
pub struct AppState {
    pub chatbot: Arc<ChatBot>,
    pub admin_store: Arc<dyn AdminStore>,
    pub documents: Option<Arc<dyn VectorStore>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        chatbot: Arc<ChatBot>,
        admin_store: Arc<dyn AdminStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            chatbot,
            admin_store,
            documents: None,
            config,
        }
    }

    pub fn with_documents(mut self, documents: Arc<dyn VectorStore>) -> Self {
        self.documents = Some(documents);
        self
    }
}
