use std::sync::Arc;
use tracing::instrument;

use crate::application::prompts::{render_user_prompt, PromptSet};
use crate::domain::{
    ports::{ChatModel, VectorStore},
    ChatTurn, DomainError, SearchResult,
};

/// Result of one pipeline invocation: the raw synthesized answer and the
/// documents it was conditioned on.
#[derive(Debug)]
pub struct ChainOutput {
    pub answer: String,
    pub source_documents: Vec<SearchResult>,
}

/// The composed retrieval pipeline: history-aware query rewriting, vector
/// similarity search, and answer synthesis, strictly in that order.
///
/// Built once during orchestrator initialization and shared read-only
/// afterwards; concurrent invocations share no mutable state.
pub struct RetrievalChain {
    model: Arc<dyn ChatModel>,
    store: Arc<dyn VectorStore>,
    prompts: PromptSet,
    top_k: usize,
}

impl RetrievalChain {
    pub fn new(
        model: Arc<dyn ChatModel>,
        store: Arc<dyn VectorStore>,
        prompts: PromptSet,
        top_k: usize,
    ) -> Self {
        Self {
            model,
            store,
            prompts,
            top_k,
        }
    }

    #[instrument(skip(self, input, history), fields(history_len = history.len()))]
    pub async fn invoke(
        &self,
        input: &str,
        history: &[ChatTurn],
    ) -> Result<ChainOutput, DomainError> {
        let query = self.contextualize(input, history).await?;
        let source_documents = self.store.similarity_search(&query, self.top_k).await?;

        let context = source_documents
            .iter()
            .map(|result| result.document.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let system = self.prompts.synthesis.system_with_context(&context);
        let prompt = render_user_prompt(history, input);
        let answer = self.model.generate(&system, &prompt).await?;

        Ok(ChainOutput {
            answer,
            source_documents,
        })
    }

    /// Rewrites the latest input into a standalone retrieval query using the
    /// condensation template. With no prior turns there is nothing to
    /// condense, so the input is used as the query directly.
    async fn contextualize(
        &self,
        input: &str,
        history: &[ChatTurn],
    ) -> Result<String, DomainError> {
        if history.is_empty() {
            return Ok(input.to_string());
        }

        let prompt = render_user_prompt(history, input);
        self.model
            .generate(self.prompts.condense.system(), &prompt)
            .await
    }
}
