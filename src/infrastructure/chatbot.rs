use std::sync::{Arc, RwLock};
use tracing::{error, info, instrument};

use crate::application::{clean_response, PromptSet, ResponseMode, RetrievalChain};
use crate::domain::{
    normalize_history,
    ports::{ChatModel, EmbeddingService, VectorStore},
    DomainError,
};
use crate::infrastructure::config::BotConfig;
use crate::infrastructure::embedding::GeminiEmbedding;
use crate::infrastructure::llm::GeminiChat;
use crate::infrastructure::vector_store::QdrantStore;

enum Lifecycle {
    Uninitialized,
    Initializing,
    Ready(Arc<RetrievalChain>),
    Failed,
}

/// The retrieval orchestrator. Construct, initialize once, then process
/// messages; configuration and the composed chain are immutable after
/// initialization, so concurrent calls share only read-only state.
///
/// There is no way back out of `Failed`: the chain has no teardown API, so
/// re-initialization means constructing a new orchestrator.
pub struct ChatBot {
    config: BotConfig,
    prompts: PromptSet,
    state: RwLock<Lifecycle>,
}

impl ChatBot {
    pub fn new(config: BotConfig) -> Self {
        let prompts = PromptSet::for_mode(config.mode);
        Self::with_prompts(config, prompts)
    }

    /// Constructs an orchestrator with an explicit template set, e.g. one
    /// loaded from a prompt-override file. The templates must target the
    /// same formatting mode as `config.mode`.
    pub fn with_prompts(config: BotConfig, prompts: PromptSet) -> Self {
        Self {
            config,
            prompts,
            state: RwLock::new(Lifecycle::Uninitialized),
        }
    }

    pub fn mode(&self) -> ResponseMode {
        self.config.mode
    }

    pub fn is_ready(&self) -> bool {
        self.state
            .read()
            .map(|state| matches!(&*state, Lifecycle::Ready(_)))
            .unwrap_or(false)
    }

    /// Builds the embedding function, the vector store handle, the model
    /// handle, and the retrieval chain. Must complete before any
    /// `process_message` call; a failure leaves the orchestrator unusable.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), DomainError> {
        self.begin_initialization()?;

        match self.build_chain().await {
            Ok(chain) => {
                self.install(chain)?;
                info!("chatbot initialized");
                Ok(())
            }
            Err(e) => {
                self.mark_failed();
                error!(error = %e, "failed to initialize chatbot");
                Err(DomainError::initialization(e.to_string()))
            }
        }
    }

    /// Composes the chain from pre-built collaborators instead of provider
    /// clients. Used by tests and embedded setups.
    pub fn initialize_with(
        &self,
        model: Arc<dyn ChatModel>,
        store: Arc<dyn VectorStore>,
    ) -> Result<(), DomainError> {
        self.begin_initialization()?;
        self.install(RetrievalChain::new(
            model,
            store,
            self.prompts.clone(),
            self.config.top_k,
        ))
    }

    /// Runs one message through contextualization, retrieval, synthesis, and
    /// post-processing, returning the cleaned answer. Each call is
    /// independent; errors from the collaborators propagate unchanged.
    #[instrument(skip(self, input, history))]
    pub async fn process_message(
        &self,
        input: &str,
        history: &serde_json::Value,
    ) -> Result<String, DomainError> {
        let chain = self.chain()?;
        let turns = normalize_history(history);
        let output = chain.invoke(input, &turns).await?;
        Ok(clean_response(self.config.mode, &output.answer))
    }

    async fn build_chain(&self) -> Result<RetrievalChain, DomainError> {
        let embedding: Arc<dyn EmbeddingService> = Arc::new(GeminiEmbedding::new(&self.config));
        let store: Arc<dyn VectorStore> = Arc::new(
            QdrantStore::new(
                &self.config.vector_store_url,
                &self.config.collection_name,
                embedding,
            )
            .await?,
        );
        let model: Arc<dyn ChatModel> = Arc::new(GeminiChat::new(&self.config));

        Ok(RetrievalChain::new(
            model,
            store,
            self.prompts.clone(),
            self.config.top_k,
        ))
    }

    fn begin_initialization(&self) -> Result<(), DomainError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        match *state {
            Lifecycle::Uninitialized => {
                *state = Lifecycle::Initializing;
                Ok(())
            }
            Lifecycle::Initializing => Err(DomainError::initialization(
                "initialization already in progress",
            )),
            Lifecycle::Ready(_) => Err(DomainError::initialization("already initialized")),
            Lifecycle::Failed => Err(DomainError::initialization(
                "previous initialization failed; construct a new chatbot",
            )),
        }
    }

    fn install(&self, chain: RetrievalChain) -> Result<(), DomainError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        *state = Lifecycle::Ready(Arc::new(chain));
        Ok(())
    }

    fn mark_failed(&self) {
        if let Ok(mut state) = self.state.write() {
            *state = Lifecycle::Failed;
        }
    }

    fn chain(&self) -> Result<Arc<RetrievalChain>, DomainError> {
        let state = self
            .state
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        match &*state {
            Lifecycle::Ready(chain) => Ok(chain.clone()),
            _ => Err(DomainError::NotInitialized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Document, SearchResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedModel {
        replies: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut replies = self.replies.lock().unwrap();
            if replies.len() > 1 {
                Ok(replies.remove(0))
            } else {
                Ok(replies[0].clone())
            }
        }
    }

    struct RecordingStore {
        results: Vec<SearchResult>,
        failure: Option<String>,
        queries: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl RecordingStore {
        fn with_documents(contents: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                results: contents
                    .iter()
                    .map(|content| SearchResult {
                        document: Document::new(*content),
                        score: 1.0,
                    })
                    .collect(),
                failure: None,
                queries: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                results: Vec::new(),
                failure: Some(message.to_string()),
                queries: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn recorded_queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn similarity_search(
            &self,
            query: &str,
            _top_k: usize,
        ) -> Result<Vec<SearchResult>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());

            match &self.failure {
                Some(message) => Err(DomainError::upstream(message.clone())),
                None => Ok(self.results.clone()),
            }
        }

        async fn add_documents(
            &self,
            _documents: &[Document],
            _ids: &[String],
        ) -> Result<(), DomainError> {
            Ok(())
        }

        async fn delete_documents(&self, _ids: &[String]) -> Result<(), DomainError> {
            Ok(())
        }
    }

    fn html_bot() -> ChatBot {
        ChatBot::new(BotConfig::default())
    }

    fn markdown_bot() -> ChatBot {
        ChatBot::new(BotConfig {
            mode: ResponseMode::Markdown,
            ..BotConfig::default()
        })
    }

    #[tokio::test]
    async fn test_process_before_initialize_fails_without_collaborator_calls() {
        let bot = html_bot();
        let model = ScriptedModel::new(&["unused"]);
        let store = RecordingStore::with_documents(&["unused"]);

        let result = bot.process_message("What TVs do you have?", &json!([])).await;

        assert!(matches!(result, Err(DomainError::NotInitialized)));
        assert_eq!(model.call_count(), 0);
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_html_pipeline_returns_post_processed_answer() {
        let bot = html_bot();
        let model = ScriptedModel::new(&["```html<p>A</p>```"]);
        let store = RecordingStore::with_documents(&["55-inch OLED, $899"]);

        bot.initialize_with(model.clone(), store.clone()).unwrap();

        let answer = bot
            .process_message("What TVs do you have?", &json!([]))
            .await
            .unwrap();

        assert_eq!(answer, "<p>A</p>");
        // Empty history skips the condensation call.
        assert_eq!(model.call_count(), 1);
        assert_eq!(store.call_count(), 1);
    }

    #[tokio::test]
    async fn test_markdown_pipeline_leaves_fenced_blocks_intact() {
        let bot = markdown_bot();
        let raw = "```js\nconsole.log(1)\n```";
        let model = ScriptedModel::new(&[raw]);
        let store = RecordingStore::with_documents(&["doc"]);

        bot.initialize_with(model, store).unwrap();

        let answer = bot
            .process_message("show me a snippet", &json!([]))
            .await
            .unwrap();

        assert_eq!(answer, raw);
    }

    #[tokio::test]
    async fn test_history_triggers_condensation_and_feeds_retrieval() {
        let bot = html_bot();
        let model = ScriptedModel::new(&["standalone: 4k TVs under $500", "<p>B</p>"]);
        let store = RecordingStore::with_documents(&["doc"]);

        bot.initialize_with(model.clone(), store.clone()).unwrap();

        let history = json!([
            {"role": "user", "content": "I want a 4k TV"},
            {"role": "assistant", "content": "<p>Sure, any budget?</p>"},
        ]);
        bot.process_message("under $500", &history).await.unwrap();

        assert_eq!(model.call_count(), 2);
        assert_eq!(
            store.recorded_queries(),
            vec!["standalone: 4k TVs under $500".to_string()]
        );
    }

    #[tokio::test]
    async fn test_sequential_calls_do_not_cross_contaminate() {
        let bot = html_bot();
        let model = ScriptedModel::new(&["<p>ok</p>"]);
        let store = RecordingStore::with_documents(&["doc"]);

        bot.initialize_with(model, store.clone()).unwrap();

        bot.process_message("first question", &json!([])).await.unwrap();
        bot.process_message("second question", &json!([])).await.unwrap();

        assert_eq!(
            store.recorded_queries(),
            vec!["first question".to_string(), "second question".to_string()]
        );
    }

    #[tokio::test]
    async fn test_upstream_error_propagates_unchanged() {
        let bot = html_bot();
        let model = ScriptedModel::new(&["unused"]);
        let store = RecordingStore::failing("vector store unavailable");

        bot.initialize_with(model.clone(), store).unwrap();

        let result = bot.process_message("anything", &json!([])).await;

        match result {
            Err(DomainError::Upstream(message)) => {
                assert_eq!(message, "vector store unavailable");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        // Synthesis never runs after a failed retrieval.
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_history_degrades_to_empty_context() {
        let bot = html_bot();
        let model = ScriptedModel::new(&["<p>ok</p>"]);
        let store = RecordingStore::with_documents(&["doc"]);

        bot.initialize_with(model.clone(), store.clone()).unwrap();

        let answer = bot
            .process_message("hello", &json!({"not": "an array"}))
            .await
            .unwrap();

        assert_eq!(answer, "<p>ok</p>");
        // Degraded-to-empty history means no condensation call.
        assert_eq!(model.call_count(), 1);
        assert_eq!(store.recorded_queries(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_initialize_twice_is_rejected() {
        let bot = html_bot();
        let model = ScriptedModel::new(&["<p>ok</p>"]);
        let store = RecordingStore::with_documents(&["doc"]);

        bot.initialize_with(model.clone(), store.clone()).unwrap();
        let second = bot.initialize_with(model, store);

        assert!(matches!(second, Err(DomainError::Initialization(_))));
        assert!(bot.is_ready());
    }
}
