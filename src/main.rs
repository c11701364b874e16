use ragbot::api::{create_router, AppState};
use ragbot::application::PromptSet;
use ragbot::domain::ports::{AdminStore, EmbeddingService, VectorStore};
use ragbot::infrastructure::{
    AppConfig, ChatBot, GeminiEmbedding, QdrantStore, SqliteAdminStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();

    let admin_store: Arc<dyn AdminStore> =
        Arc::new(SqliteAdminStore::new(&config.database_path).await?);
    info!("admin store ready");

    let prompts = PromptSet::with_overrides(
        config.bot.mode,
        config.prompts.condense.clone(),
        config.prompts.synthesis.clone(),
    );
    let chatbot = Arc::new(ChatBot::with_prompts(config.bot.clone(), prompts));
    chatbot.initialize().await?;

    let embedding: Arc<dyn EmbeddingService> = Arc::new(GeminiEmbedding::new(&config.bot));
    let documents: Arc<dyn VectorStore> = Arc::new(
        QdrantStore::new(
            &config.bot.vector_store_url,
            &config.bot.collection_name,
            embedding,
        )
        .await?,
    );
    info!("vector store connected");

    let host = config.server.host.clone();
    let port = config.server.port;

    let state = AppState::new(chatbot, admin_store, Arc::new(config)).with_documents(documents);
    let app = create_router(state);

    let addr = SocketAddr::new(host.parse()?, port);
    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
