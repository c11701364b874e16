use serde::Deserialize;
use tracing::warn;

use crate::application::ResponseMode;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub bot: BotConfig,
    pub database_path: String,
    pub admin_client_token: Option<String>,
    pub cors_allowed_origins: Vec<String>,
    pub prompts: PromptOverrides,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Pipeline configuration. Every field defaults from the process
/// environment and is immutable once the orchestrator is constructed.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub api_key: Option<String>,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub chat_model: String,
    pub temperature: f64,
    pub vector_store_url: String,
    pub collection_name: String,
    pub top_k: usize,
    pub mode: ResponseMode,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            embedding_model: "text-embedding-004".to_string(),
            embedding_dimension: 768,
            chat_model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            vector_store_url: "http://localhost:6334".to_string(),
            collection_name: "my_collection".to_string(),
            top_k: 50,
            mode: ResponseMode::Html,
        }
    }
}

/// Operator-supplied replacements for the built-in instruction templates,
/// read from an optional YAML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptOverrides {
    pub condense: Option<String>,
    pub synthesis: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = BotConfig::default();

        let bot = BotConfig {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            embedding_model: env_or("EMBEDDING_MODEL", &defaults.embedding_model),
            embedding_dimension: parsed_env("EMBEDDING_DIMENSION", defaults.embedding_dimension),
            chat_model: env_or("CHAT_MODEL", &defaults.chat_model),
            temperature: parsed_env("CHAT_TEMPERATURE", defaults.temperature),
            vector_store_url: env_or("QDRANT_URL", &defaults.vector_store_url),
            collection_name: env_or("COLLECTION_NAME", &defaults.collection_name),
            top_k: parsed_env("RETRIEVAL_TOP_K", defaults.top_k),
            mode: parsed_env("RESPONSE_MODE", defaults.mode),
        };

        Self {
            server: ServerConfig {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: parsed_env("SERVER_PORT", 8080),
            },
            bot,
            database_path: env_or("DATABASE_PATH", "ragbot.db"),
            admin_client_token: std::env::var("ADMIN_CLIENT_TOKEN").ok(),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            prompts: load_prompt_overrides(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparseable environment value, using default");
            default
        }),
        Err(_) => default,
    }
}

fn load_prompt_overrides() -> PromptOverrides {
    let Ok(path) = std::env::var("PROMPTS_PATH") else {
        return PromptOverrides::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(raw) => serde_yaml::from_str(&raw).unwrap_or_else(|e| {
            warn!(path, error = %e, "invalid prompts file, using built-in templates");
            PromptOverrides::default()
        }),
        Err(e) => {
            warn!(path, error = %e, "unreadable prompts file, using built-in templates");
            PromptOverrides::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_overrides_parse_from_yaml() {
        let overrides: PromptOverrides =
            serde_yaml::from_str("condense: summarize tersely\n").unwrap();

        assert_eq!(overrides.condense.as_deref(), Some("summarize tersely"));
        assert!(overrides.synthesis.is_none());
    }

    #[test]
    fn test_default_bot_config_matches_deployment_defaults() {
        let config = BotConfig::default();

        assert_eq!(config.top_k, 50);
        assert_eq!(config.mode, ResponseMode::Html);
        assert!((config.temperature - 0.7).abs() < f64::EPSILON);
    }
}
