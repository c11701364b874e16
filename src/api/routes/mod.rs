pub mod auth;
pub mod chat;
pub mod documents;
pub mod health;
pub mod logs;
pub mod settings;

use axum::http::{header, Method};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::middleware::{client_token_auth, request_logger};
use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.cors_allowed_origins);

    let public = Router::new()
        .route("/chat", post(chat::chat_handler))
        .route("/auth/login", post(auth::login))
        .route("/logging/api-log", post(logs::record_api_log))
        .route("/logging/event-log", post(logs::record_event_log));

    let admin = Router::new()
        .route(
            "/chatbot/settings",
            get(settings::list_settings)
                .post(settings::create_settings)
                .put(settings::update_settings),
        )
        .route("/chatbot/fetch-settings", get(settings::fetch_active))
        .route("/auth/users", get(auth::list_users))
        .route("/logging/fetch-logs", get(logs::fetch_logs))
        .route(
            "/documents",
            post(documents::add_documents).delete(documents::delete_documents),
        )
        .layer(from_fn_with_state(state.clone(), client_token_auth));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", public.merge(admin))
        .layer(from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<header::HeaderValue> =
            origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}
