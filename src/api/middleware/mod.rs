mod auth;
mod logging;

pub use auth::{client_token_auth, CLIENT_TOKEN_HEADER};
pub use logging::request_logger;
