mod admin;
mod conversation;
mod document;

pub use admin::{AdminUser, ApiLogEntry, BotSettings, EventLogEntry};
pub use conversation::{normalize_history, strip_tags, ChatTurn, TurnRole};
pub use document::{Document, SearchResult};
