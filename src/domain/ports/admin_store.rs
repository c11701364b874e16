use crate::domain::{
    errors::DomainError, AdminUser, ApiLogEntry, BotSettings, EventLogEntry,
};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn list_settings(&self) -> Result<Vec<BotSettings>, DomainError>;
    async fn active_settings(&self) -> Result<Option<BotSettings>, DomainError>;
    async fn insert_settings(&self, settings: &BotSettings) -> Result<(), DomainError>;
    async fn upsert_settings(&self, settings: &BotSettings) -> Result<(), DomainError>;
    async fn get_settings(&self, id: Uuid) -> Result<Option<BotSettings>, DomainError>;

    async fn verify_login(&self, email: &str, password: &str) -> Result<bool, DomainError>;
    async fn insert_user(&self, user: &AdminUser) -> Result<(), DomainError>;
    async fn list_users(&self) -> Result<Vec<AdminUser>, DomainError>;

    async fn record_api_log(&self, entry: &ApiLogEntry) -> Result<(), DomainError>;
    async fn record_event_log(&self, entry: &EventLogEntry) -> Result<(), DomainError>;
    async fn fetch_api_logs(&self) -> Result<Vec<ApiLogEntry>, DomainError>;
}
