use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    pub id: Uuid,
    pub name: String,
    pub greeting: String,
    pub is_active: bool,
    pub date_created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl BotSettings {
    pub fn new(name: impl Into<String>, greeting: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            greeting: greeting.into(),
            is_active: false,
            date_created: now,
            last_updated: now,
        }
    }

    pub fn activated(mut self) -> Self {
        self.is_active = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub email: String,
    /// Plaintext credential, compared verbatim in the login filter. Never
    /// serialized out of the listing endpoints.
    #[serde(skip_serializing)]
    pub password: String,
    pub fname: String,
    pub lname: String,
    pub date_added: DateTime<Utc>,
    pub access: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiLogEntry {
    pub method: String,
    pub endpoint: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
    /// Dropped from listings, mirroring the fetch projection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub severity: String,
    pub text_payload: String,
    pub source: String,
}

impl EventLogEntry {
    pub fn new(
        severity: impl Into<String>,
        text_payload: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            severity: severity.into(),
            text_payload: text_payload.into(),
            source: source.into(),
        }
    }
}
