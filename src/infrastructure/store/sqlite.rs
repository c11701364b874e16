use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use crate::domain::{
    ports::AdminStore, AdminUser, ApiLogEntry, BotSettings, DomainError, EventLogEntry,
};

pub type DbPool = Pool<Sqlite>;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS bot_settings (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        greeting TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 0,
        date_created TEXT NOT NULL,
        last_updated TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS admin_users (
        email TEXT PRIMARY KEY,
        password TEXT NOT NULL,
        fname TEXT NOT NULL,
        lname TEXT NOT NULL,
        date_added TEXT NOT NULL,
        access TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS api_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        method TEXT NOT NULL,
        endpoint TEXT NOT NULL,
        status INTEGER NOT NULL,
        timestamp TEXT NOT NULL,
        ip TEXT
    )",
    "CREATE TABLE IF NOT EXISTS event_logs (
        id TEXT PRIMARY KEY,
        timestamp TEXT NOT NULL,
        severity TEXT NOT NULL,
        text_payload TEXT NOT NULL,
        source TEXT NOT NULL
    )",
];

#[derive(Debug, Clone)]
pub struct SqliteAdminStore {
    pool: DbPool,
}

impl SqliteAdminStore {
    pub async fn new(database_path: &str) -> Result<Self, DomainError> {
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Private in-memory database; a single connection, since each SQLite
    /// in-memory connection would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self, DomainError> {
        let options = SqliteConnectOptions::new().in_memory(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), DomainError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(e.to_string()))?;
        }
        Ok(())
    }
}

fn storage_err(e: sqlx::Error) -> DomainError {
    DomainError::storage(e.to_string())
}

fn settings_from_row(row: &SqliteRow) -> Result<BotSettings, DomainError> {
    let id: String = row.try_get("id").map_err(storage_err)?;

    Ok(BotSettings {
        id: Uuid::parse_str(&id).map_err(|e| DomainError::storage(e.to_string()))?,
        name: row.try_get("name").map_err(storage_err)?,
        greeting: row.try_get("greeting").map_err(storage_err)?,
        is_active: row.try_get("is_active").map_err(storage_err)?,
        date_created: row.try_get("date_created").map_err(storage_err)?,
        last_updated: row.try_get("last_updated").map_err(storage_err)?,
    })
}

fn user_from_row(row: &SqliteRow) -> Result<AdminUser, DomainError> {
    let access_raw: String = row.try_get("access").map_err(storage_err)?;
    let access = serde_json::from_str(&access_raw)
        .map_err(|e| DomainError::storage(e.to_string()))?;

    Ok(AdminUser {
        email: row.try_get("email").map_err(storage_err)?,
        password: row.try_get("password").map_err(storage_err)?,
        fname: row.try_get("fname").map_err(storage_err)?,
        lname: row.try_get("lname").map_err(storage_err)?,
        date_added: row.try_get("date_added").map_err(storage_err)?,
        access,
    })
}

#[async_trait]
impl AdminStore for SqliteAdminStore {
    async fn list_settings(&self) -> Result<Vec<BotSettings>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, name, greeting, is_active, date_created, last_updated
             FROM bot_settings ORDER BY date_created DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter().map(settings_from_row).collect()
    }

    async fn active_settings(&self) -> Result<Option<BotSettings>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, greeting, is_active, date_created, last_updated
             FROM bot_settings WHERE is_active = 1 LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.as_ref().map(settings_from_row).transpose()
    }

    async fn insert_settings(&self, settings: &BotSettings) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO bot_settings (id, name, greeting, is_active, date_created, last_updated)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(settings.id.to_string())
        .bind(&settings.name)
        .bind(&settings.greeting)
        .bind(settings.is_active)
        .bind(settings.date_created)
        .bind(settings.last_updated)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn upsert_settings(&self, settings: &BotSettings) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO bot_settings (id, name, greeting, is_active, date_created, last_updated)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 greeting = excluded.greeting,
                 is_active = excluded.is_active,
                 last_updated = excluded.last_updated",
        )
        .bind(settings.id.to_string())
        .bind(&settings.name)
        .bind(&settings.greeting)
        .bind(settings.is_active)
        .bind(settings.date_created)
        .bind(settings.last_updated)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn get_settings(&self, id: Uuid) -> Result<Option<BotSettings>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, greeting, is_active, date_created, last_updated
             FROM bot_settings WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.as_ref().map(settings_from_row).transpose()
    }

    async fn verify_login(&self, email: &str, password: &str) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM admin_users WHERE email = ? AND password = ?",
        )
        .bind(email)
        .bind(password)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(count > 0)
    }

    async fn insert_user(&self, user: &AdminUser) -> Result<(), DomainError> {
        let access = serde_json::to_string(&user.access)
            .map_err(|e| DomainError::internal(e.to_string()))?;

        sqlx::query(
            "INSERT INTO admin_users (email, password, fname, lname, date_added, access)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.fname)
        .bind(&user.lname)
        .bind(user.date_added)
        .bind(access)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<AdminUser>, DomainError> {
        let rows = sqlx::query(
            "SELECT email, password, fname, lname, date_added, access
             FROM admin_users ORDER BY date_added",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter().map(user_from_row).collect()
    }

    async fn record_api_log(&self, entry: &ApiLogEntry) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO api_logs (method, endpoint, status, timestamp, ip)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&entry.method)
        .bind(&entry.endpoint)
        .bind(i64::from(entry.status))
        .bind(entry.timestamp)
        .bind(&entry.ip)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn record_event_log(&self, entry: &EventLogEntry) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO event_logs (id, timestamp, severity, text_payload, source)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(entry.id.to_string())
        .bind(entry.timestamp)
        .bind(&entry.severity)
        .bind(&entry.text_payload)
        .bind(&entry.source)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    /// Listings drop the source IP, mirroring the dashboard's projection.
    async fn fetch_api_logs(&self) -> Result<Vec<ApiLogEntry>, DomainError> {
        let rows = sqlx::query(
            "SELECT method, endpoint, status, timestamp
             FROM api_logs ORDER BY timestamp DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter()
            .map(|row| {
                let status: i64 = row.try_get("status").map_err(storage_err)?;
                let timestamp: DateTime<Utc> = row.try_get("timestamp").map_err(storage_err)?;

                Ok(ApiLogEntry {
                    method: row.try_get("method").map_err(storage_err)?,
                    endpoint: row.try_get("endpoint").map_err(storage_err)?,
                    status: u16::try_from(status)
                        .map_err(|_| DomainError::storage("status out of range"))?,
                    timestamp,
                    ip: None,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settings_insert_list_and_active_filter() {
        let store = SqliteAdminStore::in_memory().await.unwrap();

        let inactive = BotSettings::new("draft bot", "hello");
        let active = BotSettings::new("live bot", "welcome").activated();

        store.insert_settings(&inactive).await.unwrap();
        store.insert_settings(&active).await.unwrap();

        let all = store.list_settings().await.unwrap();
        assert_eq!(all.len(), 2);

        let current = store.active_settings().await.unwrap().unwrap();
        assert_eq!(current.name, "live bot");
        assert!(current.is_active);
    }

    #[tokio::test]
    async fn test_upsert_updates_existing_settings() {
        let store = SqliteAdminStore::in_memory().await.unwrap();

        let mut settings = BotSettings::new("bot", "hi");
        store.insert_settings(&settings).await.unwrap();

        settings.name = "renamed bot".to_string();
        settings.last_updated = Utc::now();
        store.upsert_settings(&settings).await.unwrap();

        let fetched = store.get_settings(settings.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "renamed bot");
        assert_eq!(store.list_settings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_login_matches_exact_credentials() {
        let store = SqliteAdminStore::in_memory().await.unwrap();

        let user = AdminUser {
            email: "admin@example.com".to_string(),
            password: "hunter2".to_string(),
            fname: "Ada".to_string(),
            lname: "Admin".to_string(),
            date_added: Utc::now(),
            access: vec!["logs".to_string(), "settings".to_string()],
        };
        store.insert_user(&user).await.unwrap();

        assert!(store
            .verify_login("admin@example.com", "hunter2")
            .await
            .unwrap());
        assert!(!store
            .verify_login("admin@example.com", "wrong")
            .await
            .unwrap());
        assert!(!store.verify_login("nobody@example.com", "hunter2").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_users_round_trips_access_list() {
        let store = SqliteAdminStore::in_memory().await.unwrap();

        let user = AdminUser {
            email: "admin@example.com".to_string(),
            password: "hunter2".to_string(),
            fname: "Ada".to_string(),
            lname: "Admin".to_string(),
            date_added: Utc::now(),
            access: vec!["logs".to_string()],
        };
        store.insert_user(&user).await.unwrap();

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].access, vec!["logs".to_string()]);
    }

    #[tokio::test]
    async fn test_api_log_listing_redacts_ip() {
        let store = SqliteAdminStore::in_memory().await.unwrap();

        store
            .record_api_log(&ApiLogEntry {
                method: "POST".to_string(),
                endpoint: "/api/chat".to_string(),
                status: 200,
                timestamp: Utc::now(),
                ip: Some("203.0.113.9".to_string()),
            })
            .await
            .unwrap();

        let logs = store.fetch_api_logs().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].endpoint, "/api/chat");
        assert!(logs[0].ip.is_none());
    }

    #[tokio::test]
    async fn test_event_log_recorded() {
        let store = SqliteAdminStore::in_memory().await.unwrap();

        let entry = EventLogEntry::new("info", "chatbot initialized", "api");
        store.record_event_log(&entry).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_logs")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
