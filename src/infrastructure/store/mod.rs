mod sqlite;

pub use sqlite::{DbPool, SqliteAdminStore};
