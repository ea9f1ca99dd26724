use chrono::Utc;
use sqlx::Row;

use super::SqliteStore;
use crate::repository::{ResponseStore, StorageError};

fn map_put_error(e: &sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = e {
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
    }
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl ResponseStore for SqliteStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO responses (key, value, stored_at)
                VALUES (?1, ?2, ?3)
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| map_put_error(&e))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT value FROM responses WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.map(|r| {
            r.try_get::<String, _>("value")
                .map_err(|e| StorageError::Serialization(e.to_string()))
        })
        .transpose()
    }
}
