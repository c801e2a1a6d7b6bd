//! Local persistence for session credentials.
//!
//! The token and the serialized user record form an atomic pair: a reader
//! must never observe one without the other, so both live in a single row
//! written in one transaction.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::models::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("User record (de)serialization failed: {0}")]
    UserJson(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub token: String,
    pub user: User,
}

pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    /// Open the store at `path`, creating the file and schema if needed.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::init(pool).await
    }

    /// Volatile store. Used by tests and hosts that opt out of persistence.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS credentials (
                 id INTEGER PRIMARY KEY CHECK (id = 1),
                 token TEXT NOT NULL,
                 user_json TEXT NOT NULL
             )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    /// Persist the token and user record together, replacing any previous
    /// pair.
    pub async fn save(&self, token: &str, user: &User) -> Result<(), StoreError> {
        let user_json = serde_json::to_string(user)?;
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM credentials")
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO credentials (id, token, user_json) VALUES (1, ?, ?)")
            .bind(token)
            .bind(&user_json)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// The stored pair, if any.
    pub async fn load(&self) -> Result<Option<StoredCredentials>, StoreError> {
        let row = sqlx::query("SELECT token, user_json FROM credentials WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;
        match row {
            None => Ok(None),
            Some(row) => {
                let token: String = row.get("token");
                let user_json: String = row.get("user_json");
                let user = serde_json::from_str(&user_json)?;
                Ok(Some(StoredCredentials { token, user }))
            }
        }
    }

    /// Remove any stored pair. Safe to call when nothing is stored.
    pub async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM credentials")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
