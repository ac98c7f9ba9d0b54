//! SQLite-backed account storage.
//!
//! One table, `users`, holding a unique username and its bcrypt hash. The
//! table is created on first connect.

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

const USERS_TABLE: &str = "users";

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Open (creating if missing) the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<UserStore, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        info!(%database_url, "Connected to accounts database");
        UserStore::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the `users` table if needed.
    pub async fn from_pool(pool: SqlitePool) -> Result<UserStore, AppError> {
        let store = UserStore { pool };
        if !store.is_table_exists(USERS_TABLE).await? {
            store.create_users_table().await?;
        }
        Ok(store)
    }

    async fn is_table_exists(&self, table_name: &str) -> Result<bool, sqlx::Error> {
        Ok(
            sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
                .bind(table_name)
                .fetch_optional(&self.pool)
                .await?
                .is_some(),
        )
    }

    async fn create_users_table(&self) -> Result<(), sqlx::Error> {
        let query = format!(
            r#"
                CREATE TABLE {USERS_TABLE} (
                    id INTEGER PRIMARY KEY,
                    username TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL
                )
            "#
        );
        sqlx::query(&query).execute(&self.pool).await?;
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS ix_users_username ON {USERS_TABLE} (username)"
        ))
        .execute(&self.pool)
        .await?;
        debug!("Created {}", USERS_TABLE);
        Ok(())
    }

    pub async fn find(&self, username: &str) -> Result<Option<User>, AppError> {
        let query = format!("SELECT id, username, password_hash FROM {USERS_TABLE} WHERE username = ?");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn insert(&self, username: &str, password_hash: &str) -> Result<(), AppError> {
        let query = format!("INSERT INTO {USERS_TABLE} (username, password_hash) VALUES (?, ?)");
        sqlx::query(&query)
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
