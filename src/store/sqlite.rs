use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::store::PositionStore;

/// SQLite-backed position store. Keys follow the platform's
/// `reading_position_{manga_id}_{chapter_number}` format.
pub struct SqlitePositionStore {
    pool: SqlitePool,
}

impl SqlitePositionStore {
    pub async fn open(db_url: &str) -> Result<Self> {
        let pool = init_db(db_url).await?;
        Ok(Self { pool })
    }

    /// The preference table shares this database.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn make_key(manga_id: &str, chapter_number: u32) -> String {
        format!("reading_position_{}_{}", manga_id, chapter_number)
    }
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    let db_path = db_url.trim_start_matches("sqlite:");
    if let Some(parent) = Path::new(db_path).parent() {
        fs::create_dir_all(parent)?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(
            sqlx::sqlite::SqliteConnectOptions::from_str(db_url)?.create_if_missing(true),
        )
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

#[async_trait]
impl PositionStore for SqlitePositionStore {
    async fn save(&self, manga_id: &str, chapter_number: u32, page_index: usize) {
        let key = Self::make_key(manga_id, chapter_number);

        let result = sqlx::query(
            "INSERT OR REPLACE INTO reading_position (key, value, updated_at)
             VALUES (?, ?, CURRENT_TIMESTAMP)",
        )
        .bind(&key)
        .bind(page_index.to_string())
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!("Failed to persist reading position {}: {}", key, e);
        }
    }

    async fn load(&self, manga_id: &str, chapter_number: u32) -> Option<usize> {
        let key = Self::make_key(manga_id, chapter_number);

        let result =
            sqlx::query_scalar::<_, String>("SELECT value FROM reading_position WHERE key = ?")
                .bind(&key)
                .fetch_optional(&self.pool)
                .await;

        match result {
            Ok(Some(value)) => match value.parse::<usize>() {
                Ok(index) => Some(index),
                Err(_) => {
                    tracing::warn!("Corrupt reading position {}: {:?}", key, value);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Unreadable reading position {}: {}", key, e);
                None
            }
        }
    }
}
