use anyhow::Result;
use sqlx::{Row, SqlitePool};

/// Get a preference value as String, returning the default if not set
pub async fn get_preference_string(pool: &SqlitePool, key: &str, default: &str) -> Result<String> {
    let result = sqlx::query("SELECT value FROM preference WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match result {
        Some(row) => {
            let value: String = row.get("value");
            Ok(value)
        }
        None => Ok(default.to_string()),
    }
}

pub async fn set_preference(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query("INSERT OR REPLACE INTO preference (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;

    Ok(())
}
