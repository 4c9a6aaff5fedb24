use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The remote last-read record, upserted per `(user_id, manga_id)`.
/// `page_number` is 1-based, matching the platform's deep-link pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub user_id: String,
    pub manga_id: String,
    pub chapter_id: String,
    pub page_number: i64,
    pub updated_at: DateTime<Utc>,
}
