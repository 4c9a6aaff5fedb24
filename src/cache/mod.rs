use moka::future::Cache;
use std::time::Duration;

use crate::models::ChapterSummary;

/// Memo of the merged chapter list per manga id, so previous/next
/// navigation within a session does not refetch both chapter sets.
pub struct ChapterListCache {
    cache: Cache<String, Vec<ChapterSummary>>,
}

impl ChapterListCache {
    pub fn new() -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(5 * 60))
            .build();
        Self { cache }
    }

    pub async fn get(&self, manga_id: &str) -> Option<Vec<ChapterSummary>> {
        self.cache.get(manga_id).await
    }

    pub async fn set(&self, manga_id: &str, chapters: Vec<ChapterSummary>) {
        self.cache.insert(manga_id.to_string(), chapters).await;
    }
}

impl Default for ChapterListCache {
    fn default() -> Self {
        Self::new()
    }
}
