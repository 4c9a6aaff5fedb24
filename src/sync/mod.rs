use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::models::Bookmark;
use crate::remote::RemoteSource;

/// Debounced write path for the remote bookmark.
///
/// Each schedule cancels the previously pending write and replaces it, so
/// only the position still current after the quiet period is sent
/// (last-write-wins, never a queue). Write failures are logged and not
/// surfaced; the bookmark is a convenience, not correctness-critical.
pub struct BookmarkSync {
    remote: Arc<dyn RemoteSource>,
    user_id: String,
    quiet: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl BookmarkSync {
    pub fn new(remote: Arc<dyn RemoteSource>, user_id: &str, quiet: Duration) -> Self {
        Self {
            remote,
            user_id: user_id.to_string(),
            quiet,
            pending: Mutex::new(None),
        }
    }

    /// Schedule an upsert of `(manga, chapter, page)` after the quiet
    /// period. `page_number` is 1-based, as stored remotely.
    pub fn schedule(&self, manga_id: &str, chapter_id: &str, page_number: i64) {
        let bookmark = Bookmark {
            user_id: self.user_id.clone(),
            manga_id: manga_id.to_string(),
            chapter_id: chapter_id.to_string(),
            page_number,
            updated_at: Utc::now(),
        };

        let remote = Arc::clone(&self.remote);
        let quiet = self.quiet;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            if let Err(e) = remote.upsert_bookmark(&bookmark).await {
                tracing::warn!(
                    "Failed to sync bookmark for manga {}: {}",
                    bookmark.manga_id,
                    e
                );
            }
        });

        if let Ok(mut pending) = self.pending.lock() {
            if let Some(previous) = pending.replace(handle) {
                previous.abort();
            }
        }
    }

    /// Cancel any pending write. Must run on session teardown so no timer
    /// or write survives the session.
    pub fn cancel(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(previous) = pending.take() {
                previous.abort();
            }
        }
    }
}

impl Drop for BookmarkSync {
    fn drop(&mut self) {
        self.cancel();
    }
}
