pub mod memory;
pub mod preferences;
pub mod sqlite;

pub use memory::MemoryPositionStore;
pub use sqlite::SqlitePositionStore;

use async_trait::async_trait;

/// Device-local recall of the last-viewed page per (manga, chapter),
/// independent of authentication state.
///
/// Entries have no expiry and no size bound: one row per chapter ever
/// read, kept forever, matching the platform's original behavior. Whether
/// that growth eventually needs an eviction policy is an open question
/// deliberately left open here.
#[async_trait]
pub trait PositionStore: Send + Sync {
    /// Best-effort overwrite. Storage failures are swallowed (and logged);
    /// reading continues without resume capability.
    async fn save(&self, manga_id: &str, chapter_number: u32, page_index: usize);

    /// Returns `None` when never saved or when the stored value is
    /// unreadable. A corrupt entry is treated as absent, not as an error.
    async fn load(&self, manga_id: &str, chapter_number: u32) -> Option<usize>;
}
