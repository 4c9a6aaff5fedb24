pub mod http_client;
pub mod rest;

use std::fmt;

use async_trait::async_trait;

use crate::models::{Bookmark, Chapter, ChapterSummary, Manga, PageRow, PendingChapter};

#[derive(Debug)]
pub enum RemoteError {
    Http(String),
    Decode(String),
    Unauthorized(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Http(msg) => write!(f, "HTTP error: {}", msg),
            RemoteError::Decode(msg) => write!(f, "Decode error: {}", msg),
            RemoteError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Query surface of the hosted backend, as far as this client consumes it.
/// Storage, auth, and moderation all live behind this boundary.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn list_manga(&self) -> RemoteResult<Vec<Manga>>;

    async fn manga_by_slug(&self, slug: &str) -> RemoteResult<Option<Manga>>;

    async fn approved_chapter(
        &self,
        manga_id: &str,
        chapter_number: u32,
    ) -> RemoteResult<Option<Chapter>>;

    /// Side-table fallback for approved chapters, ordered by page_number.
    async fn chapter_pages(&self, chapter_id: &str) -> RemoteResult<Vec<PageRow>>;

    /// Only chapters still in `pending` moderation state.
    async fn pending_chapter(
        &self,
        manga_id: &str,
        chapter_number: u32,
    ) -> RemoteResult<Option<PendingChapter>>;

    async fn approved_chapters(&self, manga_id: &str) -> RemoteResult<Vec<ChapterSummary>>;

    async fn pending_chapters(&self, manga_id: &str) -> RemoteResult<Vec<ChapterSummary>>;

    async fn bookmark(&self, user_id: &str, manga_id: &str) -> RemoteResult<Option<Bookmark>>;

    async fn upsert_bookmark(&self, bookmark: &Bookmark) -> RemoteResult<()>;
}
