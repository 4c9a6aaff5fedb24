#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use manga_reader::models::{
    ApprovalStatus, Bookmark, Chapter, ChapterSummary, Manga, MangaStatus, PageRow,
    PendingChapter, PendingContent,
};
use manga_reader::remote::rest::AuthSession;
use manga_reader::remote::{RemoteError, RemoteResult, RemoteSource};
use manga_reader::state::ReaderContext;
use manga_reader::store::MemoryPositionStore;

pub fn manga_id(slug: &str) -> String {
    format!("m-{}", slug)
}

pub fn chapter_id(slug: &str, number: u32) -> String {
    format!("c-{}-{}", slug, number)
}

pub fn pending_id(slug: &str, number: u32) -> String {
    format!("p-{}-{}", slug, number)
}

/// In-memory backend double. Seed records with the builder methods, then
/// inspect recorded writes after the fact.
#[derive(Default)]
pub struct FakeRemote {
    manga: Vec<Manga>,
    approved: Vec<Chapter>,
    pages: HashMap<String, Vec<PageRow>>,
    pending: Vec<PendingChapter>,
    bookmarks: Mutex<Vec<Bookmark>>,
    upserts: Mutex<Vec<Bookmark>>,
    pub fail_manga_lookup: bool,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manga(mut self, slug: &str) -> Self {
        self.manga.push(Manga {
            id: manga_id(slug),
            slug: slug.to_string(),
            title: slug.replace('-', " "),
            status: MangaStatus::Ongoing,
            approval_status: ApprovalStatus::Approved,
            chapter_count: 0,
        });
        self
    }

    pub fn with_approved_chapter(
        mut self,
        slug: &str,
        number: u32,
        page_urls: Option<Vec<&str>>,
    ) -> Self {
        self.approved.push(Chapter {
            id: chapter_id(slug, number),
            manga_id: manga_id(slug),
            chapter_number: number,
            page_urls: page_urls.map(|urls| urls.into_iter().map(String::from).collect()),
            approval_status: ApprovalStatus::Approved,
        });
        self
    }

    pub fn with_side_pages(mut self, slug: &str, number: u32, urls: Vec<&str>) -> Self {
        let rows = urls
            .into_iter()
            .enumerate()
            .map(|(index, url)| PageRow {
                page_number: index as i64 + 1,
                page_url: url.to_string(),
            })
            .collect();
        self.pages.insert(chapter_id(slug, number), rows);
        self
    }

    pub fn with_pending_chapter(mut self, slug: &str, number: u32, pages: Vec<&str>) -> Self {
        self.pending.push(PendingChapter {
            id: pending_id(slug, number),
            manga_id: manga_id(slug),
            chapter_number: number,
            content: PendingContent {
                pages: pages.into_iter().map(String::from).collect(),
            },
        });
        self
    }

    pub fn with_bookmark(self, user_id: &str, slug: &str, chapter_number: u32, page: i64) -> Self {
        if let Ok(mut bookmarks) = self.bookmarks.lock() {
            bookmarks.push(Bookmark {
                user_id: user_id.to_string(),
                manga_id: manga_id(slug),
                chapter_id: chapter_id(slug, chapter_number),
                page_number: page,
                updated_at: Utc::now(),
            });
        }
        self
    }

    pub fn upserts(&self) -> Vec<Bookmark> {
        self.upserts.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RemoteSource for FakeRemote {
    async fn list_manga(&self) -> RemoteResult<Vec<Manga>> {
        Ok(self.manga.clone())
    }

    async fn manga_by_slug(&self, slug: &str) -> RemoteResult<Option<Manga>> {
        if self.fail_manga_lookup {
            return Err(RemoteError::Http("connection refused".to_string()));
        }
        Ok(self.manga.iter().find(|m| m.slug == slug).cloned())
    }

    async fn approved_chapter(
        &self,
        manga_id: &str,
        chapter_number: u32,
    ) -> RemoteResult<Option<Chapter>> {
        Ok(self
            .approved
            .iter()
            .find(|c| c.manga_id == manga_id && c.chapter_number == chapter_number)
            .cloned())
    }

    async fn chapter_pages(&self, chapter_id: &str) -> RemoteResult<Vec<PageRow>> {
        Ok(self.pages.get(chapter_id).cloned().unwrap_or_default())
    }

    async fn pending_chapter(
        &self,
        manga_id: &str,
        chapter_number: u32,
    ) -> RemoteResult<Option<PendingChapter>> {
        Ok(self
            .pending
            .iter()
            .find(|c| c.manga_id == manga_id && c.chapter_number == chapter_number)
            .cloned())
    }

    async fn approved_chapters(&self, manga_id: &str) -> RemoteResult<Vec<ChapterSummary>> {
        let mut summaries: Vec<ChapterSummary> = self
            .approved
            .iter()
            .filter(|c| c.manga_id == manga_id)
            .map(|c| ChapterSummary {
                id: c.id.clone(),
                chapter_number: c.chapter_number,
                pending: false,
            })
            .collect();
        summaries.sort_by_key(|c| c.chapter_number);
        Ok(summaries)
    }

    async fn pending_chapters(&self, manga_id: &str) -> RemoteResult<Vec<ChapterSummary>> {
        let mut summaries: Vec<ChapterSummary> = self
            .pending
            .iter()
            .filter(|c| c.manga_id == manga_id)
            .map(|c| ChapterSummary {
                id: c.id.clone(),
                chapter_number: c.chapter_number,
                pending: true,
            })
            .collect();
        summaries.sort_by_key(|c| c.chapter_number);
        Ok(summaries)
    }

    async fn bookmark(&self, user_id: &str, manga_id: &str) -> RemoteResult<Option<Bookmark>> {
        Ok(self
            .bookmarks
            .lock()
            .ok()
            .and_then(|bookmarks| {
                bookmarks
                    .iter()
                    .find(|b| b.user_id == user_id && b.manga_id == manga_id)
                    .cloned()
            }))
    }

    async fn upsert_bookmark(&self, bookmark: &Bookmark) -> RemoteResult<()> {
        if let Ok(mut upserts) = self.upserts.lock() {
            upserts.push(bookmark.clone());
        }
        if let Ok(mut bookmarks) = self.bookmarks.lock() {
            bookmarks.retain(|b| {
                !(b.user_id == bookmark.user_id && b.manga_id == bookmark.manga_id)
            });
            bookmarks.push(bookmark.clone());
        }
        Ok(())
    }
}

/// Reference catalog: `test-manga` with approved chapters 1-3, chapter 2
/// carrying five inline pages.
pub fn test_manga_remote() -> FakeRemote {
    FakeRemote::new()
        .with_manga("test-manga")
        .with_approved_chapter("test-manga", 1, Some(vec!["1-1.jpg", "1-2.jpg"]))
        .with_approved_chapter(
            "test-manga",
            2,
            Some(vec!["2-1.jpg", "2-2.jpg", "2-3.jpg", "2-4.jpg", "2-5.jpg"]),
        )
        .with_approved_chapter("test-manga", 3, Some(vec!["3-1.jpg", "3-2.jpg"]))
}

pub fn viewer() -> AuthSession {
    AuthSession {
        user_id: "user-1".to_string(),
        access_token: "token".to_string(),
    }
}

/// Context around a fake backend, anonymous reading enabled.
pub fn anonymous_context(remote: Arc<FakeRemote>) -> ReaderContext {
    let mut ctx = ReaderContext::new(remote, Arc::new(MemoryPositionStore::new()));
    ctx.allow_anonymous = true;
    ctx
}

/// Context with a signed-in viewer, so bookmark sync is active.
pub fn authed_context(remote: Arc<FakeRemote>) -> ReaderContext {
    ReaderContext::new(remote, Arc::new(MemoryPositionStore::new())).with_viewer(viewer())
}
