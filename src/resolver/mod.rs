pub mod page_source;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::cache::ChapterListCache;
use crate::models::{ChapterSummary, Manga};
use crate::remote::{RemoteResult, RemoteSource};
use crate::resolver::page_source::{default_chain, ChapterRecord, PageSource};

#[derive(Debug)]
pub enum ResolveError {
    InvalidChapterNumber(String),
    MangaNotFound(String),
    ChapterNotFound { slug: String, chapter_number: u32 },
    NoPagesAvailable { slug: String, chapter_number: u32 },
    AuthenticationRequired,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::InvalidChapterNumber(raw) => {
                write!(f, "Invalid chapter number: {}", raw)
            }
            ResolveError::MangaNotFound(slug) => write!(f, "Manga not found: {}", slug),
            ResolveError::ChapterNotFound {
                slug,
                chapter_number,
            } => write!(f, "Chapter {} of {} not found", chapter_number, slug),
            ResolveError::NoPagesAvailable {
                slug,
                chapter_number,
            } => write!(
                f,
                "Chapter {} of {} has no pages available",
                chapter_number, slug
            ),
            ResolveError::AuthenticationRequired => write!(f, "Sign in to start reading"),
        }
    }
}

impl std::error::Error for ResolveError {}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// A chapter normalized for the reading session, whichever set it came
/// from.
#[derive(Debug, Clone)]
pub struct ResolvedChapter {
    pub manga: Manga,
    pub chapter_id: String,
    pub chapter_number: u32,
    pub pending: bool,
    pub pages: Vec<String>,
    pub chapter_list: Vec<ChapterSummary>,
}

/// Normalizes a (slug, chapter number) pair into a uniform page list,
/// trying the approved set before the pending set and walking an ordered
/// chain of page sources.
///
/// A remote failure surfaces as the typed condition of the stage it
/// interrupted, with the cause logged; no retry is ever attempted.
pub struct ChapterResolver {
    remote: Arc<dyn RemoteSource>,
    sources: Vec<Box<dyn PageSource>>,
    chapter_lists: ChapterListCache,
}

impl ChapterResolver {
    pub fn new(remote: Arc<dyn RemoteSource>) -> Self {
        Self {
            remote,
            sources: default_chain(),
            chapter_lists: ChapterListCache::new(),
        }
    }

    pub fn parse_chapter_number(raw: &str) -> ResolveResult<u32> {
        raw.trim()
            .parse::<u32>()
            .ok()
            .filter(|number| *number > 0)
            .ok_or_else(|| ResolveError::InvalidChapterNumber(raw.to_string()))
    }

    pub async fn resolve(&self, slug: &str, raw_chapter: &str) -> ResolveResult<ResolvedChapter> {
        let chapter_number = Self::parse_chapter_number(raw_chapter)?;

        let manga = self
            .remote
            .manga_by_slug(slug)
            .await
            .map_err(|e| {
                tracing::warn!("Manga lookup failed for '{}': {}", slug, e);
                ResolveError::MangaNotFound(slug.to_string())
            })?
            .ok_or_else(|| ResolveError::MangaNotFound(slug.to_string()))?;

        let record = self
            .chapter_record(&manga, chapter_number)
            .await
            .map_err(|e| {
                tracing::warn!(
                    "Chapter lookup failed for '{}' chapter {}: {}",
                    slug,
                    chapter_number,
                    e
                );
                ResolveError::ChapterNotFound {
                    slug: slug.to_string(),
                    chapter_number,
                }
            })?
            .ok_or(ResolveError::ChapterNotFound {
                slug: slug.to_string(),
                chapter_number,
            })?;

        let pages = self
            .page_list(&record)
            .await
            .map_err(|e| {
                tracing::warn!(
                    "Page fetch failed for '{}' chapter {}: {}",
                    slug,
                    chapter_number,
                    e
                );
                ResolveError::NoPagesAvailable {
                    slug: slug.to_string(),
                    chapter_number,
                }
            })?
            .ok_or(ResolveError::NoPagesAvailable {
                slug: slug.to_string(),
                chapter_number,
            })?;

        let chapter_list = self.chapter_list(&manga.id).await.map_err(|e| {
            tracing::warn!("Chapter list fetch failed for '{}': {}", slug, e);
            ResolveError::ChapterNotFound {
                slug: slug.to_string(),
                chapter_number,
            }
        })?;

        Ok(ResolvedChapter {
            chapter_id: record.id().to_string(),
            chapter_number: record.chapter_number(),
            pending: record.is_pending(),
            manga,
            pages,
            chapter_list,
        })
    }

    /// The approved record always wins over a pending one for the same
    /// chapter number.
    async fn chapter_record(
        &self,
        manga: &Manga,
        chapter_number: u32,
    ) -> RemoteResult<Option<ChapterRecord>> {
        if let Some(chapter) = self
            .remote
            .approved_chapter(&manga.id, chapter_number)
            .await?
        {
            return Ok(Some(ChapterRecord::Approved(chapter)));
        }

        Ok(self
            .remote
            .pending_chapter(&manga.id, chapter_number)
            .await?
            .map(ChapterRecord::Pending))
    }

    async fn page_list(&self, record: &ChapterRecord) -> RemoteResult<Option<Vec<String>>> {
        for source in &self.sources {
            if let Some(pages) = source.page_list(self.remote.as_ref(), record).await? {
                tracing::debug!("Resolved {} page(s) via {}", pages.len(), source.name());
                return Ok(Some(pages));
            }
        }

        Ok(None)
    }

    /// Merged navigation list: approved plus pending chapters, sorted by
    /// chapter number, memoized per manga.
    pub async fn chapter_list(&self, manga_id: &str) -> RemoteResult<Vec<ChapterSummary>> {
        if let Some(cached) = self.chapter_lists.get(manga_id).await {
            return Ok(cached);
        }

        let approved = self.remote.approved_chapters(manga_id).await?;
        let pending = self.remote.pending_chapters(manga_id).await?;
        let merged = merge_chapter_lists(approved, pending);

        self.chapter_lists.set(manga_id, merged.clone()).await;

        Ok(merged)
    }
}

/// Approved entries win a chapter-number collision with pending ones.
fn merge_chapter_lists(
    approved: Vec<ChapterSummary>,
    pending: Vec<ChapterSummary>,
) -> Vec<ChapterSummary> {
    let taken: HashSet<u32> = approved.iter().map(|c| c.chapter_number).collect();

    let mut merged = approved;
    merged.extend(
        pending
            .into_iter()
            .filter(|c| !taken.contains(&c.chapter_number)),
    );
    merged.sort_by_key(|c| c.chapter_number);
    merged
}

/// Initial page index for a session: a valid 1-based page request wins,
/// then the restored local position clamped into range, then 0.
pub fn initial_index(
    requested_page: Option<u32>,
    restored: Option<usize>,
    page_count: usize,
) -> usize {
    if let Some(page) = requested_page {
        if page >= 1 && (page as usize) <= page_count {
            return page as usize - 1;
        }
    }

    match restored {
        Some(index) => index.min(page_count.saturating_sub(1)),
        None => 0,
    }
}
