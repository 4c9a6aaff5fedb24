pub mod controls;
pub mod input;

use std::sync::Arc;
use std::time::Instant;

use crate::models::{ChapterSummary, Manga};
use crate::resolver::{self, ResolveError};
use crate::route::ReadRoute;
use crate::session::controls::ControlVisibility;
use crate::state::ReaderContext;
use crate::store::PositionStore;
use crate::sync::BookmarkSync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingMode {
    /// Continuous vertical scroll with every page mounted.
    Webtoon,
    /// One page at a time with explicit navigation.
    Manga,
}

impl ReadingMode {
    pub fn as_name(self) -> &'static str {
        match self {
            ReadingMode::Webtoon => "webtoon",
            ReadingMode::Manga => "manga",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "webtoon" => Some(ReadingMode::Webtoon),
            "manga" => Some(ReadingMode::Manga),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ReadingMode::Webtoon => ReadingMode::Manga,
            ReadingMode::Manga => ReadingMode::Webtoon,
        }
    }
}

/// Where a page turn leaves the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    /// Re-enter the resolver for this chapter, landing on its first page.
    Chapter(u32),
}

/// Scroll geometry of the webtoon viewport, in whatever unit the front
/// end renders in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollState {
    pub top: f64,
    pub height: f64,
    pub viewport: f64,
}

/// The controller of an active reading view: current page, reading mode,
/// progress, and control visibility, with write-through persistence of
/// every page change.
pub struct ReadingSession {
    manga: Manga,
    chapter_id: String,
    chapter_number: u32,
    pending: bool,
    pages: Vec<String>,
    chapter_list: Vec<ChapterSummary>,
    mode: ReadingMode,
    page_index: usize,
    scroll: ScrollState,
    pub controls: ControlVisibility,
    store: Arc<dyn PositionStore>,
    sync: Option<BookmarkSync>,
}

impl std::fmt::Debug for ReadingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadingSession")
            .field("manga", &self.manga)
            .field("chapter_id", &self.chapter_id)
            .field("chapter_number", &self.chapter_number)
            .field("pending", &self.pending)
            .field("pages", &self.pages)
            .field("chapter_list", &self.chapter_list)
            .field("mode", &self.mode)
            .field("page_index", &self.page_index)
            .field("scroll", &self.scroll)
            .field("controls", &self.controls)
            .field("sync", &self.sync.is_some())
            .finish()
    }
}

impl ReadingSession {
    /// Enter a reading session for a route. Unauthenticated viewers are
    /// refused before any fetch unless anonymous reading is enabled;
    /// anonymous sessions keep local resume but never sync bookmarks.
    pub async fn open(
        ctx: &ReaderContext,
        route: &ReadRoute,
        mode: ReadingMode,
    ) -> Result<Self, ResolveError> {
        if ctx.viewer.is_none() && !ctx.allow_anonymous {
            return Err(ResolveError::AuthenticationRequired);
        }

        let resolved = ctx.resolver.resolve(&route.slug, &route.chapter).await?;

        let restored = ctx
            .positions
            .load(&resolved.manga.id, resolved.chapter_number)
            .await;
        let page_index = resolver::initial_index(route.page, restored, resolved.pages.len());

        let sync = ctx.viewer.as_ref().map(|viewer| {
            BookmarkSync::new(Arc::clone(&ctx.remote), &viewer.user_id, ctx.sync_quiet)
        });

        Ok(Self {
            manga: resolved.manga,
            chapter_id: resolved.chapter_id,
            chapter_number: resolved.chapter_number,
            pending: resolved.pending,
            pages: resolved.pages,
            chapter_list: resolved.chapter_list,
            mode,
            page_index,
            scroll: ScrollState::default(),
            controls: ControlVisibility::new(ctx.controls_hide_after, Instant::now()),
            store: Arc::clone(&ctx.positions),
            sync,
        })
    }

    pub fn manga(&self) -> &Manga {
        &self.manga
    }

    pub fn chapter_number(&self) -> u32 {
        self.chapter_number
    }

    /// True iff the resolved chapter came from the pending set.
    pub fn pending_banner(&self) -> bool {
        self.pending
    }

    pub fn mode(&self) -> ReadingMode {
        self.mode
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn current_page_url(&self) -> &str {
        &self.pages[self.page_index]
    }

    pub fn chapter_list(&self) -> &[ChapterSummary] {
        &self.chapter_list
    }

    /// Forward one page, or cross into the next chapter at its first
    /// page. No-op on the last page of the last chapter.
    pub async fn advance(&mut self) -> Navigation {
        if self.page_index + 1 < self.pages.len() {
            self.set_page(self.page_index + 1).await;
            return Navigation::Stay;
        }

        match self.next_chapter() {
            Some(next) => Navigation::Chapter(next),
            None => Navigation::Stay,
        }
    }

    /// Back one page, or cross into the previous chapter. The landing
    /// page is the chapter start, not its end.
    pub async fn retreat(&mut self) -> Navigation {
        if self.page_index > 0 {
            self.set_page(self.page_index - 1).await;
            return Navigation::Stay;
        }

        match self.previous_chapter() {
            Some(previous) => Navigation::Chapter(previous),
            None => Navigation::Stay,
        }
    }

    /// Direct jump, clamped into the page range.
    pub async fn jump_to(&mut self, index: usize) {
        let clamped = index.min(self.pages.len().saturating_sub(1));
        self.set_page(clamped).await;
    }

    fn next_chapter(&self) -> Option<u32> {
        self.chapter_list
            .iter()
            .map(|c| c.chapter_number)
            .filter(|n| *n > self.chapter_number)
            .min()
    }

    fn previous_chapter(&self) -> Option<u32> {
        self.chapter_list
            .iter()
            .map(|c| c.chapter_number)
            .filter(|n| *n < self.chapter_number)
            .max()
    }

    async fn set_page(&mut self, index: usize) {
        self.page_index = index;

        self.store
            .save(&self.manga.id, self.chapter_number, index)
            .await;

        if let Some(sync) = &self.sync {
            sync.schedule(&self.manga.id, &self.chapter_id, index as i64 + 1);
        }
    }

    /// Switching modes never resets the current page.
    pub fn toggle_mode(&mut self) -> ReadingMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    pub fn set_mode(&mut self, mode: ReadingMode) {
        self.mode = mode;
    }

    /// Progress in percent. Webtoon progress follows the scroll geometry
    /// and is recomputed on every scroll event the front end reports —
    /// per-event recomputation is the platform's literal contract, so any
    /// throttling is left to the caller.
    pub fn progress(&self) -> f64 {
        match self.mode {
            ReadingMode::Manga => {
                (self.page_index + 1) as f64 / self.pages.len() as f64 * 100.0
            }
            ReadingMode::Webtoon => {
                if self.scroll.height <= 0.0 {
                    return 0.0;
                }
                let scrollable = self.scroll.height - self.scroll.viewport;
                if scrollable <= 0.0 {
                    return 100.0;
                }
                (self.scroll.top / scrollable * 100.0).clamp(0.0, 100.0)
            }
        }
    }

    /// Webtoon-mode scroll report. The current page follows the scroll
    /// fraction, with the usual write-through side effects when it moves.
    pub async fn update_scroll(&mut self, top: f64, height: f64, viewport: f64) {
        self.scroll = ScrollState {
            top,
            height,
            viewport,
        };

        if self.mode != ReadingMode::Webtoon || self.pages.is_empty() {
            return;
        }

        let fraction = (self.progress() / 100.0).clamp(0.0, 1.0);
        let derived =
            ((fraction * self.pages.len() as f64) as usize).min(self.pages.len() - 1);

        if derived != self.page_index {
            self.set_page(derived).await;
        }
    }

    /// Session teardown: cancel the debounced bookmark write so nothing
    /// lands after the view is gone.
    pub fn teardown(&mut self) {
        if let Some(sync) = &self.sync {
            sync.cancel();
        }
    }
}
