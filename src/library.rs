use crate::remote::RemoteSource;
use crate::resolver::ResolveError;
use crate::route::ReadRoute;
use crate::state::ReaderContext;

/// The route to resume reading a manga: the viewer's remote bookmark if
/// one exists, otherwise the first chapter of the merged list.
///
/// This is the bookmark's single read path — it is consulted once when a
/// manga detail view loads and never again during the session. A failed
/// bookmark read degrades to starting from the first chapter.
pub async fn continue_route(ctx: &ReaderContext, slug: &str) -> Result<ReadRoute, ResolveError> {
    if ctx.viewer.is_none() && !ctx.allow_anonymous {
        return Err(ResolveError::AuthenticationRequired);
    }

    let manga = ctx
        .remote
        .manga_by_slug(slug)
        .await
        .map_err(|e| {
            tracing::warn!("Manga lookup failed for '{}': {}", slug, e);
            ResolveError::MangaNotFound(slug.to_string())
        })?
        .ok_or_else(|| ResolveError::MangaNotFound(slug.to_string()))?;

    let chapters = ctx.resolver.chapter_list(&manga.id).await.map_err(|e| {
        tracing::warn!("Chapter list fetch failed for '{}': {}", slug, e);
        ResolveError::MangaNotFound(slug.to_string())
    })?;

    if let Some(viewer) = &ctx.viewer {
        let bookmark = match ctx.remote.bookmark(&viewer.user_id, &manga.id).await {
            Ok(bookmark) => bookmark,
            Err(e) => {
                tracing::warn!("Bookmark read failed for '{}': {}", slug, e);
                None
            }
        };

        if let Some(bookmark) = bookmark {
            if let Some(summary) = chapters.iter().find(|c| c.id == bookmark.chapter_id) {
                let page = u32::try_from(bookmark.page_number).ok().filter(|p| *p >= 1);
                return Ok(ReadRoute::new(
                    slug,
                    &summary.chapter_number.to_string(),
                    page,
                ));
            }
        }
    }

    match chapters.first() {
        Some(first) => Ok(ReadRoute::new(
            slug,
            &first.chapter_number.to_string(),
            None,
        )),
        None => Err(ResolveError::ChapterNotFound {
            slug: slug.to_string(),
            chapter_number: 1,
        }),
    }
}
