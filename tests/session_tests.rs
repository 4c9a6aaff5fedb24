mod common;

use std::sync::Arc;

use manga_reader::resolver::ResolveError;
use manga_reader::route::ReadRoute;
use manga_reader::session::{Navigation, ReadingMode, ReadingSession};
use manga_reader::store::PositionStore;

use common::{anonymous_context, test_manga_remote, FakeRemote};

#[tokio::test]
async fn test_deep_link_scenario() {
    // /read/test-manga/2?page=3 on a five-page chapter.
    let ctx = anonymous_context(Arc::new(test_manga_remote()));
    let route = ReadRoute::parse("/read/test-manga/2?page=3").unwrap();

    let mut session = ReadingSession::open(&ctx, &route, ReadingMode::Manga)
        .await
        .unwrap();

    assert_eq!(session.page_index(), 2);
    assert_eq!(session.page_count(), 5);
    assert!((session.progress() - 60.0).abs() < 1e-9);

    assert_eq!(session.advance().await, Navigation::Stay);
    assert_eq!(session.advance().await, Navigation::Stay);
    assert_eq!(session.page_index(), 4);

    // The third advance crosses into chapter 3 at its first page.
    assert_eq!(session.advance().await, Navigation::Chapter(3));

    let next_route = ReadRoute::new("test-manga", "3", Some(1));
    let next = ReadingSession::open(&ctx, &next_route, session.mode())
        .await
        .unwrap();
    assert_eq!(next.chapter_number(), 3);
    assert_eq!(next.page_index(), 0);
}

#[tokio::test]
async fn test_out_of_range_page_query_falls_back() {
    let ctx = anonymous_context(Arc::new(test_manga_remote()));

    for page in [0, 6] {
        let route = ReadRoute::new("test-manga", "2", Some(page));
        let session = ReadingSession::open(&ctx, &route, ReadingMode::Manga)
            .await
            .unwrap();
        assert_eq!(session.page_index(), 0, "page query {} must fall back", page);
    }
}

#[tokio::test]
async fn test_resume_from_saved_position() {
    let ctx = anonymous_context(Arc::new(test_manga_remote()));
    ctx.positions
        .save(&common::manga_id("test-manga"), 2, 3)
        .await;

    let route = ReadRoute::new("test-manga", "2", None);
    let session = ReadingSession::open(&ctx, &route, ReadingMode::Manga)
        .await
        .unwrap();

    assert_eq!(session.page_index(), 3);

    // A valid page query outranks the restored position.
    let route = ReadRoute::new("test-manga", "2", Some(1));
    let session = ReadingSession::open(&ctx, &route, ReadingMode::Manga)
        .await
        .unwrap();
    assert_eq!(session.page_index(), 0);
}

#[tokio::test]
async fn test_page_changes_write_through_to_the_store() {
    let ctx = anonymous_context(Arc::new(test_manga_remote()));
    let route = ReadRoute::new("test-manga", "2", None);

    let mut session = ReadingSession::open(&ctx, &route, ReadingMode::Manga)
        .await
        .unwrap();

    session.advance().await;
    session.advance().await;

    let saved = ctx.positions.load(&common::manga_id("test-manga"), 2).await;
    assert_eq!(saved, Some(2));
}

#[tokio::test]
async fn test_mode_switch_preserves_position() {
    let ctx = anonymous_context(Arc::new(test_manga_remote()));
    let route = ReadRoute::new("test-manga", "2", Some(4));

    let mut session = ReadingSession::open(&ctx, &route, ReadingMode::Manga)
        .await
        .unwrap();
    assert_eq!(session.page_index(), 3);

    session.toggle_mode();
    assert_eq!(session.mode(), ReadingMode::Webtoon);
    assert_eq!(session.page_index(), 3);

    session.toggle_mode();
    assert_eq!(session.mode(), ReadingMode::Manga);
    assert_eq!(session.page_index(), 3);
}

#[tokio::test]
async fn test_retreat_lands_on_previous_chapter_start() {
    let ctx = anonymous_context(Arc::new(test_manga_remote()));
    let route = ReadRoute::new("test-manga", "2", Some(1));

    let mut session = ReadingSession::open(&ctx, &route, ReadingMode::Manga)
        .await
        .unwrap();

    assert_eq!(session.retreat().await, Navigation::Chapter(1));

    let previous_route = ReadRoute::new("test-manga", "1", Some(1));
    let previous = ReadingSession::open(&ctx, &previous_route, session.mode())
        .await
        .unwrap();
    assert_eq!(previous.page_index(), 0);
}

#[tokio::test]
async fn test_no_op_at_both_ends() {
    let ctx = anonymous_context(Arc::new(test_manga_remote()));

    let route = ReadRoute::new("test-manga", "1", Some(1));
    let mut first = ReadingSession::open(&ctx, &route, ReadingMode::Manga)
        .await
        .unwrap();
    assert_eq!(first.retreat().await, Navigation::Stay);
    assert_eq!(first.page_index(), 0);

    let route = ReadRoute::new("test-manga", "3", Some(2));
    let mut last = ReadingSession::open(&ctx, &route, ReadingMode::Manga)
        .await
        .unwrap();
    assert_eq!(last.advance().await, Navigation::Stay);
    assert_eq!(last.page_index(), 1);
}

#[tokio::test]
async fn test_boundary_crossing_spans_pending_chapters() {
    let remote = FakeRemote::new()
        .with_manga("test-manga")
        .with_approved_chapter("test-manga", 1, Some(vec!["1.jpg"]))
        .with_pending_chapter("test-manga", 2, vec!["2.jpg"]);
    let ctx = anonymous_context(Arc::new(remote));

    let route = ReadRoute::new("test-manga", "1", None);
    let mut session = ReadingSession::open(&ctx, &route, ReadingMode::Manga)
        .await
        .unwrap();

    assert_eq!(session.advance().await, Navigation::Chapter(2));

    let pending_route = ReadRoute::new("test-manga", "2", Some(1));
    let pending = ReadingSession::open(&ctx, &pending_route, session.mode())
        .await
        .unwrap();
    assert!(pending.pending_banner());
}

#[tokio::test]
async fn test_webtoon_progress_follows_scroll() {
    let ctx = anonymous_context(Arc::new(test_manga_remote()));
    let route = ReadRoute::new("test-manga", "2", None);

    let mut session = ReadingSession::open(&ctx, &route, ReadingMode::Webtoon)
        .await
        .unwrap();

    assert!((session.progress() - 0.0).abs() < 1e-9);

    session.update_scroll(150.0, 300.0, 100.0).await;
    assert!((session.progress() - 75.0).abs() < 1e-9);

    // Past-the-end scroll clamps to 100.
    session.update_scroll(500.0, 300.0, 100.0).await;
    assert!((session.progress() - 100.0).abs() < 1e-9);

    // Content that fits entirely counts as fully read.
    session.update_scroll(0.0, 80.0, 100.0).await;
    assert!((session.progress() - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_webtoon_scroll_moves_the_saved_page() {
    let ctx = anonymous_context(Arc::new(test_manga_remote()));
    let route = ReadRoute::new("test-manga", "2", None);

    let mut session = ReadingSession::open(&ctx, &route, ReadingMode::Webtoon)
        .await
        .unwrap();

    session.update_scroll(200.0, 300.0, 100.0).await;
    assert_eq!(session.page_index(), 4);

    let saved = ctx.positions.load(&common::manga_id("test-manga"), 2).await;
    assert_eq!(saved, Some(4));
}

#[tokio::test]
async fn test_unauthenticated_entry_is_refused_before_any_fetch() {
    let mut remote = test_manga_remote();
    // Even a failing backend is never reached for an anonymous viewer.
    remote.fail_manga_lookup = true;

    let mut ctx = anonymous_context(Arc::new(remote));
    ctx.allow_anonymous = false;

    let route = ReadRoute::new("test-manga", "2", None);
    let error = ReadingSession::open(&ctx, &route, ReadingMode::Manga)
        .await
        .unwrap_err();

    assert!(matches!(error, ResolveError::AuthenticationRequired));
}
