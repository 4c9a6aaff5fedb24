pub mod view;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::resolver::ResolveError;
use crate::route::ReadRoute;
use crate::session::input::{command_for, ReaderCommand};
use crate::session::{Navigation, ReadingMode, ReadingSession};
use crate::state::ReaderContext;

const TICK: Duration = Duration::from_millis(100);

/// Rows one page occupies in the webtoon scroll column.
pub(crate) const ROWS_PER_PAGE: usize = 3;

/// Run the reading view for a route. Returns the mode in effect when the
/// viewer left, so the preference can be persisted.
pub async fn run(ctx: &ReaderContext, route: ReadRoute, mode: ReadingMode) -> Result<ReadingMode> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let outcome = run_loop(&mut terminal, ctx, route, mode).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ctx: &ReaderContext,
    route: ReadRoute,
    mode: ReadingMode,
) -> Result<ReadingMode> {
    let slug = route.slug.clone();

    let mut session = match ReadingSession::open(ctx, &route, mode).await {
        Ok(session) => session,
        Err(e) => {
            dead_end(terminal, &slug, &e)?;
            return Ok(mode);
        }
    };

    let mut scroll_offset = session.page_index() * ROWS_PER_PAGE;
    let mut viewport: u16 = 0;

    loop {
        terminal.draw(|frame| {
            viewport = view::render(frame, &session, scroll_offset);
        })?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }

                let now = Instant::now();
                let command = command_for(&key, session.mode());

                match command {
                    Some(ReaderCommand::ToggleControls) => session.controls.toggle(now),
                    _ => session.controls.touch(now),
                }

                match command {
                    Some(ReaderCommand::Exit) => break,
                    Some(ReaderCommand::NextPage) => {
                        if let Navigation::Chapter(next) = session.advance().await {
                            match enter_chapter(ctx, &slug, next, session.mode()).await {
                                Ok(reopened) => {
                                    session.teardown();
                                    session = reopened;
                                    scroll_offset = 0;
                                }
                                Err(e) => {
                                    session.teardown();
                                    dead_end(terminal, &slug, &e)?;
                                    return Ok(session.mode());
                                }
                            }
                        }
                    }
                    Some(ReaderCommand::PrevPage) => {
                        if let Navigation::Chapter(previous) = session.retreat().await {
                            match enter_chapter(ctx, &slug, previous, session.mode()).await {
                                Ok(reopened) => {
                                    session.teardown();
                                    session = reopened;
                                    scroll_offset = 0;
                                }
                                Err(e) => {
                                    session.teardown();
                                    dead_end(terminal, &slug, &e)?;
                                    return Ok(session.mode());
                                }
                            }
                        }
                    }
                    Some(ReaderCommand::ScrollDown) => {
                        let total = session.page_count() * ROWS_PER_PAGE;
                        let max = total.saturating_sub(viewport as usize);
                        scroll_offset = (scroll_offset + 1).min(max);
                        session
                            .update_scroll(scroll_offset as f64, total as f64, viewport as f64)
                            .await;
                    }
                    Some(ReaderCommand::ScrollUp) => {
                        let total = session.page_count() * ROWS_PER_PAGE;
                        scroll_offset = scroll_offset.saturating_sub(1);
                        session
                            .update_scroll(scroll_offset as f64, total as f64, viewport as f64)
                            .await;
                    }
                    Some(ReaderCommand::ToggleMode) => {
                        session.toggle_mode();
                        if session.mode() == ReadingMode::Webtoon {
                            // Land the scroll column on the page the viewer
                            // was already on.
                            scroll_offset = session.page_index() * ROWS_PER_PAGE;
                        }
                    }
                    Some(ReaderCommand::ToggleControls) | None => {}
                }
            }
        }

        session.controls.tick(Instant::now());
    }

    session.teardown();
    Ok(session.mode())
}

async fn enter_chapter(
    ctx: &ReaderContext,
    slug: &str,
    chapter_number: u32,
    mode: ReadingMode,
) -> Result<ReadingSession, ResolveError> {
    // Boundary crossings always land on the chapter's first page.
    let route = ReadRoute::new(slug, &chapter_number.to_string(), Some(1));
    ReadingSession::open(ctx, &route, mode).await
}

/// Terminal screen for a failed resolution. The single recovery action is
/// leaving the reader, back to where the manga's detail lives.
fn dead_end(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    slug: &str,
    error: &ResolveError,
) -> Result<()> {
    loop {
        terminal.draw(|frame| view::render_dead_end(frame, slug, error))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Release {
                return Ok(());
            }
        }
    }
}
