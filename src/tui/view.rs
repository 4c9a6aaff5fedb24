use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use crate::resolver::ResolveError;
use crate::session::{ReadingMode, ReadingSession};
use crate::tui::ROWS_PER_PAGE;

/// Draw the reading view; returns the body height for scroll math.
pub fn render(frame: &mut Frame, session: &ReadingSession, scroll_offset: usize) -> u16 {
    let constraints = if session.controls.visible() {
        vec![
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(3),
        ]
    } else {
        vec![Constraint::Length(1), Constraint::Min(1)]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    render_header(frame, session, chunks[0]);

    let body = chunks[1];
    match session.mode() {
        ReadingMode::Manga => render_page(frame, session, body),
        ReadingMode::Webtoon => render_scroll(frame, session, body, scroll_offset),
    }

    if session.controls.visible() {
        render_controls(frame, session, chunks[2]);
    }

    body.height
}

fn render_header(frame: &mut Frame, session: &ReadingSession, area: Rect) {
    let mut spans = vec![
        Span::styled(
            session.manga().title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" - Chapter {}", session.chapter_number())),
    ];

    if session.pending_banner() {
        spans.push(Span::styled(
            " [awaiting moderation]",
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_page(frame: &mut Frame, session: &ReadingSession, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Page {} / {}",
                session.page_index() + 1,
                session.page_count()
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(session.current_page_url().to_string()),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}

fn render_scroll(frame: &mut Frame, session: &ReadingSession, area: Rect, scroll_offset: usize) {
    // Keep in step with ROWS_PER_PAGE: header, url, spacer.
    let mut lines = Vec::with_capacity(session.page_count() * ROWS_PER_PAGE);
    for (index, url) in session.pages().iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("-- Page {} --", index + 1),
            Style::default().add_modifier(Modifier::DIM),
        )));
        lines.push(Line::from(url.to_string()));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).scroll((scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_controls(frame: &mut Frame, session: &ReadingSession, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1)])
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::TOP))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((session.progress() / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%", session.progress()));
    frame.render_widget(gauge, chunks[0]);

    let hints = match session.mode() {
        ReadingMode::Manga => "left/right page | m mode | c controls | Esc leave",
        ReadingMode::Webtoon => "j/k scroll | m mode | c controls | Esc leave",
    };
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().add_modifier(Modifier::DIM)),
        chunks[1],
    );
}

/// The not-found screen: one message, one way out.
pub fn render_dead_end(frame: &mut Frame, slug: &str, error: &ResolveError) {
    let area = frame.area();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(format!("Press any key to go back to '{}'", slug)),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Reader"));

    frame.render_widget(paragraph, area);
}
