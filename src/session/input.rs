use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::session::ReadingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderCommand {
    NextPage,
    PrevPage,
    ScrollDown,
    ScrollUp,
    ToggleMode,
    ToggleControls,
    Exit,
}

/// Keyboard contract of the reading view. Arrow paging only applies in
/// manga mode; webtoon mode scrolls instead of paging.
pub fn command_for(event: &KeyEvent, mode: ReadingMode) -> Option<ReaderCommand> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    match event.code {
        KeyCode::Right => (mode == ReadingMode::Manga).then_some(ReaderCommand::NextPage),
        KeyCode::Left => (mode == ReadingMode::Manga).then_some(ReaderCommand::PrevPage),
        KeyCode::Down | KeyCode::Char('j') => {
            (mode == ReadingMode::Webtoon).then_some(ReaderCommand::ScrollDown)
        }
        KeyCode::Up | KeyCode::Char('k') => {
            (mode == ReadingMode::Webtoon).then_some(ReaderCommand::ScrollUp)
        }
        KeyCode::Char('m') => Some(ReaderCommand::ToggleMode),
        KeyCode::Char('c') => Some(ReaderCommand::ToggleControls),
        KeyCode::Esc => Some(ReaderCommand::Exit),
        _ => None,
    }
}
