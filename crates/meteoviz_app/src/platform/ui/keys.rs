use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use meteoviz_core::{AppViewModel, CursorMove, Msg};

/// One-line key reference shown in the status bar.
pub const KEY_HINTS: &str = "↑↓ move  ⏎ select  ␣ expand  / search  [ ] date  h/H hour  p/P level  d download  f fullscreen  b sidebar  t theme  q quit";

/// Translate a key press into a message, given what is on screen.
pub fn map_key(key: KeyEvent, view: &AppViewModel) -> Msg {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Msg::QuitRequested;
    }
    if view.search_focused {
        return map_search_key(key, view);
    }

    let filters = &view.filters;
    match key.code {
        KeyCode::Char('q') => Msg::QuitRequested,
        KeyCode::Char('/') => Msg::SearchFocusChanged(true),
        KeyCode::Up | KeyCode::Char('k') => Msg::CursorMoved(CursorMove::Up),
        KeyCode::Down | KeyCode::Char('j') => Msg::CursorMoved(CursorMove::Down),
        KeyCode::Home | KeyCode::Char('g') => Msg::CursorMoved(CursorMove::First),
        KeyCode::End | KeyCode::Char('G') => Msg::CursorMoved(CursorMove::Last),
        KeyCode::Enter => Msg::CursorActivated,
        KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => Msg::CursorExpandToggled,
        KeyCode::Char('[') => Msg::DateChanged(filters.stepped_date(-1)),
        KeyCode::Char(']') => Msg::DateChanged(filters.stepped_date(1)),
        KeyCode::Char('h') => Msg::HourChanged(filters.hour.next()),
        KeyCode::Char('H') => Msg::HourChanged(filters.hour.previous()),
        KeyCode::Char('p') => Msg::LevelChanged(filters.level.next()),
        KeyCode::Char('P') => Msg::LevelChanged(filters.level.previous()),
        KeyCode::Char('d') => Msg::DownloadRequested,
        KeyCode::Char('f') if view.fullscreen => Msg::FullscreenClosed,
        KeyCode::Char('f') => Msg::FullscreenOpened,
        KeyCode::Esc if view.fullscreen => Msg::FullscreenClosed,
        KeyCode::Char('c') => Msg::SelectionCleared,
        KeyCode::Char('b') => Msg::SidebarToggled,
        KeyCode::Char('t') => Msg::ThemeToggled,
        _ => Msg::NoOp,
    }
}

fn map_search_key(key: KeyEvent, view: &AppViewModel) -> Msg {
    match key.code {
        KeyCode::Char(c) => {
            let mut term = view.search_term.clone();
            term.push(c);
            Msg::SearchChanged(term)
        }
        KeyCode::Backspace => {
            let mut term = view.search_term.clone();
            if term.pop().is_none() {
                return Msg::NoOp;
            }
            Msg::SearchChanged(term)
        }
        KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => Msg::SearchFocusChanged(false),
        _ => Msg::NoOp,
    }
}
