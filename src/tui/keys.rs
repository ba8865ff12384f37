use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::Event;

/// Map a key press to a session event.
pub fn map_key(key: KeyEvent) -> Option<Event> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Event::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Event::Quit),
        KeyCode::Char('r') => Some(Event::Rescan),
        KeyCode::Enter => Some(Event::LoadTitles),
        KeyCode::Up | KeyCode::Char('k') => Some(Event::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Event::CursorDown),
        KeyCode::Char(' ') => Some(Event::ToggleTitle),
        KeyCode::Char('a') => Some(Event::SelectAllTitles),
        KeyCode::Char('s') => Some(Event::StartRip),
        KeyCode::Char('e') => Some(Event::StartEncode),
        _ => None,
    }
}
