#![forbid(unsafe_code)]

//! Mapping from terminal events to demo actions.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

/// Rows scrolled per wheel notch.
const WHEEL_STEP: i32 = 3;

/// What the main loop should do with an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Scroll by this many rows (negative is up).
    Scroll(i32),
    ScrollTop,
    ScrollBottom,
    /// Pointer at viewport column/row.
    Pointer(u16, u16),
    Resize(u16, u16),
}

/// Translate `event`. `page_rows` is the height used for PageUp/PageDown.
pub fn map_event(event: &Event, page_rows: u16) -> Option<Action> {
    match event {
        Event::Key(key) => map_key(key, page_rows),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => Some(Action::Scroll(WHEEL_STEP)),
            MouseEventKind::ScrollUp => Some(Action::Scroll(-WHEEL_STEP)),
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                Some(Action::Pointer(mouse.column, mouse.row))
            }
            _ => None,
        },
        Event::Resize(width, height) => Some(Action::Resize(*width, *height)),
        _ => None,
    }
}

fn map_key(key: &KeyEvent, page_rows: u16) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let page = i32::from(page_rows.max(1));
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Scroll(1)),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Scroll(-1)),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(Action::Scroll(page)),
        KeyCode::PageUp => Some(Action::Scroll(-page)),
        KeyCode::Home => Some(Action::ScrollTop),
        KeyCode::End => Some(Action::ScrollBottom),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            assert_eq!(map_event(&key(code, KeyModifiers::NONE), 20), Some(Action::Quit));
        }
        assert_eq!(
            map_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), 20),
            Some(Action::Quit)
        );
        assert_eq!(map_event(&key(KeyCode::Char('c'), KeyModifiers::NONE), 20), None);
    }

    #[test]
    fn paging_uses_the_viewport_height() {
        assert_eq!(
            map_event(&key(KeyCode::PageDown, KeyModifiers::NONE), 23),
            Some(Action::Scroll(23))
        );
        assert_eq!(
            map_event(&key(KeyCode::PageUp, KeyModifiers::NONE), 0),
            Some(Action::Scroll(-1))
        );
    }

    #[test]
    fn releases_are_ignored() {
        let event = Event::Key(KeyEvent {
            code: KeyCode::Down,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(map_event(&event, 20), None);
    }

    #[test]
    fn mouse_motion_and_wheel() {
        assert_eq!(
            map_event(&mouse(MouseEventKind::Moved, 4, 9), 20),
            Some(Action::Pointer(4, 9))
        );
        assert_eq!(
            map_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 1, 2), 20),
            Some(Action::Pointer(1, 2))
        );
        assert_eq!(
            map_event(&mouse(MouseEventKind::ScrollDown, 0, 0), 20),
            Some(Action::Scroll(WHEEL_STEP))
        );
        assert_eq!(map_event(&Event::Resize(100, 40), 20), Some(Action::Resize(100, 40)));
    }
}
