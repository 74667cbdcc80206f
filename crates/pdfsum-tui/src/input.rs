use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::TextInput => map_key_text_input(key),
            }
        }
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::PageDown => Action::ScrollDown,
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::Back,
        KeyCode::Char('u') => Action::ShowUpload,
        KeyCode::Char('l') => Action::ShowLibrary,
        KeyCode::Char('o') | KeyCode::Char('/') => Action::EditPath,
        KeyCode::Char('m') | KeyCode::Tab => Action::CycleMode,
        KeyCode::Char('p') => Action::TogglePreview,
        KeyCode::Char('r') => Action::Regenerate,
        KeyCode::Char('R') => Action::Refresh,
        KeyCode::Char('d') => Action::Delete,
        KeyCode::Char('t') => Action::DownloadText,
        KeyCode::Char('P') => Action::DownloadPdf,
        KeyCode::Char('c') => Action::CancelJob,
        KeyCode::Char('y') => Action::Yes,
        KeyCode::Char('n') => Action::No,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

fn map_key_text_input(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::Back,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Char(c) => Action::TextInput(c),
        KeyCode::Backspace => Action::Backspace,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn ctrl_c_quits_in_every_mode() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ev, &InputMode::Normal), Action::Quit);
        assert_eq!(map_event(&ev, &InputMode::TextInput), Action::Quit);
    }

    #[test]
    fn letters_are_text_while_editing() {
        assert_eq!(
            map_event(&key(KeyCode::Char('q')), &InputMode::TextInput),
            Action::TextInput('q')
        );
        assert_eq!(
            map_event(&key(KeyCode::Backspace), &InputMode::TextInput),
            Action::Backspace
        );
        assert_eq!(map_event(&key(KeyCode::Esc), &InputMode::TextInput), Action::Back);
    }

    #[test]
    fn normal_mode_bindings() {
        let n = InputMode::Normal;
        assert_eq!(map_event(&key(KeyCode::Char('q')), &n), Action::Quit);
        assert_eq!(map_event(&key(KeyCode::Char('P')), &n), Action::DownloadPdf);
        assert_eq!(map_event(&key(KeyCode::Char('t')), &n), Action::DownloadText);
        assert_eq!(map_event(&key(KeyCode::Char('R')), &n), Action::Refresh);
        assert_eq!(map_event(&key(KeyCode::Char('r')), &n), Action::Regenerate);
        assert_eq!(map_event(&key(KeyCode::Tab), &n), Action::CycleMode);
        assert_eq!(map_event(&key(KeyCode::Char('l')), &n), Action::ShowLibrary);
        assert_eq!(map_event(&key(KeyCode::Char('u')), &n), Action::ShowUpload);
        assert_eq!(map_event(&Event::Resize(80, 24), &n), Action::Resize(80, 24));
    }

    #[test]
    fn key_release_is_ignored() {
        let mut ke = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        ke.kind = KeyEventKind::Release;
        assert_eq!(map_event(&Event::Key(ke), &InputMode::Normal), Action::None);
    }
}
