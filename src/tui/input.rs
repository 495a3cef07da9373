//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::ViewMode;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Leave the detail view. The standalone binary quits.
    Quit,
    SwitchMode(ViewMode),
    NextResource,
    PrevResource,
}

/// Maps a key to an action.
pub fn handle_key(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

        KeyCode::Tab | KeyCode::Char('n') => KeyAction::NextResource,
        KeyCode::BackTab | KeyCode::Char('p') => KeyAction::PrevResource,

        KeyCode::Char(c) => match ViewMode::from_key(c) {
            Some(mode) => KeyAction::SwitchMode(mode),
            None => KeyAction::None,
        },
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_mode_keys() {
        assert_eq!(
            handle_key(key(KeyCode::Char('s'))),
            KeyAction::SwitchMode(ViewMode::Status)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('d'))),
            KeyAction::SwitchMode(ViewMode::DetailedStatus)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('m'))),
            KeyAction::SwitchMode(ViewMode::LogTail)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('i'))),
            KeyAction::SwitchMode(ViewMode::InSyncGauges)
        );
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(handle_key(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(
            handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        // Plain 'c' does nothing.
        assert_eq!(handle_key(key(KeyCode::Char('c'))), KeyAction::None);
    }

    #[test]
    fn test_resource_navigation() {
        assert_eq!(handle_key(key(KeyCode::Tab)), KeyAction::NextResource);
        assert_eq!(handle_key(key(KeyCode::Char('n'))), KeyAction::NextResource);
        assert_eq!(handle_key(key(KeyCode::BackTab)), KeyAction::PrevResource);
        assert_eq!(handle_key(key(KeyCode::Char('p'))), KeyAction::PrevResource);
        assert_eq!(handle_key(key(KeyCode::F(1))), KeyAction::None);
    }
}
