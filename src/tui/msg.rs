//! TEA Message Types for the advisor TUI
//!
//! Messages describe what happened; `update` decides what it means.

use crossterm::event::{KeyCode, KeyModifiers};

/// All possible messages/actions in the TUI
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    // === Input field ===
    /// Character typed into the concern field
    Input(char),
    /// Delete last character
    Backspace,
    /// Clear the whole field
    ClearInput,

    // === Submission ===
    /// Enter pressed: submit, or cancel the request in flight
    Submit,
    /// Esc while a request is in flight
    Cancel,
    /// A worker finished a request
    AdviceReceived { request_id: u64, text: String },

    // === Advice panel ===
    ScrollUp,
    ScrollDown,

    // === Lifecycle ===
    Quit,
    Tick,

    // === Internal ===
    /// No operation (for unhandled keys)
    Noop,
}

/// Convert a key event to a message
///
/// Pure; `submitting` decides whether Esc cancels or quits.
pub fn key_to_msg(code: KeyCode, modifiers: KeyModifiers, submitting: bool) -> Msg {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Msg::Quit,
            KeyCode::Char('u') => Msg::ClearInput,
            _ => Msg::Noop,
        };
    }

    match code {
        KeyCode::Esc if submitting => Msg::Cancel,
        KeyCode::Esc => Msg::Quit,
        KeyCode::Enter => Msg::Submit,
        KeyCode::Backspace => Msg::Backspace,
        KeyCode::Up | KeyCode::PageUp => Msg::ScrollUp,
        KeyCode::Down | KeyCode::PageDown => Msg::ScrollDown,
        KeyCode::Char(c) => Msg::Input(c),
        _ => Msg::Noop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_to_msg_typing() {
        assert_eq!(
            key_to_msg(KeyCode::Char('a'), KeyModifiers::NONE, false),
            Msg::Input('a')
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('A'), KeyModifiers::SHIFT, false),
            Msg::Input('A')
        );
        // 'q' is text, not quit
        assert_eq!(
            key_to_msg(KeyCode::Char('q'), KeyModifiers::NONE, false),
            Msg::Input('q')
        );
        assert_eq!(
            key_to_msg(KeyCode::Backspace, KeyModifiers::NONE, false),
            Msg::Backspace
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('u'), KeyModifiers::CONTROL, false),
            Msg::ClearInput
        );
    }

    #[test]
    fn test_key_to_msg_submit_and_cancel() {
        assert_eq!(
            key_to_msg(KeyCode::Enter, KeyModifiers::NONE, false),
            Msg::Submit
        );
        assert_eq!(
            key_to_msg(KeyCode::Enter, KeyModifiers::NONE, true),
            Msg::Submit
        );
        assert_eq!(key_to_msg(KeyCode::Esc, KeyModifiers::NONE, true), Msg::Cancel);
        assert_eq!(key_to_msg(KeyCode::Esc, KeyModifiers::NONE, false), Msg::Quit);
    }

    #[test]
    fn test_key_to_msg_quit() {
        assert_eq!(
            key_to_msg(KeyCode::Char('c'), KeyModifiers::CONTROL, true),
            Msg::Quit
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('c'), KeyModifiers::CONTROL, false),
            Msg::Quit
        );
    }

    #[test]
    fn test_key_to_msg_scroll() {
        assert_eq!(key_to_msg(KeyCode::Up, KeyModifiers::NONE, false), Msg::ScrollUp);
        assert_eq!(
            key_to_msg(KeyCode::PageDown, KeyModifiers::NONE, false),
            Msg::ScrollDown
        );
    }

    #[test]
    fn test_key_to_msg_unhandled() {
        assert_eq!(key_to_msg(KeyCode::F(5), KeyModifiers::NONE, false), Msg::Noop);
        assert_eq!(
            key_to_msg(KeyCode::Char('x'), KeyModifiers::CONTROL, false),
            Msg::Noop
        );
    }
}
