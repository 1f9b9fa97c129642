use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::manager::{Overlay, TaskManager};
use crate::tui::message::Msg;

/// Map a base symbol to its shifted counterpart on a US layout
fn shift_symbol(c: char) -> Option<char> {
    match c {
        '`' => Some('~'),
        '1' => Some('!'),
        '2' => Some('@'),
        '3' => Some('#'),
        '4' => Some('$'),
        '5' => Some('%'),
        '6' => Some('^'),
        '7' => Some('&'),
        '8' => Some('*'),
        '9' => Some('('),
        '0' => Some(')'),
        '-' => Some('_'),
        '=' => Some('+'),
        '[' => Some('{'),
        ']' => Some('}'),
        '\\' => Some('|'),
        ';' => Some(':'),
        '\'' => Some('"'),
        ',' => Some('<'),
        '.' => Some('>'),
        '/' => Some('?'),
        _ => None,
    }
}

/// Normalize key events from terminals using the kitty keyboard protocol,
/// which report `Char(lowercase) + SHIFT` and `Char(base_symbol) + SHIFT`.
pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        if c.is_ascii_lowercase() {
            key.code = KeyCode::Char(c.to_ascii_uppercase());
        } else if let Some(shifted) = shift_symbol(c) {
            key.code = KeyCode::Char(shifted);
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}

/// Pass a key straight through to the active overlay. A result it returns
/// is queued and handled before the current update finishes.
pub(super) fn forward_to_overlay(m: &mut TaskManager, key: KeyEvent) {
    let done = match &mut m.overlay {
        Overlay::None => None,
        Overlay::Confirm(modal) => modal.handle_key(key).map(Msg::ConfirmDone),
        Overlay::Picker { picker, purpose } => picker.handle_key(key).map(|result| Msg::PickerDone {
            purpose: purpose.clone(),
            result,
        }),
        Overlay::Input { input, purpose } => input.handle_key(key).map(|result| Msg::InputDone {
            purpose: purpose.clone(),
            result,
        }),
        Overlay::DatePicker { picker, purpose } => {
            picker.handle_key(key).map(|result| Msg::DateDone {
                purpose: purpose.clone(),
                result,
            })
        }
        Overlay::Editor(editor) => editor.handle_key(key).map(Msg::EditorDone),
    };
    if let Some(msg) = done {
        m.enqueue(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kitty_shifted_keys_are_normalized() {
        let key = normalize_key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('P'));
        assert!(key.modifiers.contains(KeyModifiers::SHIFT));

        let key = normalize_key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('@'));
        assert_eq!(key.modifiers, KeyModifiers::NONE);

        let key = normalize_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        assert_eq!(key.code, KeyCode::Char('j'));
    }
}
