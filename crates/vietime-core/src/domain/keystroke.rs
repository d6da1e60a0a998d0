//! Keystrokes going into an engine and edit commands coming out of it.

use super::buffer::{Mark, Tone};

/// A logical keystroke, after Shift/CapsLock have been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keystroke {
    /// A printable character, already in its final case.
    Char(char),
    Backspace,
    /// Navigation, function keys, Esc, Delete, or any Ctrl/Alt/Win shortcut.
    Control,
}

impl From<char> for Keystroke {
    fn from(c: char) -> Self {
        if c == '\u{8}' {
            Keystroke::Backspace
        } else {
            Keystroke::Char(c)
        }
    }
}

/// What a diacritic key asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierAction {
    /// Put a tone on the syllable.  `Tone::Level` clears it.
    Tone(Tone),
    /// Put a mark on one of the listed base letters.
    Mark(&'static [(char, Mark)]),
}

/// How an engine sees a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// A new base letter to append.
    Letter(char),
    /// A key that may decorate the buffer.  Carries the original key.
    Modifier(char, ModifierAction),
    /// Whitespace, punctuation and anything else that ends a word.
    WordBreak,
    Backspace,
    Control,
}

/// Instruction for the interceptor: delete `delete_count` already-rendered
/// characters before the caret, then type `insert_text`.
///
/// When `passthrough` is set the other fields are meaningless and the
/// original keystroke must reach the host unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditCommand {
    pub delete_count: usize,
    pub insert_text: String,
    pub passthrough: bool,
}

impl EditCommand {
    pub fn passthrough() -> Self {
        Self {
            delete_count: 0,
            insert_text: String::new(),
            passthrough: true,
        }
    }

    pub fn replace(delete_count: usize, insert_text: impl Into<String>) -> Self {
        Self {
            delete_count,
            insert_text: insert_text.into(),
            passthrough: false,
        }
    }
}
