//! Immutable per-convention rule tables.

use crate::domain::{KeyClass, Keystroke, Mark, ModifierAction, Tone};

/// The key bindings of one input convention.
///
/// A rule table carries no state; both engines share the algorithm in
/// [`Engine`](super::Engine) and differ only in this data.
#[derive(Debug)]
pub struct RuleTable {
    pub name: &'static str,
    /// Tone keys.  `Tone::Level` marks the "clear tone" key.
    pub tone_keys: &'static [(char, Tone)],
    /// Mark keys and the `(base, mark)` pairs each of them may produce.
    pub mark_keys: &'static [(char, &'static [(char, Mark)])],
}

impl RuleTable {
    /// The diacritic action bound to `key`, ignoring case.
    pub fn action(&self, key: char) -> Option<ModifierAction> {
        let key = key.to_ascii_lowercase();
        if let Some((_, tone)) = self.tone_keys.iter().find(|(k, _)| *k == key) {
            return Some(ModifierAction::Tone(*tone));
        }
        self.mark_keys
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, targets)| ModifierAction::Mark(targets))
    }

    pub fn classify(&self, keystroke: &Keystroke) -> KeyClass {
        match *keystroke {
            Keystroke::Backspace => KeyClass::Backspace,
            Keystroke::Control => KeyClass::Control,
            Keystroke::Char(c) => match self.action(c) {
                Some(action) => KeyClass::Modifier(c, action),
                None if c.is_ascii_alphabetic() => KeyClass::Letter(c),
                None => KeyClass::WordBreak,
            },
        }
    }

    /// `true` when a rejected modifier should still be typed as a letter on
    /// an empty buffer: `a` can start a word, `s` or `6` cannot.
    pub fn is_letter_like(&self, key: char, action: ModifierAction) -> bool {
        let key = key.to_ascii_lowercase();
        match action {
            ModifierAction::Tone(_) => false,
            ModifierAction::Mark(targets) => targets.iter().any(|(base, _)| *base == key),
        }
    }
}
