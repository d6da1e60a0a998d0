//! Toggle hotkey detection.
//!
//! The IME is switched on and off with a modifier-only chord (by default
//! `Ctrl+Shift`).  A chord made only of modifiers cannot fire on key-down,
//! because the user may be in the middle of `Ctrl+Shift+T`; it fires when the
//! chord keys are released without any other key having been pressed in
//! between.  The chord keys themselves always reach the host.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a hotkey description cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotkeyParseError {
    #[error("unknown hotkey key {0:?} (expected Ctrl, Shift or Alt)")]
    UnknownKey(String),
    #[error("hotkey needs at least two modifiers, got {0:?}")]
    TooFewKeys(String),
}

/// A modifier-only chord such as `Ctrl+Shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyChord {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Default for HotkeyChord {
    fn default() -> Self {
        Self {
            ctrl: true,
            shift: true,
            alt: false,
        }
    }
}

impl FromStr for HotkeyChord {
    type Err = HotkeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chord = HotkeyChord {
            ctrl: false,
            shift: false,
            alt: false,
        };
        for part in s.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "shift" => chord.shift = true,
                "alt" => chord.alt = true,
                _ => return Err(HotkeyParseError::UnknownKey(part.to_string())),
            }
        }
        let count = [chord.ctrl, chord.shift, chord.alt].iter().filter(|&&b| b).count();
        if count < 2 {
            return Err(HotkeyParseError::TooFewKeys(s.to_string()));
        }
        Ok(chord)
    }
}

impl fmt::Display for HotkeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.alt {
            parts.push("Alt");
        }
        f.write_str(&parts.join("+"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModifierKey {
    Ctrl,
    Shift,
    Alt,
}

fn modifier_key(vk: u8) -> Option<ModifierKey> {
    match vk {
        0x11 | 0xA2 | 0xA3 => Some(ModifierKey::Ctrl),
        0x10 | 0xA0 | 0xA1 => Some(ModifierKey::Shift),
        0x12 | 0xA4 | 0xA5 => Some(ModifierKey::Alt),
        _ => None,
    }
}

/// Watches raw key events for the toggle chord.
#[derive(Debug, Default)]
pub struct HotkeyDetector {
    chord: HotkeyChord,
    ctrl: bool,
    shift: bool,
    alt: bool,
    /// The full chord was held at some point since the last all-up.
    armed: bool,
    /// A non-chord key was pressed while the chord keys were down.
    spoiled: bool,
}

impl HotkeyDetector {
    pub fn new(chord: HotkeyChord) -> Self {
        Self {
            chord,
            ..Self::default()
        }
    }

    pub fn chord(&self) -> HotkeyChord {
        self.chord
    }

    /// Feeds one key event.  Returns `true` exactly once per completed chord.
    pub fn on_key(&mut self, vk: u8, is_key_down: bool) -> bool {
        let Some(key) = modifier_key(vk) else {
            if is_key_down && self.any_down() {
                self.spoiled = true;
            }
            return false;
        };

        let in_chord = match key {
            ModifierKey::Ctrl => self.chord.ctrl,
            ModifierKey::Shift => self.chord.shift,
            ModifierKey::Alt => self.chord.alt,
        };
        match key {
            ModifierKey::Ctrl => self.ctrl = is_key_down,
            ModifierKey::Shift => self.shift = is_key_down,
            ModifierKey::Alt => self.alt = is_key_down,
        }

        if is_key_down {
            if !in_chord {
                self.spoiled = true;
            } else if self.chord_held() {
                self.armed = true;
            }
            return false;
        }

        let fired = self.armed && !self.spoiled;
        if fired {
            self.armed = false;
            self.spoiled = true;
        }
        if !self.any_down() {
            self.armed = false;
            self.spoiled = false;
        }
        fired
    }

    fn chord_held(&self) -> bool {
        (!self.chord.ctrl || self.ctrl)
            && (!self.chord.shift || self.shift)
            && (!self.chord.alt || self.alt)
    }

    fn any_down(&self) -> bool {
        self.ctrl || self.shift || self.alt
    }
}
