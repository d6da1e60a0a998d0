//! Physical key → logical [`Keystroke`] resolution.
//!
//! The keyboard hook reports a Windows virtual-key code plus the modifier
//! state at the time of the press.  [`KeyMapper::resolve`] turns that into
//! the keystroke the engines understand.  Bare modifiers resolve to `None`
//! and never touch the composition buffer.  Every other key the table does
//! not know (ISO `<>` key, `VK_PACKET`, media keys) resolves to
//! [`Keystroke::Control`]: it reaches the host, so the word must end.

pub mod windows_vk;

use crate::domain::Keystroke;
pub use windows_vk::{vk_role, KeyRole};

/// Modifier state captured alongside a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierFlags(pub u8);

impl ModifierFlags {
    pub const SHIFT: u8 = 1 << 0;
    pub const CTRL: u8 = 1 << 1;
    pub const ALT: u8 = 1 << 2;
    pub const META: u8 = 1 << 3;
    pub const CAPS_LOCK: u8 = 1 << 4;

    pub fn has(&self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Returns `true` if Ctrl, Alt or Win is held, i.e. the key is a shortcut.
    pub fn is_shortcut(&self) -> bool {
        self.has(Self::CTRL | Self::ALT | Self::META)
    }
}

/// Resolves virtual keys into keystrokes.
pub struct KeyMapper;

impl KeyMapper {
    /// Resolves a Windows virtual-key press.
    ///
    /// Letters take their case from Shift XOR CapsLock.  Any key pressed with
    /// Ctrl, Alt or Win held is a shortcut and resolves to
    /// [`Keystroke::Control`], including Backspace.  Only bare modifiers
    /// resolve to `None`.
    pub fn resolve(vk: u8, modifiers: ModifierFlags) -> Option<Keystroke> {
        let role = vk_role(vk);
        match role {
            KeyRole::Modifier => return None,
            KeyRole::Unmapped | KeyRole::Navigation => return Some(Keystroke::Control),
            _ if modifiers.is_shortcut() => return Some(Keystroke::Control),
            _ => {}
        }

        let shift = modifiers.has(ModifierFlags::SHIFT);
        let keystroke = match role {
            KeyRole::Letter(c) => {
                let upper = shift != modifiers.has(ModifierFlags::CAPS_LOCK);
                Keystroke::Char(if upper { c.to_ascii_uppercase() } else { c })
            }
            KeyRole::Text { plain, shifted } => {
                Keystroke::Char(if shift { shifted } else { plain })
            }
            KeyRole::Numpad(c) => Keystroke::Char(c),
            KeyRole::Backspace => Keystroke::Backspace,
            KeyRole::Unmapped | KeyRole::Modifier | KeyRole::Navigation => Keystroke::Control,
        };
        Some(keystroke)
    }
}
