//! Windows Virtual Key (VK) code role table.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h), US keyboard layout.
//! Windows VK codes range from 0x00 to 0xFF.
//!
//! # What is a Windows Virtual Key (VK) code? (for beginners)
//!
//! Windows assigns each keyboard key a number called a "Virtual Key code".
//! These are defined in `<winuser.h>` and named `VK_*` (e.g., `VK_RETURN = 0x0D`,
//! `VK_SPACE = 0x20`).  Pressing the letter A always produces `VK_A = 0x41`,
//! whatever Shift or CapsLock are doing; working out the final character is
//! the job of [`KeyMapper`](super::KeyMapper).
//!
//! # How this table works
//!
//! `VK_ROLE_TABLE` is a compile-time constant array of 256 [`KeyRole`] values,
//! indexed by VK code.  Position 0x41 holds `KeyRole::Letter('a')` because
//! Windows VK_A is 0x41.  Any VK code the IME does not care about stores
//! `KeyRole::Unmapped`; it is passed through and ends the current word.
//!
//! Indexing into this array is an O(1) lookup; every captured key event goes
//! through it.

/// What a physical key means to the composition engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Not interesting to the IME (media keys, mouse buttons, unassigned codes).
    Unmapped,
    /// Shift, Ctrl, Alt, Win, CapsLock, NumLock, ScrollLock.
    Modifier,
    /// A letter key; the value is the lowercase letter.
    Letter(char),
    /// A printable non-letter key on the main block.
    Text { plain: char, shifted: char },
    /// A printable numpad key (not affected by Shift).
    Numpad(char),
    Backspace,
    /// Arrows, Home/End, function keys, Esc, Delete, ...
    Navigation,
}

/// Returns the role of a Windows Virtual Key code.
///
/// # Panics
///
/// This function never panics; all u8 inputs are handled.
pub fn vk_role(vk: u8) -> KeyRole {
    VK_ROLE_TABLE[vk as usize]
}

/// Complete VK → role table indexed by VK code (0x00–0xFF).
/// Reference: https://learn.microsoft.com/windows/win32/inputdev/virtual-key-codes
const VK_ROLE_TABLE: [KeyRole; 256] = {
    use KeyRole::*;
    let mut t = [Unmapped; 256];

    // ── Alphabet keys (VK_A=0x41 … VK_Z=0x5A) ────────────────────────────────
    let mut vk = 0x41;
    while vk <= 0x5A {
        t[vk] = Letter((b'a' + (vk - 0x41) as u8) as char);
        vk += 1;
    }

    // ── Digit row (VK_0=0x30 … VK_9=0x39) ───────────────────────────────────
    let shifted_digits = [')', '!', '@', '#', '$', '%', '^', '&', '*', '('];
    let mut d = 0;
    while d < 10 {
        t[0x30 + d] = Text { plain: (b'0' + d as u8) as char, shifted: shifted_digits[d] };
        d += 1;
    }

    // ── Punctuation (US layout OEM keys) ─────────────────────────────────────
    t[0xBA] = Text { plain: ';', shifted: ':' };   // VK_OEM_1
    t[0xBB] = Text { plain: '=', shifted: '+' };   // VK_OEM_PLUS
    t[0xBC] = Text { plain: ',', shifted: '<' };   // VK_OEM_COMMA
    t[0xBD] = Text { plain: '-', shifted: '_' };   // VK_OEM_MINUS
    t[0xBE] = Text { plain: '.', shifted: '>' };   // VK_OEM_PERIOD
    t[0xBF] = Text { plain: '/', shifted: '?' };   // VK_OEM_2
    t[0xC0] = Text { plain: '`', shifted: '~' };   // VK_OEM_3
    t[0xDB] = Text { plain: '[', shifted: '{' };   // VK_OEM_4
    t[0xDC] = Text { plain: '\\', shifted: '|' };  // VK_OEM_5
    t[0xDD] = Text { plain: ']', shifted: '}' };   // VK_OEM_6
    t[0xDE] = Text { plain: '\'', shifted: '"' };  // VK_OEM_7

    // ── Whitespace ────────────────────────────────────────────────────────────
    t[0x20] = Text { plain: ' ', shifted: ' ' };   // VK_SPACE
    t[0x0D] = Text { plain: '\n', shifted: '\n' }; // VK_RETURN
    t[0x09] = Text { plain: '\t', shifted: '\t' }; // VK_TAB

    t[0x08] = Backspace; // VK_BACK

    // ── Numpad ───────────────────────────────────────────────────────────────
    let mut n = 0;
    while n < 10 {
        t[0x60 + n] = Numpad((b'0' + n as u8) as char);
        n += 1;
    }
    t[0x6A] = Numpad('*'); // VK_MULTIPLY
    t[0x6B] = Numpad('+'); // VK_ADD
    t[0x6D] = Numpad('-'); // VK_SUBTRACT
    t[0x6E] = Numpad('.'); // VK_DECIMAL
    t[0x6F] = Numpad('/'); // VK_DIVIDE

    // ── Navigation and editing ───────────────────────────────────────────────
    t[0x1B] = Navigation; // VK_ESCAPE
    t[0x13] = Navigation; // VK_PAUSE
    t[0x21] = Navigation; // VK_PRIOR
    t[0x22] = Navigation; // VK_NEXT
    t[0x23] = Navigation; // VK_END
    t[0x24] = Navigation; // VK_HOME
    t[0x25] = Navigation; // VK_LEFT
    t[0x26] = Navigation; // VK_UP
    t[0x27] = Navigation; // VK_RIGHT
    t[0x28] = Navigation; // VK_DOWN
    t[0x2C] = Navigation; // VK_SNAPSHOT
    t[0x2D] = Navigation; // VK_INSERT
    t[0x2E] = Navigation; // VK_DELETE
    t[0x5D] = Navigation; // VK_APPS

    // ── Function keys (VK_F1=0x70 … VK_F24=0x87) ─────────────────────────────
    let mut f = 0x70;
    while f <= 0x87 {
        t[f] = Navigation;
        f += 1;
    }

    // ── Modifiers ─────────────────────────────────────────────────────────────
    t[0x10] = Modifier; // VK_SHIFT
    t[0x11] = Modifier; // VK_CONTROL
    t[0x12] = Modifier; // VK_MENU
    t[0xA0] = Modifier; // VK_LSHIFT
    t[0xA1] = Modifier; // VK_RSHIFT
    t[0xA2] = Modifier; // VK_LCONTROL
    t[0xA3] = Modifier; // VK_RCONTROL
    t[0xA4] = Modifier; // VK_LMENU
    t[0xA5] = Modifier; // VK_RMENU
    t[0x5B] = Modifier; // VK_LWIN
    t[0x5C] = Modifier; // VK_RWIN
    t[0x14] = Modifier; // VK_CAPITAL
    t[0x90] = Modifier; // VK_NUMLOCK
    t[0x91] = Modifier; // VK_SCROLL

    t
};
