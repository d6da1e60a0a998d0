//! Text injection infrastructure.
//!
//! Implementations of [`TextInjector`](crate::application::intercept::TextInjector):
//!
//! - **`windows`** – `SendInput` with `VK_BACK` presses followed by
//!   `KEYEVENTF_UNICODE` code units, all in a single call so no physical
//!   keystroke can interleave.
//! - **`mock`** – an in-memory text field used by tests and the headless
//!   console.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Value written to `dwExtraInfo` of every synthetic event we inject.  The
/// keyboard hook ignores events carrying it, so injected text is never
/// composed a second time.
pub const INJECTED_MARKER: usize = 0x5649_4554;
