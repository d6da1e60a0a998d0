//! Interceptor: decides, for every key event, whether it is swallowed and
//! replaced by injected text or passed through to the focused application.
//!
//! This is the hot path.  It runs inside the low-level keyboard hook, so it
//! must never block on anything but the injection itself.
//!
//! # Flow
//!
//! ```text
//! RawKeyEvent ─► HotkeyDetector ─► KeyMapper::resolve ─► ImeController::handle_keystroke
//!                                                          │
//!                          passthrough ◄───────────────────┤
//!                                                          ▼
//!                                         TextInjector::replace(delete, text)
//! ```

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;
use vietime_core::{KeyMapper, Keystroke, ModifierFlags};

use super::controller::ImeController;
use super::hotkey::HotkeyDetector;

/// Error type for text injection.
#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("platform error: {0}")]
    Platform(String),
    /// The OS accepted fewer synthetic events than were sent.
    #[error("only {sent} of {expected} input events were injected")]
    Partial { sent: usize, expected: usize },
}

/// Replaces text immediately before the caret in the focused application.
///
/// The Windows implementation uses `SendInput`; tests and the headless console
/// use a simulated text field.
#[cfg_attr(test, mockall::automock)]
pub trait TextInjector: Send + Sync {
    /// Deletes `delete_count` characters before the caret, then types `text`.
    fn replace(&self, delete_count: usize, text: &str) -> Result<(), InjectionError>;
}

/// A key event as reported by the keyboard hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// Windows Virtual Key code.
    pub vk_code: u8,
    /// Modifier and CapsLock state at the time of the event.
    pub modifiers: ModifierFlags,
    pub is_key_down: bool,
}

impl RawKeyEvent {
    pub fn down(vk_code: u8, modifiers: ModifierFlags) -> Self {
        Self {
            vk_code,
            modifiers,
            is_key_down: true,
        }
    }

    pub fn up(vk_code: u8, modifiers: ModifierFlags) -> Self {
        Self {
            vk_code,
            modifiers,
            is_key_down: false,
        }
    }
}

/// Glue between the keyboard hook, the controller and the text injector.
pub struct Interceptor {
    controller: Arc<ImeController>,
    injector: Arc<dyn TextInjector>,
    hotkey: HotkeyDetector,
}

impl Interceptor {
    pub fn new(
        controller: Arc<ImeController>,
        injector: Arc<dyn TextInjector>,
        hotkey: HotkeyDetector,
    ) -> Self {
        Self {
            controller,
            injector,
            hotkey,
        }
    }

    pub fn controller(&self) -> &Arc<ImeController> {
        &self.controller
    }

    /// Handles a raw key event.  Returns `true` if the event was consumed and
    /// must not reach the focused application.
    pub fn on_key_event(&mut self, event: &RawKeyEvent) -> bool {
        if self.hotkey.on_key(event.vk_code, event.is_key_down) {
            self.controller.toggle();
            return false;
        }
        if !event.is_key_down {
            return false;
        }
        match KeyMapper::resolve(event.vk_code, event.modifiers) {
            Some(keystroke) => self.on_keystroke(&keystroke),
            // Bare modifier: the word continues.
            None => false,
        }
    }

    /// Handles a resolved keystroke.  Returns `true` if it was consumed.
    pub fn on_keystroke(&self, keystroke: &Keystroke) -> bool {
        if !self.controller.is_enabled() {
            return false;
        }
        let command = self.controller.handle_keystroke(keystroke);
        if command.passthrough {
            return false;
        }
        match self.injector.replace(command.delete_count, &command.insert_text) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, ?keystroke, "text injection failed; passing key through");
                self.controller.reset_buffer();
                false
            }
        }
    }

    /// A mouse click may have moved the caret; the composition is abandoned.
    pub fn on_pointer_down(&self) {
        self.controller.reset_buffer();
    }
}
