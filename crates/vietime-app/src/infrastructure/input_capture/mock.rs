//! Mock keyboard hook for unit testing and the headless console.
//!
//! Holds the installed [`Interceptor`] in-process and lets callers feed it
//! synthetic key events, exactly as the Windows hook callback would.

use vietime_core::{Keystroke, ModifierFlags};

use super::{HookError, KeyboardHook};
use crate::application::intercept::{Interceptor, RawKeyEvent};

/// A [`KeyboardHook`] that is driven by method calls instead of the OS.
#[derive(Default)]
pub struct MockKeyboardHook {
    interceptor: Option<Interceptor>,
    /// When set, `install` fails with this message.
    fail_with: Option<String>,
}

impl MockKeyboardHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hook whose `install` always fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            interceptor: None,
            fail_with: Some(message.into()),
        }
    }

    /// Presses and releases `vk_code`.  Returns whether the key-down was
    /// consumed.  With no hook installed every key reaches the host.
    pub fn press(&mut self, vk_code: u8, modifiers: ModifierFlags) -> bool {
        let Some(interceptor) = self.interceptor.as_mut() else {
            return false;
        };
        let consumed = interceptor.on_key_event(&RawKeyEvent::down(vk_code, modifiers));
        interceptor.on_key_event(&RawKeyEvent::up(vk_code, modifiers));
        consumed
    }

    /// Feeds one raw event.
    pub fn send(&mut self, event: RawKeyEvent) -> bool {
        self.interceptor
            .as_mut()
            .is_some_and(|interceptor| interceptor.on_key_event(&event))
    }

    /// Feeds one already-resolved keystroke.  Returns whether it was consumed.
    pub fn keystroke(&mut self, keystroke: &Keystroke) -> bool {
        self.interceptor
            .as_ref()
            .is_some_and(|interceptor| interceptor.on_keystroke(keystroke))
    }

    /// Feeds one keystroke per character of `text`.  Returns the number of
    /// keystrokes that were consumed.
    pub fn type_text(&mut self, text: &str) -> usize {
        text.chars()
            .filter(|&c| self.keystroke(&Keystroke::from(c)))
            .count()
    }

    /// Simulates a mouse click.
    pub fn click(&mut self) {
        if let Some(interceptor) = self.interceptor.as_ref() {
            interceptor.on_pointer_down();
        }
    }

    /// Simulates the OS silently removing the hook.
    pub fn revoke(&mut self, reason: &str) {
        if let Some(interceptor) = self.interceptor.take() {
            let error = HookError::Lost(reason.to_string());
            interceptor.controller().report_hook_error(error.to_string());
        }
    }
}

impl KeyboardHook for MockKeyboardHook {
    fn install(&mut self, interceptor: Interceptor) -> Result<(), HookError> {
        if let Some(message) = &self.fail_with {
            return Err(HookError::InstallFailed(message.clone()));
        }
        if self.interceptor.is_some() {
            return Err(HookError::AlreadyInstalled);
        }
        self.interceptor = Some(interceptor);
        Ok(())
    }

    fn dispose(&mut self) {
        self.interceptor = None;
    }

    fn is_installed(&self) -> bool {
        self.interceptor.is_some()
    }
}
