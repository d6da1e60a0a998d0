//! Keyboard capture infrastructure.
//!
//! On Windows, this installs low-level keyboard and mouse hooks
//! (`WH_KEYBOARD_LL`, `WH_MOUSE_LL`) on a dedicated Win32 message-loop thread.
//! Unlike a pure observer, an IME must decide *inside* the callback whether
//! the key reaches the focused application, so the [`Interceptor`] is moved
//! onto the hook thread and called synchronously.
//!
//! # Windows-Specific Implementation
//!
//! The hook callbacks must complete within ~300ms or Windows silently removes
//! the hook.  The only blocking work done inside the callback is one
//! `SendInput` call.
//!
//! # Testability
//!
//! The [`KeyboardHook`] trait allows tests and the headless console to drive
//! the interceptor with synthetic events via [`mock::MockKeyboardHook`].

use thiserror::Error;
use tracing::info;

use crate::application::controller::ImeController;
use crate::application::intercept::Interceptor;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Error type for keyboard hook operations.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to install keyboard hook: {0}")]
    InstallFailed(String),
    #[error("keyboard hook is already installed")]
    AlreadyInstalled,
    /// The hook was removed or its message loop died after installation.
    #[error("keyboard hook lost: {0}")]
    Lost(String),
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Trait abstracting the system-wide keystroke source.
///
/// The production implementation uses Windows hooks; tests use
/// [`mock::MockKeyboardHook`].
pub trait KeyboardHook: Send {
    /// Installs the hook.  Every key event is routed through `interceptor`
    /// until [`dispose`](Self::dispose) is called.
    fn install(&mut self, interceptor: Interceptor) -> Result<(), HookError>;
    /// Removes the hook and releases all OS resources.  Idempotent.
    fn dispose(&mut self);
    fn is_installed(&self) -> bool;
}

/// Installs `hook`, reporting a failure to the controller instead of
/// returning it.  Returns `true` when the hook is live.
pub fn install_hook(
    hook: &mut dyn KeyboardHook,
    interceptor: Interceptor,
    controller: &ImeController,
) -> bool {
    match hook.install(interceptor) {
        Ok(()) => {
            info!("keyboard hook installed");
            true
        }
        Err(e) => {
            controller.report_hook_error(e.to_string());
            false
        }
    }
}
