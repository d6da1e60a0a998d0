//! Simulated host text field.
//!
//! The real injector types into whatever window has focus, which tests cannot
//! observe.  `SimulatedHost` instead keeps the "document" in a
//! `Mutex<String>` and records every replacement, so assertions can check both
//! the final text and the exact commands that produced it.
//!
//! Keys the interceptor does not consume must be forwarded with
//! [`SimulatedHost::deliver`], mirroring the OS delivering them to the
//! focused application.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use vietime_core::Keystroke;

use crate::application::intercept::{InjectionError, TextInjector};

/// An in-memory text field that implements [`TextInjector`].
#[derive(Debug, Default)]
pub struct SimulatedHost {
    text: Mutex<String>,
    /// Records each `(delete_count, text)` pair passed to `replace`.
    injections: Mutex<Vec<(usize, String)>>,
    /// When `true`, `replace` fails without touching the text.
    should_fail: AtomicBool,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current document contents.
    pub fn text(&self) -> String {
        lock(&self.text).clone()
    }

    pub fn injections(&self) -> Vec<(usize, String)> {
        lock(&self.injections).clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    /// Applies a keystroke the interceptor passed through.
    pub fn deliver(&self, keystroke: &Keystroke) {
        let mut text = lock(&self.text);
        match keystroke {
            Keystroke::Char(c) => text.push(*c),
            Keystroke::Backspace => {
                text.pop();
            }
            Keystroke::Control => {}
        }
    }

    /// Empties the document, e.g. after the console submits a line.
    pub fn clear(&self) {
        lock(&self.text).clear();
    }
}

impl TextInjector for SimulatedHost {
    fn replace(&self, delete_count: usize, text: &str) -> Result<(), InjectionError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(InjectionError::Platform(
                "simulated injection failure".to_string(),
            ));
        }
        let mut document = lock(&self.text);
        for _ in 0..delete_count {
            document.pop();
        }
        document.push_str(text);
        lock(&self.injections).push((delete_count, text.to_string()));
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
