//! Windows text injection via the SendInput API.
//!
//! A replacement is encoded as `delete_count` `VK_BACK` press/release pairs
//! followed by one `KEYEVENTF_UNICODE` press/release pair per UTF-16 code
//! unit.  Every event carries [`INJECTED_MARKER`] so our own keyboard hook
//! lets it through.

#![cfg(target_os = "windows")]

use std::mem::size_of;

use tracing::trace;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    KEYEVENTF_UNICODE, VIRTUAL_KEY, VK_BACK,
};

use super::INJECTED_MARKER;
use crate::application::intercept::{InjectionError, TextInjector};

/// Windows implementation of [`TextInjector`] using SendInput.
#[derive(Debug, Default)]
pub struct WindowsTextInjector;

impl WindowsTextInjector {
    pub fn new() -> Self {
        Self
    }
}

impl TextInjector for WindowsTextInjector {
    fn replace(&self, delete_count: usize, text: &str) -> Result<(), InjectionError> {
        let inputs = build_inputs(delete_count, text);
        if inputs.is_empty() {
            return Ok(());
        }
        // SAFETY: inputs is a contiguous slice of fully initialised INPUT structures.
        let sent = unsafe { SendInput(&inputs, size_of::<INPUT>() as i32) } as usize;
        trace!(delete_count, %text, sent, "SendInput");
        if sent != inputs.len() {
            return Err(InjectionError::Partial {
                sent,
                expected: inputs.len(),
            });
        }
        Ok(())
    }
}

fn key_input(vk: VIRTUAL_KEY, scan: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: INJECTED_MARKER,
            },
        },
    }
}

/// Builds the full event sequence for one replacement.
fn build_inputs(delete_count: usize, text: &str) -> Vec<INPUT> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let mut inputs = Vec::with_capacity(2 * (delete_count + units.len()));
    for _ in 0..delete_count {
        inputs.push(key_input(VK_BACK, 0, KEYBD_EVENT_FLAGS(0)));
        inputs.push(key_input(VK_BACK, 0, KEYEVENTF_KEYUP));
    }
    for unit in units {
        inputs.push(key_input(VIRTUAL_KEY(0), unit, KEYEVENTF_UNICODE));
        inputs.push(key_input(VIRTUAL_KEY(0), unit, KEYEVENTF_UNICODE | KEYEVENTF_KEYUP));
    }
    inputs
}
