//! Infrastructure layer for VietIME.
//!
//! Contains OS-facing adapters: the low-level keyboard hook, `SendInput` text
//! injection, file-system storage, the control-surface command bridge, and the headless
//! console.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `vietime_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod console;
pub mod input_capture;
pub mod storage;
pub mod text_injection;
pub mod ui_bridge;
