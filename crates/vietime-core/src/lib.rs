//! # vietime-core
//!
//! Composition engine for VietIME, a Vietnamese input method.  This crate
//! holds everything that decides *what* the word being typed should look
//! like; it has zero dependencies on OS APIs.
//!
//! # Architecture overview (for beginners)
//!
//! Vietnamese is written in Latin letters plus diacritics: letter marks
//! (â ă ê ô ơ ư đ) and one of six tones (a á à ả ã ạ).  Ordinary keyboards
//! have no keys for these, so an input method watches what is typed and
//! rewrites the current word as the user goes.  Typing `v i e e t j` in the
//! Telex convention produces `việt`.
//!
//! - **`domain`** – The data being edited: [`Atom`]s (one rendered letter
//!   each), the [`CompositionBuffer`] holding the current word, the
//!   [`Keystroke`]s coming in and the [`EditCommand`]s going out.
//!
//! - **`engine`** – The Telex and VNI rule tables and the one algorithm they
//!   share.  [`Engine::process`] is a pure function from
//!   `(buffer, keystroke)` to `(buffer, command)`.
//!
//! - **`keymap`** – Turns a Windows virtual-key code plus modifier state into
//!   a [`Keystroke`].

pub mod domain;
pub mod engine;
pub mod keymap;

pub use domain::{
    Atom, CompositionBuffer, EditCommand, KeyClass, KeyEffect, KeyRecord, Keystroke, Mark,
    ModifierAction, Tone,
};
pub use engine::{Engine, EngineKind, RuleTable, UnknownEngine};
pub use keymap::{KeyMapper, ModifierFlags};
