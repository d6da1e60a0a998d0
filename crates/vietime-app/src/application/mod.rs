//! Application layer use cases for VietIME.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (here: the composition engine in `vietime-core`) and the infrastructure
//! (OS hooks, `SendInput`, files).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "turn the
//!   keys I just typed into `việt`").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the infrastructure can be swapped without changing this code.
//! - **Contain no OS calls, no file system access**.
//!
//! # Sub-modules
//!
//! - **`controller`** – Owns the runtime state (enabled flag, active engine,
//!   composition buffer) behind one lock and broadcasts state changes.
//!
//! - **`intercept`** – Runs on every key event.  Decides whether the key is
//!   swallowed and replaced by injected text or passed through.
//!
//! - **`hotkey`** – Detects the modifier chord that toggles the IME.

pub mod controller;
pub mod hotkey;
pub mod intercept;
