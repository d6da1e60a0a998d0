//! Domain types shared by every engine: atoms, the composition buffer,
//! keystrokes and edit commands.

pub mod buffer;
pub mod glyph;
pub mod keystroke;

pub use buffer::{Atom, CompositionBuffer, KeyEffect, KeyRecord, Mark, Tone};
pub use keystroke::{EditCommand, KeyClass, Keystroke, ModifierAction};
