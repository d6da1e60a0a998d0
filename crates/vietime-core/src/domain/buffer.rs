//! The composition buffer: the word currently being typed.
//!
//! A buffer is an ordered sequence of [`Atom`]s plus a journal of the
//! keystrokes that built it.  The rendered text is always derived from the
//! atoms by [`CompositionBuffer::render`]; it is never stored, so the text
//! shown in the host and the key history cannot drift apart.
//!
//! The journal exists so that a word can be rebuilt from scratch: backspace
//! and the "press the same modifier twice" rule both replay a prefix of the
//! journal through the engine instead of trying to reverse a diacritic by
//! hand.

use super::glyph;

/// Vietnamese tone (thanh điệu).  Declaration order matches the glyph table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    /// Ngang – no tone mark.
    #[default]
    Level,
    /// Sắc.
    Acute,
    /// Huyền.
    Grave,
    /// Hỏi.
    HookAbove,
    /// Ngã.
    Tilde,
    /// Nặng.
    DotBelow,
}

impl Tone {
    /// Column of this tone in the glyph table.
    pub(crate) fn index(self) -> usize {
        match self {
            Tone::Level => 0,
            Tone::Acute => 1,
            Tone::Grave => 2,
            Tone::HookAbove => 3,
            Tone::Tilde => 4,
            Tone::DotBelow => 5,
        }
    }
}

/// Letter-shape diacritic.  At most one per atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// â ê ô
    Circumflex,
    /// ă
    Breve,
    /// ơ ư
    Horn,
    /// đ
    Stroke,
}

/// One composed letter of the word being typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    base: char,
    upper: bool,
    mark: Option<Mark>,
    tone: Tone,
    keys: String,
}

impl Atom {
    /// Creates an undecorated atom for a literally typed key.
    ///
    /// The base is stored lowercase; the key's case is remembered separately
    /// and applied at render time.
    pub fn literal(key: char) -> Self {
        Self {
            base: key.to_ascii_lowercase(),
            upper: key.is_ascii_uppercase(),
            mark: None,
            tone: Tone::Level,
            keys: key.to_string(),
        }
    }

    pub fn base(&self) -> char {
        self.base
    }

    pub fn is_upper(&self) -> bool {
        self.upper
    }

    pub fn mark(&self) -> Option<Mark> {
        self.mark
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    /// The keystrokes that produced this atom, in the order they were typed.
    pub fn keys(&self) -> &str {
        &self.keys
    }

    /// `true` for the six Vietnamese vowel letters.
    pub fn is_vowel(&self) -> bool {
        matches!(self.base, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
    }

    /// The single scalar this atom renders to.
    pub fn render(&self) -> char {
        glyph::render(self.base, self.mark, self.tone, self.upper)
    }

    /// The lowercase, toneless shape of this atom (e.g. `ơ` for `Ở`).
    pub fn shape(&self) -> char {
        glyph::compose(self.base, self.mark, Tone::Level)
    }

    pub(crate) fn set_mark(&mut self, mark: Option<Mark>) {
        self.mark = mark;
    }

    pub(crate) fn set_tone(&mut self, tone: Tone) {
        self.tone = tone;
    }

    pub(crate) fn push_key(&mut self, key: char) {
        self.keys.push(key);
    }
}

/// What a journaled keystroke did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEffect {
    /// Appended a new atom.
    Literal,
    /// Applied, replaced or removed a diacritic.
    Modifier,
    /// Undid the immediately preceding modifier (same key pressed twice).
    /// The undone modifier's record stays in the journal.
    Revert,
}

/// One entry of the keystroke journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecord {
    pub key: char,
    pub effect: KeyEffect,
    /// Index of the atom the keystroke created or decorated.
    pub atom: usize,
}

/// The in-progress word: atoms plus the journal that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionBuffer {
    atoms: Vec<Atom>,
    journal: Vec<KeyRecord>,
}

impl CompositionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an atom to the end of the word.
    pub fn append(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    /// Removes the last atom together with the journal records that point at it.
    ///
    /// A no-op on an empty buffer.  Exact keystroke undo goes through the
    /// engine's backspace handling, which replays the journal instead.
    pub fn pop_last(&mut self) -> Option<Atom> {
        let atom = self.atoms.pop()?;
        let remaining = self.atoms.len();
        self.journal.retain(|record| record.atom < remaining);
        Some(atom)
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.atoms.clear();
        self.journal.clear();
    }

    /// Renders the word.  Pure function of the atom sequence.
    pub fn render(&self) -> String {
        self.atoms.iter().map(Atom::render).collect()
    }

    /// Length of [`render`](Self::render) in Unicode scalars.
    ///
    /// Each atom renders to exactly one scalar, so this is the atom count.
    pub fn rendered_len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn journal(&self) -> &[KeyRecord] {
        &self.journal
    }

    /// The raw keystroke sequence that built this word.
    pub fn keys(&self) -> impl Iterator<Item = char> + '_ {
        self.journal.iter().map(|record| record.key)
    }

    pub(crate) fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    /// Takes over the atoms of `earlier` and keeps this buffer's journal.
    pub(crate) fn restore_atoms(&mut self, earlier: CompositionBuffer) {
        self.atoms = earlier.atoms;
    }

    pub(crate) fn record(&mut self, record: KeyRecord) {
        self.journal.push(record);
    }
}
