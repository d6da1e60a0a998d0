//! The transformation engine shared by Telex and VNI.
//!
//! [`Engine::process`] is a pure function: it takes the current
//! [`CompositionBuffer`] and one [`Keystroke`] and returns the next buffer
//! together with the [`EditCommand`] the host must apply.  Engines hold no
//! mutable state, so one `Engine` value can be shared freely between threads.
//!
//! # How a keystroke is handled (for beginners)
//!
//! 1. The active [`RuleTable`] classifies the key: letter, diacritic key,
//!    word break, backspace or control.
//! 2. Word breaks and control keys end the word and pass through untouched.
//! 3. Backspace undoes the last keystroke by replaying the journal without it.
//! 4. A diacritic key pressed right after itself reverts that application
//!    (Telex `a a a` renders `a`, `â`, `a`).
//! 5. Otherwise the engine tries to place the mark or tone.  If the result
//!    would not be Vietnamese the key is typed as a plain letter instead.
//! 6. After every step the tone is moved to the vowel the orthography
//!    tables prescribe, because the nucleus may have grown.

pub mod orthography;
pub mod rules;
pub mod telex;
pub mod vni;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::domain::{
    Atom, CompositionBuffer, EditCommand, KeyClass, KeyEffect, KeyRecord, Keystroke, Mark,
    ModifierAction, Tone,
};
use orthography::{find_cluster, is_stop_coda, parse, tone_position};
pub use rules::RuleTable;

/// The two supported input conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Telex,
    Vni,
}

impl EngineKind {
    /// Display name used by the tray tooltip and the control surface.
    pub fn name(self) -> &'static str {
        self.rules().name
    }

    pub fn rules(self) -> &'static RuleTable {
        match self {
            EngineKind::Telex => &telex::TELEX,
            EngineKind::Vni => &vni::VNI,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown input method: {0:?} (expected \"telex\" or \"vni\")")]
pub struct UnknownEngine(pub String);

impl FromStr for EngineKind {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "telex" => Ok(EngineKind::Telex),
            "vni" => Ok(EngineKind::Vni),
            _ => Err(UnknownEngine(s.to_string())),
        }
    }
}

/// A Telex or VNI engine.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    kind: EngineKind,
    rules: &'static RuleTable,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineKind::default())
    }
}

impl Engine {
    pub fn new(kind: EngineKind) -> Self {
        Self {
            kind,
            rules: kind.rules(),
        }
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.rules.name
    }

    /// Processes one keystroke against `buffer`.
    ///
    /// Every command that is not a passthrough replaces the whole rendered
    /// word: `delete_count` is the old rendered length and `insert_text` the
    /// new rendering.
    pub fn process(
        &self,
        mut buffer: CompositionBuffer,
        keystroke: &Keystroke,
    ) -> (CompositionBuffer, EditCommand) {
        let class = self.rules.classify(keystroke);
        match class {
            KeyClass::WordBreak | KeyClass::Control => {
                (CompositionBuffer::new(), EditCommand::passthrough())
            }
            KeyClass::Backspace => self.backspace(buffer),
            KeyClass::Letter(_) | KeyClass::Modifier(..) => {
                let before = buffer.rendered_len();
                if !self.step(&mut buffer, class) {
                    trace!(engine = self.name(), ?keystroke, "modifier rejected on empty word");
                    return (CompositionBuffer::new(), EditCommand::passthrough());
                }
                let command = EditCommand::replace(before, buffer.render());
                (buffer, command)
            }
        }
    }

    /// Rebuilds a buffer from a raw key sequence.
    pub fn replay(&self, keys: impl IntoIterator<Item = char>) -> CompositionBuffer {
        let mut buffer = CompositionBuffer::new();
        for key in keys {
            let class = self.rules.classify(&Keystroke::Char(key));
            self.step(&mut buffer, class);
        }
        buffer
    }

    fn backspace(&self, mut buffer: CompositionBuffer) -> (CompositionBuffer, EditCommand) {
        if buffer.is_empty() {
            return (buffer, EditCommand::passthrough());
        }
        let before = buffer.rendered_len();
        let recorded = buffer.journal().len();
        let next = if recorded == 0 {
            buffer.pop_last();
            buffer
        } else {
            let keys: Vec<char> = buffer.keys().take(recorded - 1).collect();
            self.replay(keys)
        };
        let command = EditCommand::replace(before, next.render());
        (next, command)
    }

    /// Applies a letter or modifier key.  Returns `false` when the key must
    /// pass through instead (a modifier with nothing to decorate).
    fn step(&self, buffer: &mut CompositionBuffer, class: KeyClass) -> bool {
        match class {
            KeyClass::Letter(key) => {
                self.push_literal(buffer, key);
                true
            }
            KeyClass::Modifier(key, action) => self.apply_modifier(buffer, key, action),
            _ => false,
        }
    }

    fn apply_modifier(
        &self,
        buffer: &mut CompositionBuffer,
        key: char,
        action: ModifierAction,
    ) -> bool {
        if let Some(last) = buffer.journal().last().copied() {
            if last.effect == KeyEffect::Modifier && last.key.eq_ignore_ascii_case(&key) {
                // The journal keeps the modifier's record so that backspace
                // replays it and brings the diacritic back.
                let recorded = buffer.journal().len();
                let keys: Vec<char> = buffer.keys().take(recorded - 1).collect();
                buffer.restore_atoms(self.replay(keys));
                if let Some(atom) = buffer.atoms_mut().get_mut(last.atom) {
                    atom.push_key(last.key);
                    atom.push_key(key);
                }
                buffer.record(KeyRecord {
                    key,
                    effect: KeyEffect::Revert,
                    atom: last.atom,
                });
                return true;
            }
        }

        let applied = match action {
            ModifierAction::Tone(tone) => apply_tone(buffer, tone),
            ModifierAction::Mark(targets) => apply_mark(buffer, targets),
        };

        match applied {
            Some(index) => {
                buffer.atoms_mut()[index].push_key(key);
                buffer.record(KeyRecord {
                    key,
                    effect: KeyEffect::Modifier,
                    atom: index,
                });
                normalize_tone(buffer);
                true
            }
            None if buffer.is_empty() && !self.rules.is_letter_like(key, action) => false,
            None => {
                trace!(engine = self.name(), key = %key, "modifier typed as a letter");
                self.push_literal(buffer, key);
                true
            }
        }
    }

    fn push_literal(&self, buffer: &mut CompositionBuffer, key: char) {
        buffer.append(Atom::literal(key));
        buffer.record(KeyRecord {
            key,
            effect: KeyEffect::Literal,
            atom: buffer.len() - 1,
        });
        complete_horn_pair(buffer);
        normalize_tone(buffer);
    }
}

/// `uơ` only ends a word.  Once anything follows it the `u` takes the horn
/// too: `thuơ` + `ng` becomes `thương`, `huơ` + `u` becomes `hươu`.
fn complete_horn_pair(buffer: &mut CompositionBuffer) {
    let atoms = buffer.atoms();
    let Some(u) = atoms.windows(2).position(|pair| {
        pair[0].base() == 'u' && pair[0].mark().is_none() && pair[1].shape() == 'ơ'
    }) else {
        return;
    };
    let after_qu = u > 0 && atoms[u - 1].base() == 'q';
    if !after_qu && u + 2 < atoms.len() {
        buffer.atoms_mut()[u].set_mark(Some(Mark::Horn));
    }
}

// ── Diacritic placement ───────────────────────────────────────────────────────

/// Places, replaces or removes a tone.  Returns the index of the atom that
/// now carries (or lost) it, or `None` if the syllable cannot take it.
fn apply_tone(buffer: &mut CompositionBuffer, tone: Tone) -> Option<usize> {
    let atoms = buffer.atoms();
    let syllable = parse(atoms)?;
    let position = tone_position(atoms, &syllable)?;
    let current = atoms.iter().position(|a| a.tone() != Tone::Level);

    if tone == Tone::Level {
        let index = current?;
        buffer.atoms_mut()[index].set_tone(Tone::Level);
        return Some(index);
    }
    if let Some(index) = current {
        if atoms[index].tone() == tone {
            buffer.atoms_mut()[index].set_tone(Tone::Level);
            return Some(index);
        }
    }
    if is_stop_coda(atoms, &syllable) && !matches!(tone, Tone::Acute | Tone::DotBelow) {
        return None;
    }

    for atom in buffer.atoms_mut() {
        atom.set_tone(Tone::Level);
    }
    buffer.atoms_mut()[position].set_tone(tone);
    Some(position)
}

/// Places, replaces or removes a letter mark.  Returns the index of the
/// decorated atom, or `None` if no target accepts the mark.
fn apply_mark(buffer: &mut CompositionBuffer, targets: &[(char, Mark)]) -> Option<usize> {
    let atoms = buffer.atoms();
    let syllable = parse(atoms)?;

    if targets.iter().any(|&(_, mark)| mark == Mark::Stroke) {
        let first = syllable.onset.start;
        if syllable.onset.is_empty() || atoms[first].base() != 'd' {
            return None;
        }
        let stroke = match atoms[first].mark() {
            Some(Mark::Stroke) => None,
            _ => Some(Mark::Stroke),
        };
        buffer.atoms_mut()[first].set_mark(stroke);
        return Some(first);
    }

    let nucleus = syllable.nucleus.clone();
    let mut candidates: Vec<(Vec<usize>, Mark)> = Vec::new();

    // `uo` takes the horn on both vowels at once, except at the very end of
    // the word (`thuở`).  `complete_horn_pair` adds the second horn later.
    let horns_u = targets.contains(&('u', Mark::Horn));
    let horns_o = targets.contains(&('o', Mark::Horn));
    if horns_u && horns_o {
        if let Some(u) = (nucleus.start..nucleus.end.saturating_sub(1))
            .find(|&i| atoms[i].base() == 'u' && atoms[i + 1].base() == 'o')
        {
            let word_final = u + 2 == atoms.len();
            let horned = if word_final { vec![u + 1] } else { vec![u, u + 1] };
            candidates.push((horned, Mark::Horn));
        }
    }
    for index in nucleus.clone().rev() {
        let base = atoms[index].base();
        if let Some(&(_, mark)) = targets.iter().find(|(b, _)| *b == base) {
            candidates.push((vec![index], mark));
        }
    }

    for (indices, mark) in candidates {
        if indices.iter().all(|&i| atoms[i].mark() == Some(mark)) {
            for &i in &indices {
                buffer.atoms_mut()[i].set_mark(None);
            }
            return indices.last().copied();
        }

        let trial = nucleus.clone().map(|i| {
            let atom = &atoms[i];
            if indices.contains(&i) {
                crate::domain::glyph::compose(atom.base(), Some(mark), Tone::Level)
            } else {
                atom.shape()
            }
        });
        let accepted = find_cluster(trial).is_some_and(|rule| {
            rule.canonical && (!syllable.has_coda() || rule.closed.is_some())
        });
        if accepted {
            for &i in &indices {
                buffer.atoms_mut()[i].set_mark(Some(mark));
            }
            return indices.last().copied();
        }
    }
    None
}

/// Moves an existing tone to the vowel the orthography prescribes.
fn normalize_tone(buffer: &mut CompositionBuffer) {
    let atoms = buffer.atoms();
    let Some(current) = atoms.iter().position(|a| a.tone() != Tone::Level) else {
        return;
    };
    let Some(target) = parse(atoms).and_then(|s| tone_position(atoms, &s)) else {
        return;
    };
    if current != target {
        let tone = atoms[current].tone();
        buffer.atoms_mut()[current].set_tone(Tone::Level);
        buffer.atoms_mut()[target].set_tone(tone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_keys(engine: &Engine, keys: &str) -> (CompositionBuffer, EditCommand) {
        let mut buffer = CompositionBuffer::new();
        let mut last = EditCommand::passthrough();
        for key in keys.chars() {
            let (next, command) = engine.process(buffer, &Keystroke::from(key));
            buffer = next;
            last = command;
        }
        (buffer, last)
    }

    fn telex(keys: &str) -> String {
        type_keys(&Engine::new(EngineKind::Telex), keys).0.render()
    }

    fn vni(keys: &str) -> String {
        type_keys(&Engine::new(EngineKind::Vni), keys).0.render()
    }

    #[test]
    fn test_letter_emits_full_word_replace() {
        // Arrange
        let engine = Engine::new(EngineKind::Telex);
        let (buffer, _) = type_keys(&engine, "vi");

        // Act
        let (next, command) = engine.process(buffer, &Keystroke::Char('e'));

        // Assert
        assert_eq!(next.render(), "vie");
        assert_eq!(command, EditCommand::replace(2, "vie"));
    }

    #[test]
    fn test_word_break_passes_through_and_clears() {
        let engine = Engine::new(EngineKind::Telex);
        let (buffer, _) = type_keys(&engine, "xin");
        let (next, command) = engine.process(buffer, &Keystroke::Char(' '));
        assert!(command.passthrough);
        assert!(next.is_empty());
    }

    #[test]
    fn test_control_key_passes_through_and_clears() {
        let engine = Engine::new(EngineKind::Vni);
        let (buffer, _) = type_keys(&engine, "chao");
        let (next, command) = engine.process(buffer, &Keystroke::Control);
        assert!(command.passthrough);
        assert!(next.is_empty());
    }

    #[test]
    fn test_telex_circumflex_round_trip() {
        assert_eq!(telex("a"), "a");
        assert_eq!(telex("aa"), "â");
        assert_eq!(telex("aaa"), "a");
    }

    #[test]
    fn test_telex_tone_toggle_round_trip() {
        assert_eq!(telex("as"), "á");
        assert_eq!(telex("ass"), "a");
    }

    #[test]
    fn test_tone_key_on_empty_buffer_passes_through() {
        // Arrange
        let engine = Engine::new(EngineKind::Telex);

        // Act
        let (buffer, command) = engine.process(CompositionBuffer::new(), &Keystroke::Char('s'));

        // Assert
        assert!(command.passthrough);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_vni_digit_on_empty_buffer_passes_through() {
        let engine = Engine::new(EngineKind::Vni);
        let (buffer, command) = engine.process(CompositionBuffer::new(), &Keystroke::Char('6'));
        assert!(command.passthrough);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_tone_placement_prefers_traditional_style() {
        assert_eq!(telex("hoas"), "hóa");
        assert_eq!(telex("hoafn"), "hoàn");
        assert_eq!(telex("thuys"), "thúy");
        assert_eq!(telex("khoer"), "khỏe");
    }

    #[test]
    fn test_tone_moves_when_nucleus_grows() {
        assert_eq!(telex("hosa"), "hóa");
        assert_eq!(telex("tuyeenr"), "tuyển");
    }

    #[test]
    fn test_gi_and_qu_onsets() {
        assert_eq!(telex("gias"), "giá");
        assert_eq!(telex("gif"), "gì");
        assert_eq!(telex("quas"), "quá");
        assert_eq!(telex("quyeets"), "quyết");
    }

    #[test]
    fn test_horn_on_uo_pair() {
        assert_eq!(telex("nguoiwf"), "người");
        assert_eq!(telex("thuowngf"), "thường");
        assert_eq!(vni("nguoi72"), "người");
    }

    #[test]
    fn test_word_final_uo_takes_a_single_horn() {
        assert_eq!(telex("thuowr"), "thuở");
        assert_eq!(telex("huow"), "huơ");
        assert_eq!(vni("thuo73"), "thuở");
    }

    #[test]
    fn test_single_horn_grows_when_the_word_continues() {
        assert_eq!(telex("thuowng"), "thương");
        assert_eq!(telex("huowu"), "hươu");
        assert_eq!(telex("nguowif"), "người");
        assert_eq!(vni("huo7u"), "hươu");
    }

    #[test]
    fn test_w_picks_the_vowel_that_forms_a_cluster() {
        assert_eq!(telex("muwa"), "mưa");
        assert_eq!(telex("hoaw"), "hoă");
        assert_eq!(telex("hoiw"), "hơi");
    }

    #[test]
    fn test_stroke_d() {
        assert_eq!(telex("dd"), "đ");
        assert_eq!(telex("ddd"), "d");
        assert_eq!(telex("ddaayf"), "đầy");
        assert_eq!(vni("d9i"), "đi");
        assert_eq!(telex("DD"), "Đ");
    }

    #[test]
    fn test_stop_coda_rejects_non_stop_tones() {
        assert_eq!(telex("hocj"), "học");
        assert_eq!(telex("hocf"), "hocf");
    }

    #[test]
    fn test_clear_tone_key() {
        assert_eq!(telex("toasz"), "toa");
        assert_eq!(vni("toa10"), "toa");
    }

    #[test]
    fn test_clear_tone_without_tone_is_literal() {
        assert_eq!(telex("taz"), "taz");
    }

    #[test]
    fn test_compatible_marks_replace_each_other() {
        assert_eq!(telex("aaw"), "ă");
        assert_eq!(telex("oow"), "ơ");
        assert_eq!(vni("a68"), "ă");
    }

    #[test]
    fn test_nonconsecutive_repeat_removes_mark() {
        assert_eq!(telex("tana"), "tân");
        assert_eq!(telex("taana"), "tan");
    }

    #[test]
    fn test_foreign_words_stay_literal() {
        assert_eq!(telex("hellos"), "hellos");
        assert_eq!(telex("bank"), "bank");
    }

    #[test]
    fn test_case_is_preserved_per_atom() {
        assert_eq!(telex("Vieetj"), "Việt");
        assert_eq!(telex("VIEETJ"), "VIỆT");
        assert_eq!(telex("Aa"), "Â");
    }

    #[test]
    fn test_backspace_on_empty_buffer_passes_through() {
        let engine = Engine::new(EngineKind::Telex);
        let (buffer, command) = engine.process(CompositionBuffer::new(), &Keystroke::Backspace);
        assert!(command.passthrough);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_backspace_undoes_last_modifier() {
        // Arrange
        let engine = Engine::new(EngineKind::Telex);
        let (buffer, _) = type_keys(&engine, "vieetj");

        // Act
        let (next, command) = engine.process(buffer, &Keystroke::Backspace);

        // Assert
        assert_eq!(next.render(), "viêt");
        assert_eq!(command, EditCommand::replace(4, "viêt"));
    }

    #[test]
    fn test_backspace_after_revert_restores_the_diacritic() {
        // Arrange
        let engine = Engine::new(EngineKind::Telex);
        let (buffer, _) = type_keys(&engine, "aaa");
        let keys: String = buffer.keys().collect();

        // Act
        let (next, command) = engine.process(buffer, &Keystroke::Backspace);
        let (again, _) = engine.process(next.clone(), &Keystroke::Char('a'));

        // Assert
        assert_eq!(keys, "aaa");
        assert_eq!(next.render(), "â");
        assert_eq!(command, EditCommand::replace(1, "â"));
        assert_eq!(again.render(), "a");
    }

    #[test]
    fn test_backspace_emptying_buffer_is_explicit_clear() {
        let engine = Engine::new(EngineKind::Telex);
        let (buffer, _) = type_keys(&engine, "a");
        let (next, command) = engine.process(buffer, &Keystroke::Backspace);
        assert!(next.is_empty());
        assert_eq!(command, EditCommand::replace(1, ""));
    }

    #[test]
    fn test_engine_kind_parsing_and_names() {
        assert_eq!("Telex".parse::<EngineKind>(), Ok(EngineKind::Telex));
        assert_eq!(" vni ".parse::<EngineKind>(), Ok(EngineKind::Vni));
        assert!("viqr".parse::<EngineKind>().is_err());
        assert_eq!(EngineKind::Vni.to_string(), "VNI");
        assert_eq!(Engine::new(EngineKind::Telex).name(), "Telex");
    }
}
