//! Precomposed Vietnamese glyph table.
//!
//! Every atom in the composition buffer renders to exactly one Unicode scalar
//! value.  Vietnamese has twelve vowel "shapes" (a, ă, â, e, ê, i, o, ô, ơ, u,
//! ư, y) and six tones, so a vowel atom maps onto one cell of a 12 × 6 table.
//! All 72 cells exist as precomposed (NFC) code points in the Latin-1
//! Supplement and Latin Extended Additional blocks, which is what host
//! applications expect to receive.
//!
//! # Why precomposed instead of combining marks? (for beginners)
//!
//! `ế` can be written as one scalar (U+1EBF) or as `e` + U+0302 (circumflex)
//! + U+0301 (acute).  The second form is three scalars long, so "delete one
//! character" in the host would remove only the acute accent.  Rendering
//! precomposed scalars keeps the invariant "one atom == one host character",
//! which makes [`EditCommand::delete_count`](super::keystroke::EditCommand)
//! exact.

use super::buffer::{Mark, Tone};

/// One row of the vowel table: base letter, mark, and the six toned forms in
/// [`Tone`] order (level, acute, grave, hook above, tilde, dot below).
struct VowelRow {
    base: char,
    mark: Option<Mark>,
    forms: [char; 6],
}

const VOWEL_TABLE: [VowelRow; 12] = [
    VowelRow {
        base: 'a',
        mark: None,
        forms: ['a', 'á', 'à', 'ả', 'ã', 'ạ'],
    },
    VowelRow {
        base: 'a',
        mark: Some(Mark::Breve),
        forms: ['ă', 'ắ', 'ằ', 'ẳ', 'ẵ', 'ặ'],
    },
    VowelRow {
        base: 'a',
        mark: Some(Mark::Circumflex),
        forms: ['â', 'ấ', 'ầ', 'ẩ', 'ẫ', 'ậ'],
    },
    VowelRow {
        base: 'e',
        mark: None,
        forms: ['e', 'é', 'è', 'ẻ', 'ẽ', 'ẹ'],
    },
    VowelRow {
        base: 'e',
        mark: Some(Mark::Circumflex),
        forms: ['ê', 'ế', 'ề', 'ể', 'ễ', 'ệ'],
    },
    VowelRow {
        base: 'i',
        mark: None,
        forms: ['i', 'í', 'ì', 'ỉ', 'ĩ', 'ị'],
    },
    VowelRow {
        base: 'o',
        mark: None,
        forms: ['o', 'ó', 'ò', 'ỏ', 'õ', 'ọ'],
    },
    VowelRow {
        base: 'o',
        mark: Some(Mark::Circumflex),
        forms: ['ô', 'ố', 'ồ', 'ổ', 'ỗ', 'ộ'],
    },
    VowelRow {
        base: 'o',
        mark: Some(Mark::Horn),
        forms: ['ơ', 'ớ', 'ờ', 'ở', 'ỡ', 'ợ'],
    },
    VowelRow {
        base: 'u',
        mark: None,
        forms: ['u', 'ú', 'ù', 'ủ', 'ũ', 'ụ'],
    },
    VowelRow {
        base: 'u',
        mark: Some(Mark::Horn),
        forms: ['ư', 'ứ', 'ừ', 'ử', 'ữ', 'ự'],
    },
    VowelRow {
        base: 'y',
        mark: None,
        forms: ['y', 'ý', 'ỳ', 'ỷ', 'ỹ', 'ỵ'],
    },
];

/// Returns the lowercase precomposed scalar for `base` carrying `mark` and `tone`.
///
/// Combinations with no Vietnamese glyph (a consonant with a tone, `e` with a
/// horn, ...) fall back to the bare base letter; the engine never produces
/// them, but rendering must stay total.
pub fn compose(base: char, mark: Option<Mark>, tone: Tone) -> char {
    if base == 'd' {
        return if mark == Some(Mark::Stroke) { 'đ' } else { 'd' };
    }
    VOWEL_TABLE
        .iter()
        .find(|row| row.base == base && row.mark == mark)
        .map(|row| row.forms[tone.index()])
        .unwrap_or(base)
}

/// Like [`compose`], but applies the atom's case.
pub fn render(base: char, mark: Option<Mark>, tone: Tone, upper: bool) -> char {
    let lower = compose(base, mark, tone);
    if upper {
        lower.to_uppercase().next().unwrap_or(lower)
    } else {
        lower
    }
}
