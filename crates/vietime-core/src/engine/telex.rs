//! Telex: letters double as diacritic keys.
//!
//! | Key | Effect |
//! |-----|--------|
//! | `s f r x j` | acute, grave, hook above, tilde, dot below |
//! | `z` | clear the tone |
//! | `aa ee oo` | â ê ô |
//! | `w` | ă after `a`, ơ after `o`, ư after `u`, ươ after `uo` |
//! | `dd` | đ |

use super::rules::RuleTable;
use crate::domain::{Mark, Tone};

pub static TELEX: RuleTable = RuleTable {
    name: "Telex",
    tone_keys: &[
        ('s', Tone::Acute),
        ('f', Tone::Grave),
        ('r', Tone::HookAbove),
        ('x', Tone::Tilde),
        ('j', Tone::DotBelow),
        ('z', Tone::Level),
    ],
    mark_keys: &[
        ('a', &[('a', Mark::Circumflex)]),
        ('e', &[('e', Mark::Circumflex)]),
        ('o', &[('o', Mark::Circumflex)]),
        ('w', &[('a', Mark::Breve), ('o', Mark::Horn), ('u', Mark::Horn)]),
        ('d', &[('d', Mark::Stroke)]),
    ],
};
