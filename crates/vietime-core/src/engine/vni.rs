//! VNI: digits typed after the letter they decorate.
//!
//! `1`–`5` are the tones (acute, grave, hook above, tilde, dot below) and
//! `0` clears it.  `6` circumflex, `7` horn, `8` breve, `9` stroke.

use super::rules::RuleTable;
use crate::domain::{Mark, Tone};

pub static VNI: RuleTable = RuleTable {
    name: "VNI",
    tone_keys: &[
        ('1', Tone::Acute),
        ('2', Tone::Grave),
        ('3', Tone::HookAbove),
        ('4', Tone::Tilde),
        ('5', Tone::DotBelow),
        ('0', Tone::Level),
    ],
    mark_keys: &[
        ('6', &[('a', Mark::Circumflex), ('e', Mark::Circumflex), ('o', Mark::Circumflex)]),
        ('7', &[('o', Mark::Horn), ('u', Mark::Horn)]),
        ('8', &[('a', Mark::Breve)]),
        ('9', &[('d', Mark::Stroke)]),
    ],
};
