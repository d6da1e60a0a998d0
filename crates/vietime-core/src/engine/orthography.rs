//! Static Vietnamese orthography tables and the syllable parser.
//!
//! A written Vietnamese syllable is `onset + nucleus + coda`:
//!
//! ```text
//!   ngh  iê  ng      -> nghiêng
//!   qu   y   ết      -> quyết   (the `u` of `qu` belongs to the onset)
//!   gi   a           -> gia     (so does the `i` of `gi`)
//! ```
//!
//! The engines only ever decorate a buffer that parses.  Anything that does
//! not parse (English words, abbreviations, typos) stays literal.
//!
//! Tone placement follows the traditional style: `hóa`, `thúy`, `khỏe`.

use std::ops::Range;

use crate::domain::Atom;

/// Consonant clusters that may start a syllable (lowercase, stroked `d` as `đ`).
pub const ONSETS: &[&str] = &[
    "", "b", "c", "ch", "d", "đ", "g", "gh", "gi", "h", "k", "kh", "l", "m", "n", "ng",
    "ngh", "nh", "p", "ph", "q", "qu", "r", "s", "t", "th", "tr", "v", "x",
];

/// Consonant clusters that may end a syllable.
pub const CODAS: &[&str] = &["c", "ch", "m", "n", "ng", "nh", "p", "t"];

/// Stop codas only admit the acute and dot-below tones.
pub const STOP_CODAS: &[&str] = &["c", "ch", "p", "t"];

/// Tone placement for one vowel cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterRule {
    /// Lowercase toneless spelling of the cluster.
    pub text: &'static str,
    /// Index of the toned vowel when no coda follows.
    pub open: usize,
    /// Index of the toned vowel when a coda follows; `None` if the cluster
    /// never takes a coda.
    pub closed: Option<usize>,
    /// `false` for spellings that only exist half-way through typing a word
    /// (`ie` before it becomes `iê`).  Marks never produce these.
    pub canonical: bool,
}

const fn rule(text: &'static str, open: usize, closed: Option<usize>) -> ClusterRule {
    ClusterRule { text, open, closed, canonical: true }
}

const fn partial(text: &'static str, open: usize, closed: Option<usize>) -> ClusterRule {
    ClusterRule { text, open, closed, canonical: false }
}

pub const VOWEL_CLUSTERS: &[ClusterRule] = &[
    // ── Single vowels ──
    rule("a", 0, Some(0)),
    rule("ă", 0, Some(0)),
    rule("â", 0, Some(0)),
    rule("e", 0, Some(0)),
    rule("ê", 0, Some(0)),
    rule("i", 0, Some(0)),
    rule("o", 0, Some(0)),
    rule("ô", 0, Some(0)),
    rule("ơ", 0, Some(0)),
    rule("u", 0, Some(0)),
    rule("ư", 0, Some(0)),
    rule("y", 0, Some(0)),
    // ── Falling diphthongs: tone on the first vowel, no coda ──
    rule("ai", 0, None),
    rule("ao", 0, None),
    rule("au", 0, None),
    rule("âu", 0, None),
    rule("ay", 0, None),
    rule("ây", 0, None),
    rule("eo", 0, None),
    rule("êu", 0, None),
    rule("ia", 0, None),
    rule("iu", 0, None),
    rule("oi", 0, None),
    rule("ôi", 0, None),
    rule("ơi", 0, None),
    rule("ui", 0, None),
    rule("ưa", 0, None),
    rule("ưi", 0, None),
    rule("ưu", 0, None),
    // `ua` is open in `của`; the closed form is `tuan` on its way to `tuân`.
    rule("ua", 0, Some(1)),
    partial("eu", 0, None),
    // ── Rising diphthongs ──
    rule("oa", 0, Some(1)),
    rule("oe", 0, Some(1)),
    rule("uy", 0, Some(1)),
    rule("oo", 0, Some(1)),
    rule("oă", 1, Some(1)),
    rule("uâ", 1, Some(1)),
    rule("uê", 1, Some(1)),
    rule("uơ", 1, None),
    // ── Centring diphthongs: tone on the marked vowel ──
    rule("iê", 1, Some(1)),
    rule("yê", 1, Some(1)),
    rule("uô", 1, Some(1)),
    rule("ươ", 1, Some(1)),
    partial("ie", 1, Some(1)),
    partial("ye", 1, Some(1)),
    partial("ue", 1, Some(1)),
    partial("ưo", 1, Some(1)),
    partial("uo", 0, Some(1)),
    // ── Triphthongs ──
    rule("iêu", 1, None),
    rule("yêu", 1, None),
    rule("oai", 1, None),
    rule("oao", 1, None),
    rule("oay", 1, None),
    rule("oeo", 1, None),
    rule("uây", 1, None),
    rule("uôi", 1, None),
    rule("ươi", 1, None),
    rule("ươu", 1, None),
    rule("uya", 1, None),
    rule("uyu", 1, None),
    rule("uyê", 2, Some(2)),
    partial("ieu", 1, None),
    partial("yeu", 1, None),
    partial("uay", 1, None),
    partial("uoi", 1, None),
    partial("uou", 1, None),
    partial("uye", 2, Some(2)),
];

/// Atom ranges of a parsed syllable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syllable {
    pub onset: Range<usize>,
    pub nucleus: Range<usize>,
    pub coda: Range<usize>,
}

impl Syllable {
    pub fn has_coda(&self) -> bool {
        !self.coda.is_empty()
    }
}

fn spells<'a>(text: &str, atoms: impl IntoIterator<Item = &'a Atom>) -> bool {
    text.chars().eq(atoms.into_iter().map(Atom::shape))
}

/// Looks up the cluster rule for a sequence of lowercase toneless vowel shapes.
pub fn find_cluster<I>(shapes: I) -> Option<&'static ClusterRule>
where
    I: Iterator<Item = char> + Clone,
{
    VOWEL_CLUSTERS
        .iter()
        .find(|rule| rule.text.chars().eq(shapes.clone()))
}

/// Cluster rule for the nucleus of an already parsed syllable.
pub fn nucleus_rule(atoms: &[Atom], syllable: &Syllable) -> Option<&'static ClusterRule> {
    find_cluster(atoms[syllable.nucleus.clone()].iter().map(Atom::shape))
}

/// Splits `atoms` into onset, nucleus and coda.
///
/// Returns `None` if the atoms do not spell a Vietnamese syllable (or a
/// prefix of one that ends in a nucleus).  A buffer without vowels parses
/// as a bare onset with an empty nucleus.
pub fn parse(atoms: &[Atom]) -> Option<Syllable> {
    let first_vowel = atoms.iter().position(Atom::is_vowel).unwrap_or(atoms.len());
    let mut nucleus_end = first_vowel;
    while nucleus_end < atoms.len() && atoms[nucleus_end].is_vowel() {
        nucleus_end += 1;
    }

    // `gi` and `qu` take the first vowel into the onset when another vowel follows.
    let mut onset_end = first_vowel;
    if onset_end == 1 && nucleus_end - onset_end >= 2 {
        let glide = &atoms[1];
        let absorbs = match atoms[0].base() {
            'g' => glide.base() == 'i',
            'q' => glide.base() == 'u',
            _ => false,
        };
        if absorbs && glide.mark().is_none() {
            onset_end += 1;
        }
    }

    let onset = 0..onset_end;
    let nucleus = onset_end..nucleus_end;
    let coda = nucleus_end..atoms.len();

    if !ONSETS.iter().any(|o| spells(o, &atoms[onset.clone()])) {
        return None;
    }
    if !coda.is_empty() && !CODAS.iter().any(|c| spells(c, &atoms[coda.clone()])) {
        return None;
    }

    let syllable = Syllable { onset, nucleus, coda };
    if !syllable.nucleus.is_empty() {
        let rule = nucleus_rule(atoms, &syllable)?;
        if syllable.has_coda() && rule.closed.is_none() {
            return None;
        }
    }
    Some(syllable)
}

/// Index of the atom that carries the tone.  `None` for an empty nucleus.
pub fn tone_position(atoms: &[Atom], syllable: &Syllable) -> Option<usize> {
    if syllable.nucleus.is_empty() {
        return None;
    }
    let rule = nucleus_rule(atoms, syllable)?;
    let offset = if syllable.has_coda() {
        rule.closed.unwrap_or(rule.open)
    } else {
        rule.open
    };
    Some(syllable.nucleus.start + offset)
}

pub fn is_stop_coda(atoms: &[Atom], syllable: &Syllable) -> bool {
    syllable.has_coda() && STOP_CODAS.iter().any(|c| spells(c, &atoms[syllable.coda.clone()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(text: &str) -> Vec<Atom> {
        text.chars().map(Atom::literal).collect()
    }

    #[test]
    fn test_parse_splits_onset_nucleus_coda() {
        // Arrange
        let word = atoms("nghieng");

        // Act
        let syllable = parse(&word).expect("nghieng parses");

        // Assert
        assert_eq!(syllable.onset, 0..3);
        assert_eq!(syllable.nucleus, 3..5);
        assert_eq!(syllable.coda, 5..7);
    }

    #[test]
    fn test_parse_moves_gi_and_qu_glides_into_onset() {
        let gia = parse(&atoms("gia")).expect("gia parses");
        assert_eq!(gia.onset, 0..2);
        assert_eq!(gia.nucleus, 2..3);

        let quy = parse(&atoms("quy")).expect("quy parses");
        assert_eq!(quy.onset, 0..2);
        assert_eq!(quy.nucleus, 2..3);
    }

    #[test]
    fn test_parse_keeps_lone_i_after_g_in_nucleus() {
        let gi = parse(&atoms("gi")).expect("gi parses");
        assert_eq!(gi.onset, 0..1);
        assert_eq!(gi.nucleus, 1..2);
    }

    #[test]
    fn test_parse_accepts_consonant_only_prefix() {
        let ngh = parse(&atoms("ngh")).expect("ngh parses");
        assert!(ngh.nucleus.is_empty());
    }

    #[test]
    fn test_parse_rejects_foreign_spellings() {
        assert!(parse(&atoms("hello")).is_none());
        assert!(parse(&atoms("str")).is_none());
        assert!(parse(&atoms("bank")).is_none());
        assert!(parse(&atoms("taik")).is_none());
    }

    #[test]
    fn test_parse_rejects_coda_after_open_only_cluster() {
        assert!(parse(&atoms("hain")).is_none());
    }

    #[test]
    fn test_tone_position_traditional_style() {
        // Arrange
        let hoa = atoms("hoa");
        let hoan = atoms("hoan");
        let cua = atoms("cua");

        // Act
        let open = tone_position(&hoa, &parse(&hoa).unwrap());
        let closed = tone_position(&hoan, &parse(&hoan).unwrap());
        let falling = tone_position(&cua, &parse(&cua).unwrap());

        // Assert
        assert_eq!(open, Some(1));
        assert_eq!(closed, Some(2));
        assert_eq!(falling, Some(1));
    }

    #[test]
    fn test_stop_coda_detection() {
        let hoc = atoms("hoc");
        let hon = atoms("hon");
        assert!(is_stop_coda(&hoc, &parse(&hoc).unwrap()));
        assert!(!is_stop_coda(&hon, &parse(&hon).unwrap()));
    }

    #[test]
    fn test_find_cluster_distinguishes_marks() {
        assert!(find_cluster("ươ".chars()).is_some_and(|r| r.canonical));
        assert!(find_cluster("uo".chars()).is_some_and(|r| !r.canonical));
        assert!(find_cluster("aô".chars()).is_none());
    }

    #[test]
    fn test_cluster_table_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for rule in VOWEL_CLUSTERS {
            assert!(seen.insert(rule.text), "duplicate cluster {}", rule.text);
            assert!(rule.open < rule.text.chars().count());
        }
    }
}
