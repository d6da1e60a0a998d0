//! Behavioural properties of the Telex and VNI engines, exercised through the
//! public API only.

use vietime_core::{CompositionBuffer, EditCommand, Engine, EngineKind, Keystroke};

/// Types `keys` into an empty buffer and returns the final buffer together
/// with every command emitted on the way.
fn type_keys(engine: &Engine, keys: &str) -> (CompositionBuffer, Vec<EditCommand>) {
    let mut buffer = CompositionBuffer::new();
    let mut commands = Vec::new();
    for key in keys.chars() {
        let (next, command) = engine.process(buffer, &Keystroke::from(key));
        buffer = next;
        commands.push(command);
    }
    (buffer, commands)
}

fn render(kind: EngineKind, keys: &str) -> String {
    type_keys(&Engine::new(kind), keys).0.render()
}

/// Replays commands against a plain string the way a host text field would.
fn apply_to_host(host: &mut String, key: char, command: &EditCommand) {
    if command.passthrough {
        if key == '\u{8}' {
            host.pop();
        } else {
            host.push(key);
        }
        return;
    }
    for _ in 0..command.delete_count {
        host.pop();
    }
    host.push_str(&command.insert_text);
}

const TELEX_CORPUS: &[(&str, &str)] = &[
    ("vieetj", "việt"),
    ("nguoiwf", "người"),
    ("thuowngf", "thường"),
    ("quas", "quá"),
    ("gias", "giá"),
    ("hoafn", "hoàn"),
    ("khuyeens", "khuyến"),
    ("muwa", "mưa"),
    ("cuar", "của"),
    ("ddaayf", "đầy"),
    ("tana", "tân"),
    ("Aa", "Â"),
    ("DD", "Đ"),
    ("hellos", "hellos"),
    ("tieengs", "tiếng"),
    ("banhs", "bánh"),
    ("chaof", "chào"),
    ("ddieeuf", "điều"),
    ("nghieeng", "nghiêng"),
    ("hoawcj", "hoặc"),
    ("thuowr", "thuở"),
    ("huowu", "hươu"),
];

/// Words that press a modifier twice in a row, so the toggle path is followed
/// by a backspace.
const REPEATED_MODIFIERS: &[(EngineKind, &str)] = &[
    (EngineKind::Telex, "aaa"),
    (EngineKind::Telex, "hoass"),
    (EngineKind::Telex, "ddd"),
    (EngineKind::Telex, "nguoww"),
    (EngineKind::Telex, "vieee"),
    (EngineKind::Telex, "taana"),
    (EngineKind::Vni, "a66"),
    (EngineKind::Vni, "hoa11"),
    (EngineKind::Vni, "d99"),
    (EngineKind::Vni, "nguo77i"),
];

// ── Round-trip law ────────────────────────────────────────────────────────────

#[test]
fn test_telex_aaa_toggles_back_to_plain() {
    // Arrange
    let engine = Engine::new(EngineKind::Telex);

    // Act
    let (_, commands) = type_keys(&engine, "aaa");
    let rendered: Vec<&str> = commands.iter().map(|c| c.insert_text.as_str()).collect();

    // Assert
    assert_eq!(rendered, ["a", "â", "a"]);
}

#[test]
fn test_every_applied_modifier_reverts_when_repeated() {
    for (before, key) in [
        ("vie", 'e'),
        ("nguo", 'w'),
        ("hoa", 's'),
        ("d", 'd'),
        ("ta", 'w'),
        ("ma", 'x'),
    ] {
        let engine = Engine::new(EngineKind::Telex);
        let (buffer, _) = type_keys(&engine, before);
        let plain = buffer.render();

        let (applied, first) = engine.process(buffer, &Keystroke::Char(key));
        assert_ne!(first.insert_text, plain, "{before}+{key} should apply");

        let (reverted, _) = engine.process(applied, &Keystroke::Char(key));
        assert_eq!(reverted.render(), plain, "{before}+{key}{key} should revert");
    }
}

// ── Rejection ─────────────────────────────────────────────────────────────────

#[test]
fn test_tone_key_on_empty_buffer_passes_through() {
    let engine = Engine::new(EngineKind::Telex);
    let (buffer, command) = engine.process(CompositionBuffer::new(), &Keystroke::Char('s'));
    assert!(command.passthrough);
    assert!(buffer.is_empty());
}

#[test]
fn test_rejected_modifier_is_typed_literally_mid_word() {
    assert_eq!(render(EngineKind::Telex, "ts"), "ts");
    assert_eq!(render(EngineKind::Vni, "t1"), "t1");
}

// ── Tie-break ─────────────────────────────────────────────────────────────────

#[test]
fn test_hoas_places_tone_on_o() {
    assert_eq!(render(EngineKind::Telex, "hoas"), "hóa");
}

// ── Corpus ────────────────────────────────────────────────────────────────────

#[test]
fn test_telex_corpus() {
    for (keys, expected) in TELEX_CORPUS {
        assert_eq!(render(EngineKind::Telex, keys), *expected, "telex {keys}");
    }
}

// ── Backspace symmetry ────────────────────────────────────────────────────────

#[test]
fn test_backspace_after_any_key_restores_previous_state() {
    // Arrange
    let engine = Engine::new(EngineKind::Telex);

    for (keys, _) in TELEX_CORPUS {
        let chars: Vec<char> = keys.chars().collect();
        for split in 0..chars.len() {
            let prefix: String = chars[..split].iter().collect();
            let (before, _) = type_keys(&engine, &prefix);
            let expected = before.render();

            // Act
            let (after_key, _) = engine.process(before, &Keystroke::Char(chars[split]));
            let (after_backspace, _) = engine.process(after_key, &Keystroke::Backspace);

            // Assert
            assert_eq!(
                after_backspace.render(),
                expected,
                "backspace after {prefix}+{} should restore {expected:?}",
                chars[split]
            );
        }
    }
}

#[test]
fn test_backspace_after_repeated_modifier_restores_previous_state() {
    for &(kind, keys) in REPEATED_MODIFIERS {
        let engine = Engine::new(kind);
        let chars: Vec<char> = keys.chars().collect();
        for split in 0..chars.len() {
            // Arrange
            let prefix: String = chars[..split].iter().collect();
            let (before, _) = type_keys(&engine, &prefix);
            let expected = before.render();

            // Act
            let (after_key, _) = engine.process(before, &Keystroke::Char(chars[split]));
            let (after_backspace, _) = engine.process(after_key, &Keystroke::Backspace);

            // Assert
            assert_eq!(
                after_backspace.render(),
                expected,
                "{kind}: backspace after {prefix}+{} should restore {expected:?}",
                chars[split]
            );
        }
    }
}

#[test]
fn test_retyping_the_erased_key_restores_the_word() {
    let words = TELEX_CORPUS
        .iter()
        .map(|&(keys, _)| (EngineKind::Telex, keys))
        .chain(REPEATED_MODIFIERS.iter().copied());

    for (kind, keys) in words {
        // Arrange
        let engine = Engine::new(kind);
        let (word, _) = type_keys(&engine, keys);
        let expected = word.render();
        let last = keys.chars().last().expect("non-empty key sequence");

        // Act
        let (erased, _) = engine.process(word, &Keystroke::Backspace);
        let (retyped, _) = engine.process(erased, &Keystroke::Char(last));

        // Assert
        assert_eq!(retyped.render(), expected, "{kind}: {keys} + backspace + {last}");
    }
}

#[test]
fn test_commands_keep_host_text_in_sync_with_buffer() {
    let engine = Engine::new(EngineKind::Telex);
    for (keys, expected) in TELEX_CORPUS {
        let mut host = String::new();
        let mut buffer = CompositionBuffer::new();
        for key in keys.chars() {
            let (next, command) = engine.process(buffer, &Keystroke::from(key));
            apply_to_host(&mut host, key, &command);
            buffer = next;
            if !buffer.is_empty() {
                assert!(host.ends_with(&buffer.render()), "{keys}: host {host:?}");
            }
        }
        assert_eq!(host, *expected);
    }
}

#[test]
fn test_backspacing_a_whole_word_clears_it() {
    let engine = Engine::new(EngineKind::Telex);
    let (mut buffer, _) = type_keys(&engine, "vieetj");
    let mut host = String::from("việt");

    while !buffer.is_empty() {
        let (next, command) = engine.process(buffer, &Keystroke::Backspace);
        assert!(!command.passthrough);
        apply_to_host(&mut host, '\u{8}', &command);
        buffer = next;
    }

    assert_eq!(host, "");
}

// ── VNI ≡ Telex ───────────────────────────────────────────────────────────────

#[test]
fn test_vni_numeric_suffixes_match_telex() {
    for (vni, telex) in [
        ("a8", "aw"),
        ("a6", "aa"),
        ("o7", "ow"),
        ("hoa1", "hoas"),
        ("hoa2n", "hoafn"),
        ("vie65t", "vieetj"),
        ("d9", "dd"),
        ("d9a6y2", "ddaayf"),
        ("nguoi72", "nguoiwf"),
        ("thuo7ng2", "thuowngf"),
        ("khuye6n1", "khuyeens"),
        ("cua3", "cuar"),
        ("toa10", "toasz"),
    ] {
        assert_eq!(
            render(EngineKind::Vni, vni),
            render(EngineKind::Telex, telex),
            "vni {vni} vs telex {telex}"
        );
    }
}

#[test]
fn test_telex_letters_are_plain_in_vni() {
    assert_eq!(render(EngineKind::Vni, "hoas"), "hoas");
    assert_eq!(render(EngineKind::Vni, "dd"), "dd");
}

#[test]
fn test_telex_digits_break_words() {
    let engine = Engine::new(EngineKind::Telex);
    let (buffer, _) = type_keys(&engine, "tie");
    let (next, command) = engine.process(buffer, &Keystroke::Char('1'));
    assert!(command.passthrough);
    assert!(next.is_empty());
}
