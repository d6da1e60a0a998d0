//! End-to-end typing through the mock keyboard hook into a simulated text
//! field: raw virtual-key events in, host text out.

use std::sync::Arc;

use vietime_app::application::controller::{ImeController, ImeEvent};
use vietime_app::application::hotkey::HotkeyDetector;
use vietime_app::application::intercept::{Interceptor, RawKeyEvent, TextInjector};
use vietime_app::infrastructure::input_capture::mock::MockKeyboardHook;
use vietime_app::infrastructure::input_capture::KeyboardHook;
use vietime_app::infrastructure::text_injection::mock::SimulatedHost;
use vietime_core::{EngineKind, KeyMapper, Keystroke, ModifierFlags};

const VK_BACK: u8 = 0x08;
const VK_SPACE: u8 = 0x20;
const VK_LEFT: u8 = 0x25;
const VK_LSHIFT: u8 = 0xA0;
const VK_LCTRL: u8 = 0xA2;
const VK_OEM_102: u8 = 0xE2;
const VK_PACKET: u8 = 0xE7;
const NONE: ModifierFlags = ModifierFlags(0);

struct Rig {
    hook: MockKeyboardHook,
    controller: Arc<ImeController>,
    host: Arc<SimulatedHost>,
}

impl Rig {
    fn new(kind: EngineKind) -> Self {
        let controller = Arc::new(ImeController::new(kind, true));
        let host = Arc::new(SimulatedHost::new());
        let injector: Arc<dyn TextInjector> = Arc::clone(&host) as Arc<dyn TextInjector>;
        let mut hook = MockKeyboardHook::new();
        hook.install(Interceptor::new(
            Arc::clone(&controller),
            injector,
            HotkeyDetector::default(),
        ))
        .expect("install mock hook");
        Self {
            hook,
            controller,
            host,
        }
    }

    /// Presses one key; keys that are not consumed reach the host as the OS
    /// would deliver them.
    fn press(&mut self, vk: u8, modifiers: ModifierFlags) {
        if !self.hook.press(vk, modifiers) {
            if let Some(keystroke) = KeyMapper::resolve(vk, modifiers) {
                self.host.deliver(&keystroke);
            }
        }
    }

    /// Types ASCII text as unshifted virtual keys (letters, digits, space).
    fn type_keys(&mut self, keys: &str) {
        for c in keys.chars() {
            let vk = match c {
                'a'..='z' => c.to_ascii_uppercase() as u8,
                '0'..='9' | ' ' => c as u8,
                _ => panic!("type_keys does not map {c:?}"),
            };
            self.press(vk, NONE);
        }
    }

    fn toggle_chord(&mut self) {
        let ctrl = ModifierFlags(ModifierFlags::CTRL);
        self.hook.send(RawKeyEvent::down(VK_LCTRL, NONE));
        self.hook.send(RawKeyEvent::down(VK_LSHIFT, ctrl));
        self.hook.send(RawKeyEvent::up(VK_LSHIFT, ctrl));
        self.hook.send(RawKeyEvent::up(VK_LCTRL, NONE));
    }
}

#[test]
fn test_telex_sentence_from_virtual_keys() {
    // Arrange
    let mut rig = Rig::new(EngineKind::Telex);

    // Act
    rig.type_keys("tieengs vieetj hay quas");

    // Assert
    assert_eq!(rig.host.text(), "tiếng việt hay quá");
}

#[test]
fn test_vni_sentence_from_virtual_keys() {
    let mut rig = Rig::new(EngineKind::Vni);

    rig.type_keys("nguoi72 vie65t");

    assert_eq!(rig.host.text(), "người việt");
}

#[test]
fn test_shift_produces_capitals() {
    // Arrange
    let mut rig = Rig::new(EngineKind::Telex);
    let shift = ModifierFlags(ModifierFlags::SHIFT);

    // Act
    rig.press(b'D', shift);
    rig.type_keys("dang");

    // Assert
    assert_eq!(rig.host.text(), "Đang");
}

#[test]
fn test_caps_lock_without_shift_produces_capitals() {
    let mut rig = Rig::new(EngineKind::Telex);
    let caps = ModifierFlags(ModifierFlags::CAPS_LOCK);

    for vk in [b'V', b'I', b'E', b'E', b'T', b'J'] {
        rig.press(vk, caps);
    }

    assert_eq!(rig.host.text(), "VIỆT");
}

#[test]
fn test_backspace_undoes_last_keystroke() {
    // Arrange
    let mut rig = Rig::new(EngineKind::Telex);
    rig.type_keys("hoas");

    // Act
    rig.press(VK_BACK, NONE);

    // Assert
    assert_eq!(rig.host.text(), "hoa");
    assert_eq!(rig.controller.composition(), "hoa");
}

#[test]
fn test_backspace_on_empty_buffer_reaches_host() {
    let mut rig = Rig::new(EngineKind::Telex);
    rig.type_keys("ab ");

    rig.press(VK_BACK, NONE);

    assert_eq!(rig.host.text(), "ab");
    assert_eq!(rig.controller.composition(), "");
}

#[test]
fn test_navigation_key_ends_the_word() {
    let mut rig = Rig::new(EngineKind::Telex);
    rig.type_keys("vie");

    rig.press(VK_LEFT, NONE);
    rig.type_keys("e");

    assert_eq!(rig.host.text(), "viee");
}

#[test]
fn test_unmapped_key_ends_the_word() {
    // Arrange
    let mut rig = Rig::new(EngineKind::Telex);
    rig.type_keys("vie");

    // Act: the ISO `<>` key is not in the VK table; the OS types `<` itself.
    rig.press(VK_OEM_102, NONE);
    rig.host.deliver(&Keystroke::Char('<'));
    rig.type_keys("e");

    // Assert
    assert_eq!(rig.controller.composition(), "e");
    assert_eq!(rig.host.text(), "vie<e");
}

#[test]
fn test_text_injected_by_other_software_ends_the_word() {
    let mut rig = Rig::new(EngineKind::Telex);
    rig.type_keys("vie");

    rig.press(VK_PACKET, NONE);
    rig.host.deliver(&Keystroke::Char('x'));
    rig.type_keys("es");

    assert_eq!(rig.host.text(), "viexé");
}

#[test]
fn test_ctrl_shortcut_is_not_composed() {
    let mut rig = Rig::new(EngineKind::Telex);
    rig.type_keys("ca");

    rig.press(b'S', ModifierFlags(ModifierFlags::CTRL));
    rig.type_keys("s");

    assert_eq!(rig.host.text(), "cas");
}

#[test]
fn test_hotkey_toggles_vietnamese_off_and_on() {
    // Arrange
    let mut rig = Rig::new(EngineKind::Telex);

    // Act
    rig.toggle_chord();
    rig.type_keys("vieetj ");
    rig.toggle_chord();
    rig.type_keys("vieetj");

    // Assert
    assert_eq!(rig.host.text(), "vieetj việt");
    assert!(rig.controller.is_enabled());
}

#[test]
fn test_click_abandons_composition() {
    let mut rig = Rig::new(EngineKind::Telex);
    rig.type_keys("vie");

    rig.hook.click();
    rig.type_keys("es");

    assert_eq!(rig.host.text(), "vieé");
}

#[test]
fn test_engine_switch_mid_word_starts_fresh() {
    let mut rig = Rig::new(EngineKind::Telex);
    rig.type_keys("ca");

    rig.controller.set_engine(EngineKind::Vni);
    rig.type_keys("a1");

    assert_eq!(rig.host.text(), "caá");
}

#[test]
fn test_injection_failure_passes_key_through() {
    // Arrange
    let mut rig = Rig::new(EngineKind::Telex);
    rig.type_keys("ho");
    rig.host.set_failing(true);

    // Act
    rig.type_keys("a");

    // Assert
    assert_eq!(rig.host.text(), "hoa");
    assert_eq!(rig.controller.composition(), "");
    assert!(rig.controller.is_enabled());
}

#[test]
fn test_revoked_hook_disables_and_reports() {
    // Arrange
    let mut rig = Rig::new(EngineKind::Telex);
    let mut events = rig.controller.subscribe();

    // Act
    rig.hook.revoke("hook timed out");
    rig.type_keys("as");

    // Assert
    assert!(!rig.controller.is_enabled());
    assert_eq!(rig.host.text(), "as");
    let first = tokio_test::block_on(events.recv()).unwrap();
    let second = tokio_test::block_on(events.recv()).unwrap();
    assert_eq!(first, ImeEvent::EnabledChanged(false));
    assert!(matches!(second, ImeEvent::Error(message) if message.contains("hook timed out")));
}

#[test]
fn test_space_is_passed_through_not_injected() {
    let mut rig = Rig::new(EngineKind::Telex);

    rig.press(VK_SPACE, NONE);

    assert_eq!(rig.host.text(), " ");
    assert!(rig.host.injections().is_empty());
}
