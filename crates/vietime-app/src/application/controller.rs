//! ImeController: the single owner of the IME's runtime state.
//!
//! The keyboard hook thread calls [`ImeController::handle_keystroke`] for
//! every key while the control surface (tray, settings, console) calls
//! `toggle` / `set_engine` from the async runtime.  `enabled`, the active
//! engine and the composition buffer live under one `std::sync::Mutex`, so a
//! keystroke never observes a half-applied switch.
//!
//! State changes are published on a `tokio::sync::broadcast` channel.  Sending
//! never blocks; events are dropped when nobody is subscribed.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, error, info};
use vietime_core::{CompositionBuffer, EditCommand, Engine, EngineKind, Keystroke};

/// Capacity of the event channel.  Lagging subscribers lose the oldest events.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Notification emitted when the runtime state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImeEvent {
    EnabledChanged(bool),
    EngineChanged(EngineKind),
    /// The keyboard hook failed or was removed; the IME has been disabled.
    Error(String),
}

#[derive(Debug)]
struct RuntimeState {
    enabled: bool,
    engine: Engine,
    buffer: CompositionBuffer,
}

/// Owns `enabled`, the active engine and the composition buffer.
pub struct ImeController {
    state: Mutex<RuntimeState>,
    events: broadcast::Sender<ImeEvent>,
}

impl ImeController {
    /// Creates a controller with an empty buffer.
    pub fn new(kind: EngineKind, enabled: bool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(RuntimeState {
                enabled,
                engine: Engine::new(kind),
                buffer: CompositionBuffer::new(),
            }),
            events,
        }
    }

    /// Subscribes to state-change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ImeEvent> {
        self.events.subscribe()
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    pub fn engine(&self) -> EngineKind {
        self.lock().engine.kind()
    }

    /// Display name of the active engine (`"Telex"` or `"VNI"`).
    pub fn engine_name(&self) -> &'static str {
        self.lock().engine.name()
    }

    /// The rendered text of the word currently being composed.
    pub fn composition(&self) -> String {
        self.lock().buffer.render()
    }

    /// Flips the enabled flag, clears the buffer and returns the new state.
    pub fn toggle(&self) -> bool {
        let enabled = {
            let mut state = self.lock();
            state.enabled = !state.enabled;
            state.buffer.clear();
            state.enabled
        };
        info!(enabled, "IME toggled");
        self.emit(ImeEvent::EnabledChanged(enabled));
        enabled
    }

    /// Sets the enabled flag.  The buffer is cleared even if nothing changed.
    pub fn set_enabled(&self, enabled: bool) {
        let changed = {
            let mut state = self.lock();
            let changed = state.enabled != enabled;
            state.enabled = enabled;
            state.buffer.clear();
            changed
        };
        if changed {
            info!(enabled, "IME enabled state changed");
            self.emit(ImeEvent::EnabledChanged(enabled));
        }
    }

    /// Switches the active engine.  Always clears the buffer.
    pub fn set_engine(&self, kind: EngineKind) {
        let changed = {
            let mut state = self.lock();
            let changed = state.engine.kind() != kind;
            state.engine = Engine::new(kind);
            state.buffer.clear();
            changed
        };
        if changed {
            info!(engine = kind.name(), "input method changed");
            self.emit(ImeEvent::EngineChanged(kind));
        }
    }

    /// Runs one keystroke through the active engine.
    ///
    /// While disabled this is a strict no-op that returns passthrough.
    pub fn handle_keystroke(&self, keystroke: &Keystroke) -> EditCommand {
        let mut state = self.lock();
        if !state.enabled {
            return EditCommand::passthrough();
        }
        let buffer = std::mem::take(&mut state.buffer);
        let (next, command) = state.engine.process(buffer, keystroke);
        state.buffer = next;
        debug!(
            ?keystroke,
            delete = command.delete_count,
            insert = %command.insert_text,
            passthrough = command.passthrough,
            "keystroke processed"
        );
        command
    }

    /// Drops the current composition without touching the host text.
    pub fn reset_buffer(&self) {
        self.lock().buffer.clear();
    }

    /// Records a keyboard-hook failure: disables the IME and emits `Error`.
    pub fn report_hook_error(&self, message: impl Into<String>) {
        let message = message.into();
        error!(%message, "keyboard hook unavailable; IME disabled");
        let was_enabled = {
            let mut state = self.lock();
            let was_enabled = state.enabled;
            state.enabled = false;
            state.buffer.clear();
            was_enabled
        };
        if was_enabled {
            self.emit(ImeEvent::EnabledChanged(false));
        }
        self.emit(ImeEvent::Error(message));
    }

    fn lock(&self) -> MutexGuard<'_, RuntimeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ImeEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

impl Default for ImeController {
    fn default() -> Self {
        Self::new(EngineKind::default(), true)
    }
}
