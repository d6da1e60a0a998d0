//! Control-surface command bridge: exposes runtime operations to a tray menu,
//! settings window, or the headless console.
//!
//! Every command here delegates to the shared [`AppState`].  The presentation
//! layer is the only consumer of this module; it must NOT be imported by the
//! application or domain layers.
//!
//! # Data Transfer Objects (DTOs)
//!
//! DTOs (`StatusDto`, `EventDto`) contain only JSON-serialisable fields so a
//! web or native front end can consume them directly.
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>`.
//! This ensures every command response has the same shape:
//! `{ success: bool, data: T | null, error: string | null }`.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use vietime_core::EngineKind;

use crate::application::controller::{ImeController, ImeEvent};
use crate::infrastructure::storage::config::{save_config_to, AppConfig};

// ── Shared application state ──────────────────────────────────────────────────

/// Application state shared between control-surface commands.
///
/// `config` uses the async Tokio mutex because commands run on the runtime;
/// the controller has its own synchronous lock shared with the hook thread.
pub struct AppState {
    pub controller: Arc<ImeController>,
    /// The preferences as last loaded or saved.
    pub config: Mutex<AppConfig>,
    /// Where `save_preferences` writes.
    pub config_path: PathBuf,
}

impl AppState {
    pub fn new(
        controller: Arc<ImeController>,
        config: AppConfig,
        config_path: PathBuf,
    ) -> Arc<Self> {
        Arc::new(Self {
            controller,
            config: Mutex::new(config),
            config_path,
        })
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// Snapshot of the runtime state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDto {
    pub enabled: bool,
    /// `"Telex"` or `"VNI"`.
    pub input_method: String,
    pub tooltip: String,
}

impl StatusDto {
    fn from_controller(controller: &ImeController) -> Self {
        let enabled = controller.is_enabled();
        let input_method = controller.engine_name();
        Self {
            enabled,
            input_method: input_method.to_string(),
            tooltip: tray_tooltip(enabled, input_method),
        }
    }
}

/// A runtime event as pushed to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventDto {
    EnabledChanged { enabled: bool },
    EngineChanged { input_method: String },
    Error { message: String },
}

impl From<&ImeEvent> for EventDto {
    fn from(event: &ImeEvent) -> Self {
        match event {
            ImeEvent::EnabledChanged(enabled) => EventDto::EnabledChanged { enabled: *enabled },
            ImeEvent::EngineChanged(kind) => EventDto::EngineChanged {
                input_method: kind.name().to_string(),
            },
            ImeEvent::Error(message) => EventDto::Error {
                message: message.clone(),
            },
        }
    }
}

impl EventDto {
    /// Balloon notification `(title, body)` for this event.
    pub fn notification(&self) -> (String, String) {
        match self {
            EventDto::EnabledChanged { enabled } => (
                "VietIME".to_string(),
                if *enabled { "Đã bật" } else { "Đã tắt" }.to_string(),
            ),
            EventDto::EngineChanged { input_method } => (
                "Đổi kiểu gõ".to_string(),
                format!("Đã chuyển sang {input_method}"),
            ),
            EventDto::Error { message } => ("VietIME - Lỗi".to_string(), message.clone()),
        }
    }
}

/// Unified response wrapper used by control-surface commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Tray tooltip text.
pub fn tray_tooltip(enabled: bool, input_method: &str) -> String {
    if enabled {
        format!("VietIME - Bật ({input_method})")
    } else {
        "VietIME - Tắt".to_string()
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns the current enabled flag and input method.
pub async fn get_status(state: Arc<AppState>) -> CommandResult<StatusDto> {
    CommandResult::ok(StatusDto::from_controller(&state.controller))
}

/// Flips Vietnamese typing on or off.
pub async fn toggle_ime(state: Arc<AppState>) -> CommandResult<StatusDto> {
    state.controller.toggle();
    CommandResult::ok(StatusDto::from_controller(&state.controller))
}

/// Switches the input method by name (`"telex"` or `"vni"`, any case).
pub async fn set_input_method(state: Arc<AppState>, name: String) -> CommandResult<StatusDto> {
    let kind: EngineKind = match name.parse() {
        Ok(kind) => kind,
        Err(e) => return CommandResult::err(format!("{e}")),
    };
    state.controller.set_engine(kind);
    state.config.lock().await.general.input_method = kind;
    CommandResult::ok(StatusDto::from_controller(&state.controller))
}

/// Persists the current input method and enabled flag as the startup
/// preferences.
pub async fn save_preferences(state: Arc<AppState>) -> CommandResult<()> {
    let mut cfg = state.config.lock().await;
    cfg.general.input_method = state.controller.engine();
    cfg.general.start_enabled = state.controller.is_enabled();

    if let Err(e) = save_config_to(&state.config_path, &cfg) {
        return CommandResult::err(format!("failed to save config: {e}"));
    }
    info!(path = %state.config_path.display(), "preferences saved");
    CommandResult::ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
