//! VietIME entry point.
//!
//! Wires together configuration, the runtime controller, the keyboard hook and
//! the text injector, then runs the Tokio async event loop.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()              -- preferences, log level, hotkey
//!  └─ ImeController::new()       -- enabled flag + engine + buffer
//!  └─ event pump (Tokio task)    -- ImeEvent -> tray tooltip / notifications
//!  └─ run()
//!       ├─ Windows:   WindowsKeyboardHook + WindowsTextInjector, until Ctrl-C
//!       └─ elsewhere: headless console over a simulated text field
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vietime_app::application::controller::ImeController;
use vietime_app::application::hotkey::HotkeyDetector;
use vietime_app::infrastructure::storage::config::{config_file_path, load_config, AppConfig};
use vietime_app::infrastructure::ui_bridge::{tray_tooltip, AppState, EventDto};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config first: it carries the default log level.
    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialise structured logging.  `RUST_LOG` overrides the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    info!("VietIME starting");
    if let Some(e) = config_error {
        warn!(error = %e, "could not load config; using defaults");
    }

    let config_path = config_file_path().unwrap_or_else(|_| PathBuf::from("vietime.toml"));
    let controller = Arc::new(ImeController::new(
        config.general.input_method,
        config.general.start_enabled,
    ));
    let hotkey = HotkeyDetector::new(config.hotkey.chord());
    info!(
        input_method = controller.engine_name(),
        enabled = controller.is_enabled(),
        hotkey = %hotkey.chord(),
        "{}",
        tray_tooltip(controller.is_enabled(), controller.engine_name())
    );
    let state = AppState::new(Arc::clone(&controller), config, config_path);

    // ── Event pump ────────────────────────────────────────────────────────────
    let mut events = controller.subscribe();
    let pump_controller = Arc::clone(&controller);
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let dto = EventDto::from(&event);
                    let (title, body) = dto.notification();
                    let tooltip =
                        tray_tooltip(pump_controller.is_enabled(), pump_controller.engine_name());
                    info!(
                        %title,
                        %body,
                        %tooltip,
                        payload = %serde_json::to_string(&dto).unwrap_or_default(),
                        "state changed"
                    );
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event pump lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    run(state, hotkey).await?;

    info!("VietIME stopped");
    Ok(())
}

#[cfg(target_os = "windows")]
async fn run(state: Arc<AppState>, hotkey: HotkeyDetector) -> anyhow::Result<()> {
    use vietime_app::application::intercept::Interceptor;
    use vietime_app::infrastructure::input_capture::windows::WindowsKeyboardHook;
    use vietime_app::infrastructure::input_capture::{install_hook, KeyboardHook};
    use vietime_app::infrastructure::text_injection::windows::WindowsTextInjector;

    let controller = Arc::clone(&state.controller);
    let chord = hotkey.chord();
    let interceptor = Interceptor::new(
        Arc::clone(&controller),
        Arc::new(WindowsTextInjector::new()),
        hotkey,
    );
    let mut hook = WindowsKeyboardHook::new();
    if !install_hook(&mut hook, interceptor, &controller) {
        anyhow::bail!("keyboard hook unavailable");
    }

    info!("VietIME ready.  Press {chord} to toggle, Ctrl-C to exit.");
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    hook.dispose();
    Ok(())
}

#[cfg(not(target_os = "windows"))]
async fn run(state: Arc<AppState>, hotkey: HotkeyDetector) -> anyhow::Result<()> {
    use tokio::io::{AsyncBufReadExt, BufReader};
    use vietime_app::application::intercept::{Interceptor, TextInjector};
    use vietime_app::infrastructure::console::{Console, ConsoleReply, HELP};
    use vietime_app::infrastructure::input_capture::mock::MockKeyboardHook;
    use vietime_app::infrastructure::input_capture::{install_hook, KeyboardHook};
    use vietime_app::infrastructure::text_injection::mock::SimulatedHost;

    info!("no system-wide keyboard hook on this platform; starting headless console");

    let controller = Arc::clone(&state.controller);
    let host = Arc::new(SimulatedHost::new());
    let injector: Arc<dyn TextInjector> = Arc::clone(&host) as Arc<dyn TextInjector>;
    let interceptor = Interceptor::new(Arc::clone(&controller), injector, hotkey);
    let mut hook = MockKeyboardHook::new();
    if !install_hook(&mut hook, interceptor, &controller) {
        anyhow::bail!("keyboard hook unavailable");
    }
    let mut console = Console::new(state, hook, host);

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match console.execute(&line).await {
                    ConsoleReply::Output(text) => println!("{text}"),
                    ConsoleReply::Quit => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    console.hook_mut().dispose();
    Ok(())
}
