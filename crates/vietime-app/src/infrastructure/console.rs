//! Headless console front end.
//!
//! Used where no system-wide keyboard hook exists (every non-Windows build)
//! and handy for trying the engines on Windows too.  Each input line is either
//! a `:command` routed to the [`ui_bridge`](super::ui_bridge) commands, or
//! text that is typed key by key through the interceptor into a
//! [`SimulatedHost`].  The line ends the word as Enter would.

use std::sync::Arc;

use vietime_core::Keystroke;

use super::input_capture::mock::MockKeyboardHook;
use super::text_injection::mock::SimulatedHost;
use super::ui_bridge::{
    get_status, save_preferences, set_input_method, toggle_ime, AppState, CommandResult,
    StatusDto,
};

pub const HELP: &str = "\
Type Vietnamese with Telex or VNI keys and press Enter, e.g. `vieetj nam`.
Commands:
  :toggle    turn Vietnamese typing on or off
  :telex     switch to Telex
  :vni       switch to VNI
  :status    show the current state
  :save      save the current state as the startup preferences
  :help      show this text
  :quit      exit";

/// Result of one console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleReply {
    Output(String),
    Quit,
}

/// Console session: the hook it types through and the text field it types into.
pub struct Console {
    state: Arc<AppState>,
    hook: MockKeyboardHook,
    host: Arc<SimulatedHost>,
}

impl Console {
    /// `hook` must already have an interceptor installed that injects into `host`.
    pub fn new(state: Arc<AppState>, hook: MockKeyboardHook, host: Arc<SimulatedHost>) -> Self {
        Self { state, hook, host }
    }

    pub fn hook_mut(&mut self) -> &mut MockKeyboardHook {
        &mut self.hook
    }

    /// Handles one line of input.
    pub async fn execute(&mut self, line: &str) -> ConsoleReply {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(command) = line.strip_prefix(':') else {
            return ConsoleReply::Output(self.type_line(line));
        };
        let state = Arc::clone(&self.state);
        match command.trim() {
            "toggle" => status_reply(toggle_ime(state).await),
            "telex" => status_reply(set_input_method(state, "telex".to_string()).await),
            "vni" => status_reply(set_input_method(state, "vni".to_string()).await),
            "status" => status_reply(get_status(state).await),
            "save" => match save_preferences(state).await {
                CommandResult { success: true, .. } => ConsoleReply::Output("saved".to_string()),
                CommandResult { error, .. } => {
                    ConsoleReply::Output(error.unwrap_or_else(|| "save failed".to_string()))
                }
            },
            "help" => ConsoleReply::Output(HELP.to_string()),
            "quit" | "q" => ConsoleReply::Quit,
            other => ConsoleReply::Output(format!("unknown command :{other} (try :help)")),
        }
    }

    fn type_line(&mut self, line: &str) -> String {
        self.host.clear();
        for c in line.chars() {
            let keystroke = Keystroke::from(c);
            if !self.hook.keystroke(&keystroke) {
                self.host.deliver(&keystroke);
            }
        }
        // Enter ends the word.
        self.hook.keystroke(&Keystroke::Control);
        self.host.text()
    }
}

fn status_reply(result: CommandResult<StatusDto>) -> ConsoleReply {
    match (result.data, result.error) {
        (Some(status), _) => ConsoleReply::Output(status.tooltip),
        (None, error) => ConsoleReply::Output(error.unwrap_or_default()),
    }
}
