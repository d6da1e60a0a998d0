//! Windows low-level keyboard and mouse hook implementation.
//!
//! This module installs `WH_KEYBOARD_LL` and `WH_MOUSE_LL` hooks on a
//! dedicated Win32 message-loop thread.  The [`Interceptor`] is moved onto that
//! thread and stored in a thread-local, so the callbacks reach it without any
//! lock or global sender.
//!
//! # Hook loss
//!
//! Loss is only reported when `GetMessageW` itself fails.  Windows also
//! removes a low-level hook without notice when one callback runs longer than
//! `LowLevelHooksTimeout`.  No API reports that removal, so the hook stops
//! receiving keys while [`KeyboardHook::is_installed`] still returns `true`
//! and no `Error` event is emitted.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::cell::RefCell;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};
use vietime_core::ModifierFlags;
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, GetKeyState, VK_CAPITAL, VK_CONTROL, VK_LWIN, VK_MENU, VK_RWIN, VK_SHIFT,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, MSG,
    MSLLHOOKSTRUCT, PM_NOREMOVE, WH_KEYBOARD_LL, WH_MOUSE_LL, WM_KEYDOWN, WM_KEYUP,
    WM_LBUTTONDOWN, WM_MBUTTONDOWN, WM_QUIT, WM_RBUTTONDOWN, WM_SYSKEYDOWN, WM_SYSKEYUP,
    WM_USER,
};

use super::{HookError, KeyboardHook};
use crate::application::intercept::{Interceptor, RawKeyEvent};
use crate::infrastructure::text_injection::INJECTED_MARKER;

thread_local! {
    /// The interceptor owned by the hook thread.  Only the hook callbacks,
    /// which Windows invokes on this thread, ever touch it.
    static INTERCEPTOR: RefCell<Option<Interceptor>> = const { RefCell::new(None) };
}

/// Windows low-level keyboard hook.
#[derive(Default)]
pub struct WindowsKeyboardHook {
    thread: Option<JoinHandle<()>>,
    thread_id: u32,
}

impl WindowsKeyboardHook {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyboardHook for WindowsKeyboardHook {
    fn install(&mut self, interceptor: Interceptor) -> Result<(), HookError> {
        if self.thread.is_some() {
            return Err(HookError::AlreadyInstalled);
        }

        let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, HookError>>();
        let handle = thread::Builder::new()
            .name("vietime-hook-loop".to_string())
            .spawn(move || run_hook_message_loop(interceptor, ready_tx))
            .map_err(|e| HookError::InstallFailed(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => {
                self.thread = Some(handle);
                self.thread_id = thread_id;
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(HookError::InstallFailed(
                    "hook thread exited before reporting".to_string(),
                ))
            }
        }
    }

    fn dispose(&mut self) {
        let Some(handle) = self.thread.take() else {
            return;
        };
        // SAFETY: PostThreadMessageW only enqueues a message; the thread id
        // belongs to the hook thread, which created its queue before reporting.
        let posted =
            unsafe { PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) };
        if let Err(e) = posted {
            warn!(error = %e, "failed to stop hook thread");
            return;
        }
        let _ = handle.join();
        debug!("keyboard hook disposed");
    }

    fn is_installed(&self) -> bool {
        self.thread.is_some()
    }
}

impl Drop for WindowsKeyboardHook {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Entry point for the dedicated Win32 message loop thread.
fn run_hook_message_loop(interceptor: Interceptor, ready: Sender<Result<u32, HookError>>) {
    let controller = Arc::clone(interceptor.controller());
    INTERCEPTOR.with(|slot| *slot.borrow_mut() = Some(interceptor));

    let mut msg = MSG::default();
    // SAFETY: Standard thread-queue creation; PM_NOREMOVE leaves the queue untouched.
    let thread_id = unsafe {
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
        GetCurrentThreadId()
    };

    // SAFETY: SetWindowsHookExW requires the calling thread to run a message loop,
    // which this thread does below.
    let keyboard: HHOOK = match unsafe {
        SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), None, 0)
    } {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(HookError::InstallFailed(e.to_string())));
            return;
        }
    };
    // Click resets are a nicety; typing still works without the mouse hook.
    // SAFETY: as above.
    let mouse: Option<HHOOK> =
        match unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) } {
            Ok(hook) => Some(hook),
            Err(e) => {
                warn!(error = %e, "mouse hook unavailable; clicks will not reset the composition");
                None
            }
        };

    let _ = ready.send(Ok(thread_id));

    // Win32 message loop – blocks until WM_QUIT is posted.
    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern.
    unsafe {
        loop {
            match GetMessageW(&mut msg, None, 0, 0).0 {
                0 => break,
                -1 => {
                    let error = HookError::Lost("GetMessageW failed".to_string());
                    controller.report_hook_error(error.to_string());
                    break;
                }
                _ => {
                    DispatchMessageW(&msg);
                }
            }
        }
        let _ = UnhookWindowsHookEx(keyboard);
        if let Some(mouse) = mouse {
            let _ = UnhookWindowsHookEx(mouse);
        }
    }

    INTERCEPTOR.with(|slot| slot.borrow_mut().take());
}

/// Samples the live modifier and CapsLock state.
fn current_modifiers() -> ModifierFlags {
    // SAFETY: GetAsyncKeyState/GetKeyState only read input state.
    let down = |vk: i32| unsafe { GetAsyncKeyState(vk) } < 0;
    let mut flags = 0u8;
    if down(VK_SHIFT.0 as i32) {
        flags |= ModifierFlags::SHIFT;
    }
    if down(VK_CONTROL.0 as i32) {
        flags |= ModifierFlags::CTRL;
    }
    if down(VK_MENU.0 as i32) {
        flags |= ModifierFlags::ALT;
    }
    if down(VK_LWIN.0 as i32) || down(VK_RWIN.0 as i32) {
        flags |= ModifierFlags::META;
    }
    // SAFETY: as above.
    if unsafe { GetKeyState(VK_CAPITAL.0 as i32) } & 1 != 0 {
        flags |= ModifierFlags::CAPS_LOCK;
    }
    ModifierFlags(flags)
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// This function is called by Windows from the hook message loop thread.
/// It must return quickly (< ~300ms) to avoid hook removal by the OS.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
    let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);

    // Our own SendInput output must reach the application untouched.
    if kbs.dwExtraInfo == INJECTED_MARKER {
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    let is_key_down = match w_param.0 as u32 {
        WM_KEYDOWN | WM_SYSKEYDOWN => true,
        WM_KEYUP | WM_SYSKEYUP => false,
        _ => return CallNextHookEx(None, n_code, w_param, l_param),
    };
    let event = RawKeyEvent {
        vk_code: kbs.vkCode as u8,
        modifiers: current_modifiers(),
        is_key_down,
    };

    // A re-entrant call (the slot is already borrowed) is passed through.
    let consumed = INTERCEPTOR.with(|slot| {
        slot.try_borrow_mut()
            .ok()
            .and_then(|mut guard| guard.as_mut().map(|i| i.on_key_event(&event)))
            .unwrap_or(false)
    });
    if consumed {
        return LRESULT(1);
    }

    // SAFETY: Forward the event to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}

/// Low-level mouse hook callback.  Any button press ends the composition.
///
/// # Safety
///
/// Called by Windows from the hook message loop thread; must return quickly.
unsafe extern "system" fn mouse_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code == HC_ACTION as i32 {
        // SAFETY: l_param points to a MSLLHOOKSTRUCT when n_code == HC_ACTION.
        let mhs = &*(l_param.0 as *const MSLLHOOKSTRUCT);
        let is_press = matches!(
            w_param.0 as u32,
            WM_LBUTTONDOWN | WM_RBUTTONDOWN | WM_MBUTTONDOWN
        );
        if is_press && mhs.dwExtraInfo != INJECTED_MARKER {
            INTERCEPTOR.with(|slot| {
                if let Ok(guard) = slot.try_borrow() {
                    if let Some(interceptor) = guard.as_ref() {
                        interceptor.on_pointer_down();
                    }
                }
            });
        }
    }

    // SAFETY: Mouse events are never consumed; forward to the next hook.
    CallNextHookEx(None, n_code, w_param, l_param)
}
