//! Windows input injection via the SendInput API and cursor control via
//! SetCursorPos.
//!
//! The wake press submits the key-down and key-up records in a single
//! `SendInput` batch; Windows reports how many it accepted, and anything
//! short of both is a partial submission.

#![cfg(target_os = "windows")]

use std::mem;

use switch_core::WakeKey;
use tracing::debug;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SetCursorPos, SM_CXSCREEN, SM_CYSCREEN,
};

use crate::application::handle_arrival::{CursorController, InjectionError, InputInjector};

/// Windows implementation of [`InputInjector`] using SendInput.
pub struct SendInputInjector;

impl SendInputInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SendInputInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputInjector for SendInputInjector {
    fn press_key(&self, key: WakeKey) -> Result<(), InjectionError> {
        let vk = VIRTUAL_KEY(key.virtual_key());
        let inputs = [key_input(vk, false), key_input(vk, true)];

        // SAFETY: inputs is a valid INPUT array on the stack
        let accepted =
            unsafe { SendInput(&inputs, mem::size_of::<INPUT>() as i32) };
        if accepted as usize != inputs.len() {
            return Err(InjectionError::PartialSubmission {
                accepted,
                expected: inputs.len() as u32,
            });
        }
        Ok(())
    }
}

/// Builds one keyboard INPUT record for the given virtual key.
fn key_input(vk: VIRTUAL_KEY, key_up: bool) -> INPUT {
    let flags = if key_up {
        KEYEVENTF_KEYUP
    } else {
        KEYBD_EVENT_FLAGS(0)
    };
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

/// Windows implementation of [`CursorController`] over the primary screen.
pub struct WindowsCursorController;

impl WindowsCursorController {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsCursorController {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorController for WindowsCursorController {
    fn screen_size(&self) -> (i32, i32) {
        // SAFETY: GetSystemMetrics is always safe to call
        let width = unsafe { GetSystemMetrics(SM_CXSCREEN) };
        let height = unsafe { GetSystemMetrics(SM_CYSCREEN) };
        (width, height)
    }

    fn set_position(&self, x: i32, y: i32) {
        // SAFETY: SetCursorPos takes no pointers
        if let Err(e) = unsafe { SetCursorPos(x, y) } {
            debug!("SetCursorPos({x}, {y}) failed: {e}");
        }
    }
}
