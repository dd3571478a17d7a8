//! Mock input injector and cursor controller for unit testing.
//!
//! The real implementations synthesize OS input: they actually press keys
//! and move the cursor on the machine running the tests. The mocks record
//! every call in `Mutex<Vec<...>>` fields instead so assertions can check
//! exactly which keys were pressed and where the cursor went.

use std::sync::Mutex;

use switch_core::WakeKey;

use crate::application::handle_arrival::{CursorController, InjectionError, InputInjector};

/// An injector that records pressed keys instead of calling `SendInput`.
pub struct MockInputInjector {
    /// Records each key passed to `press_key`, one entry per down/up pair.
    pub presses: Mutex<Vec<WakeKey>>,
    /// When `true`, every press fails with `PartialSubmission`.
    pub should_fail: bool,
}

impl MockInputInjector {
    pub fn new() -> Self {
        Self {
            presses: Mutex::new(Vec::new()),
            should_fail: false,
        }
    }

    /// An injector whose input queue accepts only the key-down half.
    pub fn failing() -> Self {
        Self {
            presses: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }
}

impl Default for MockInputInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputInjector for MockInputInjector {
    fn press_key(&self, key: WakeKey) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::PartialSubmission {
                accepted: 1,
                expected: 2,
            });
        }
        self.presses.lock().unwrap().push(key);
        Ok(())
    }
}

/// A cursor controller with a fixed screen size that records moves.
pub struct MockCursorController {
    width: i32,
    height: i32,
    /// Records each (x, y) passed to `set_position`.
    pub moves: Mutex<Vec<(i32, i32)>>,
}

impl MockCursorController {
    /// A controller reporting the given primary screen resolution.
    pub fn with_screen(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            moves: Mutex::new(Vec::new()),
        }
    }
}

impl CursorController for MockCursorController {
    fn screen_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn set_position(&self, x: i32, y: i32) {
        self.moves.lock().unwrap().push((x, y));
    }
}
