//! Wake-key selection.
//!
//! After a successful input switch the daemon presses one key to wake the
//! display from standby. The key depends on the session lock state; both
//! choices are deliberately inert keys that cannot trigger actions on a
//! lock screen or an active desktop.

/// The key pressed to generate a wake signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeKey {
    /// Up arrow — pressed while the session is locked.
    UpArrow,
    /// Alt (menu key) — pressed while the session is unlocked.
    Alt,
}

impl WakeKey {
    /// The Win32 virtual-key code for this key (`VK_UP` / `VK_MENU`).
    pub fn virtual_key(self) -> u16 {
        match self {
            WakeKey::UpArrow => 0x26,
            WakeKey::Alt => 0x12,
        }
    }

    /// Picks the wake key for the given lock state.
    pub fn for_lock_state(locked: bool) -> Self {
        if locked {
            WakeKey::UpArrow
        } else {
            WakeKey::Alt
        }
    }
}
