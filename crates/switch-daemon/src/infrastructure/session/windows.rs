//! Windows session lock probing via the WTS (Remote Desktop Services) API.
//!
//! Enumerates every session on the local session host and reports locked
//! if any of them carries the lock flag. WTS buffers are freed on every
//! path; a failed query is inconclusive and reads as unlocked.

#![cfg(target_os = "windows")]

use std::ffi::c_void;
use std::ptr;
use std::slice;

use tracing::trace;
use windows::core::PWSTR;
use windows::Win32::System::RemoteDesktop::{
    WTSEnumerateSessionsW, WTSFreeMemory, WTSQuerySessionInformationW, WTSSessionInfoEx,
    WTSINFOEXW, WTS_CURRENT_SERVER_HANDLE, WTS_SESSIONSTATE_LOCK, WTS_SESSION_INFOW,
};

use crate::application::handle_arrival::SessionProbe;

/// Windows implementation of [`SessionProbe`] over the WTS API.
pub struct WtsSessionProbe;

impl WtsSessionProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WtsSessionProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProbe for WtsSessionProbe {
    fn any_session_locked(&self) -> bool {
        let mut sessions: *mut WTS_SESSION_INFOW = ptr::null_mut();
        let mut count: u32 = 0;

        // SAFETY: sessions/count are valid out-pointers; the returned buffer
        // is freed below with WTSFreeMemory
        let enumerated = unsafe {
            WTSEnumerateSessionsW(
                WTS_CURRENT_SERVER_HANDLE,
                0,
                1,
                ptr::addr_of_mut!(sessions),
                ptr::addr_of_mut!(count),
            )
        };
        if enumerated.is_err() || sessions.is_null() {
            // Inconclusive: degrade to unlocked semantics.
            return false;
        }

        // SAFETY: the API returned `count` entries at `sessions`
        let list = unsafe { slice::from_raw_parts(sessions, count as usize) };
        let locked = list.iter().any(|session| session_is_locked(session.SessionId));
        // SAFETY: buffer came from WTSEnumerateSessionsW
        unsafe { WTSFreeMemory(sessions as *mut c_void) };

        trace!(sessions = count, locked, "session lock probe");
        locked
    }
}

/// Queries the extended session info for one session and checks its lock flag.
fn session_is_locked(session_id: u32) -> bool {
    let mut buffer = PWSTR::null();
    let mut bytes: u32 = 0;

    // SAFETY: buffer/bytes are valid out-pointers; the returned buffer is
    // freed below with WTSFreeMemory
    let queried = unsafe {
        WTSQuerySessionInformationW(
            WTS_CURRENT_SERVER_HANDLE,
            session_id,
            WTSSessionInfoEx,
            ptr::addr_of_mut!(buffer),
            ptr::addr_of_mut!(bytes),
        )
    };
    if queried.is_err() || buffer.is_null() {
        return false;
    }

    // SAFETY: for WTSSessionInfoEx the buffer holds a WTSINFOEXW; the level-1
    // union member is the only one defined for Level == 1
    let locked = unsafe {
        let info = &*(buffer.as_ptr() as *const WTSINFOEXW);
        info.Level == 1
            && info.Data.WTSInfoExLevel1.SessionFlags == WTS_SESSIONSTATE_LOCK as i32
    };
    // SAFETY: buffer came from WTSQuerySessionInformationW
    unsafe { WTSFreeMemory(buffer.as_ptr() as *mut c_void) };

    locked
}
