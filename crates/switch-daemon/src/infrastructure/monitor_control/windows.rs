//! Windows monitor control via the physical monitor enumeration and
//! DDC/CI high-level APIs (dxva2).
//!
//! Handles flow strictly through the use case's acquire/release pairing:
//! `GetPhysicalMonitorsFromHMONITOR` produces them, `DestroyPhysicalMonitor`
//! releases them, and nothing here caches an HMONITOR or a physical handle
//! across calls.

#![cfg(target_os = "windows")]

use std::ptr;

use switch_core::{InputSourceCode, INPUT_SELECT_VCP_CODE};
use tracing::trace;
use windows::Win32::Devices::Display::{
    DestroyPhysicalMonitor, GetNumberOfPhysicalMonitorsFromHMONITOR,
    GetPhysicalMonitorsFromHMONITOR, SetVCPFeature, PHYSICAL_MONITOR,
};
use windows::Win32::Foundation::{HANDLE, POINT};
use windows::Win32::Graphics::Gdi::{MonitorFromPoint, HMONITOR, MONITOR_DEFAULTTOPRIMARY};

use crate::application::switch_input::{DisplayError, DisplayPort, MonitorId, PhysicalHandle};

/// Windows implementation of [`DisplayPort`].
pub struct WindowsDisplayPort;

impl WindowsDisplayPort {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsDisplayPort {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for WindowsDisplayPort {
    fn primary_monitor(&self) -> Result<MonitorId, DisplayError> {
        // The primary monitor is the one covering the desktop origin.
        // SAFETY: MonitorFromPoint takes no pointers and is always safe to call
        let hmonitor =
            unsafe { MonitorFromPoint(POINT { x: 0, y: 0 }, MONITOR_DEFAULTTOPRIMARY) };
        if hmonitor.is_invalid() {
            return Err(DisplayError::NoPrimaryMonitor);
        }
        Ok(MonitorId(hmonitor.0 as isize))
    }

    fn acquire_physical_handles(
        &self,
        monitor: MonitorId,
    ) -> Result<Vec<PhysicalHandle>, DisplayError> {
        let hmonitor = HMONITOR(monitor.0 as _);

        let mut count: u32 = 0;
        // SAFETY: count is a valid out-pointer for the duration of the call
        unsafe {
            GetNumberOfPhysicalMonitorsFromHMONITOR(hmonitor, ptr::addr_of_mut!(count))
                .map_err(|e| DisplayError::EnumerationFailed(e.message()))?;
        }

        let mut monitors = vec![PHYSICAL_MONITOR::default(); count as usize];
        // SAFETY: monitors has exactly the length the API reported above
        unsafe {
            GetPhysicalMonitorsFromHMONITOR(hmonitor, &mut monitors)
                .map_err(|e| DisplayError::EnumerationFailed(e.message()))?;
        }

        Ok(monitors
            .iter()
            .map(|m| PhysicalHandle(m.hPhysicalMonitor.0 as isize))
            .collect())
    }

    fn set_input_source(&self, handle: PhysicalHandle, code: InputSourceCode) -> bool {
        // SAFETY: the handle was acquired by this switch attempt and is live
        let accepted =
            unsafe { SetVCPFeature(HANDLE(handle.0 as _), INPUT_SELECT_VCP_CODE, code.0) } != 0;
        trace!(handle = handle.0, accepted, "SetVCPFeature 0x60");
        accepted
    }

    fn release_physical_handles(&self, handles: &[PhysicalHandle]) {
        for &handle in handles {
            // Release failures leave nothing actionable; the handle is gone
            // either way once the attempt returns.
            // SAFETY: each handle is released exactly once
            let _ = unsafe { DestroyPhysicalMonitor(HANDLE(handle.0 as _)) };
        }
    }
}
