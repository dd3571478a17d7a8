//! Windows hotplug listener: a hidden window subscribed to USB device
//! interface notifications.
//!
//! The window procedure decodes `WM_DEVICECHANGE` broadcasts into
//! [`HotplugEvent`]s and runs the pipeline inline, on the message-loop
//! thread. The loop runs until `WM_DESTROY`; the notification handle and
//! the window are torn down before `run` returns.

#![cfg(target_os = "windows")]

use std::cell::RefCell;
use std::ffi::c_void;
use std::mem;
use std::slice;

use switch_core::{DeviceChange, DeviceType, HotplugEvent};
use tracing::info;
use windows::core::{w, GUID};
use windows::Win32::Foundation::{HANDLE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW,
    PostQuitMessage, RegisterClassW, RegisterDeviceNotificationW, TranslateMessage,
    UnregisterClassW, UnregisterDeviceNotification, DBT_DEVICEARRIVAL,
    DBT_DEVICEREMOVECOMPLETE, DBT_DEVTYP_DEVICEINTERFACE, DEVICE_NOTIFY_WINDOW_HANDLE,
    DEV_BROADCAST_DEVICEINTERFACE_W, DEV_BROADCAST_HDR, MSG, WINDOW_EX_STYLE, WM_DESTROY,
    WM_DEVICECHANGE, WNDCLASSW, WS_OVERLAPPEDWINDOW,
};

use super::HotplugError;
use crate::application::handle_arrival::ArrivalPipeline;

/// Device interface class for USB devices,
/// `{A5DCBF10-6530-11D2-901F-00C04FB951ED}`.
const GUID_DEVINTERFACE_USB_DEVICE: GUID =
    GUID::from_u128(0xA5DCBF10_6530_11D2_901F_00C04FB951ED);

thread_local! {
    // The pipeline driven by the window procedure, set for the duration of
    // WindowsHotplugListener::run on the message-loop thread.
    static PIPELINE: RefCell<Option<ArrivalPipeline>> = const { RefCell::new(None) };
}

/// Owns the hidden listener window and the process message loop.
pub struct WindowsHotplugListener;

impl WindowsHotplugListener {
    /// Registers the USB notification subscription and blocks in the
    /// message loop, dispatching every arrival through `pipeline`, until a
    /// shutdown message destroys the window.
    ///
    /// # Errors
    ///
    /// Returns [`HotplugError`] if the window cannot be created or the
    /// subscription is rejected. Both are fatal: without the subscription
    /// the daemon has no purpose.
    pub fn run(pipeline: ArrivalPipeline) -> Result<(), HotplugError> {
        PIPELINE.with(|cell| *cell.borrow_mut() = Some(pipeline));

        let result = unsafe { message_loop() };

        PIPELINE.with(|cell| *cell.borrow_mut() = None);
        result
    }
}

unsafe fn message_loop() -> Result<(), HotplugError> {
    let instance = GetModuleHandleW(None)
        .map_err(|e| HotplugError::WindowCreation(e.message()))?;
    let class_name = w!("UsbDisplaySwitchListener");

    let wc = WNDCLASSW {
        lpfnWndProc: Some(wndproc),
        hInstance: instance.into(),
        lpszClassName: class_name,
        ..Default::default()
    };
    RegisterClassW(&wc);

    // Hidden window: created but never shown, it exists only to receive
    // WM_DEVICECHANGE broadcasts.
    let hwnd = CreateWindowExW(
        WINDOW_EX_STYLE(0),
        class_name,
        w!("USB Display Switch"),
        WS_OVERLAPPEDWINDOW,
        0,
        0,
        0,
        0,
        None,
        None,
        Some(instance.into()),
        None,
    )
    .map_err(|e| HotplugError::WindowCreation(e.message()))?;

    let filter = DEV_BROADCAST_DEVICEINTERFACE_W {
        dbcc_size: mem::size_of::<DEV_BROADCAST_DEVICEINTERFACE_W>() as u32,
        dbcc_devicetype: DBT_DEVTYP_DEVICEINTERFACE.0,
        dbcc_reserved: 0,
        dbcc_classguid: GUID_DEVINTERFACE_USB_DEVICE,
        dbcc_name: [0],
    };
    let notification = RegisterDeviceNotificationW(
        HANDLE(hwnd.0),
        &filter as *const _ as *const c_void,
        DEVICE_NOTIFY_WINDOW_HANDLE,
    )
    .map_err(|e| {
        let _ = DestroyWindow(hwnd);
        let _ = UnregisterClassW(class_name, Some(instance.into()));
        HotplugError::RegistrationFailed(e.message())
    })?;

    info!("listening for USB device interface arrivals");

    let mut msg = MSG::default();
    while GetMessageW(&mut msg, None, 0, 0).as_bool() {
        let _ = TranslateMessage(&msg);
        DispatchMessageW(&msg);
    }

    let _ = UnregisterDeviceNotification(notification);
    let _ = DestroyWindow(hwnd);
    let _ = UnregisterClassW(class_name, Some(instance.into()));

    info!("hotplug listener stopped");
    Ok(())
}

extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe {
        match msg {
            WM_DEVICECHANGE => {
                if let Some(event) = decode_device_change(wparam, lparam) {
                    PIPELINE.with(|cell| {
                        if let Some(pipeline) = cell.borrow().as_ref() {
                            // Synchronous: the next notification is not
                            // dispatched until this event completes.
                            pipeline.handle_event(&event);
                        }
                    });
                }
                LRESULT(0)
            }

            WM_DESTROY => {
                PostQuitMessage(0);
                LRESULT(0)
            }

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}

/// Decodes one `WM_DEVICECHANGE` broadcast into a [`HotplugEvent`].
///
/// Returns `None` for subtypes that carry no broadcast payload (queries,
/// config changes with a null lparam).
unsafe fn decode_device_change(wparam: WPARAM, lparam: LPARAM) -> Option<HotplugEvent> {
    if lparam.0 == 0 {
        return None;
    }

    let change = match wparam.0 as u32 {
        DBT_DEVICEARRIVAL => DeviceChange::Arrival,
        DBT_DEVICEREMOVECOMPLETE => DeviceChange::Removal,
        _ => DeviceChange::Other,
    };

    // SAFETY: a non-null lparam on WM_DEVICECHANGE points at a
    // DEV_BROADCAST_HDR describing the payload
    let header = &*(lparam.0 as *const DEV_BROADCAST_HDR);
    let (device_type, interface_path) = if header.dbch_devicetype == DBT_DEVTYP_DEVICEINTERFACE {
        let broadcast = &*(lparam.0 as *const DEV_BROADCAST_DEVICEINTERFACE_W);
        (DeviceType::Interface, interface_path(broadcast))
    } else {
        (DeviceType::Other, String::new())
    };

    Some(HotplugEvent {
        change,
        device_type,
        interface_path,
    })
}

/// Reads the variable-length, NUL-terminated `dbcc_name` field.
unsafe fn interface_path(broadcast: &DEV_BROADCAST_DEVICEINTERFACE_W) -> String {
    // Fixed-size prefix before dbcc_name: size + devicetype + reserved + GUID.
    let prefix = mem::size_of::<u32>() * 3 + mem::size_of::<GUID>();
    let name_len = (broadcast.dbcc_size as usize).saturating_sub(prefix) / mem::size_of::<u16>();

    // SAFETY: dbcc_size covers the full variable-length structure
    let wide = slice::from_raw_parts(broadcast.dbcc_name.as_ptr(), name_len);
    let end = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..end])
}
