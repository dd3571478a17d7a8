//! Hotplug notification infrastructure.
//!
//! The listener owns the process's message loop: it subscribes to USB
//! device-interface arrival notifications and drives the
//! [`ArrivalPipeline`](crate::application::handle_arrival::ArrivalPipeline)
//! synchronously inside the dispatch callback. Events are delivered
//! serially, so no two pipeline runs ever overlap.

use thiserror::Error;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Error type for the hotplug listener lifecycle.
///
/// Registration failures are fatal to the process: the daemon has no
/// purpose without the notification subscription.
#[derive(Debug, Error)]
pub enum HotplugError {
    /// The listener window could not be created.
    #[error("listener window creation failed: {0}")]
    WindowCreation(String),

    /// The device notification subscription was rejected.
    #[error("device notification registration failed: {0}")]
    RegistrationFailed(String),

    /// The current platform has no device notification support.
    #[error("USB device notifications are not supported on this platform")]
    Unsupported,
}
