//! # switch-core
//!
//! Shared library for the USB display switch daemon containing the
//! configuration model, the hotplug event model, and the device matching
//! rules.
//!
//! This crate is pure domain logic: it has zero dependencies on OS APIs,
//! so every rule in it can be unit-tested on any platform. The daemon crate
//! (`switch-daemon`) layers the Win32 adapters on top.

pub mod config;
pub mod hotplug;
pub mod matcher;
pub mod wake;

// Re-export the most-used types at the crate root so callers can write
// `switch_core::DaemonConfig` instead of `switch_core::config::DaemonConfig`.
pub use config::{
    ConfigParseError, DaemonConfig, InputSourceCode, TargetDeviceSpec, INPUT_SELECT_VCP_CODE,
};
pub use hotplug::{DeviceChange, DeviceType, HotplugEvent};
pub use matcher::is_target_device;
pub use wake::WakeKey;
