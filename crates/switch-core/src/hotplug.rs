//! Hotplug event model.
//!
//! A [`HotplugEvent`] is the platform-neutral form of one OS device-change
//! notification. It is constructed by the notification layer for the
//! duration of a single callback and never retained.

/// The device-change subtype of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceChange {
    /// A device was connected (`DBT_DEVICEARRIVAL`).
    Arrival,
    /// A device was removed (`DBT_DEVICEREMOVECOMPLETE`).
    Removal,
    /// Any other device-change subtype (query, config change, ...).
    Other,
}

/// The broadcast class of the notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// A device interface notification (`DBT_DEVTYP_DEVICEINTERFACE`), the
    /// only class that carries an interface path.
    Interface,
    /// Volumes, OEM broadcasts, and everything else.
    Other,
}

/// One OS device-change notification, transient per callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotplugEvent {
    /// Arrival, removal, or other.
    pub change: DeviceChange,
    /// Broadcast payload class.
    pub device_type: DeviceType,
    /// The device interface path, e.g.
    /// `\\?\USB#VID_046D&PID_C52B#...`. Empty for non-interface payloads.
    pub interface_path: String,
}

impl HotplugEvent {
    /// Convenience constructor for an interface arrival.
    pub fn interface_arrival(path: impl Into<String>) -> Self {
        Self {
            change: DeviceChange::Arrival,
            device_type: DeviceType::Interface,
            interface_path: path.into(),
        }
    }
}
