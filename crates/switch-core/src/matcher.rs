//! Device matching rules.
//!
//! Decides whether one hotplug notification refers to the configured target
//! device. Pure predicate over two immutable inputs; no side effects.

use crate::config::TargetDeviceSpec;
use crate::hotplug::{DeviceChange, DeviceType, HotplugEvent};

/// Returns `true` iff `event` is a device-interface arrival whose interface
/// path contains both the configured vendor-id and product-id fragments.
///
/// Matching is case-sensitive substring containment, in any position and
/// order: interface paths carry firmware-reported identifiers verbatim, so
/// the configured fragments must mirror the OS path casing exactly.
/// A malformed or truncated path that is missing either fragment is a
/// non-match, not an error.
pub fn is_target_device(spec: &TargetDeviceSpec, event: &HotplugEvent) -> bool {
    if event.change != DeviceChange::Arrival || event.device_type != DeviceType::Interface {
        return false;
    }

    event.interface_path.contains(&spec.vendor_id)
        && event.interface_path.contains(&spec.product_id)
}
