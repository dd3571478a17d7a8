//! switch-daemon library entry point.
//!
//! Re-exports the module tree so that integration tests in `tests/` and the
//! binary entry point in `main.rs` share the same code.
//!
//! The daemon reacts to USB hotplug notifications: when a device matching
//! the configured vendor/product signature arrives, it switches the primary
//! display's input source over DDC/CI (VCP feature `0x60`), wakes the
//! display with a synthetic key press, and recenters the cursor onto the
//! now-active screen.
//!
//! The crate follows the application/infrastructure split: the application
//! layer holds the per-event pipeline and depends only on traits; the
//! infrastructure layer provides the Win32 adapters plus recording mocks
//! that compile on every platform.

/// Application layer: the switch and arrival-handling use cases.
pub mod application;

/// Infrastructure layer: OS adapters, hotplug listener, config loading.
pub mod infrastructure;
