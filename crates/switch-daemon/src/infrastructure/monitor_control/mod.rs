//! Monitor control infrastructure.
//!
//! Implements [`DisplayPort`](crate::application::switch_input::DisplayPort):
//! physical monitor enumeration and the DDC/CI Input Source Select write.
//! The Windows implementation is selected at compile time; the mock is
//! always available for tests.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
