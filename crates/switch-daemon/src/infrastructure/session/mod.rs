//! Session lock probing infrastructure.
//!
//! Implements [`SessionProbe`](crate::application::handle_arrival::SessionProbe)
//! over the local session host.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
