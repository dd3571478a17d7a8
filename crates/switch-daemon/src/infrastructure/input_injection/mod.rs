//! Input injection infrastructure.
//!
//! Implements [`InputInjector`](crate::application::handle_arrival::InputInjector)
//! (the wake key press) and
//! [`CursorController`](crate::application::handle_arrival::CursorController)
//! (the post-switch cursor recenter).

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
