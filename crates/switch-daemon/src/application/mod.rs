//! Application layer: use cases for the daemon.
//!
//! Each use case depends only on traits and domain types from
//! `switch-core`; the OS implementations live in the infrastructure layer
//! and are injected at construction time.

pub mod handle_arrival;
pub mod switch_input;
