//! Infrastructure layer: OS adapters and recording mocks.
//!
//! Each submodule pairs a Win32 implementation (compiled only on Windows)
//! with a mock that records calls in memory; the mocks compile everywhere
//! and back the unit and integration tests.

pub mod hotplug;
pub mod input_injection;
pub mod monitor_control;
pub mod session;
pub mod storage;
