//! SwitchInputUseCase: drives the DDC/CI input switch on the primary display.
//!
//! The use case owns the switching policy; the [`DisplayPort`] trait hides
//! the OS monitor APIs. Physical monitor handles are enumerated fresh on
//! every attempt (monitor topology can change between hotplug events) and
//! are guaranteed to be released on every exit path by a drop guard, so the
//! released count always equals the acquired count even under partial
//! failure.

use std::sync::Arc;

use switch_core::InputSourceCode;
use thiserror::Error;
use tracing::debug;

/// Error type for the input switch operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// The monitor covering the desktop origin could not be resolved.
    #[error("no primary monitor could be resolved")]
    NoPrimaryMonitor,

    /// Counting or acquiring the physical monitor handles failed.
    #[error("physical monitor enumeration failed: {0}")]
    EnumerationFailed(String),

    /// Every physical handle rejected the input-source command.
    #[error("no physical monitor accepted the input source command")]
    NoHandleAccepted,
}

/// Result of a successful switch attempt.
///
/// A single accepting handle among several counts as overall success:
/// clone-mode duplicates of one panel report the same command redundantly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Succeeded,
}

/// Opaque token for the logical monitor covering the desktop origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorId(pub isize);

/// Opaque token for one physically connected display panel.
///
/// Handles are only valid between `acquire_physical_handles` and
/// `release_physical_handles` of the same switch attempt; they must never
/// be cached across events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalHandle(pub isize);

/// Trait over the OS monitor-control APIs.
///
/// The Windows implementation calls the physical-monitor enumeration and
/// `SetVCPFeature` APIs; the mock implementation records calls and induces
/// failures for tests.
pub trait DisplayPort: Send + Sync {
    /// Resolves the logical monitor covering the desktop's default origin.
    fn primary_monitor(&self) -> Result<MonitorId, DisplayError>;

    /// Acquires the full set of physical handles backing `monitor`.
    ///
    /// On error no handles were acquired, so there is nothing to release.
    fn acquire_physical_handles(
        &self,
        monitor: MonitorId,
    ) -> Result<Vec<PhysicalHandle>, DisplayError>;

    /// Writes the Input Source Select VCP feature (`0x60`) on one handle.
    /// Returns `true` if the monitor accepted the command.
    fn set_input_source(&self, handle: PhysicalHandle, code: InputSourceCode) -> bool;

    /// Releases previously acquired handles. Must tolerate being called
    /// with handles the OS has already invalidated.
    fn release_physical_handles(&self, handles: &[PhysicalHandle]);
}

/// Releases the acquired handle set when dropped, on every exit path.
struct HandleGuard<'a> {
    port: &'a dyn DisplayPort,
    handles: Vec<PhysicalHandle>,
}

impl Drop for HandleGuard<'_> {
    fn drop(&mut self) {
        self.port.release_physical_handles(&self.handles);
    }
}

/// The Switch Input use case.
pub struct SwitchInputUseCase {
    port: Arc<dyn DisplayPort>,
}

impl SwitchInputUseCase {
    /// Creates a new use case over the given display port.
    pub fn new(port: Arc<dyn DisplayPort>) -> Self {
        Self { port }
    }

    /// Switches the primary display to `code`.
    ///
    /// Attempts the VCP write on every physical handle backing the primary
    /// monitor; any single acceptance counts as success. One attempt per
    /// invocation, no retries.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError`] if the primary monitor cannot be resolved,
    /// enumeration fails, or no handle accepts the command.
    pub fn switch_input(&self, code: InputSourceCode) -> Result<SwitchOutcome, DisplayError> {
        let monitor = self.port.primary_monitor()?;
        let handles = self.port.acquire_physical_handles(monitor)?;
        debug!(count = handles.len(), "acquired physical monitor handles");

        let guard = HandleGuard {
            port: self.port.as_ref(),
            handles,
        };

        // Attempt every handle; OR-fold the per-handle acceptance. Per-handle
        // failures are not individually surfaced, only the aggregate outcome.
        let accepted = guard
            .handles
            .iter()
            .map(|&handle| self.port.set_input_source(handle, code))
            .fold(false, |any, ok| any || ok);

        drop(guard);

        if accepted {
            Ok(SwitchOutcome::Succeeded)
        } else {
            Err(DisplayError::NoHandleAccepted)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::monitor_control::mock::MockDisplayPort;

    #[test]
    fn test_switch_succeeds_when_all_handles_accept() {
        // Arrange
        let port = Arc::new(MockDisplayPort::accepting(3));
        let uc = SwitchInputUseCase::new(Arc::clone(&port) as Arc<dyn DisplayPort>);

        // Act
        let outcome = uc.switch_input(InputSourceCode(15));

        // Assert
        assert_eq!(outcome, Ok(SwitchOutcome::Succeeded));
        assert_eq!(port.set_calls.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_switch_attempts_every_handle_even_after_first_acceptance() {
        // Arrange – only the first handle accepts; the others must still be tried
        let port = Arc::new(MockDisplayPort::with_acceptance(vec![true, false, false]));
        let uc = SwitchInputUseCase::new(Arc::clone(&port) as Arc<dyn DisplayPort>);

        // Act
        let outcome = uc.switch_input(InputSourceCode(15));

        // Assert
        assert_eq!(outcome, Ok(SwitchOutcome::Succeeded));
        assert_eq!(port.set_calls.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_single_acceptance_among_rejections_counts_as_success() {
        // Arrange
        let port = Arc::new(MockDisplayPort::with_acceptance(vec![false, true, false]));
        let uc = SwitchInputUseCase::new(Arc::clone(&port) as Arc<dyn DisplayPort>);

        // Act + Assert
        assert_eq!(uc.switch_input(InputSourceCode(17)), Ok(SwitchOutcome::Succeeded));
    }

    #[test]
    fn test_all_rejections_yield_no_handle_accepted() {
        // Arrange
        let port = Arc::new(MockDisplayPort::with_acceptance(vec![false, false]));
        let uc = SwitchInputUseCase::new(Arc::clone(&port) as Arc<dyn DisplayPort>);

        // Act + Assert
        assert_eq!(
            uc.switch_input(InputSourceCode(15)),
            Err(DisplayError::NoHandleAccepted)
        );
    }

    #[test]
    fn test_no_primary_monitor_short_circuits_before_enumeration() {
        // Arrange
        let port = Arc::new(MockDisplayPort::failing_primary());
        let uc = SwitchInputUseCase::new(Arc::clone(&port) as Arc<dyn DisplayPort>);

        // Act
        let outcome = uc.switch_input(InputSourceCode(15));

        // Assert – nothing enumerated, nothing to release
        assert_eq!(outcome, Err(DisplayError::NoPrimaryMonitor));
        assert!(port.acquired.lock().unwrap().is_empty());
        assert!(port.released.lock().unwrap().is_empty());
    }

    #[test]
    fn test_released_count_equals_acquired_count_on_success() {
        // Arrange
        let port = Arc::new(MockDisplayPort::accepting(4));
        let uc = SwitchInputUseCase::new(Arc::clone(&port) as Arc<dyn DisplayPort>);

        // Act
        uc.switch_input(InputSourceCode(15)).unwrap();

        // Assert
        let acquired: usize = port.acquired.lock().unwrap().iter().map(Vec::len).sum();
        let released: usize = port.released.lock().unwrap().iter().map(Vec::len).sum();
        assert_eq!(acquired, 4);
        assert_eq!(released, acquired);
    }

    #[test]
    fn test_released_count_equals_acquired_count_when_every_handle_rejects() {
        // Arrange
        let port = Arc::new(MockDisplayPort::with_acceptance(vec![false, false, false]));
        let uc = SwitchInputUseCase::new(Arc::clone(&port) as Arc<dyn DisplayPort>);

        // Act
        let _ = uc.switch_input(InputSourceCode(15));

        // Assert – the failure path still releases the full handle set
        let acquired: usize = port.acquired.lock().unwrap().iter().map(Vec::len).sum();
        let released: usize = port.released.lock().unwrap().iter().map(Vec::len).sum();
        assert_eq!(acquired, 3);
        assert_eq!(released, acquired);
    }

    #[test]
    fn test_enumeration_failure_releases_nothing() {
        // Arrange
        let port = Arc::new(MockDisplayPort::failing_enumeration());
        let uc = SwitchInputUseCase::new(Arc::clone(&port) as Arc<dyn DisplayPort>);

        // Act
        let outcome = uc.switch_input(InputSourceCode(15));

        // Assert
        assert!(matches!(outcome, Err(DisplayError::EnumerationFailed(_))));
        assert!(port.released.lock().unwrap().is_empty());
    }

    #[test]
    fn test_handles_are_enumerated_fresh_on_every_attempt() {
        // Arrange
        let port = Arc::new(MockDisplayPort::accepting(2));
        let uc = SwitchInputUseCase::new(Arc::clone(&port) as Arc<dyn DisplayPort>);

        // Act – two independent switch attempts
        uc.switch_input(InputSourceCode(15)).unwrap();
        uc.switch_input(InputSourceCode(15)).unwrap();

        // Assert – two separate acquire/release rounds
        assert_eq!(port.acquired.lock().unwrap().len(), 2);
        assert_eq!(port.released.lock().unwrap().len(), 2);
    }
}
