//! Mock display port for unit testing.
//!
//! The real port talks to physical monitors over DDC/CI, which requires
//! hardware and actually switches video inputs. The mock records every
//! acquire, release, and VCP write in `Mutex<Vec<...>>` fields so tests can
//! assert exactly what happened — in particular that the released handle
//! count always equals the acquired count.

use std::sync::Mutex;

use switch_core::InputSourceCode;

use crate::application::switch_input::{DisplayError, DisplayPort, MonitorId, PhysicalHandle};

/// A mock display port with configurable failures and per-handle acceptance.
pub struct MockDisplayPort {
    /// When `true`, `primary_monitor` fails with `NoPrimaryMonitor`.
    pub fail_primary: bool,
    /// When `true`, `acquire_physical_handles` fails with `EnumerationFailed`.
    pub fail_enumeration: bool,
    /// Per-handle acceptance of the VCP write; the length is the handle count.
    pub acceptance: Vec<bool>,
    /// Records each acquired handle set, one entry per switch attempt.
    pub acquired: Mutex<Vec<Vec<PhysicalHandle>>>,
    /// Records each released handle set.
    pub released: Mutex<Vec<Vec<PhysicalHandle>>>,
    /// Records each (handle, code) VCP write.
    pub set_calls: Mutex<Vec<(PhysicalHandle, InputSourceCode)>>,
}

impl MockDisplayPort {
    /// A port backing `count` physical handles that all accept the command.
    pub fn accepting(count: usize) -> Self {
        Self::with_acceptance(vec![true; count])
    }

    /// A port whose handles accept or reject per the given pattern.
    pub fn with_acceptance(acceptance: Vec<bool>) -> Self {
        Self {
            fail_primary: false,
            fail_enumeration: false,
            acceptance,
            acquired: Mutex::new(Vec::new()),
            released: Mutex::new(Vec::new()),
            set_calls: Mutex::new(Vec::new()),
        }
    }

    /// A port that cannot resolve the primary monitor.
    pub fn failing_primary() -> Self {
        Self {
            fail_primary: true,
            ..Self::with_acceptance(Vec::new())
        }
    }

    /// A port that resolves the monitor but fails enumeration.
    pub fn failing_enumeration() -> Self {
        Self {
            fail_enumeration: true,
            ..Self::with_acceptance(Vec::new())
        }
    }
}

impl DisplayPort for MockDisplayPort {
    fn primary_monitor(&self) -> Result<MonitorId, DisplayError> {
        if self.fail_primary {
            return Err(DisplayError::NoPrimaryMonitor);
        }
        Ok(MonitorId(1))
    }

    fn acquire_physical_handles(
        &self,
        _monitor: MonitorId,
    ) -> Result<Vec<PhysicalHandle>, DisplayError> {
        if self.fail_enumeration {
            return Err(DisplayError::EnumerationFailed("mock failure".to_string()));
        }
        let handles: Vec<PhysicalHandle> = (0..self.acceptance.len())
            .map(|i| PhysicalHandle(i as isize))
            .collect();
        self.acquired.lock().unwrap().push(handles.clone());
        Ok(handles)
    }

    fn set_input_source(&self, handle: PhysicalHandle, code: InputSourceCode) -> bool {
        self.set_calls.lock().unwrap().push((handle, code));
        self.acceptance
            .get(handle.0 as usize)
            .copied()
            .unwrap_or(false)
    }

    fn release_physical_handles(&self, handles: &[PhysicalHandle]) {
        self.released.lock().unwrap().push(handles.to_vec());
    }
}
