//! ArrivalPipeline: the per-event pipeline behind the hotplug listener.
//!
//! For each incoming device notification the pipeline runs, in order:
//! match → switch input → probe session lock → wake key press → cursor
//! recenter. Every step is synchronous; the OS delivers notifications to a
//! single callback serially, so no two events ever overlap.
//!
//! Configuration is loaded before the message loop starts and passed in at
//! construction. A pipeline built without configuration is permanently
//! inert: it acknowledges events and does nothing else.
//!
//! No failure crosses the event boundary. Display errors drop the event
//! after logging (deliberately skipping the wake and cursor steps — there
//! is nothing to wake into); injection errors are logged and the rest of
//! the pipeline still runs.

use std::sync::Arc;

use chrono::Local;
use switch_core::{is_target_device, DaemonConfig, HotplugEvent, WakeKey};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::application::switch_input::{DisplayPort, SwitchInputUseCase, SwitchOutcome};

/// Error type for synthetic input submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InjectionError {
    /// The input queue accepted fewer events than were submitted.
    #[error("input queue accepted {accepted} of {expected} events")]
    PartialSubmission { accepted: u32, expected: u32 },
}

/// Trait over the OS session enumeration APIs.
///
/// Best-effort: implementations never error. A query failure is
/// inconclusive and reports `false` (unlocked semantics).
pub trait SessionProbe: Send + Sync {
    /// Returns `true` if any session on the local session host reports the
    /// lock state. The any-session semantics reflect a single-user desktop
    /// where session enumeration may return more entries than expected.
    fn any_session_locked(&self) -> bool;
}

/// Trait over the OS input-synthesis API.
pub trait InputInjector: Send + Sync {
    /// Submits a key-down/key-up pair for `key` as one batch.
    /// Zero-duration press: the pair exists only to generate a wake signal.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::PartialSubmission`] if the input queue
    /// accepted fewer than both events.
    fn press_key(&self, key: WakeKey) -> Result<(), InjectionError>;
}

/// Trait over the OS cursor APIs.
///
/// Infrastructure implementation calls `SetCursorPos`; test implementation
/// records calls.
pub trait CursorController: Send + Sync {
    /// Returns the primary screen resolution in pixels.
    fn screen_size(&self) -> (i32, i32);

    /// Moves the cursor to the absolute position (x, y).
    fn set_position(&self, x: i32, y: i32);
}

/// What the pipeline did with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// No configuration was loaded; the pipeline is permanently inert.
    Inert,
    /// The event did not refer to the configured target device.
    NoMatch,
    /// The device matched but the display switch failed; no wake or cursor
    /// step was performed.
    SwitchFailed,
    /// The display switch succeeded and the wake/cursor steps ran.
    Switched {
        /// Lock state observed after the switch (decides the wake key).
        locked: bool,
    },
}

/// The arrival-handling pipeline, one instance per process.
pub struct ArrivalPipeline {
    config: Option<DaemonConfig>,
    switcher: SwitchInputUseCase,
    session: Arc<dyn SessionProbe>,
    injector: Arc<dyn InputInjector>,
    cursor: Arc<dyn CursorController>,
}

impl ArrivalPipeline {
    /// Builds the pipeline. `config` is `None` when configuration loading
    /// failed at startup; the pipeline then ignores every event.
    pub fn new(
        config: Option<DaemonConfig>,
        display: Arc<dyn DisplayPort>,
        session: Arc<dyn SessionProbe>,
        injector: Arc<dyn InputInjector>,
        cursor: Arc<dyn CursorController>,
    ) -> Self {
        Self {
            config,
            switcher: SwitchInputUseCase::new(display),
            session,
            injector,
            cursor,
        }
    }

    /// Handles one hotplug notification to completion.
    ///
    /// Never panics and never propagates an error: per-event failures are
    /// logged and swallowed so the message loop cannot stall.
    pub fn handle_event(&self, event: &HotplugEvent) -> EventOutcome {
        let Some(config) = &self.config else {
            return EventOutcome::Inert;
        };

        if !is_target_device(&config.device, event) {
            return EventOutcome::NoMatch;
        }
        debug!(path = %event.interface_path, "target device arrived");

        match self.switcher.switch_input(config.input_source) {
            Err(e) => {
                error!("display input switch failed: {e}");
                EventOutcome::SwitchFailed
            }
            Ok(SwitchOutcome::Succeeded) => {
                // Timestamp format is an observable contract for log scrapers.
                let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
                info!(
                    "[{timestamp}] display input source changed to {}",
                    config.input_source.0
                );

                // Lock state is recomputed on every switch, never cached.
                let locked = self.session.any_session_locked();
                let key = WakeKey::for_lock_state(locked);
                debug!(?key, locked, "waking display");
                if let Err(e) = self.injector.press_key(key) {
                    warn!("wake key press did not fully land: {e}");
                }

                // Pull the pointer onto the now-active display.
                let (width, height) = self.cursor.screen_size();
                self.cursor.set_position(width / 2, height / 2);

                EventOutcome::Switched { locked }
            }
        }
    }

    /// Whether the pipeline was built with a configuration.
    pub fn is_armed(&self) -> bool {
        self.config.is_some()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use switch_core::{HotplugEvent, InputSourceCode, TargetDeviceSpec};

    use crate::infrastructure::input_injection::mock::{MockCursorController, MockInputInjector};
    use crate::infrastructure::monitor_control::mock::MockDisplayPort;
    use crate::infrastructure::session::mock::MockSessionProbe;

    struct Mocks {
        display: Arc<MockDisplayPort>,
        session: Arc<MockSessionProbe>,
        injector: Arc<MockInputInjector>,
        cursor: Arc<MockCursorController>,
    }

    fn config() -> DaemonConfig {
        DaemonConfig {
            device: TargetDeviceSpec {
                vendor_id: "ABC123".to_string(),
                product_id: "DEF456".to_string(),
            },
            input_source: InputSourceCode(15),
        }
    }

    fn matching_event() -> HotplugEvent {
        HotplugEvent::interface_arrival(r"\\?\USB#VID_ABC123&PID_DEF456#6&1a2b3c&0&2#{guid}")
    }

    fn make_pipeline(
        config: Option<DaemonConfig>,
        display: MockDisplayPort,
        locked: bool,
    ) -> (ArrivalPipeline, Mocks) {
        let display = Arc::new(display);
        let session = Arc::new(MockSessionProbe::reporting(locked));
        let injector = Arc::new(MockInputInjector::new());
        let cursor = Arc::new(MockCursorController::with_screen(1920, 1080));
        let pipeline = ArrivalPipeline::new(
            config,
            Arc::clone(&display) as Arc<dyn DisplayPort>,
            Arc::clone(&session) as Arc<dyn SessionProbe>,
            Arc::clone(&injector) as Arc<dyn InputInjector>,
            Arc::clone(&cursor) as Arc<dyn CursorController>,
        );
        (pipeline, Mocks { display, session, injector, cursor })
    }

    #[test]
    fn test_unconfigured_pipeline_is_inert_and_touches_no_port() {
        // Arrange
        let (pipeline, mocks) = make_pipeline(None, MockDisplayPort::accepting(1), false);

        // Act
        let outcome = pipeline.handle_event(&matching_event());

        // Assert
        assert_eq!(outcome, EventOutcome::Inert);
        assert!(!pipeline.is_armed());
        assert!(mocks.display.acquired.lock().unwrap().is_empty());
        assert!(mocks.injector.presses.lock().unwrap().is_empty());
    }

    #[test]
    fn test_non_matching_event_performs_no_enumeration() {
        // Arrange
        let (pipeline, mocks) =
            make_pipeline(Some(config()), MockDisplayPort::accepting(1), false);
        let event =
            HotplugEvent::interface_arrival(r"\\?\USB#VID_ZZZZZZ&PID_DEF456#6&1a2b3c&0&2#{guid}");

        // Act
        let outcome = pipeline.handle_event(&event);

        // Assert
        assert_eq!(outcome, EventOutcome::NoMatch);
        assert!(mocks.display.acquired.lock().unwrap().is_empty());
        assert!(mocks.injector.presses.lock().unwrap().is_empty());
        assert!(mocks.cursor.moves.lock().unwrap().is_empty());
    }

    #[test]
    fn test_locked_session_wakes_with_up_arrow() {
        // Arrange
        let (pipeline, mocks) =
            make_pipeline(Some(config()), MockDisplayPort::accepting(1), true);

        // Act
        let outcome = pipeline.handle_event(&matching_event());

        // Assert
        assert_eq!(outcome, EventOutcome::Switched { locked: true });
        assert_eq!(*mocks.injector.presses.lock().unwrap(), vec![WakeKey::UpArrow]);
    }

    #[test]
    fn test_unlocked_session_wakes_with_alt() {
        // Arrange
        let (pipeline, mocks) =
            make_pipeline(Some(config()), MockDisplayPort::accepting(1), false);

        // Act
        let outcome = pipeline.handle_event(&matching_event());

        // Assert
        assert_eq!(outcome, EventOutcome::Switched { locked: false });
        assert_eq!(*mocks.injector.presses.lock().unwrap(), vec![WakeKey::Alt]);
    }

    #[test]
    fn test_cursor_recenters_to_half_resolution_after_success() {
        // Arrange
        let (pipeline, mocks) =
            make_pipeline(Some(config()), MockDisplayPort::accepting(1), true);

        // Act
        pipeline.handle_event(&matching_event());

        // Assert – recenter happens regardless of lock state
        assert_eq!(*mocks.cursor.moves.lock().unwrap(), vec![(960, 540)]);
    }

    #[test]
    fn test_failed_switch_skips_wake_and_cursor_steps() {
        // Arrange
        let (pipeline, mocks) =
            make_pipeline(Some(config()), MockDisplayPort::failing_primary(), true);

        // Act
        let outcome = pipeline.handle_event(&matching_event());

        // Assert
        assert_eq!(outcome, EventOutcome::SwitchFailed);
        assert!(mocks.injector.presses.lock().unwrap().is_empty());
        assert!(mocks.cursor.moves.lock().unwrap().is_empty());
        assert_eq!(mocks.session.probe_count(), 0);
    }

    #[test]
    fn test_exactly_one_key_press_per_successful_switch() {
        // Arrange
        let (pipeline, mocks) =
            make_pipeline(Some(config()), MockDisplayPort::accepting(3), false);

        // Act
        pipeline.handle_event(&matching_event());

        // Assert – one press pair even with several physical handles
        assert_eq!(mocks.injector.presses.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_partial_injection_failure_is_non_fatal() {
        // Arrange
        let display = MockDisplayPort::accepting(1);
        let display = Arc::new(display);
        let session = Arc::new(MockSessionProbe::reporting(false));
        let injector = Arc::new(MockInputInjector::failing());
        let cursor = Arc::new(MockCursorController::with_screen(2560, 1440));
        let pipeline = ArrivalPipeline::new(
            Some(config()),
            Arc::clone(&display) as Arc<dyn DisplayPort>,
            session as Arc<dyn SessionProbe>,
            injector as Arc<dyn InputInjector>,
            Arc::clone(&cursor) as Arc<dyn CursorController>,
        );

        // Act – the wake step fails but the event is still fully handled
        let outcome = pipeline.handle_event(&matching_event());

        // Assert – cursor recenter still runs after the failed press
        assert_eq!(outcome, EventOutcome::Switched { locked: false });
        assert_eq!(*cursor.moves.lock().unwrap(), vec![(1280, 720)]);
    }

    #[test]
    fn test_lock_state_is_probed_once_per_successful_switch() {
        // Arrange
        let (pipeline, mocks) =
            make_pipeline(Some(config()), MockDisplayPort::accepting(1), true);

        // Act – two events, two switches
        pipeline.handle_event(&matching_event());
        pipeline.handle_event(&matching_event());

        // Assert – the probe is recomputed per event, never cached
        assert_eq!(mocks.session.probe_count(), 2);
    }
}
