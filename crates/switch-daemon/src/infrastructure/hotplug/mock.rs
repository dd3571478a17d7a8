//! Mock hotplug listener for unit and integration testing.
//!
//! The real listener blocks inside a Win32 message loop that only the OS can
//! feed. The mock replaces it with an in-process channel: tests inject
//! synthetic [`HotplugEvent`]s through a [`MockHotplugHandle`] and the
//! listener dispatches them to the pipeline one at a time, preserving the
//! serial, synchronous delivery model of the real message loop.

use std::sync::mpsc;

use switch_core::HotplugEvent;

use crate::application::handle_arrival::{ArrivalPipeline, EventOutcome};

/// Sender half: injects synthetic events. Dropping it ends the listener's
/// run loop, standing in for process shutdown.
pub struct MockHotplugHandle {
    tx: mpsc::Sender<HotplugEvent>,
}

impl MockHotplugHandle {
    /// Injects one synthetic hotplug event.
    pub fn inject(&self, event: HotplugEvent) {
        // A closed receiver only happens after run() returned; ignore.
        let _ = self.tx.send(event);
    }
}

/// Channel-driven stand-in for the OS notification subscription.
pub struct MockHotplugListener {
    rx: mpsc::Receiver<HotplugEvent>,
}

impl MockHotplugListener {
    /// Creates the listener and its injection handle.
    pub fn new() -> (Self, MockHotplugHandle) {
        let (tx, rx) = mpsc::channel();
        (Self { rx }, MockHotplugHandle { tx })
    }

    /// Dispatches every injected event to the pipeline in order, returning
    /// the per-event outcomes once the handle is dropped.
    pub fn run(self, pipeline: &ArrivalPipeline) -> Vec<EventOutcome> {
        self.rx
            .iter()
            .map(|event| pipeline.handle_event(&event))
            .collect()
    }
}
