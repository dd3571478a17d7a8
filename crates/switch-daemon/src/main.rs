//! USB display switch daemon entry point.
//!
//! Two-phase startup: configuration is loaded first, then the arrival
//! pipeline is built with the platform ports and handed to the hotplug
//! listener, which owns the message loop until shutdown.
//!
//! A config load failure is fatal to activation but not to the process:
//! the daemon keeps running inert (it never retries the load). A failed
//! notification subscription is fatal to the process — without it the
//! daemon has no purpose — and exits with a nonzero status.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use switch_core::DaemonConfig;
use switch_daemon::application::handle_arrival::ArrivalPipeline;
use switch_daemon::infrastructure::storage::config::{config_path, load_config};

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("usb display switch daemon starting");

    let path = config_path();
    let config = match load_config(&path) {
        Ok(config) => {
            info!(
                "config loaded: VID={} PID={} inputSource={}",
                config.device.vendor_id, config.device.product_id, config.input_source.0
            );
            Some(config)
        }
        Err(e) => {
            error!("{e}; daemon will run inert until restarted with a valid config");
            None
        }
    };

    let pipeline = build_pipeline(config);
    run_listener(pipeline).context("hotplug listener failed")?;

    info!("usb display switch daemon stopped");
    Ok(())
}

#[cfg(target_os = "windows")]
fn build_pipeline(config: Option<DaemonConfig>) -> ArrivalPipeline {
    use switch_daemon::infrastructure::input_injection::windows::{
        SendInputInjector, WindowsCursorController,
    };
    use switch_daemon::infrastructure::monitor_control::windows::WindowsDisplayPort;
    use switch_daemon::infrastructure::session::windows::WtsSessionProbe;

    ArrivalPipeline::new(
        config,
        Arc::new(WindowsDisplayPort::new()),
        Arc::new(WtsSessionProbe::new()),
        Arc::new(SendInputInjector::new()),
        Arc::new(WindowsCursorController::new()),
    )
}

#[cfg(target_os = "windows")]
fn run_listener(
    pipeline: ArrivalPipeline,
) -> Result<(), switch_daemon::infrastructure::hotplug::HotplugError> {
    switch_daemon::infrastructure::hotplug::windows::WindowsHotplugListener::run(pipeline)
}

#[cfg(not(target_os = "windows"))]
fn build_pipeline(config: Option<DaemonConfig>) -> ArrivalPipeline {
    use switch_daemon::infrastructure::input_injection::mock::{
        MockCursorController, MockInputInjector,
    };
    use switch_daemon::infrastructure::monitor_control::mock::MockDisplayPort;
    use switch_daemon::infrastructure::session::mock::MockSessionProbe;
    use tracing::warn;

    warn!("no monitor control backend for this platform; using inert ports");
    ArrivalPipeline::new(
        config,
        Arc::new(MockDisplayPort::accepting(0)),
        Arc::new(MockSessionProbe::reporting(false)),
        Arc::new(MockInputInjector::new()),
        Arc::new(MockCursorController::with_screen(0, 0)),
    )
}

#[cfg(not(target_os = "windows"))]
fn run_listener(
    _pipeline: ArrivalPipeline,
) -> Result<(), switch_daemon::infrastructure::hotplug::HotplugError> {
    Err(switch_daemon::infrastructure::hotplug::HotplugError::Unsupported)
}
