//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each supervisor event to the `log`
//! facade as one operator-readable line.  `env_logger` supplies the
//! millisecond timestamp.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, Switch};

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink {
    /// Application name used in operator messages.
    app: String,
}

impl LogEventSink {
    pub fn new(app: impl Into<String>) -> Self {
        Self { app: app.into() }
    }

    fn gated(switch: Switch) -> &'static str {
        match switch {
            Switch::App => "application start/stop button",
            Switch::Shutdown => "system shutdown button",
        }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let app = &self.app;
        match event {
            AppEvent::Started { signature } => {
                info!("Supervising `{}`.", signature);
            }
            AppEvent::SwitchChanged { switch, enabled } => {
                let (pos, state) = if *enabled { ("ON", "enabled") } else { ("OFF", "disabled") };
                info!(
                    "Switch {} is {} ({} {}).",
                    switch.number(),
                    pos,
                    Self::gated(*switch),
                    state
                );
            }
            AppEvent::StaleEdgeDiscarded { switch } => {
                debug!("Discarded press latched while switch {} was OFF.", switch.number());
            }
            AppEvent::Launching { signature } => {
                info!("Launching application {} (`{}`).", app, signature);
            }
            AppEvent::Launched { pid } => {
                info!("Successfully launched {}, pid={}.", app, pid);
            }
            AppEvent::LaunchFailed { reason } => {
                warn!("Failed to launch {}: {}.", app, reason);
            }
            AppEvent::ExitRequested => {
                info!("Requested application exit {}.", app);
            }
            AppEvent::ExitedGracefully { polls } => {
                info!("Application {} exited successfully after {} polls.", app, polls);
            }
            AppEvent::GracefulStopTimedOut { pid } => {
                warn!("Application {} (pid={}) did not exit in time.", app, pid);
            }
            AppEvent::Killed { pid } => {
                info!("Killing application {}, pid={}.", app, pid);
            }
            AppEvent::ExitedUnexpectedly => {
                warn!("Application {} is no longer running.", app);
            }
            AppEvent::ShutdownRequested => {
                info!("System shutdown requested.");
            }
            AppEvent::ShuttingDown => {
                info!("Shutting down...");
            }
        }
    }
}
