//! Outbound supervisor events.
//!
//! The domain emits these through the [`EventSink`](super::ports::EventSink)
//! port.  The log sink renders each one as a timestamped log line; tests
//! record them to assert on the exact action sequence.

use crate::app::ports::Switch;

/// Structured events emitted by the supervisor core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The coordinator entered its main loop.
    Started { signature: String },

    /// An enable switch changed position.
    SwitchChanged { switch: Switch, enabled: bool },

    /// A stale edge was discarded when its switch was enabled.
    StaleEdgeDiscarded { switch: Switch },

    /// The launch command is about to be spawned.
    Launching { signature: String },

    /// The launch was confirmed by a live probe.
    Launched { pid: u32 },

    /// Spawn failed, or no matching process appeared afterwards.
    LaunchFailed { reason: String },

    /// The exit flag was written; graceful stop polling begins.
    ExitRequested,

    /// The application exited within the polling budget.
    ExitedGracefully { polls: u32 },

    /// The polling budget ran out with the application still alive.
    GracefulStopTimedOut { pid: u32 },

    /// A forced termination signal was sent.
    Killed { pid: u32 },

    /// A previously launched application is no longer running.
    ExitedUnexpectedly,

    /// The shutdown button was pressed while enabled.  Terminal.
    ShutdownRequested,

    /// The host shutdown command is being issued.
    ShuttingDown,
}
