//! Process supervisor.
//!
//! Owns the lifecycle of the single managed application.  The OS process
//! table is the ground truth: every decision is taken on a fresh probe,
//! and the recorded pid is advisory only.
//!
//! ## Lifecycle
//!
//! ```text
//!            launch (probe confirms)
//!   Stopped ─────────────────────────▶ Running
//!      ▲                                  │ stop
//!      │                                  ▼
//!      │   exited within budget     StopRequested
//!      ├──────────────────────────────────┤
//!      │   budget spent / no flag: kill   │
//!      └──────────────────────────────────┘
//! ```
//!
//! Shutdown bypasses the graceful phase entirely: [`ProcessSupervisor::force_stop`]
//! goes straight to a kill.
//!
//! A forced kill is never verified.  If the pid was stale or the signal
//! was lost, the state still reads `Stopped` until the next probe puts it
//! right.

use std::path::PathBuf;
use std::time::Duration;

use crate::app::events::AppEvent;
use crate::app::ports::{ClockPort, EventSink, PanelPort, ProcessPort, StatusLed};
use crate::config::SupervisorConfig;
use crate::drivers::status_indicator::IndicatorStatus;

/// How the managed application is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    program: String,
    args: Vec<String>,
}

impl LaunchCommand {
    /// `<interpreter> <app>`, or `<app>` alone when there is no interpreter.
    pub fn new(app: &str, interpreter: Option<&str>) -> Self {
        match interpreter {
            Some(interp) => Self {
                program: interp.to_owned(),
                args: vec![app.to_owned()],
            },
            None => Self {
                program: app.to_owned(),
                args: Vec::new(),
            },
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The command line as it appears in the process table.  Any process
    /// whose arguments contain this string is taken to be the application.
    pub fn signature(&self) -> String {
        let mut sig = self.program.clone();
        for arg in &self.args {
            sig.push(' ');
            sig.push_str(arg);
        }
        sig
    }
}

/// Application lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Stopped,
    Running,
    /// Graceful stop in progress (exit flag written, polling for exit).
    StopRequested,
}

/// The process supervisor.
pub struct ProcessSupervisor {
    command: LaunchCommand,
    signature: String,
    exit_flag: Option<PathBuf>,
    state: AppState,
    pid: Option<u32>,
    /// Launched by us and not stopped by us since.
    started: bool,
    exit_poll_count: u32,
    exit_poll_interval: Duration,
}

impl ProcessSupervisor {
    pub fn new(
        command: LaunchCommand,
        exit_flag: Option<PathBuf>,
        config: &SupervisorConfig,
    ) -> Self {
        let signature = command.signature();
        Self {
            command,
            signature,
            exit_flag,
            state: AppState::Stopped,
            pid: None,
            started: false,
            exit_poll_count: config.exit_poll_count,
            exit_poll_interval: config.exit_poll_interval(),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> AppState {
        self.state
    }

    /// Pid seen by the most recent probe that found the application.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn is_running(&self) -> bool {
        self.state == AppState::Running
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// LED inputs for the next flash cycle.
    pub fn indicator_status(&self) -> IndicatorStatus {
        IndicatorStatus {
            app_running: self.is_running(),
            app_stopped_since_started: self.started && !self.is_running(),
        }
    }

    // ── Probing ───────────────────────────────────────────────

    /// Query the process table.  Updates the advisory pid only.
    pub fn probe(&mut self, procs: &mut impl ProcessPort) -> Option<u32> {
        let found = procs.find(&self.signature);
        if found.is_some() {
            self.pid = found;
        }
        found
    }

    /// Probe and bring the lifecycle state in line with the OS.
    pub fn refresh(&mut self, procs: &mut impl ProcessPort, sink: &mut impl EventSink) -> AppState {
        match self.probe(procs) {
            Some(_) => self.state = AppState::Running,
            None => {
                if self.state == AppState::Running && self.started {
                    sink.emit(&AppEvent::ExitedUnexpectedly);
                }
                self.state = AppState::Stopped;
                self.pid = None;
            }
        }
        self.state
    }

    // ── Transitions ───────────────────────────────────────────

    /// Launch if stopped, stop if running.
    pub fn toggle(
        &mut self,
        panel: &mut impl PanelPort,
        procs: &mut impl ProcessPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        match self.state {
            AppState::Stopped => self.launch(procs, sink),
            AppState::Running | AppState::StopRequested => self.stop(panel, procs, clock, sink),
        }
    }

    /// Spawn the application and confirm it with a fresh probe.
    /// A failed launch leaves the state `Stopped`; there is no retry.
    pub fn launch(&mut self, procs: &mut impl ProcessPort, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Launching {
            signature: self.signature.clone(),
        });

        if let Err(e) = procs.spawn_detached(&self.command) {
            self.state = AppState::Stopped;
            sink.emit(&AppEvent::LaunchFailed {
                reason: e.to_string(),
            });
            return;
        }

        match self.probe(procs) {
            Some(pid) => {
                self.state = AppState::Running;
                self.started = true;
                sink.emit(&AppEvent::Launched { pid });
            }
            None => {
                self.state = AppState::Stopped;
                self.pid = None;
                sink.emit(&AppEvent::LaunchFailed {
                    reason: "no matching process after spawn".to_owned(),
                });
            }
        }
    }

    /// Stop the application: exit flag and bounded polling if configured,
    /// then a forced kill if it is still alive.
    pub fn stop(
        &mut self,
        panel: &mut impl PanelPort,
        procs: &mut impl ProcessPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        self.state = AppState::StopRequested;

        if let Some(flag) = self.exit_flag.clone() {
            match procs.write_exit_flag(&flag) {
                Ok(()) => {
                    sink.emit(&AppEvent::ExitRequested);
                    if self.poll_for_exit(panel, procs, clock, sink) {
                        return;
                    }
                }
                Err(e) => log::warn!("Cannot request graceful exit ({}), killing instead", e),
            }
        }

        self.kill(procs, sink);
        panel.set_led(StatusLed::AppRunning, false);
    }

    /// Kill the application without a graceful phase, if it is running.
    pub fn force_stop(&mut self, procs: &mut impl ProcessPort, sink: &mut impl EventSink) {
        if self.is_running() {
            self.kill(procs, sink);
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Returns `true` if the application exited within the budget.
    fn poll_for_exit(
        &mut self,
        panel: &mut impl PanelPort,
        procs: &mut impl ProcessPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> bool {
        for poll in 1..=self.exit_poll_count {
            panel.set_led(StatusLed::AppRunning, poll % 2 == 1);
            clock.sleep(self.exit_poll_interval);

            if self.probe(procs).is_none() {
                panel.set_led(StatusLed::AppRunning, false);
                self.state = AppState::Stopped;
                self.started = false;
                self.pid = None;
                sink.emit(&AppEvent::ExitedGracefully { polls: poll });
                return true;
            }
        }

        if let Some(pid) = self.pid {
            sink.emit(&AppEvent::GracefulStopTimedOut { pid });
        }
        false
    }

    /// Send the kill and flip to `Stopped` unconditionally.
    fn kill(&mut self, procs: &mut impl ProcessPort, sink: &mut impl EventSink) {
        if let Some(pid) = self.pid {
            procs.force_kill(pid);
            sink.emit(&AppEvent::Killed { pid });
        }
        self.state = AppState::Stopped;
        self.started = false;
        self.pid = None;
    }
}
