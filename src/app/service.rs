//! Shutdown coordinator, the top-level state machine.
//!
//! [`Coordinator`] owns the input monitor, status indicator, process
//! supervisor, and the shutdown latch.  All I/O flows through the port
//! traits held in [`Ports`], making the whole loop testable with mock
//! adapters and a clock that never blocks.
//!
//! ```text
//!  PanelPort ───▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                 │         Coordinator         │
//!  ProcessPort ◀─▶│ Input · Indicator · Process │ ──▶ SystemPort
//!                 └─────────────────────────────┘
//! ```
//!
//! ## One iteration
//!
//! 1. Sample both enable switches.
//! 2. Run one flash cycle (this is the loop's sleep).
//! 3. Probe the application.
//! 4. App switch ON and a press pending: toggle the application, then settle.
//! 5. Shutdown switch ON and a press pending: latch the shutdown request.
//!
//! Once latched, the loop exits after the current iteration; the
//! application is force-killed and the host is halted.

use std::time::Duration;

use log::debug;

use crate::config::SupervisorConfig;
use crate::drivers::input_monitor::InputMonitor;
use crate::drivers::status_indicator::StatusIndicator;
use crate::supervisor::ProcessSupervisor;

use super::commands::PanelCommand;
use super::events::AppEvent;
use super::ports::{
    ClockPort, EventSink, PanelPort, ProcessPort, StatusLed, Switch, SystemError, SystemPort,
};

// ───────────────────────────────────────────────────────────────
// Ports bundle
// ───────────────────────────────────────────────────────────────

/// Every adapter the coordinator drives.
pub struct Ports<H, P, C, S, Y> {
    pub panel: H,
    pub processes: P,
    pub clock: C,
    pub sink: S,
    pub system: Y,
}

// ───────────────────────────────────────────────────────────────
// Shutdown latch
// ───────────────────────────────────────────────────────────────

/// One-way shutdown flag.  It cannot be cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShutdownLatch {
    requested: bool,
}

impl ShutdownLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) {
        self.requested = true;
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }
}

/// Coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Active,
    /// Terminal.
    ShuttingDown,
}

// ───────────────────────────────────────────────────────────────
// Coordinator
// ───────────────────────────────────────────────────────────────

/// The coordinator orchestrates all domain logic.
pub struct Coordinator<H, P, C, S, Y> {
    ports: Ports<H, P, C, S, Y>,
    input: InputMonitor,
    indicator: StatusIndicator,
    supervisor: ProcessSupervisor,
    latch: ShutdownLatch,
    settle_delay: Duration,
    iterations: u64,
}

impl<H, P, C, S, Y> Coordinator<H, P, C, S, Y>
where
    H: PanelPort,
    P: ProcessPort,
    C: ClockPort,
    S: EventSink,
    Y: SystemPort,
{
    /// Construct the coordinator.  Does **not** touch the panel; call
    /// [`start`](Self::start) (or [`run`](Self::run)) next.
    pub fn new(
        config: &SupervisorConfig,
        supervisor: ProcessSupervisor,
        ports: Ports<H, P, C, S, Y>,
    ) -> Self {
        Self {
            ports,
            input: InputMonitor::new(),
            indicator: StatusIndicator::new(config),
            supervisor,
            latch: ShutdownLatch::new(),
            settle_delay: config.settle_delay(),
            iterations: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put the LEDs in their power-on state and announce the loop.
    pub fn start(&mut self) {
        for led in StatusLed::ALL {
            self.ports.panel.set_led(led, false);
        }
        self.ports.panel.set_led(StatusLed::SystemAlive, true);
        self.ports.sink.emit(&AppEvent::Started {
            signature: self.supervisor.signature().to_owned(),
        });
    }

    /// Start, iterate until shutdown is latched, then shut down.
    pub fn run(&mut self) -> Result<(), SystemError> {
        self.start();
        while self.step() == CoordinatorState::Active {}
        self.shut_down()
    }

    /// Run one loop iteration.  A no-op once shutdown has been latched.
    pub fn step(&mut self) -> CoordinatorState {
        if self.latch.is_requested() {
            return CoordinatorState::ShuttingDown;
        }
        self.iterations += 1;

        let Ports {
            panel,
            processes,
            clock,
            sink,
            ..
        } = &mut self.ports;

        // 1. Switch positions
        self.input.sync_switches(panel, sink);

        // 2. Flash cycle (the loop pacing sleep)
        self.indicator
            .run_cycle(self.supervisor.indicator_status(), panel, clock);

        // 3. Fresh liveness probe
        self.supervisor.refresh(processes, sink);

        // 4. Application start/stop
        if let Some(cmd) = self.input.poll_command(Switch::App, panel, sink) {
            self.handle_command(cmd);
        }

        // 5. Shutdown request
        let Ports { panel, sink, .. } = &mut self.ports;
        if let Some(cmd) = self.input.poll_command(Switch::Shutdown, panel, sink) {
            self.handle_command(cmd);
        }

        self.state()
    }

    /// Terminal action: force-kill the application (no graceful phase),
    /// then halt the host.
    pub fn shut_down(&mut self) -> Result<(), SystemError> {
        let Ports {
            processes,
            sink,
            system,
            ..
        } = &mut self.ports;
        self.supervisor.force_stop(processes, sink);
        sink.emit(&AppEvent::ShuttingDown);
        system.shutdown()
    }

    // ── Command handling ──────────────────────────────────────

    fn handle_command(&mut self, cmd: PanelCommand) {
        let Ports {
            panel,
            processes,
            clock,
            sink,
            ..
        } = &mut self.ports;

        match cmd {
            PanelCommand::ToggleApp => {
                if self.latch.is_requested() {
                    debug!("Ignoring start/stop press: shutdown already requested");
                    return;
                }
                self.supervisor.toggle(panel, processes, clock, sink);
                clock.sleep(self.settle_delay);
            }
            PanelCommand::RequestShutdown => {
                self.latch.request();
                self.indicator.show_shutdown_requested(panel);
                sink.emit(&AppEvent::ShutdownRequested);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> CoordinatorState {
        if self.latch.is_requested() {
            CoordinatorState::ShuttingDown
        } else {
            CoordinatorState::Active
        }
    }

    pub fn shutdown_requested(&self) -> bool {
        self.latch.is_requested()
    }

    /// Loop iterations executed since construction.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn supervisor(&self) -> &ProcessSupervisor {
        &self.supervisor
    }

    pub fn input(&self) -> &InputMonitor {
        &self.input
    }

    pub fn ports(&self) -> &Ports<H, P, C, S, Y> {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut Ports<H, P, C, S, Y> {
        &mut self.ports
    }
}
