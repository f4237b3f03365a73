//! Mock adapters for integration tests.
//!
//! Every externally visible action (LED write, sleep, spawn, kill, exit
//! flag, host shutdown) is appended to one shared [`Trace`] so tests can
//! assert on the exact interleaving without real GPIO or processes.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use panelvisor::app::events::AppEvent;
use panelvisor::app::ports::{
    Button, ClockPort, EventSink, PanelPort, PinState, ProcessError, ProcessPort, StatusLed,
    Switch, SystemError, SystemPort,
};
use panelvisor::app::service::{Coordinator, Ports};
use panelvisor::config::SupervisorConfig;
use panelvisor::supervisor::{LaunchCommand, ProcessSupervisor};

// ── Action record ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Led(StatusLed, bool),
    Sleep(Duration),
    Spawn(String),
    Kill(u32),
    ExitFlag(PathBuf),
    Shutdown,
}

impl Action {
    /// Process and host actions only, without LED and clock noise.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::Spawn(_) | Self::Kill(_) | Self::ExitFlag(_) | Self::Shutdown
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Trace(Rc<RefCell<Vec<Action>>>);

#[allow(dead_code)]
impl Trace {
    pub fn push(&self, action: Action) {
        self.0.borrow_mut().push(action);
    }

    pub fn all(&self) -> Vec<Action> {
        self.0.borrow().clone()
    }

    pub fn lifecycle(&self) -> Vec<Action> {
        self.0.borrow().iter().filter(|a| a.is_lifecycle()).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Actions recorded since `mark` (a previous [`len`](Self::len)).
    pub fn since(&self, mark: usize) -> Vec<Action> {
        self.0.borrow()[mark..].to_vec()
    }

    pub fn sleeps_between(&self, from: &Action, to: &Action) -> Vec<Duration> {
        let all = self.all();
        let start = all.iter().position(|a| a == from).expect("start action recorded");
        let end = all.iter().position(|a| a == to).expect("end action recorded");
        all[start..end]
            .iter()
            .filter_map(|a| match a {
                Action::Sleep(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

// ── MockPanel ─────────────────────────────────────────────────

pub struct MockPanel {
    trace: Trace,
    app_switch_on: bool,
    shutdown_switch_on: bool,
    app_edge: bool,
    shutdown_edge: bool,
    /// Button that is re-pressed every time a switch is sampled.
    mashed: Option<Button>,
    leds: [bool; 3],
}

#[allow(dead_code)]
impl MockPanel {
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            app_switch_on: false,
            shutdown_switch_on: false,
            app_edge: false,
            shutdown_edge: false,
            mashed: None,
            leds: [false; 3],
        }
    }

    pub fn set_switch(&mut self, switch: Switch, on: bool) {
        match switch {
            Switch::App => self.app_switch_on = on,
            Switch::Shutdown => self.shutdown_switch_on = on,
        }
    }

    pub fn press(&mut self, button: Button) {
        match button {
            Button::App => self.app_edge = true,
            Button::Shutdown => self.shutdown_edge = true,
        }
    }

    /// Keep pressing `button` for as long as the test runs.
    pub fn mash(&mut self, button: Button) {
        self.mashed = Some(button);
    }

    pub fn edge(&self, button: Button) -> bool {
        match button {
            Button::App => self.app_edge,
            Button::Shutdown => self.shutdown_edge,
        }
    }

    pub fn led(&self, led: StatusLed) -> bool {
        self.leds[led_index(led)]
    }
}

fn led_index(led: StatusLed) -> usize {
    match led {
        StatusLed::SystemAlive => 0,
        StatusLed::AppRunning => 1,
        StatusLed::ShutdownStopped => 2,
    }
}

impl PanelPort for MockPanel {
    fn read_switch(&mut self, switch: Switch) -> PinState {
        if let Some(button) = self.mashed {
            self.press(button);
        }
        let on = match switch {
            Switch::App => self.app_switch_on,
            Switch::Shutdown => self.shutdown_switch_on,
        };
        if on { PinState::Low } else { PinState::High }
    }

    fn has_pending_edge(&mut self, button: Button) -> bool {
        self.edge(button)
    }

    fn clear_pending_edge(&mut self, button: Button) {
        match button {
            Button::App => self.app_edge = false,
            Button::Shutdown => self.shutdown_edge = false,
        }
    }

    fn set_led(&mut self, led: StatusLed, on: bool) {
        self.leds[led_index(led)] = on;
        self.trace.push(Action::Led(led, on));
    }
}

// ── MockProcesses ─────────────────────────────────────────────

/// Simulated process table holding at most the one managed application.
pub struct MockProcesses {
    trace: Trace,
    /// Pid of the live application, if any.
    pub running: Option<u32>,
    next_pid: u32,
    /// Spawning produces a live matching process.
    pub spawn_starts: bool,
    /// Spawning fails at the OS level.
    pub spawn_error: Option<ProcessError>,
    /// After the exit flag is written, the app exits on this probe.
    pub exits_on_probe: Option<u32>,
    countdown: Option<u32>,
    /// Kills are sent but the process survives.
    pub ignore_kill: bool,
    pub flag_error: Option<ProcessError>,
    pub probes: u32,
}

#[allow(dead_code)]
impl MockProcesses {
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            running: None,
            next_pid: 4100,
            spawn_starts: true,
            spawn_error: None,
            exits_on_probe: None,
            countdown: None,
            ignore_kill: false,
            flag_error: None,
            probes: 0,
        }
    }

    /// Simulate the application dying on its own.
    pub fn crash(&mut self) {
        self.running = None;
    }
}

impl ProcessPort for MockProcesses {
    fn find(&mut self, _signature: &str) -> Option<u32> {
        self.probes += 1;
        if let Some(left) = self.countdown {
            if left <= 1 {
                self.running = None;
                self.countdown = None;
            } else {
                self.countdown = Some(left - 1);
            }
        }
        self.running
    }

    fn spawn_detached(&mut self, command: &LaunchCommand) -> Result<(), ProcessError> {
        self.trace.push(Action::Spawn(command.signature()));
        if let Some(e) = self.spawn_error {
            return Err(e);
        }
        if self.spawn_starts {
            self.next_pid += 1;
            self.running = Some(self.next_pid);
        }
        Ok(())
    }

    fn force_kill(&mut self, pid: u32) {
        self.trace.push(Action::Kill(pid));
        if !self.ignore_kill && self.running == Some(pid) {
            self.running = None;
        }
    }

    fn write_exit_flag(&mut self, path: &Path) -> Result<(), ProcessError> {
        if let Some(e) = self.flag_error {
            return Err(e);
        }
        self.trace.push(Action::ExitFlag(path.to_path_buf()));
        self.countdown = self.exits_on_probe;
        Ok(())
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Records sleeps without blocking.
pub struct MockClock {
    trace: Trace,
    pub elapsed: Duration,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            elapsed: Duration::ZERO,
        }
    }
}

impl ClockPort for MockClock {
    fn sleep(&mut self, duration: Duration) {
        self.elapsed += duration;
        self.trace.push(Action::Sleep(duration));
    }
}

// ── MockSystem ────────────────────────────────────────────────

pub struct MockSystem {
    trace: Trace,
    pub result: Result<(), SystemError>,
}

impl MockSystem {
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            result: Ok(()),
        }
    }
}

impl SystemPort for MockSystem {
    fn shutdown(&mut self) -> Result<(), SystemError> {
        self.trace.push(Action::Shutdown);
        self.result
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

pub type MockCoordinator =
    Coordinator<MockPanel, MockProcesses, MockClock, RecordingSink, MockSystem>;

pub const APP: &str = "/home/pi/panel/app.py";
pub const SIGNATURE: &str = "python3 /home/pi/panel/app.py";

/// Coordinator over fresh mocks with factory timings, plus its trace.
pub fn rig(flag: Option<&str>) -> (MockCoordinator, Trace) {
    rig_with(flag, &SupervisorConfig::default())
}

pub fn rig_with(flag: Option<&str>, config: &SupervisorConfig) -> (MockCoordinator, Trace) {
    let trace = Trace::default();
    let command = LaunchCommand::new(APP, config.interpreter.as_deref());
    let supervisor = ProcessSupervisor::new(command, flag.map(PathBuf::from), config);
    let ports = Ports {
        panel: MockPanel::new(trace.clone()),
        processes: MockProcesses::new(trace.clone()),
        clock: MockClock::new(trace.clone()),
        sink: RecordingSink::default(),
        system: MockSystem::new(trace.clone()),
    };
    (Coordinator::new(config, supervisor, ports), trace)
}
