//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Coordinator (domain)
//! ```
//!
//! Driven adapters (control panel, process table, host, clock, event sinks)
//! implement these traits.  The [`Coordinator`](super::service::Coordinator)
//! owns them through generics, so the domain core never touches GPIO files
//! or spawns `ps` directly and can be driven by deterministic fakes.

use std::path::Path;
use std::time::Duration;

pub use embedded_hal::digital::PinState;

use crate::supervisor::LaunchCommand;

// ───────────────────────────────────────────────────────────────
// Panel identities
// ───────────────────────────────────────────────────────────────

/// Level-sensing enable switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Switch {
    /// Switch 1: gates the application start/stop button.
    App,
    /// Switch 2: gates the system shutdown button.
    Shutdown,
}

impl Switch {
    /// The button this switch gates.
    pub const fn button(self) -> Button {
        match self {
            Self::App => Button::App,
            Self::Shutdown => Button::Shutdown,
        }
    }

    /// Operator-facing switch number printed on the panel.
    pub const fn number(self) -> u8 {
        match self {
            Self::App => 1,
            Self::Shutdown => 2,
        }
    }
}

/// Edge-triggered momentary button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Start/stop the application.
    App,
    /// Request system shutdown.
    Shutdown,
}

/// One of the three status LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLed {
    /// Heartbeat while the supervisor is alive.
    SystemAlive,
    /// Flashes while the application is running.
    AppRunning,
    /// Flashes when the application stopped after being started;
    /// solid when shutdown has been requested.
    ShutdownStopped,
}

impl StatusLed {
    pub const ALL: [Self; 3] = [Self::SystemAlive, Self::AppRunning, Self::ShutdownStopped];
}

// ───────────────────────────────────────────────────────────────
// Panel port (driven adapter: hardware ↔ domain)
// ───────────────────────────────────────────────────────────────

/// The control panel: two switches, two edge-detected buttons, three LEDs.
///
/// Levels are reported raw; the active-low interpretation belongs to the
/// input monitor.  Runtime I/O failures are absorbed by the adapter, which
/// reports a failed switch read as [`PinState::High`] (OFF).
pub trait PanelPort {
    /// Current level of an enable switch.
    fn read_switch(&mut self, switch: Switch) -> PinState;

    /// Whether a falling edge has been latched for `button` since the last clear.
    fn has_pending_edge(&mut self, button: Button) -> bool;

    /// Discard any latched edge for `button`.
    fn clear_pending_edge(&mut self, button: Button);

    /// Drive an LED on or off.
    fn set_led(&mut self, led: StatusLed, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Process port (driven adapter: domain ↔ OS process table)
// ───────────────────────────────────────────────────────────────

/// Inspection, spawning, and signalling of OS processes.
pub trait ProcessPort {
    /// Find a running process whose command line contains `signature`.
    /// Returns its pid, or `None` when no process matches.
    fn find(&mut self, signature: &str) -> Option<u32>;

    /// Start `command` detached from the supervisor.
    fn spawn_detached(&mut self, command: &LaunchCommand) -> Result<(), ProcessError>;

    /// Send an unconditional termination signal.  Success is assumed.
    fn force_kill(&mut self, pid: u32);

    /// Create the cooperative exit flag file.  Its content is irrelevant.
    fn write_exit_flag(&mut self, path: &Path) -> Result<(), ProcessError>;
}

// ───────────────────────────────────────────────────────────────
// System port (driven adapter: domain → host OS)
// ───────────────────────────────────────────────────────────────

/// The host operating system.
pub trait SystemPort {
    /// Halt the host.  Returns once the command has been issued.
    fn shutdown(&mut self) -> Result<(), SystemError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// The loop's only suspension primitive.
pub trait ClockPort {
    /// Block the supervisor for `duration`.
    fn sleep(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from loading [`SupervisorConfig`](crate::config::SupervisorConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(std::io::ErrorKind),
    /// The config file is not valid JSON for the schema.
    Parse(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

/// Errors from [`ProcessPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessError {
    /// The OS refused to start the program.
    Spawn(std::io::ErrorKind),
    /// The process listing could not be obtained.
    Listing(std::io::ErrorKind),
    /// The exit flag file could not be written.
    ExitFlag(std::io::ErrorKind),
}

/// Errors from [`SystemPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemError {
    /// The shutdown command could not be started.
    Spawn(std::io::ErrorKind),
    /// The shutdown command ran but reported failure.
    Status(Option<i32>),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "config unreadable: {}", kind),
            Self::Parse(msg) => write!(f, "config malformed: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::fmt::Display for ProcessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spawn(kind) => write!(f, "spawn failed: {}", kind),
            Self::Listing(kind) => write!(f, "process listing failed: {}", kind),
            Self::ExitFlag(kind) => write!(f, "exit flag write failed: {}", kind),
        }
    }
}

impl core::fmt::Display for SystemError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spawn(kind) => write!(f, "shutdown command failed to start: {}", kind),
            Self::Status(Some(code)) => write!(f, "shutdown command exited with {}", code),
            Self::Status(None) => write!(f, "shutdown command killed by signal"),
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for ProcessError {}
impl std::error::Error for SystemError {}
