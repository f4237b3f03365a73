//! Unified error types for the supervisor.
//!
//! Only setup and the final shutdown command can fail the program; every
//! runtime failure inside the loop is logged and absorbed.  A single
//! [`Error`] that those paths convert into keeps `main` uniform.

use core::fmt;
use std::io;

use crate::app::ports::{ConfigError, SystemError};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fatal failure funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// GPIO setup failed; the loop never started.
    Gpio(GpioError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The host shutdown command failed.
    System(SystemError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::System(e) => write!(f, "system: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SystemError> for Error {
    fn from(e: SystemError) -> Self {
        Self::System(e)
    }
}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

/// The sysfs operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioOp {
    Export,
    Direction,
    Read,
    Write,
    /// The header position carries no GPIO line.
    NoLine,
}

impl fmt::Display for GpioOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Export => write!(f, "export"),
            Self::Direction => write!(f, "set direction"),
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::NoLine => write!(f, "map"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioError {
    /// sysfs line number (or board position for [`GpioOp::NoLine`]).
    pub line: u32,
    pub op: GpioOp,
    pub kind: io::ErrorKind,
}

impl GpioError {
    pub fn new(line: u32, op: GpioOp, kind: io::ErrorKind) -> Self {
        Self { line, op, kind }
    }
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gpio{} failed: {}", self.op, self.line, self.kind)
    }
}

impl std::error::Error for GpioError {}

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
