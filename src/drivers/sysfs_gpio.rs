//! Linux sysfs GPIO pin driver.
//!
//! Exports a line under `/sys/class/gpio`, sets its direction, and exposes
//! it through the `embedded-hal` digital traits so the panel adapter stays
//! generic over the pin implementation.
//!
//! Pull-up resistors cannot be configured through sysfs; the panel inputs
//! rely on the board (or a `gpio=…=pu` firmware overlay) providing them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

use crate::error::{GpioError, GpioOp};
use crate::pins;

/// Default sysfs GPIO class directory.
pub const SYSFS_ROOT: &str = "/sys/class/gpio";

/// After `export`, udev may take a moment to hand the new files to the
/// `gpio` group.  Retry direction writes this many times.
const EXPORT_SETTLE_RETRIES: u32 = 20;
const EXPORT_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Pin direction at export time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    /// Output, driven LOW from the moment it is configured.
    OutputLow,
}

impl Direction {
    fn as_sysfs(self) -> &'static str {
        match self {
            Self::Input => "in",
            Self::OutputLow => "low",
        }
    }
}

/// sysfs line number for a header position.
pub fn line_for(board_pin: u8, chip_base: u32) -> Result<u32, GpioError> {
    pins::board_to_bcm(board_pin)
        .map(|bcm| chip_base + u32::from(bcm))
        .ok_or_else(|| {
            GpioError::new(u32::from(board_pin), GpioOp::NoLine, io::ErrorKind::InvalidInput)
        })
}

/// One exported sysfs GPIO line.
#[derive(Debug)]
pub struct SysfsPin {
    line: u32,
    value_path: PathBuf,
}

impl SysfsPin {
    /// Export `line` below `root` (if not already exported) and configure it.
    pub fn open(root: &Path, line: u32, direction: Direction) -> Result<Self, GpioError> {
        let dir = root.join(format!("gpio{line}"));
        if !dir.exists() {
            match fs::write(root.join("export"), line.to_string()) {
                Ok(()) => {}
                // Exported concurrently by someone else.
                Err(e) if e.kind() == io::ErrorKind::ResourceBusy => {}
                Err(e) => return Err(GpioError::new(line, GpioOp::Export, e.kind())),
            }
        }

        let direction_path = dir.join("direction");
        let mut attempt = 0;
        loop {
            match fs::write(&direction_path, direction.as_sysfs()) {
                Ok(()) => break,
                Err(e)
                    if attempt < EXPORT_SETTLE_RETRIES
                        && matches!(
                            e.kind(),
                            io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound
                        ) =>
                {
                    attempt += 1;
                    thread::sleep(EXPORT_SETTLE_DELAY);
                }
                Err(e) => return Err(GpioError::new(line, GpioOp::Direction, e.kind())),
            }
        }

        Ok(Self {
            line,
            value_path: dir.join("value"),
        })
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    fn read_level(&self) -> Result<PinState, GpioError> {
        let raw = fs::read_to_string(&self.value_path)
            .map_err(|e| GpioError::new(self.line, GpioOp::Read, e.kind()))?;
        match raw.trim() {
            "0" => Ok(PinState::Low),
            "1" => Ok(PinState::High),
            _ => Err(GpioError::new(self.line, GpioOp::Read, io::ErrorKind::InvalidData)),
        }
    }

    fn write_level(&self, state: PinState) -> Result<(), GpioError> {
        let raw = match state {
            PinState::Low => "0",
            PinState::High => "1",
        };
        fs::write(&self.value_path, raw)
            .map_err(|e| GpioError::new(self.line, GpioOp::Write, e.kind()))
    }
}

impl ErrorType for SysfsPin {
    type Error = GpioError;
}

impl InputPin for SysfsPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read_level()? == PinState::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read_level()? == PinState::Low)
    }
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write_level(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write_level(PinState::High)
    }
}
