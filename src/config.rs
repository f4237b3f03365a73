//! Supervisor configuration parameters.
//!
//! Timing for the flash cycle, graceful-stop polling, and button bounce
//! window, plus the launch interpreter.  Defaults reproduce the panel's
//! factory behaviour; a JSON file passed with `--config` may override any
//! subset of fields.  Pin assignments are fixed in [`crate::pins`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core supervisor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    // --- Flash cycle (also the main loop period) ---
    /// Length of one full flash cycle (milliseconds)
    pub flash_period_ms: u32,
    /// Number of equal slices per flash cycle; LEDs are lit for one slice
    pub flash_slices: u32,

    // --- Graceful stop ---
    /// Number of liveness probes after writing the exit flag
    pub exit_poll_count: u32,
    /// Delay between exit probes (milliseconds)
    pub exit_poll_interval_ms: u32,
    /// Pause after a start/stop toggle before the next iteration (milliseconds)
    pub settle_delay_ms: u32,

    // --- Buttons ---
    /// Edges closer than this to the previous accepted edge are bounce (milliseconds)
    pub button_bounce_ms: u32,
    /// Button sampling interval of the edge watcher (milliseconds)
    pub edge_sample_ms: u32,

    // --- Host ---
    /// Offset added to BCM line numbers when exporting sysfs GPIOs
    pub gpio_chip_base: u32,
    /// Program used to run the application; `None` runs the app path itself.
    ///
    /// With `None` the process signature is the bare app path, so any
    /// command line containing that path matches, e.g. a
    /// `sudo panelvisor -a app.py` wrapper that launched the supervisor.
    /// The app then reads as running for as long as the wrapper lives.
    pub interpreter: Option<String>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            // Flash cycle
            flash_period_ms: 1000, // 1 Hz heartbeat
            flash_slices: 10,      // 10% duty

            // Graceful stop
            exit_poll_count: 12,
            exit_poll_interval_ms: 200, // 2.4 s budget
            settle_delay_ms: 1000,

            // Buttons
            button_bounce_ms: 300,
            edge_sample_ms: 5,

            // Host
            gpio_chip_base: 0,
            interpreter: Some("python3".to_owned()),
        }
    }
}

impl SupervisorConfig {
    /// Load from a JSON file.  Fields missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.kind()))?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the flash scheduler or the stop sequence cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flash_slices < 2 {
            return Err(ConfigError::ValidationFailed(
                "flash_slices must be at least 2 (one on, one off)",
            ));
        }
        if self.exit_poll_count == 0 {
            return Err(ConfigError::ValidationFailed("exit_poll_count must be at least 1"));
        }
        if self.edge_sample_ms == 0 {
            return Err(ConfigError::ValidationFailed("edge_sample_ms must be at least 1"));
        }
        if self.interpreter.as_deref().is_some_and(|i| i.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed(
                "interpreter must be null or a program name",
            ));
        }
        Ok(())
    }

    /// Duration of one flash slice (`flash_period / flash_slices`).
    pub fn flash_slice(&self) -> Duration {
        Duration::from_millis(u64::from(self.flash_period_ms)) / self.flash_slices.max(1)
    }

    pub fn exit_poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.exit_poll_interval_ms))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.settle_delay_ms))
    }

    pub fn button_bounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.button_bounce_ms))
    }

    pub fn edge_sample(&self) -> Duration {
        Duration::from_millis(u64::from(self.edge_sample_ms))
    }

    /// Zero-delay timing for host tests: every sleep is `Duration::ZERO`.
    pub fn immediate() -> Self {
        Self {
            flash_period_ms: 0,
            exit_poll_interval_ms: 0,
            settle_delay_ms: 0,
            ..Self::default()
        }
    }
}
