//! Time-sliced LED flash scheduler.
//!
//! One flash cycle lasts `flash_period` and is split into `flash_slices`
//! equal slices.  Each LED that participates in the cycle is switched ON at
//! the start of slice 0 and OFF at the start of slice 1, giving a
//! `1 / flash_slices` duty heartbeat.
//!
//! ## LED selection
//!
//! | LED               | Flashes when                                   |
//! |-------------------|------------------------------------------------|
//! | SystemAlive       | always                                         |
//! | AppRunning        | application running                            |
//! | ShutdownStopped   | application not running, but started earlier   |
//!
//! After the cycle the ShutdownStopped LED is forced OFF.  It is lit solid
//! only by [`StatusIndicator::show_shutdown_requested`].
//!
//! The cycle sleeps `flash_slices` times for `flash_period / flash_slices`,
//! which makes it the pacing interval of the whole supervisor loop.

use std::time::Duration;

use crate::app::ports::{ClockPort, PanelPort, StatusLed};
use crate::config::SupervisorConfig;

/// Slice at which flashing LEDs switch on.
const ON_SLICE: u32 = 0;
/// Slice at which flashing LEDs switch off.
const OFF_SLICE: u32 = 1;

/// What the indicator needs to know about the application for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorStatus {
    pub app_running: bool,
    pub app_stopped_since_started: bool,
}

impl IndicatorStatus {
    /// The application LED that flashes alongside the heartbeat, if any.
    pub fn app_led(self) -> Option<StatusLed> {
        if self.app_running {
            Some(StatusLed::AppRunning)
        } else if self.app_stopped_since_started {
            Some(StatusLed::ShutdownStopped)
        } else {
            None
        }
    }
}

/// Flash scheduler.  Stateless between cycles; the LEDs hold the only state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusIndicator {
    slices: u32,
    slice: Duration,
}

impl StatusIndicator {
    pub fn new(config: &SupervisorConfig) -> Self {
        Self {
            slices: config.flash_slices,
            slice: config.flash_slice(),
        }
    }

    /// LED writes to perform at the start of `slice`.
    pub fn slice_writes(slice: u32, status: IndicatorStatus) -> Vec<(StatusLed, bool)> {
        let level = match slice {
            ON_SLICE => true,
            OFF_SLICE => false,
            _ => return Vec::new(),
        };
        let mut writes = vec![(StatusLed::SystemAlive, level)];
        if let Some(led) = status.app_led() {
            writes.push((led, level));
        }
        writes
    }

    /// Run one full flash cycle, sleeping between slices.
    pub fn run_cycle(
        &self,
        status: IndicatorStatus,
        panel: &mut impl PanelPort,
        clock: &mut impl ClockPort,
    ) {
        for slice in 0..self.slices {
            for (led, on) in Self::slice_writes(slice, status) {
                panel.set_led(led, on);
            }
            clock.sleep(self.slice);
        }
        panel.set_led(StatusLed::ShutdownStopped, false);
    }

    /// Light the ShutdownStopped LED solid.  Overrides the flash pattern
    /// for the rest of the supervisor's life.
    pub fn show_shutdown_requested(&self, panel: &mut impl PanelPort) {
        panel.set_led(StatusLed::ShutdownStopped, true);
    }
}
