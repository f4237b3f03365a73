//! Hardware adapter: bridges the physical control panel to [`PanelPort`].
//!
//! Generic over `embedded-hal` pins so the same adapter drives sysfs lines
//! in production and in-memory pins in tests.  Owns the edge watcher thread
//! for the two buttons; the main loop only ever sees the latched flags.
//!
//! Runtime I/O errors never reach the domain.  A failed switch read is
//! logged and reported as HIGH (switch OFF); a failed LED write is logged
//! and dropped.

use std::path::Path;
use std::sync::Arc;

use embedded_hal::digital::{InputPin, OutputPin};
use log::{info, warn};

use crate::app::ports::{Button, PanelPort, PinState, StatusLed, Switch};
use crate::config::SupervisorConfig;
use crate::drivers::edge_watcher::{EdgeFlags, EdgeWatcher};
use crate::drivers::sysfs_gpio::{self, Direction, SysfsPin};
use crate::error::{GpioError, GpioOp};
use crate::pins;

/// Switch and LED pins, plus the shared button latches.
pub struct PanelHardware<I, O> {
    app_switch: I,
    shutdown_switch: I,
    system_alive_led: O,
    app_running_led: O,
    shutdown_led: O,
    edges: Arc<EdgeFlags>,
    /// Kept alive for the adapter's lifetime; dropping it joins the thread.
    _watcher: Option<EdgeWatcher>,
}

impl<I: InputPin, O: OutputPin> PanelHardware<I, O> {
    /// Assemble from already-configured pins.  `watcher` may be `None` when
    /// edges are latched into `edges` by some other means.
    pub fn new(
        switches: [I; 2],
        leds: [O; 3],
        edges: Arc<EdgeFlags>,
        watcher: Option<EdgeWatcher>,
    ) -> Self {
        let [app_switch, shutdown_switch] = switches;
        let [system_alive_led, app_running_led, shutdown_led] = leds;
        Self {
            app_switch,
            shutdown_switch,
            system_alive_led,
            app_running_led,
            shutdown_led,
            edges,
            _watcher: watcher,
        }
    }

    /// The button latches, for injecting presses from outside the watcher.
    pub fn edges(&self) -> &Arc<EdgeFlags> {
        &self.edges
    }
}

impl PanelHardware<SysfsPin, SysfsPin> {
    /// Export and configure every panel line under `/sys/class/gpio` and
    /// start the edge watcher.  Any failure here is fatal.
    pub fn open(config: &SupervisorConfig) -> Result<Self, GpioError> {
        Self::open_at(Path::new(sysfs_gpio::SYSFS_ROOT), config)
    }

    /// [`open`](Self::open) against an arbitrary sysfs root.
    pub fn open_at(root: &Path, config: &SupervisorConfig) -> Result<Self, GpioError> {
        let base = config.gpio_chip_base;
        let output = |board| {
            SysfsPin::open(root, sysfs_gpio::line_for(board, base)?, Direction::OutputLow)
        };
        let input =
            |board| SysfsPin::open(root, sysfs_gpio::line_for(board, base)?, Direction::Input);

        let leds = [
            output(pins::SYSTEM_ALIVE_LED)?,
            output(pins::APP_RUNNING_LED)?,
            output(pins::SHUTDOWN_LED)?,
        ];
        let switches = [
            input(pins::APP_ENABLE_SWITCH)?,
            input(pins::SHUTDOWN_ENABLE_SWITCH)?,
        ];
        let app_button = input(pins::APP_BUTTON)?;
        let shutdown_button = input(pins::SHUTDOWN_BUTTON)?;
        info!(
            "Panel inputs on lines {}, {}, {}, {} (pull-ups must be provided by the board)",
            switches[0].line(),
            switches[1].line(),
            app_button.line(),
            shutdown_button.line()
        );

        let edges = Arc::new(EdgeFlags::new());
        let watcher = EdgeWatcher::spawn(
            vec![(Button::App, app_button), (Button::Shutdown, shutdown_button)],
            Arc::clone(&edges),
            config.button_bounce(),
            config.edge_sample(),
        )
        .map_err(|e| GpioError::new(u32::from(pins::APP_BUTTON), GpioOp::Read, e.kind()))?;

        Ok(Self::new(switches, leds, edges, Some(watcher)))
    }
}

impl<I: InputPin, O: OutputPin> PanelPort for PanelHardware<I, O> {
    fn read_switch(&mut self, switch: Switch) -> PinState {
        let pin = match switch {
            Switch::App => &mut self.app_switch,
            Switch::Shutdown => &mut self.shutdown_switch,
        };
        match pin.is_low() {
            Ok(true) => PinState::Low,
            Ok(false) => PinState::High,
            Err(e) => {
                warn!("Switch {} read failed ({:?}), treating as OFF", switch.number(), e);
                PinState::High
            }
        }
    }

    fn has_pending_edge(&mut self, button: Button) -> bool {
        self.edges.pending(button)
    }

    fn clear_pending_edge(&mut self, button: Button) {
        self.edges.clear(button);
    }

    fn set_led(&mut self, led: StatusLed, on: bool) {
        let pin = match led {
            StatusLed::SystemAlive => &mut self.system_alive_led,
            StatusLed::AppRunning => &mut self.app_running_led,
            StatusLed::ShutdownStopped => &mut self.shutdown_led,
        };
        if let Err(e) = pin.set_state(PinState::from(on)) {
            warn!("{:?} LED write failed: {:?}", led, e);
        }
    }
}
