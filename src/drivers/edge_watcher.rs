//! Background falling-edge detection for the panel buttons.
//!
//! ## Hardware
//!
//! Active-low momentary buttons with pull-up.  A press pulls the line LOW,
//! so the event of interest is the HIGH → LOW transition.  sysfs offers no
//! interrupt delivery that survives every kernel, so a dedicated thread
//! samples the lines every `edge_sample_ms` and latches accepted edges into
//! [`EdgeFlags`].  The main loop reads and clears those flags at its own
//! pace; the latch is a single bit, so several presses between two reads
//! collapse into one.
//!
//! ```text
//!   sampler thread ──store(Release)──▶ EdgeFlags ◀──load(Acquire)── main loop
//! ```
//!
//! ## Debounce
//!
//! After an accepted edge, further falling edges are ignored for
//! `button_bounce_ms`.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::app::ports::{Button, PinState};

// ───────────────────────────────────────────────────────────────
// Detector
// ───────────────────────────────────────────────────────────────

/// Per-line falling-edge state machine.  Pure: time is passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallingEdgeDetector {
    bounce: Duration,
    level: Option<PinState>,
    last_edge: Option<Instant>,
}

impl FallingEdgeDetector {
    pub fn new(bounce: Duration) -> Self {
        Self {
            bounce,
            level: None,
            last_edge: None,
        }
    }

    /// Feed one sample.  Returns `true` if it completes an accepted
    /// falling edge.  The very first sample only records the level, so a
    /// button held at startup does not count as a press.
    pub fn sample(&mut self, level: PinState, now: Instant) -> bool {
        let previous = self.level.replace(level);
        if previous != Some(PinState::High) || level != PinState::Low {
            return false;
        }
        match self.last_edge {
            Some(at) if now.saturating_duration_since(at) < self.bounce => false,
            _ => {
                self.last_edge = Some(now);
                true
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Shared latch
// ───────────────────────────────────────────────────────────────

/// One pending-edge bit per button, shared with the sampler thread.
#[derive(Debug, Default)]
pub struct EdgeFlags {
    app: AtomicBool,
    shutdown: AtomicBool,
}

impl EdgeFlags {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, button: Button) -> &AtomicBool {
        match button {
            Button::App => &self.app,
            Button::Shutdown => &self.shutdown,
        }
    }

    pub fn latch(&self, button: Button) {
        self.slot(button).store(true, Ordering::Release);
    }

    pub fn pending(&self, button: Button) -> bool {
        self.slot(button).load(Ordering::Acquire)
    }

    pub fn clear(&self, button: Button) {
        self.slot(button).store(false, Ordering::Release);
    }
}

// ───────────────────────────────────────────────────────────────
// Sampler thread
// ───────────────────────────────────────────────────────────────

struct WatchedLine<I> {
    button: Button,
    pin: I,
    detector: FallingEdgeDetector,
    failing: bool,
}

impl<I: InputPin> WatchedLine<I> {
    fn poll(&mut self, now: Instant, flags: &EdgeFlags) {
        let level = match self.pin.is_low() {
            Ok(true) => PinState::Low,
            Ok(false) => PinState::High,
            Err(e) => {
                if !self.failing {
                    warn!("{:?} button read failed: {:?}", self.button, e);
                    self.failing = true;
                }
                return;
            }
        };
        self.failing = false;
        if self.detector.sample(level, now) {
            debug!("{:?} button pressed", self.button);
            flags.latch(self.button);
        }
    }
}

/// Handle to the running sampler.  Dropping it stops and joins the thread.
pub struct EdgeWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl EdgeWatcher {
    /// Start sampling `pins` every `sample`, latching into `flags`.
    pub fn spawn<I>(
        pins: Vec<(Button, I)>,
        flags: Arc<EdgeFlags>,
        bounce: Duration,
        sample: Duration,
    ) -> io::Result<Self>
    where
        I: InputPin + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let mut lines: Vec<WatchedLine<I>> = pins
            .into_iter()
            .map(|(button, pin)| WatchedLine {
                button,
                pin,
                detector: FallingEdgeDetector::new(bounce),
                failing: false,
            })
            .collect();

        let handle = thread::Builder::new()
            .name("edge-watcher".into())
            .spawn(move || {
                while !stop_flag.load(Ordering::Acquire) {
                    let now = Instant::now();
                    for line in &mut lines {
                        line.poll(now, &flags);
                    }
                    thread::sleep(sample);
                }
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for EdgeWatcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
