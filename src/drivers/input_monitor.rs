//! Enable-switch tracking and gated button edges.
//!
//! ## Hardware
//!
//! Two level switches and two momentary buttons, all active-low with
//! pull-up.  A switch reading logic 0 is **ON**.  Button falling edges are
//! latched by the I/O layer (see [`edge_watcher`](super::edge_watcher));
//! this module only consumes them.
//!
//! ## Gating rules
//!
//! | Switch state          | Button edge           | Result                      |
//! |-----------------------|-----------------------|-----------------------------|
//! | OFF                   | pending               | ignored, left latched       |
//! | OFF → ON (this call)  | pending               | discarded, never fires      |
//! | ON                    | pending               | consumed → [`PanelCommand`] |
//!
//! An edge latched while the switch was OFF is therefore never acted on:
//! it is cleared at the moment the switch is turned back ON.

use crate::app::commands::PanelCommand;
use crate::app::events::AppEvent;
use crate::app::ports::{Button, EventSink, PanelPort, PinState, Switch};

/// Tracks the logical enabled state of both switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputMonitor {
    app_enabled: bool,
    shutdown_enabled: bool,
}

impl InputMonitor {
    /// Both switches start out disabled, so any switch already ON is
    /// reported (and its stale edge discarded) by the first sync.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last observed logical state of `switch`.
    pub fn is_enabled(&self, switch: Switch) -> bool {
        match switch {
            Switch::App => self.app_enabled,
            Switch::Shutdown => self.shutdown_enabled,
        }
    }

    /// Sample both switches.  Returns how many changed position.
    pub fn sync_switches(
        &mut self,
        panel: &mut impl PanelPort,
        sink: &mut impl EventSink,
    ) -> usize {
        [Switch::App, Switch::Shutdown]
            .into_iter()
            .filter(|&s| self.sync_switch(s, panel, sink).is_some())
            .count()
    }

    /// Sample one switch.  Returns `Some(enabled)` if it changed since the
    /// previous sample, `None` otherwise.
    ///
    /// On a disabled → enabled transition the paired button's pending
    /// edge is discarded before anyone can consume it.
    pub fn sync_switch(
        &mut self,
        switch: Switch,
        panel: &mut impl PanelPort,
        sink: &mut impl EventSink,
    ) -> Option<bool> {
        let enabled = panel.read_switch(switch) == PinState::Low;
        let slot = match switch {
            Switch::App => &mut self.app_enabled,
            Switch::Shutdown => &mut self.shutdown_enabled,
        };
        if *slot == enabled {
            return None;
        }
        *slot = enabled;
        sink.emit(&AppEvent::SwitchChanged { switch, enabled });

        if enabled {
            let button = switch.button();
            if panel.has_pending_edge(button) {
                sink.emit(&AppEvent::StaleEdgeDiscarded { switch });
            }
            panel.clear_pending_edge(button);
        }
        Some(enabled)
    }

    /// Consume the pending edge for `button`.  True at most once per press.
    pub fn take_edge(&mut self, button: Button, panel: &mut impl PanelPort) -> bool {
        if panel.has_pending_edge(button) {
            panel.clear_pending_edge(button);
            true
        } else {
            false
        }
    }

    /// Re-sample `switch` and, if it is ON, consume its button's edge.
    ///
    /// Returns the command the press issues, or `None` when the switch is
    /// OFF or no press is pending.
    pub fn poll_command(
        &mut self,
        switch: Switch,
        panel: &mut impl PanelPort,
        sink: &mut impl EventSink,
    ) -> Option<PanelCommand> {
        self.sync_switch(switch, panel, sink);
        if !self.is_enabled(switch) {
            return None;
        }
        let button = switch.button();
        self.take_edge(button, panel)
            .then(|| PanelCommand::for_button(button))
    }
}
