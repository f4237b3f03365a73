//! Logical commands produced by the control panel.
//!
//! The [`InputMonitor`](crate::drivers::input_monitor::InputMonitor) turns a
//! button edge into one of these only when the button's enable switch is ON.
//! The [`Coordinator`](super::service::Coordinator) interprets them.

use crate::app::ports::Button;

/// Commands the operator can issue from the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    /// Launch the application if stopped, stop it if running.
    ToggleApp,

    /// Stop the application and halt the host.  Irrevocable.
    RequestShutdown,
}

impl PanelCommand {
    /// The command a press of `button` issues.
    pub const fn for_button(button: Button) -> Self {
        match button {
            Button::App => Self::ToggleApp,
            Button::Shutdown => Self::RequestShutdown,
        }
    }
}
