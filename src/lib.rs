//! Panelvisor library.
//!
//! Control-panel supervisor for a headless single-board computer: two
//! enable switches, two buttons and three LEDs drive the lifecycle of one
//! managed application and, ultimately, the host shutdown.
//!
//! The domain core ([`app`], [`supervisor`], [`drivers`]) talks to the
//! outside world only through the port traits in [`app::ports`]; the
//! Linux implementations live in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod supervisor;
