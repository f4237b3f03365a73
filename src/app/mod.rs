//! Supervisor core: pure domain logic, zero I/O.
//!
//! This module contains the rules of the control panel: which presses are
//! honoured, when the application is launched or stopped, and when the
//! host is halted.  All interaction with hardware and the OS happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without a board.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
