//! Panel drivers: sysfs pins, edge sampling, switch gating, LED flashing.

pub mod edge_watcher;
pub mod input_monitor;
pub mod status_indicator;
pub mod sysfs_gpio;
