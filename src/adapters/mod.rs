//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements   | Connects to                          |
//! |-------------|--------------|--------------------------------------|
//! | `hardware`  | PanelPort    | sysfs GPIO lines + edge watcher      |
//! | `process`   | ProcessPort  | `ps`, `kill`, detached spawn, flag   |
//! | `system`    | SystemPort   | `shutdown -h now`                    |
//! | `time`      | ClockPort    | `std::thread::sleep`                 |
//! | `log_sink`  | EventSink    | `log` facade (env_logger)            |

pub mod hardware;
pub mod log_sink;
pub mod process;
pub mod system;
pub mod time;
