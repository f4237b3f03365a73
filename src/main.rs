//! Panelvisor main entry point.
//!
//! Hexagonal architecture with a single cooperative polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  PanelHardware    PsProcessTable   HostShutdown                │
//! │  (PanelPort)      (ProcessPort)    (SystemPort)                │
//! │  MonotonicClock   LogEventSink                                 │
//! │  (ClockPort)      (EventSink)                                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Coordinator (pure logic)                  │    │
//! │  │  InputMonitor · StatusIndicator · ProcessSupervisor    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use panelvisor::adapters::hardware::PanelHardware;
use panelvisor::adapters::log_sink::LogEventSink;
use panelvisor::adapters::process::PsProcessTable;
use panelvisor::adapters::system::HostShutdown;
use panelvisor::adapters::time::MonotonicClock;
use panelvisor::app::service::{Coordinator, Ports};
use panelvisor::config::SupervisorConfig;
use panelvisor::supervisor::{LaunchCommand, ProcessSupervisor};

/// Supervise one application from a physical control panel.
#[derive(Parser, Debug)]
#[command(name = "panelvisor", version, about)]
struct Cli {
    /// Application to manage; also the process-table match signature.
    #[arg(short, long)]
    app: String,

    /// Exit flag file written to ask the application to stop on its own.
    /// Without it, stopping always kills.
    #[arg(short, long)]
    flag: Option<PathBuf>,

    /// JSON configuration file (timings, interpreter, gpio chip base).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn load_config(path: Option<&PathBuf>) -> panelvisor::error::Result<SupervisorConfig> {
    let Some(path) = path else {
        return Ok(SupervisorConfig::default());
    };
    let config = SupervisorConfig::from_file(path)?;
    info!("Config loaded from {}", path.display());
    Ok(config)
}

/// Setup, loop, host shutdown.  Only setup and the final shutdown command
/// can fail; everything in between is logged and absorbed.
fn run(cli: Cli) -> panelvisor::error::Result<()> {
    // ── 1. Configuration ──────────────────────────────────────
    let config = load_config(cli.config.as_ref())?;

    // ── 2. Panel hardware (fatal on failure) ──────────────────
    let panel = PanelHardware::open(&config)?;

    // ── 3. Supervisor + coordinator ───────────────────────────
    let command = LaunchCommand::new(&cli.app, config.interpreter.as_deref());
    if let Some(flag) = &cli.flag {
        info!("Graceful stop via exit flag {}", flag.display());
    }
    let supervisor = ProcessSupervisor::new(command, cli.flag, &config);
    let ports = Ports {
        panel,
        processes: PsProcessTable::new(),
        clock: MonotonicClock::new(),
        sink: LogEventSink::new(cli.app),
        system: HostShutdown::new(),
    };
    let mut coordinator = Coordinator::new(&config, supervisor, ports);

    // ── 4. Main loop, then halt the host ──────────────────────
    coordinator.run()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    info!("Panelvisor v{}", env!("CARGO_PKG_VERSION"));

    run(cli).inspect_err(|e| error!("{}", e)).context("panelvisor aborted")
}
