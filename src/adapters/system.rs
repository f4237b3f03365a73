//! Host adapter: halts the machine.

use std::process::{Command, Stdio};

use log::info;

use crate::app::ports::{SystemError, SystemPort};

/// [`SystemPort`] that runs the host's `shutdown` command.
#[derive(Debug, Clone)]
pub struct HostShutdown {
    program: String,
    args: Vec<String>,
}

impl Default for HostShutdown {
    fn default() -> Self {
        Self::with_command("shutdown", &["-h", "now"])
    }
}

impl HostShutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different halt command (e.g. `systemctl poweroff`).
    pub fn with_command(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_owned(),
            args: args.iter().map(|a| (*a).to_owned()).collect(),
        }
    }
}

impl SystemPort for HostShutdown {
    fn shutdown(&mut self) -> Result<(), SystemError> {
        info!("Running {} {}", self.program, self.args.join(" "));
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| SystemError::Spawn(e.kind()))?;
        if status.success() {
            Ok(())
        } else {
            Err(SystemError::Status(status.code()))
        }
    }
}
