//! Process-table adapter backed by `ps`, `kill` and detached spawning.
//!
//! The application is identified by substring match of its launch command
//! line against `ps ax -o pid= -o args=`.  The supervisor's own pid and the
//! `ps` child are excluded from the match; when several processes match,
//! the one listed last wins.

use std::fs;
use std::io;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use log::{debug, warn};

use crate::app::ports::{ProcessError, ProcessPort};
use crate::supervisor::LaunchCommand;

/// Pid of the last line in `listing` whose arguments contain `signature`,
/// skipping any pid in `exclude`.
pub fn parse_ps_listing(listing: &str, signature: &str, exclude: &[u32]) -> Option<u32> {
    listing
        .lines()
        .filter_map(|line| {
            let line = line.trim_start();
            let (pid, args) = line.split_once(char::is_whitespace)?;
            let pid: u32 = pid.parse().ok()?;
            (!exclude.contains(&pid) && args.contains(signature)).then_some(pid)
        })
        .last()
}

/// [`ProcessPort`] over the host's process table.
#[derive(Debug, Default)]
pub struct PsProcessTable {
    /// Children we spawned and have not yet reaped.
    children: Vec<Child>,
}

impl PsProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect exit statuses of finished children so they do not linger
    /// as zombies.
    fn reap(&mut self) {
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                debug!("Reaped child {} ({})", child.id(), status);
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!("Cannot wait on child {}: {}", child.id(), e);
                false
            }
        });
    }

    fn listing(&self) -> Result<(String, u32), ProcessError> {
        let child = Command::new("ps")
            .args(["ax", "-o", "pid=", "-o", "args="])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ProcessError::Listing(e.kind()))?;
        let ps_pid = child.id();
        let output = child
            .wait_with_output()
            .map_err(|e| ProcessError::Listing(e.kind()))?;
        if !output.status.success() {
            return Err(ProcessError::Listing(io::ErrorKind::Other));
        }
        Ok((String::from_utf8_lossy(&output.stdout).into_owned(), ps_pid))
    }
}

impl ProcessPort for PsProcessTable {
    fn find(&mut self, signature: &str) -> Option<u32> {
        self.reap();
        match self.listing() {
            Ok((listing, ps_pid)) => {
                parse_ps_listing(&listing, signature, &[std::process::id(), ps_pid])
            }
            Err(e) => {
                warn!("{}, assuming application is not running", e);
                None
            }
        }
    }

    fn spawn_detached(&mut self, command: &LaunchCommand) -> Result<(), ProcessError> {
        let child = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|e| ProcessError::Spawn(e.kind()))?;
        debug!("Spawned {} as pid {}", command.signature(), child.id());
        self.children.push(child);
        Ok(())
    }

    fn force_kill(&mut self, pid: u32) {
        match Command::new("kill")
            .args(["-9", &pid.to_string()])
            .stdin(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => {}
            Ok(status) => warn!("kill -9 {} exited with {}", pid, status),
            Err(e) => warn!("Cannot run kill for pid {}: {}", pid, e),
        }
        self.reap();
    }

    fn write_exit_flag(&mut self, path: &Path) -> Result<(), ProcessError> {
        fs::write(path, b"exit").map_err(|e| ProcessError::ExitFlag(e.kind()))
    }
}
