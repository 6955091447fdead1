//! Child process execution with a deadline.

use std::{process::ExitStatus, time::Duration};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, warn};

/// How a bounded child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finished {
    Exited(ExitStatus),
    TimedOut,
}

/// Run `cmd` with inherited stdio, killing it if it outlives `timeout`.
///
/// Failing to spawn the program is an error; a non-zero exit is not.
pub async fn status_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Finished> {
    let program = format!("{:?}", cmd.as_std());
    debug!("running {}", program);

    let mut child = cmd
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to start {}", program))?;

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(status) => Ok(Finished::Exited(
            status.with_context(|| format!("failed to wait for {}", program))?,
        )),
        Err(_) => {
            warn!("{} timed out after {}s", program, timeout.as_secs());
            if let Err(e) = child.kill().await {
                warn!("could not kill {}: {}", program, e);
            }
            Ok(Finished::TimedOut)
        }
    }
}
