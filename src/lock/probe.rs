//! Detect whether a git process is running on the host.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// Process name checked before forcing a lock removal.
pub const GIT_PROCESS_NAME: &str = "git";

/// Trait for host process lookups.
///
/// This abstraction allows mocking the process listing in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessProbe: Send + Sync {
    /// Whether a process with exactly this name is running.
    ///
    /// Lookup failures report `false`.
    async fn is_running(&self, name: &str) -> bool;
}

/// Probe backed by `pgrep -x`.
pub struct PgrepProbe;

#[async_trait]
impl ProcessProbe for PgrepProbe {
    async fn is_running(&self, name: &str) -> bool {
        if which::which("pgrep").is_err() {
            warn!("pgrep not found on PATH; assuming no {} process is running", name);
            return false;
        }

        let output = match Command::new("pgrep")
            .arg("-x")
            .arg(name)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to run pgrep: {}", e);
                return false;
            }
        };

        match output.status.code() {
            Some(0) => {
                let pids = String::from_utf8_lossy(&output.stdout);
                debug!(pids = %pids.trim().replace('\n', ","), "{} process running", name);
                true
            }
            Some(1) => false,
            code => {
                warn!(
                    ?code,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "pgrep failed; assuming no {} process is running",
                    name
                );
                false
            }
        }
    }
}
