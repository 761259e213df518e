//! Index lock contention handling.
//!
//! A leftover `index.lock` makes every index-mutating git command fail. Before
//! staging, the lock is waited on in two bounded stages and then removed. The
//! removal is a heuristic: a git process that legitimately holds the lock for
//! longer than the grace period will lose it.

pub mod probe;
pub mod schedule;

use std::io;
use std::path::Path;

use backoff::backoff::Backoff;
use tracing::{info, warn};

use crate::error::LockError;

pub use probe::{GIT_PROCESS_NAME, PgrepProbe, ProcessProbe};
pub use schedule::{LockPolicy, LockWaitSchedule};

/// What happened at the lock check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// No lock file was present.
    Absent,
    /// The lock disappeared while waiting.
    ReleasedWhileWaiting,
    /// The lock outlived the waits and was deleted.
    ForcedRemoval {
        /// Whether a git process was seen running (and the grace period waited).
        git_was_running: bool,
    },
}

/// Wait out, and if necessary remove, a held `index.lock`.
pub async fn clear_stale_lock<P: ProcessProbe + ?Sized>(
    lock_path: &Path,
    policy: &LockPolicy,
    probe: &P,
) -> Result<LockOutcome, LockError> {
    if !lock_exists(lock_path).await? {
        return Ok(LockOutcome::Absent);
    }

    let mut schedule = policy.schedule();

    if let Some(wait) = schedule.next_backoff() {
        info!(
            lock = %lock_path.display(),
            "Lock file present, waiting {}s before re-checking",
            wait.as_secs()
        );
        tokio::time::sleep(wait).await;
    }

    if !lock_exists(lock_path).await? {
        info!("Lock file released");
        return Ok(LockOutcome::ReleasedWhileWaiting);
    }

    let git_was_running = probe.is_running(GIT_PROCESS_NAME).await;

    if git_was_running {
        if let Some(grace) = schedule.next_backoff() {
            warn!(
                "Lock file still present and a git process is running, waiting {}s grace period",
                grace.as_secs()
            );
            tokio::time::sleep(grace).await;
        }

        if !lock_exists(lock_path).await? {
            info!("Lock file released during grace period");
            return Ok(LockOutcome::ReleasedWhileWaiting);
        }
    }

    warn!(lock = %lock_path.display(), "Removing stale lock file");
    match tokio::fs::remove_file(lock_path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(LockOutcome::ReleasedWhileWaiting);
        }
        Err(error) => {
            return Err(LockError::RemoveFailed {
                path: lock_path.to_path_buf(),
                error,
            });
        }
    }

    Ok(LockOutcome::ForcedRemoval { git_was_running })
}

async fn lock_exists(lock_path: &Path) -> Result<bool, LockError> {
    tokio::fs::try_exists(lock_path)
        .await
        .map_err(|error| LockError::Inspect {
            path: lock_path.to_path_buf(),
            error,
        })
}
