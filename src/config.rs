//! Runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::lock::LockPolicy;
use crate::lock::schedule::{DEFAULT_GRACE_PERIOD_SECS, DEFAULT_INITIAL_WAIT_SECS};

/// Environment variable to override the initial lock wait (seconds).
pub const LOCK_WAIT_ENV_VAR: &str = "AUTOCOMMIT_LOCK_WAIT_SECS";

/// Environment variable to override the lock grace period (seconds).
pub const LOCK_GRACE_ENV_VAR: &str = "AUTOCOMMIT_LOCK_GRACE_SECS";

/// Environment variable to override the log file path.
pub const LOG_FILE_ENV_VAR: &str = "AUTOCOMMIT_LOG_FILE";

/// Environment variable that disables desktop notifications when truthy.
pub const NO_NOTIFY_ENV_VAR: &str = "AUTOCOMMIT_NO_NOTIFY";

/// Log file name used next to the installed executable.
pub const DEFAULT_LOG_FILE_NAME: &str = "autocommit.log";

/// Lock policy from the environment, falling back to 10s / 60s.
pub fn lock_policy_from_env() -> LockPolicy {
    LockPolicy {
        initial_wait: secs_from_env(LOCK_WAIT_ENV_VAR, DEFAULT_INITIAL_WAIT_SECS),
        grace_period: secs_from_env(LOCK_GRACE_ENV_VAR, DEFAULT_GRACE_PERIOD_SECS),
    }
}

/// Read a duration in whole seconds.
///
/// Logs a warning if the variable is set but is not a non-negative integer.
fn secs_from_env(var: &str, default: u64) -> Duration {
    match env::var(var) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!("Invalid {} value '{}', using default {}s", var, v, default);
                Duration::from_secs(default)
            }
        },
        _ => Duration::from_secs(default),
    }
}

/// Resolve the log file: explicit flag, then environment, then next to the executable.
///
/// Returns `None` when no location can be determined.
pub fn log_file_path(cli_override: Option<PathBuf>) -> Option<PathBuf> {
    if cli_override.is_some() {
        return cli_override;
    }

    if let Ok(v) = env::var(LOG_FILE_ENV_VAR)
        && !v.is_empty()
    {
        return Some(PathBuf::from(v));
    }

    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_LOG_FILE_NAME)))
}

/// Whether desktop notifications are enabled.
pub fn notifications_enabled(no_notify_flag: bool) -> bool {
    if no_notify_flag {
        return false;
    }

    match env::var(NO_NOTIFY_ENV_VAR) {
        Ok(v) => !matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => true,
    }
}
