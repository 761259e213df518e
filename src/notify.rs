//! Best-effort desktop notifications for failed runs.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// Trait for surfacing failures to the desktop.
///
/// This abstraction allows mocking notification delivery in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a notification. Delivery failures are logged, never returned.
    async fn notify(&self, summary: &str, body: &str);
}

/// Notifier backed by `notify-send` (libnotify).
pub struct DesktopNotifier;

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, summary: &str, body: &str) {
        if which::which("notify-send").is_err() {
            debug!("notify-send not found; skipping desktop notification");
            return;
        }

        let result = Command::new("notify-send")
            .arg("--urgency=critical")
            .arg(summary)
            .arg(body)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {}
            Ok(output) => warn!(
                code = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Desktop notification failed"
            ),
            Err(e) => warn!("Failed to run notify-send: {}", e),
        }
    }
}

/// Notifier that drops everything, used with `--no-notify`.
pub struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn notify(&self, summary: &str, _body: &str) {
        debug!(summary, "Desktop notifications disabled");
    }
}
