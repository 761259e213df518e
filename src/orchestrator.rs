//! Commit pipeline: lock check, stage, detect changes, commit, push.

use std::path::PathBuf;

use tracing::{error, info};

use crate::error::RunError;
use crate::git::GitExecutor;
use crate::lock::{LockOutcome, LockPolicy, ProcessProbe, clear_stale_lock};
use crate::message::derive_message;
use crate::notify::Notifier;

/// Successful end states of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The tree matched the last commit; nothing was committed or pushed.
    NoChanges,
    /// A commit was created and pushed.
    Pushed { message: String },
}

/// Sequences the git operations for one working tree.
pub struct CommitOrchestrator<'a, G: ?Sized, P: ?Sized, N: ?Sized> {
    pub workdir: PathBuf,
    pub lock_path: PathBuf,
    pub lock_policy: LockPolicy,
    pub git: &'a G,
    pub probe: &'a P,
    pub notifier: &'a N,
}

impl<G, P, N> CommitOrchestrator<'_, G, P, N>
where
    G: GitExecutor + ?Sized,
    P: ProcessProbe + ?Sized,
    N: Notifier + ?Sized,
{
    /// Run the pipeline, reporting any failure before returning it.
    pub async fn run(&self, message: Option<&str>) -> Result<RunOutcome, RunError> {
        match self.execute(message).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.report(&e).await;
                Err(e)
            }
        }
    }

    async fn execute(&self, message: Option<&str>) -> Result<RunOutcome, RunError> {
        let repo = self.workdir.display();

        // ── Lock check ──
        match clear_stale_lock(&self.lock_path, &self.lock_policy, self.probe).await? {
            LockOutcome::Absent => {}
            LockOutcome::ReleasedWhileWaiting => info!(%repo, "Index lock released, continuing"),
            LockOutcome::ForcedRemoval { git_was_running } => {
                info!(%repo, git_was_running, "Removed stale index lock, continuing")
            }
        }

        // ── Staging ──
        self.git.add_all().await.map_err(RunError::StagingFailed)?;

        // ── Change detection ──
        let index_clean = self
            .git
            .index_matches_head()
            .await
            .map_err(RunError::ChangeDetectionFailed)?;
        let status = self
            .git
            .tracked_status()
            .await
            .map_err(RunError::ChangeDetectionFailed)?;

        if index_clean && status.is_empty() {
            info!(%repo, "No changes to commit");
            return Ok(RunOutcome::NoChanges);
        }

        // ── Commit ──
        let message = match message {
            Some(explicit) => explicit.to_string(),
            None => {
                let staged = self
                    .git
                    .staged_paths()
                    .await
                    .map_err(RunError::ChangeDetectionFailed)?;
                derive_message(&staged)
            }
        };

        self.git
            .commit(&message)
            .await
            .map_err(RunError::CommitFailed)?;
        info!(%repo, "Commit successful. Pushing to remote.");

        // ── Push ──
        self.git.push().await.map_err(RunError::PushFailed)?;
        info!(%repo, "Push successful.");

        Ok(RunOutcome::Pushed { message })
    }

    async fn report(&self, e: &RunError) {
        error!(repo = %self.workdir.display(), "{}", e);
        self.notifier
            .notify(e.title(), &format!("{}\n{}", self.workdir.display(), e))
            .await;
    }
}
