//! Git operations for the commit pipeline: stage, inspect, commit and push.
//!
//! All operations use `tokio::process::Command` to shell out to the system `git`
//! binary, inheriting the user's existing git config, SSH agent, and credential store.

use std::path::PathBuf;
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::GitError;

/// Trait for the git operations the orchestrator needs.
///
/// This abstraction allows mocking the git subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitExecutor: Send + Sync {
    /// `git add .`
    async fn add_all(&self) -> Result<(), GitError>;

    /// `git diff-index --quiet HEAD --`; `true` when the index matches HEAD.
    async fn index_matches_head(&self) -> Result<bool, GitError>;

    /// `git status --porcelain --untracked-files=no`, trimmed.
    async fn tracked_status(&self) -> Result<String, GitError>;

    /// `git diff --name-only --cached`, in listing order.
    async fn staged_paths(&self) -> Result<Vec<String>, GitError>;

    /// `git commit -m <message>`
    async fn commit(&self, message: &str) -> Result<(), GitError>;

    /// `git push`
    async fn push(&self) -> Result<(), GitError>;
}

/// Executor that runs the real `git` binary inside a working tree.
pub struct SystemGit {
    workdir: PathBuf,
}

impl SystemGit {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Run git and return its output, whatever the exit status.
    async fn output(&self, args: &[&str], operation: &'static str) -> Result<Output, GitError> {
        debug!(?args, "running git {}", operation);

        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|error| GitError::SpawnFailed { operation, error })
    }

    /// Run git and return its stdout, or a descriptive error on non-zero exit.
    async fn run_git(&self, args: &[&str], operation: &'static str) -> Result<String, GitError> {
        let output = self.output(args, operation).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            // git commit reports "nothing to commit" on stdout
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(GitError::NonZeroExit {
                operation,
                code: output.status.code(),
                stderr: detail,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl GitExecutor for SystemGit {
    async fn add_all(&self) -> Result<(), GitError> {
        self.run_git(&["add", "."], "add").await.map(|_| ())
    }

    async fn index_matches_head(&self) -> Result<bool, GitError> {
        let output = self
            .output(&["diff-index", "--quiet", "HEAD", "--"], "diff-index")
            .await?;

        // Exit 1 means "differs"; anything else non-zero (e.g. no HEAD yet)
        // is treated the same way so the commit step gets a chance to run.
        Ok(output.status.success())
    }

    async fn tracked_status(&self) -> Result<String, GitError> {
        let stdout = self
            .run_git(&["status", "--porcelain", "--untracked-files=no"], "status")
            .await?;
        Ok(stdout.trim().to_string())
    }

    async fn staged_paths(&self) -> Result<Vec<String>, GitError> {
        let stdout = self
            .run_git(&["diff", "--name-only", "--cached", "-z"], "diff")
            .await?;
        Ok(parse_nul_separated(&stdout))
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        let stdout = self.run_git(&["commit", "-m", message], "commit").await?;
        debug!("git commit: {}", stdout.trim());
        Ok(())
    }

    async fn push(&self) -> Result<(), GitError> {
        self.run_git(&["push"], "push").await.map(|_| ())
    }
}

/// Split `-z` output into paths, dropping the trailing terminator.
fn parse_nul_separated(stdout: &str) -> Vec<String> {
    stdout
        .split('\0')
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}
