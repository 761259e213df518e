//! Error types for autocommit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from running a single `git` subprocess.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to spawn git {operation}: {error}")]
    SpawnFailed {
        operation: &'static str,
        error: std::io::Error,
    },

    #[error("git {operation} exited with {}: {stderr}",
             code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    NonZeroExit {
        operation: &'static str,
        code: Option<i32>,
        stderr: String,
    },
}

/// Errors from resolving the working tree and its control directory.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Repository path {path} does not exist: {error}")]
    NotFound {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("{path} is not inside a git working tree: {}", error.message())]
    NotARepository { path: PathBuf, error: git2::Error },

    #[error("{0} is a bare repository (no working tree)")]
    NotAWorkTree(PathBuf),

    #[error("Failed to change into {path}: {error}")]
    ChangeDir {
        path: PathBuf,
        error: std::io::Error,
    },
}

/// Errors from inspecting or clearing the index lock marker.
#[derive(Error, Debug)]
pub enum LockError {
    #[error("Failed to inspect lock file {path}: {error}")]
    Inspect {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Lock file {path} is still held and could not be removed: {error}")]
    RemoveFailed {
        path: PathBuf,
        error: std::io::Error,
    },
}

/// Terminal failures of a commit-and-push run.
///
/// Each variant maps to exit code 1. A run with nothing to commit is not an
/// error; see [`crate::orchestrator::RunOutcome::NoChanges`]. Variants carry
/// git's output inline rather than as a source chain.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("Staging failed: {0}")]
    StagingFailed(GitError),

    #[error("Could not determine pending changes: {0}")]
    ChangeDetectionFailed(GitError),

    #[error("Commit failed: {0}")]
    CommitFailed(GitError),

    #[error("Push failed (the local commit was created and is kept): {0}")]
    PushFailed(GitError),
}

impl RunError {
    /// Short title used for desktop notifications.
    pub fn title(&self) -> &'static str {
        match self {
            RunError::Repository(_) => "autocommit: invalid repository",
            RunError::Lock(_) => "autocommit: index lock contention",
            RunError::StagingFailed(_) => "autocommit: staging failed",
            RunError::ChangeDetectionFailed(_) => "autocommit: status check failed",
            RunError::CommitFailed(_) => "autocommit: commit failed",
            RunError::PushFailed(_) => "autocommit: push failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exit(operation: &'static str) -> GitError {
        GitError::NonZeroExit {
            operation,
            code: Some(1),
            stderr: "fatal: something went wrong".to_string(),
        }
    }

    #[test]
    fn test_non_zero_exit_includes_code_and_stderr() {
        let msg = exit("push").to_string();
        assert!(msg.contains("git push"));
        assert!(msg.contains("code 1"));
        assert!(msg.contains("fatal: something went wrong"));
    }

    #[test]
    fn test_non_zero_exit_without_code() {
        let err = GitError::NonZeroExit {
            operation: "commit",
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("unknown status"));
    }

    #[test]
    fn test_push_failure_is_distinct_from_commit_failure() {
        let push = RunError::PushFailed(exit("push"));
        let commit = RunError::CommitFailed(exit("commit"));

        assert!(push.to_string().contains("local commit was created"));
        assert!(!commit.to_string().contains("local commit was created"));
        assert_ne!(push.title(), commit.title());
    }

    #[test]
    fn test_git_stderr_appears_once() {
        let push = RunError::PushFailed(exit("push"));

        assert!(std::error::Error::source(&push).is_none());

        let mut rendered = push.to_string();
        let mut current = std::error::Error::source(&push);
        while let Some(cause) = current {
            rendered.push_str(&cause.to_string());
            current = cause.source();
        }
        assert_eq!(rendered.matches("fatal: something went wrong").count(), 1);
    }

    #[test]
    fn test_transparent_errors_have_no_duplicate_chain() {
        let err = RunError::from(LockError::RemoveFailed {
            path: PathBuf::from("/repo/.git/index.lock"),
            error: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });

        assert!(std::error::Error::source(&err).is_none());
        assert!(err.to_string().contains("could not be removed"));
    }
}
