//! autocommit - A CLI tool that stages, commits and pushes a git working tree.
//!
//! # Overview
//!
//! autocommit runs `git add`, checks whether anything changed, commits with
//! either a supplied message or one derived from the staged filenames, and
//! pushes. A stale `index.lock` is waited on and then removed. Failures are
//! logged, optionally raised as desktop notifications, and end the process
//! with exit code 1.

pub mod config;
pub mod error;
pub mod git;
pub mod lock;
pub mod logging;
pub mod message;
pub mod notify;
pub mod orchestrator;
pub mod repository;

// Re-export commonly used types
pub use error::{GitError, LockError, RepositoryError, RunError};
pub use git::{GitExecutor, SystemGit};
pub use lock::{LockOutcome, LockPolicy};
pub use message::{HIDDEN_ONLY_MESSAGE, derive_message};
pub use orchestrator::{CommitOrchestrator, RunOutcome};
pub use repository::RepositoryHandle;
