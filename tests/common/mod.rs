//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;
use git2::{IndexAddOption, Oid, Repository, Signature};

use autocommit::lock::ProcessProbe;
use autocommit::notify::Notifier;

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
    pub remote_dir: Option<tempfile::TempDir>,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config
            .set_str("user.name", "Test User")
            .expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");
        config
            .set_bool("commit.gpgsign", false)
            .expect("Failed to disable signing");

        Self {
            dir,
            repo,
            remote_dir: None,
        }
    }

    /// Create a repository with one commit pushed to a bare `origin`.
    pub fn with_remote() -> Self {
        let mut test_repo = Self::new();
        test_repo.write("README.md", "initial\n");
        test_repo.commit_all("initial commit");

        let remote_dir = tempfile::tempdir().expect("Failed to create remote dir");
        Repository::init_bare(remote_dir.path()).expect("Failed to init bare repo");
        test_repo
            .repo
            .remote(
                "origin",
                remote_dir.path().to_str().expect("Invalid remote path"),
            )
            .expect("Failed to add origin remote");

        let branch = test_repo.branch();
        let status = Command::new("git")
            .args(["push", "origin", &format!("HEAD:refs/heads/{}", branch)])
            .current_dir(test_repo.path())
            .output()
            .expect("Failed to push to origin");
        assert!(status.status.success(), "git push failed in test setup");

        let mut config = test_repo.repo.config().expect("Failed to open repo config");
        config
            .set_str(&format!("branch.{}.remote", branch), "origin")
            .expect("Failed to set upstream remote");
        config
            .set_str(
                &format!("branch.{}.merge", branch),
                &format!("refs/heads/{}", branch),
            )
            .expect("Failed to set upstream branch");

        test_repo.remote_dir = Some(remote_dir);
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dir.path().join(".git").join("index.lock")
    }

    /// Write a file relative to the working tree, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Stage everything and commit it. Returns the commit OID.
    pub fn commit_all(&self, message: &str) -> Oid {
        let sig = self.signature();

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .expect("Failed to add files");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        // Get parent commit if exists
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());

        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Current branch name.
    pub fn branch(&self) -> String {
        self.repo
            .head()
            .ok()
            .and_then(|h| h.shorthand().map(|s| s.to_string()))
            .unwrap_or_else(|| "master".to_string())
    }

    /// Message of the local HEAD commit.
    pub fn head_message(&self) -> String {
        let commit = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("Failed to read HEAD commit");
        commit.message().unwrap_or("").trim_end().to_string()
    }

    /// Number of commits reachable from HEAD.
    pub fn commit_count(&self) -> usize {
        let mut walk = self.repo.revwalk().expect("Failed to create revwalk");
        walk.push_head().expect("Failed to push HEAD");
        walk.count()
    }

    /// Message of the remote branch tip, if a remote exists.
    pub fn remote_head_message(&self) -> Option<String> {
        let remote_dir = self.remote_dir.as_ref()?;
        let remote = Repository::open_bare(remote_dir.path()).expect("Failed to open remote");
        let reference = remote
            .find_reference(&format!("refs/heads/{}", self.branch()))
            .ok()?;
        let commit = reference.peel_to_commit().ok()?;
        Some(commit.message().unwrap_or("").trim_end().to_string())
    }

    /// Point origin at a path that does not exist so pushes fail.
    pub fn break_remote(&self) {
        self.repo
            .remote_set_url("origin", "/nonexistent/autocommit/remote.git")
            .expect("Failed to rewrite origin URL");
    }
}

/// Process check with a fixed answer.
pub struct FixedProbe(pub bool);

#[async_trait]
impl ProcessProbe for FixedProbe {
    async fn is_running(&self, _name: &str) -> bool {
        self.0
    }
}

/// Notifier that records every notification.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: std::sync::Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn summaries(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .iter()
            .map(|(summary, _)| summary.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, summary: &str, body: &str) {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push((summary.to_string(), body.to_string()));
    }
}
