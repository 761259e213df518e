//! Working tree resolution.

use std::fs;
use std::path::{Path, PathBuf};

use git2::Repository;

use crate::error::RepositoryError;

/// File git creates while it mutates the index.
pub const INDEX_LOCK_FILE: &str = "index.lock";

/// The working tree a run operates on, fixed at startup.
///
/// `workdir` is the directory the user named (possibly below the tree root);
/// git commands run from there, so `git add .` stages only that subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    workdir: PathBuf,
    root: PathBuf,
    git_dir: PathBuf,
}

impl RepositoryHandle {
    /// Resolve `path` (absolute, or relative to the current directory) and
    /// discover the repository that contains it.
    pub fn resolve(path: &Path) -> Result<Self, RepositoryError> {
        let workdir = fs::canonicalize(path).map_err(|error| RepositoryError::NotFound {
            path: path.to_path_buf(),
            error,
        })?;

        let repo =
            Repository::discover(&workdir).map_err(|error| RepositoryError::NotARepository {
                path: workdir.clone(),
                error,
            })?;

        let root = repo
            .workdir()
            .ok_or_else(|| RepositoryError::NotAWorkTree(repo.path().to_path_buf()))?;
        let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());

        // repo.path() already follows `gitdir:` files (worktrees, submodules)
        let git_dir = repo.path().to_path_buf();

        Ok(Self {
            workdir,
            root,
            git_dir,
        })
    }

    /// Make the requested directory the process's current directory.
    pub fn enter(&self) -> Result<(), RepositoryError> {
        std::env::set_current_dir(&self.workdir).map_err(|error| RepositoryError::ChangeDir {
            path: self.workdir.clone(),
            error,
        })
    }

    /// Directory git commands run from.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Top of the working tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// `<git-dir>/index.lock`
    pub fn lock_path(&self) -> PathBuf {
        self.git_dir.join(INDEX_LOCK_FILE)
    }
}
