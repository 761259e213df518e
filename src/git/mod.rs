//! Git operations via the system `git` binary.

pub mod executor;

pub use executor::{GitExecutor, SystemGit};
