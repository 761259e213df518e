//! Commit message derivation from the staged path listing.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Message used when every staged path is hidden (or nothing is staged).
pub const HIDDEN_ONLY_MESSAGE: &str = "Commit involves changes in hidden files or directories only.";

/// Matches a path whose first segment, or any later segment, starts with `.`.
static HIDDEN_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^\.)|(/\.)").expect("Invalid regex"));

/// Whether a staged path names a hidden file or lives under a hidden directory.
///
/// Empty paths count as hidden: they never contribute a filename.
pub fn is_hidden_path(path: &str) -> bool {
    path.is_empty() || HIDDEN_SEGMENT.is_match(path)
}

/// Build a commit message from the staged paths.
///
/// Hidden paths are dropped, the rest are reduced to their bare filename and
/// joined with newlines in listing order. Never returns an empty string.
pub fn derive_message<S: AsRef<str>>(staged_paths: &[S]) -> String {
    let names: Vec<&str> = staged_paths
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|path| !is_hidden_path(path))
        .map(|path| path.rsplit('/').next().unwrap_or(path))
        .collect();

    if names.is_empty() {
        return HIDDEN_ONLY_MESSAGE.to_string();
    }

    names.join("\n")
}
