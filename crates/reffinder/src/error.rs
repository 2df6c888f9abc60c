//! Error types for reffinder operations.
//!
//! Errors are split the same way indexing work is split:
//!
//! - **`Error`**: infrastructure failures that halt an operation (unreadable
//!   corpus root, cache write failure, bad configuration).
//! - **`ScanIssue`**: per-asset problems found while scanning. These are
//!   collected into [`IndexStats`](crate::IndexStats) and logged, never thrown.
//!
//! ## Error Philosophy
//!
//! Indexing is best effort. An asset whose content cannot be read simply
//! contributes no edges, references to unknown assets are dropped, and cycles
//! or dangling references during tree materialization are ordinary outcomes.
//! A stale or unreadable cache is reported through
//! [`LoadOutcome`](crate::LoadOutcome) so the caller can rebuild.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for reffinder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for reffinder operations.
#[derive(Debug, Error)]
pub enum Error {
    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),
}

/// A problem with a single asset encountered while scanning the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanIssue {
    /// Path of the asset (or meta file) that could not be used
    pub path: PathBuf,
    /// Human-readable description
    pub message: String,
}

impl ScanIssue {
    /// Create a new scan issue.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ScanIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

impl std::error::Error for ScanIssue {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_issue_display_includes_path_and_message() {
        let issue = ScanIssue::new("Assets/Hero.prefab.meta", "missing guid line");

        let display = issue.to_string();
        assert!(display.contains("Assets/Hero.prefab.meta"));
        assert!(display.contains("missing guid line"));
    }

    #[test]
    fn io_error_converts_into_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: Error = io.into();

        assert!(matches!(error, Error::Io(_)));
        assert!(error.to_string().contains("gone"));
    }
}
