//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`TreeCompareError`] which covers every failure mode of the
//! diff extraction and tree building pipeline. It uses `thiserror` for ergonomic error
//! definitions and includes constructors for the common failure scenarios.
//!
//! # Public API
//! - [`TreeCompareError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, TreeCompareError>`
//!
//! # Error Categories
//! - **Command execution**: git failed or is unavailable, empty repositories
//! - **Format parsing**: unknown status codes, truncated raw diff lines
//! - **Reference resolution**: unreadable remote HEAD pointers, missing refs
//! - **Tree elements**: nodes the tree logic cannot act on
//! - **Configuration**: config directory and JSON errors

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-tree-compare
#[derive(Error, Debug)]
pub enum TreeCompareError {
    // Git repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("Repository has no working directory")]
    NoWorkingDirectory,

    #[error("git {command} failed: {stderr}")]
    CommandExecution { command: String, stderr: String },

    #[error("Repository has no commits yet")]
    EmptyRepository,

    // Raw diff parsing errors
    #[error("Malformed diff line '{line}': {reason}")]
    FormatParse { line: String, reason: String },

    #[error("Unsupported git status: {code}")]
    UnsupportedStatus { code: String },

    // Reference errors
    #[error("Could not resolve reference: {reason}")]
    ReferenceResolution { reason: String },

    // Tree errors
    #[error("Unsupported element type: {element}")]
    UnknownElement { element: String },

    // File and config errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not find config directory")]
    ConfigDirectoryNotFound,

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using TreeCompareError
pub type Result<T> = std::result::Result<T, TreeCompareError>;

impl TreeCompareError {
    /// Create a command execution error from the git arguments and captured stderr
    pub fn command_execution(args: &[&str], stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: args.join(" "),
            stderr: stderr.into(),
        }
    }

    /// Create a format parse error for a raw output line
    pub fn format_parse(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FormatParse {
            line: line.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported status error
    pub fn unsupported_status(code: impl Into<String>) -> Self {
        Self::UnsupportedStatus { code: code.into() }
    }

    /// Create a reference resolution error
    pub fn reference_resolution(reason: impl Into<String>) -> Self {
        Self::ReferenceResolution {
            reason: reason.into(),
        }
    }

    /// Create an unknown element error
    pub fn unknown_element(element: impl Into<String>) -> Self {
        Self::UnknownElement {
            element: element.into(),
        }
    }

    /// Create a config parse error
    pub fn config_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParseFailed {
            path: path.into(),
            source,
        }
    }

    /// True when the diff is merely unavailable right now (busy repository, no commits,
    /// missing binary). Callers display these as "no changes" and keep the last snapshot.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CommandExecution { .. } | Self::EmptyRepository
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TreeCompareError::NotInGitRepo;
        assert_eq!(err.to_string(), "Not in a git repository");
    }

    #[test]
    fn test_command_execution_error() {
        let err = TreeCompareError::command_execution(
            &["diff-index", "--no-renames", "main", "--"],
            "fatal: bad revision 'main'",
        );
        assert_eq!(
            err.to_string(),
            "git diff-index --no-renames main -- failed: fatal: bad revision 'main'"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_unsupported_status_error() {
        let err = TreeCompareError::unsupported_status("X");
        assert_eq!(err.to_string(), "Unsupported git status: X");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_format_parse_error() {
        let err = TreeCompareError::format_parse(":100644", "line too short");
        assert!(err.to_string().contains(":100644"));
        assert!(err.to_string().contains("line too short"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_empty_repository_is_recoverable() {
        assert!(TreeCompareError::EmptyRepository.is_recoverable());
    }

    #[test]
    fn test_reference_resolution_error() {
        let err = TreeCompareError::reference_resolution("no origin/HEAD");
        assert_eq!(err.to_string(), "Could not resolve reference: no origin/HEAD");
    }

    #[test]
    fn test_unknown_element_error() {
        let err = TreeCompareError::unknown_element("folder");
        assert_eq!(err.to_string(), "Unsupported element type: folder");
    }

    #[test]
    fn test_config_parse_failed() {
        let path = std::path::PathBuf::from("/test/config.json");
        let json_err = serde_json::from_str::<serde_json::Value>("{ invalid json").unwrap_err();
        let err = TreeCompareError::config_parse_failed(&path, json_err);
        assert!(err.to_string().contains("/test/config.json"));
        assert!(err.to_string().contains("Failed to parse"));
    }
}
