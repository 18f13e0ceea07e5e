//! Type-safe diff status enumeration and per-path status records.
//!
//! # Public API
//! - [`DiffStatus`]: The six path-level states a file can have against the comparison base
//! - [`StatusRecord`]: One changed or untracked path with its status and submodule flag
//!
//! # Status codes
//! Raw `git diff-index` codes map one-to-one except for the unmerged marker `U`, which
//! becomes [`DiffStatus::Conflict`]. Untracked files never come from `diff-index`; they are
//! synthesized from `git ls-files --others`.

use crate::core::error::{Result, TreeCompareError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// File mode of a regular, non-executable file
pub const MODE_REGULAR_FILE: &str = "100644";
/// File mode reported for the side of a change where the path does not exist
pub const MODE_EMPTY: &str = "000000";
/// File mode of a gitlink (submodule) entry
pub const MODE_SUBMODULE: &str = "160000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffStatus {
    /// Added in the index or working tree (A)
    Added,
    /// Deleted (D)
    Deleted,
    /// Content modified (M)
    Modified,
    /// Unmerged path with conflicts (C)
    Conflict,
    /// Present on disk, not ignored, never added (U)
    Untracked,
    /// Type change, e.g. regular file to symlink (T)
    TypeChanged,
}

impl DiffStatus {
    /// Map a raw `diff-index` status field to a status.
    ///
    /// Only `A`, `D`, `M`, `T` and the unmerged marker `U` are accepted; rename and copy
    /// codes never appear because detection is disabled, so they are rejected like any
    /// other unknown code.
    pub fn from_raw_code(code: &str) -> Result<DiffStatus> {
        match code {
            "A" => Ok(DiffStatus::Added),
            "D" => Ok(DiffStatus::Deleted),
            "M" => Ok(DiffStatus::Modified),
            "T" => Ok(DiffStatus::TypeChanged),
            "U" => Ok(DiffStatus::Conflict),
            other => Err(TreeCompareError::unsupported_status(other)),
        }
    }

    /// Single-letter code used in tree output
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Added => "A",
            DiffStatus::Deleted => "D",
            DiffStatus::Modified => "M",
            DiffStatus::Conflict => "C",
            DiffStatus::Untracked => "U",
            DiffStatus::TypeChanged => "T",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DiffStatus::Added => "added",
            DiffStatus::Deleted => "deleted",
            DiffStatus::Modified => "modified",
            DiffStatus::Conflict => "conflict",
            DiffStatus::Untracked => "untracked",
            DiffStatus::TypeChanged => "type changed",
        }
    }

    /// Whether the comparison base holds a version of the file
    pub fn has_base_version(&self) -> bool {
        !matches!(self, DiffStatus::Added | DiffStatus::Untracked)
    }

    /// Whether the working tree holds a version of the file
    pub fn has_working_version(&self) -> bool {
        !matches!(self, DiffStatus::Deleted)
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry per changed or untracked path.
///
/// Within one diff snapshot `abs_path` is unique; see
/// [`reconcile`](crate::core::diff_index::reconcile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: DiffStatus,
    pub abs_path: PathBuf,
    pub is_submodule: bool,
}

impl StatusRecord {
    /// Build a record from a repository-relative path as printed by git
    pub fn new(
        repo_root: &Path,
        status: DiffStatus,
        rel_path: &str,
        src_mode: &str,
        dst_mode: &str,
    ) -> Self {
        StatusRecord {
            status,
            abs_path: join_git_path(repo_root, rel_path),
            is_submodule: src_mode == MODE_SUBMODULE || dst_mode == MODE_SUBMODULE,
        }
    }

    /// Immediate parent folder of the record
    pub fn folder(&self) -> &Path {
        self.abs_path.parent().unwrap_or(&self.abs_path)
    }

    /// Final path component, used as the tree label
    pub fn file_name(&self) -> String {
        self.abs_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Join a `/`-separated git path onto the repository root component by component
pub fn join_git_path(repo_root: &Path, rel_path: &str) -> PathBuf {
    let mut path = repo_root.to_path_buf();
    for part in rel_path.split('/').filter(|part| !part.is_empty()) {
        path.push(part);
    }
    path
}
