//! git-tree-compare - working tree changes against any branch, tag or commit, as a folder tree.
//!
//! The library computes the path-level diff between the working tree (index and untracked
//! files included) and a comparison base, then indexes it by folder so that any subtree
//! can be expanded on demand without re-walking the whole diff.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module:
//! - Diff extraction and reconciliation ([`diff_index`])
//! - Folder index ([`FolderIndex`]) and tree provider ([`DiffTreeProvider`])
//! - Error handling and result types

pub mod commands;
pub mod core;

pub use core::{
    // Diff extraction
    diff_index,
    reconcile,
    // Tree
    DiffSnapshot,
    DiffStatus,
    DiffTarget,
    DiffTreeProvider,
    FolderIndex,
    // Git operations
    GitRepo,
    Node,
    // Error handling
    Result,
    StatusRecord,
    TreeCompareConfig,
    TreeCompareError,
    TreeEvent,
};
