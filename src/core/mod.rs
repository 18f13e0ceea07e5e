//! Core functionality for git-tree-compare.
//!
//! This module provides diff extraction, the folder index, the tree provider and the
//! supporting configuration, error handling and output helpers.

pub mod colors;
pub mod command_init;
pub mod config;
pub mod diff_index;
pub mod diff_status;
pub mod dirs;
pub mod error;
pub mod folder_index;
pub mod git;
pub mod output;
pub mod refs;
pub mod render;
pub mod tree;
pub mod watch;

// === Error handling ===
pub use error::{Result, TreeCompareError};

// === Git operations ===
// Repository handle: command execution and reference metadata
pub use git::{BranchInfo, CommandOutput, GitRepo, HeadRef, RefInfo, RefKind, Upstream};

// === Diff extraction ===
pub use diff_index::{diff_index, reconcile};
pub use diff_status::{DiffStatus, StatusRecord};

// === Tree ===
pub use folder_index::FolderIndex;
pub use tree::{
    spawn_rebuild_on_change, BaseVersion, DiffSnapshot, DiffTarget, DiffTreeProvider, Node,
    TreeEvent, ViewState,
};
pub use watch::{is_relevant_change, ChangeDebouncer};

// === Command initialization ===
pub use command_init::{TreeCommandContext, TreeCommandInit};

// === Configuration ===
pub use config::{TreeCompareConfig, TreeRootSetting};

// === Output formatting ===
pub use output::{print_error, print_info, print_section_header, print_success, print_warning};
pub use render::render_tree;
