//! Centralized initialization for the tree commands.
//!
//! Every command needs the same setup: locate the repository from the current
//! directory, load the configuration, create the [`DiffTreeProvider`] for this view and
//! subscribe to its events before the first build so failures can be reported.

use crate::core::{
    config::TreeCompareConfig,
    error::{Result, TreeCompareError},
    git::GitRepo,
    output::print_warning,
    tree::{DiffTreeProvider, TreeEvent},
};
use std::env;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// Initialized context shared by the tree commands
pub struct TreeCommandContext {
    pub provider: Arc<DiffTreeProvider>,
    pub config: TreeCompareConfig,
    pub events: Receiver<TreeEvent>,
    pub workspace_root: PathBuf,
}

impl TreeCommandContext {
    /// Print every pending rebuild failure as a warning; returns how many there were
    pub fn report_rebuild_failures(&self) -> usize {
        let mut failures = 0;
        for event in self.events.try_iter() {
            if let TreeEvent::RebuildFailed {
                message,
                recoverable,
            } = event
            {
                print_warning(&rebuild_failure_text(&message, recoverable));
                failures += 1;
            }
        }
        failures
    }
}

/// Warning shown for a failed rebuild
pub fn rebuild_failure_text(message: &str, recoverable: bool) -> String {
    if recoverable {
        format!("Diff unavailable, showing no changes: {message}")
    } else {
        format!("Could not read the diff: {message}")
    }
}

pub struct TreeCommandInit;

impl TreeCommandInit {
    /// Initialize the provider for the repository containing the current directory.
    ///
    /// An explicit `base` is applied immediately and its failure is returned; without
    /// one the default base is resolved lazily on first access.
    pub fn initialize(base: Option<&str>, refresh_index: Option<bool>) -> Result<TreeCommandContext> {
        let current_dir = env::current_dir()?;
        let git_repo = GitRepo::open(&current_dir).map_err(|_| TreeCompareError::NotInGitRepo)?;

        let mut config = TreeCompareConfig::load_or_default().unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable config: {e}");
            TreeCompareConfig::default()
        });
        if let Some(refresh_index) = refresh_index {
            config.refresh_index = refresh_index;
        }

        let provider = Arc::new(DiffTreeProvider::new(git_repo, &config, &current_dir));
        // record paths are canonical, so user paths are resolved against the canonical root
        let workspace_root = provider.workspace_root().to_path_buf();
        let events = provider.subscribe();

        if let Some(base) = base {
            log::debug!("Using explicit comparison base {base}");
            provider.set_comparison_base(base)?;
        }

        Ok(TreeCommandContext {
            provider,
            config,
            events,
            workspace_root,
        })
    }
}
