//! Lazily expandable diff tree for one repository view.
//!
//! [`DiffTreeProvider`] owns the comparison context (base reference and last seen HEAD)
//! and the current [`DiffSnapshot`]. A snapshot is immutable once built; a rebuild
//! computes a complete new one and swaps the shared pointer, so readers always see
//! either the previous or the new tree, never a half-built one. Rebuilds are serialized
//! on a mutex: a trigger arriving during a rebuild waits and runs afterwards.
//!
//! # Public API
//! - [`Node`]: File, folder and reference nodes handed to the UI
//! - [`DiffTreeProvider`]: Root node, children queries, base selection, rebuilds
//! - [`DiffTarget`] / [`BaseVersion`]: What to open for a file node
//! - [`TreeEvent`]: Notifications sent to subscribers

use crate::core::{
    config::{TreeCompareConfig, TreeRootSetting},
    diff_index::diff_index,
    diff_status::{DiffStatus, StatusRecord},
    error::{Result, TreeCompareError},
    folder_index::FolderIndex,
    git::{CommandOutput, GitRepo, HeadRef, RefInfo},
    refs,
    watch::ChangeDebouncer,
};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

/// A node of the displayed tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File { path: PathBuf, status: DiffStatus },
    Folder { path: PathBuf },
    Ref { name: String },
}

impl Node {
    pub fn label(&self) -> String {
        match self {
            Node::File { path, .. } | Node::Folder { path } => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Node::Ref { name } => name.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::File { .. } => "file",
            Node::Folder { .. } => "folder",
            Node::Ref { .. } => "ref",
        }
    }
}

/// Sent to subscribers after rebuilds and tree root changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    Changed,
    /// `recoverable` failures mean the diff is temporarily unavailable (repository
    /// busy, no commits yet) rather than unreadable
    RebuildFailed { message: String, recoverable: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Uninitialized,
    Ready,
}

/// A file as it exists at the comparison base, addressed as `<base>:<path>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseVersion {
    pub spec: String,
}

/// What to show when a file node is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffTarget {
    /// Added or untracked: only the live file exists
    Working(PathBuf),
    /// Deleted: only the base version exists
    Base(BaseVersion),
    SideBySide { base: BaseVersion, working: PathBuf },
}

/// One complete, immutable result of a rebuild
#[derive(Debug, Clone, PartialEq)]
pub struct DiffSnapshot {
    pub base_ref: String,
    pub records: Vec<StatusRecord>,
    pub index: FolderIndex,
    pub built_at: DateTime<Utc>,
}

impl DiffSnapshot {
    fn empty(root: &Path, base_ref: &str) -> Self {
        DiffSnapshot {
            base_ref: base_ref.to_string(),
            records: Vec::new(),
            index: FolderIndex::empty(root),
            built_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
struct ComparisonContext {
    base_ref: Option<String>,
    head: Option<HeadRef>,
}

struct RebuildState {
    repo: GitRepo,
    context: ComparisonContext,
}

pub struct DiffTreeProvider {
    state: Mutex<RebuildState>,
    snapshot: RwLock<Arc<DiffSnapshot>>,
    ready: AtomicBool,
    init_attempted: AtomicBool,
    repo_root: PathBuf,
    workspace_root: PathBuf,
    tree_root: RwLock<PathBuf>,
    refresh_index: bool,
    listeners: Mutex<Vec<Sender<TreeEvent>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Whether the symbolic HEAD moved. Only the branch name counts: commits made on a
/// branch or on a detached HEAD keep the base.
fn head_changed(previous: Option<&HeadRef>, current: &HeadRef) -> bool {
    match previous {
        Some(previous) => previous.name != current.name,
        None => true,
    }
}

impl DiffTreeProvider {
    pub fn new(repo: GitRepo, config: &TreeCompareConfig, workspace_root: impl AsRef<Path>) -> Self {
        let repo_root = repo.root().to_path_buf();
        let workspace_root = std::fs::canonicalize(workspace_root.as_ref())
            .unwrap_or_else(|_| workspace_root.as_ref().to_path_buf());
        let tree_root = tree_root_for(config.root, &repo_root, &workspace_root);

        DiffTreeProvider {
            state: Mutex::new(RebuildState {
                repo,
                context: ComparisonContext::default(),
            }),
            snapshot: RwLock::new(Arc::new(DiffSnapshot::empty(&repo_root, ""))),
            ready: AtomicBool::new(false),
            init_attempted: AtomicBool::new(false),
            repo_root,
            workspace_root,
            tree_root: RwLock::new(tree_root),
            refresh_index: config.refresh_index,
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Canonical folder the view was opened from
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn tree_root(&self) -> PathBuf {
        self.tree_root
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn view_state(&self) -> ViewState {
        if self.ready.load(Ordering::Acquire) {
            ViewState::Ready
        } else {
            ViewState::Uninitialized
        }
    }

    /// The current complete snapshot
    pub fn snapshot(&self) -> Arc<DiffSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn subscribe(&self) -> Receiver<TreeEvent> {
        let (sender, receiver) = mpsc::channel();
        lock(&self.listeners).push(sender);
        receiver
    }

    fn emit(&self, event: TreeEvent) {
        lock(&self.listeners).retain(|listener| listener.send(event.clone()).is_ok());
    }

    fn publish(&self, snapshot: Arc<DiffSnapshot>) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    /// Build the first snapshot on first access. Failures are already reported
    /// through [`TreeEvent::RebuildFailed`] and leave the view uninitialized; only
    /// an explicit refresh retries them.
    fn ensure_initialized(&self) {
        if self.view_state() == ViewState::Uninitialized
            && !self.init_attempted.swap(true, Ordering::AcqRel)
        {
            let _ = self.refresh();
        }
    }

    /// Node carrying the comparison base; the top of the tree
    pub fn root_node(&self) -> Node {
        self.ensure_initialized();
        Node::Ref {
            name: self.snapshot().base_ref.clone(),
        }
    }

    /// Direct children of a node: folders first (sorted), then files in path order
    pub fn children(&self, node: &Node) -> Vec<Node> {
        match node {
            Node::Ref { .. } => {
                self.ensure_initialized();
                self.entries(&self.tree_root())
            }
            Node::Folder { path } => self.entries(path),
            Node::File { .. } => Vec::new(),
        }
    }

    fn entries(&self, folder: &Path) -> Vec<Node> {
        let snapshot = self.snapshot();
        let folders = snapshot
            .index
            .child_folders(folder)
            .into_iter()
            .map(|path| Node::Folder {
                path: path.to_path_buf(),
            });
        let files = snapshot
            .index
            .files_in(folder)
            .iter()
            .map(|record| Node::File {
                path: record.abs_path.clone(),
                status: record.status,
            });
        folders.chain(files).collect()
    }

    /// Recompute the diff and swap in a new snapshot.
    ///
    /// On failure the previous snapshot stays in place and subscribers get a single
    /// [`TreeEvent::RebuildFailed`]. A view that never built successfully shows an
    /// empty tree for the resolved base instead.
    pub fn refresh(&self) -> Result<Arc<DiffSnapshot>> {
        let mut state = lock(&self.state);
        self.refresh_locked(&mut state)
    }

    fn refresh_locked(&self, state: &mut RebuildState) -> Result<Arc<DiffSnapshot>> {
        match self.rebuild(state) {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.publish(Arc::clone(&snapshot));
                self.ready.store(true, Ordering::Release);
                log::debug!(
                    "Published diff against {}: {} records in {} folders",
                    snapshot.base_ref,
                    snapshot.records.len(),
                    snapshot.index.folder_count()
                );
                self.emit(TreeEvent::Changed);
                Ok(snapshot)
            }
            Err(e) => {
                log::warn!("Diff rebuild failed: {e}");
                if self.view_state() == ViewState::Uninitialized {
                    if let Some(base) = &state.context.base_ref {
                        self.publish(Arc::new(DiffSnapshot::empty(&self.repo_root, base)));
                    }
                }
                self.emit(TreeEvent::RebuildFailed {
                    message: e.to_string(),
                    recoverable: e.is_recoverable(),
                });
                Err(e)
            }
        }
    }

    fn rebuild(&self, state: &mut RebuildState) -> Result<DiffSnapshot> {
        let head = state.repo.head()?;
        if head_changed(state.context.head.as_ref(), &head) || state.context.base_ref.is_none() {
            let base = refs::resolve_base(&state.repo, &head)?;
            log::info!("Comparing against {base}");
            state.context.base_ref = Some(base);
        }
        state.context.head = Some(head);

        let base = state
            .context
            .base_ref
            .clone()
            .ok_or_else(|| TreeCompareError::reference_resolution("no comparison base"))?;

        let records = diff_index(&state.repo, &base, self.refresh_index)?;
        let index = FolderIndex::build(&self.repo_root, &records);

        Ok(DiffSnapshot {
            base_ref: base,
            records,
            index,
            built_at: Utc::now(),
        })
    }

    /// Compare against `name` instead of the resolved default and rebuild now.
    /// Selecting the base already in use is a no-op.
    pub fn set_comparison_base(&self, name: &str) -> Result<()> {
        let mut state = lock(&self.state);
        let ready = self.view_state() == ViewState::Ready;
        if ready && state.context.base_ref.as_deref() == Some(name) {
            return Ok(());
        }

        let previous_base = state.context.base_ref.clone();
        let previous_head = state.context.head.clone();

        if state.context.head.is_none() {
            // keeps the first rebuild from treating HEAD as changed and resetting the base
            let head = state.repo.head()?;
            state.context.head = Some(head);
        }
        state.context.base_ref = Some(name.to_string());

        match self.refresh_locked(&mut state) {
            Ok(_) => Ok(()),
            Err(e) => {
                // the visible snapshot still compares against the previous base
                state.context.base_ref = previous_base;
                state.context.head = previous_head;
                Err(e)
            }
        }
    }

    /// Switch between repository and workspace roots; notifies when the root moves
    pub fn set_tree_root(&self, setting: TreeRootSetting) -> bool {
        let new_root = tree_root_for(setting, &self.repo_root, &self.workspace_root);
        {
            let mut tree_root = self.tree_root.write().unwrap_or_else(PoisonError::into_inner);
            if *tree_root == new_root {
                return false;
            }
            *tree_root = new_root;
        }
        self.emit(TreeEvent::Changed);
        true
    }

    /// Refs offered when picking a new comparison base
    pub fn refs(&self) -> Result<Vec<RefInfo>> {
        lock(&self.state).repo.refs()
    }

    /// Short commit of the current base, if it can be determined
    pub fn base_commit(&self) -> Option<String> {
        let base = self.snapshot().base_ref.clone();
        let state = lock(&self.state);

        let commit = refs::branch_commit(&state.repo.common_dir(), &base)
            .ok()
            .or_else(|| {
                state
                    .repo
                    .refs()
                    .ok()?
                    .into_iter()
                    .find(|r| r.name == base)
                    .and_then(|r| r.commit)
            })?;
        Some(commit.chars().take(8).collect())
    }

    /// Resolve what to open for a file node
    pub fn open_diff(&self, node: &Node) -> Result<DiffTarget> {
        let Node::File { path, status } = node else {
            return Err(TreeCompareError::unknown_element(node.kind()));
        };

        let rel_path = path
            .strip_prefix(&self.repo_root)
            .map_err(|_| TreeCompareError::unknown_element(path.display().to_string()))?;
        let git_path: Vec<String> = rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let base = BaseVersion {
            spec: format!("{}:{}", self.snapshot().base_ref, git_path.join("/")),
        };

        Ok(match (status.has_base_version(), status.has_working_version()) {
            (true, true) => DiffTarget::SideBySide {
                base,
                working: path.clone(),
            },
            (true, false) => DiffTarget::Base(base),
            _ => DiffTarget::Working(path.clone()),
        })
    }

    /// Read the content of a base version
    pub fn read_base_version(&self, base: &BaseVersion) -> Result<String> {
        lock(&self.state).repo.show(&base.spec)
    }

    /// Run a git command against this view's repository
    pub fn run_git(&self, args: &[&str]) -> Result<CommandOutput> {
        lock(&self.state).repo.run(args)
    }

    /// Find the file node for a path in the current snapshot
    pub fn file_node(&self, path: &Path) -> Option<Node> {
        let snapshot = self.snapshot();
        let folder = path.parent()?;
        snapshot
            .index
            .files_in(folder)
            .iter()
            .find(|record| record.abs_path == path)
            .map(|record| Node::File {
                path: record.abs_path.clone(),
                status: record.status,
            })
    }
}

fn tree_root_for(setting: TreeRootSetting, repo_root: &Path, workspace_root: &Path) -> PathBuf {
    match setting {
        TreeRootSetting::Repository => repo_root.to_path_buf(),
        TreeRootSetting::Workspace => workspace_root.to_path_buf(),
    }
}

/// Rebuild `provider` after each quiet window following relevant changes
pub fn spawn_rebuild_on_change(provider: &Arc<DiffTreeProvider>, window: Duration) -> ChangeDebouncer {
    let provider = Arc::clone(provider);
    ChangeDebouncer::spawn(window, move || {
        // failures reach subscribers as RebuildFailed
        let _ = provider.refresh();
    })
}
