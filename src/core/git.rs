//! Git repository handle used by the diff pipeline.
//!
//! This module provides [`GitRepo`], the boundary to the version-control layer. Reference
//! metadata (HEAD, branches, refs) is read through `git2`; diff listings are produced by
//! running the `git` binary in the working tree and returning its raw stdout, because the
//! raw `diff-index` format is what the parser in [`diff_index`](crate::core::diff_index)
//! consumes.
//!
//! # Public API
//! - [`GitRepo`]: Main interface for repository queries and command execution
//! - [`CommandOutput`], [`HeadRef`], [`BranchInfo`], [`Upstream`], [`RefInfo`], [`RefKind`]

use crate::core::error::{Result, TreeCompareError};
use git2::{BranchType, ErrorCode, Repository};
use std::path::{Component, Path, PathBuf};
use std::process::Command;

/// Captured output of a successful git invocation
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Where HEAD currently points.
///
/// `name` is set when HEAD is a branch (born or unborn); `commit` is set whenever HEAD
/// resolves to a commit. A detached HEAD has a commit but no name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadRef {
    pub name: Option<String>,
    pub commit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub remote: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    pub name: String,
    pub upstream: Option<Upstream>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Head,
    RemoteHead,
    Tag,
}

/// A reference usable as comparison base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefInfo {
    pub name: String,
    pub kind: RefKind,
    pub commit: Option<String>,
}

impl RefInfo {
    /// First eight characters of the commit, as shown next to refs in listings
    pub fn short_commit(&self) -> &str {
        match &self.commit {
            Some(commit) => &commit[..commit.len().min(8)],
            None => "",
        }
    }
}

pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
}

impl GitRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        let workdir = repo
            .workdir()
            .ok_or(TreeCompareError::NoWorkingDirectory)?;
        let root = std::fs::canonicalize(workdir).unwrap_or_else(|_| normalize_path(workdir));
        log::debug!("Opened repository at {}", root.display());
        Ok(GitRepo { repo, root })
    }

    /// Canonical absolute path of the working tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory shared by all worktrees (holds refs and packed-refs)
    pub fn common_dir(&self) -> PathBuf {
        self.repo.commondir().to_path_buf()
    }

    /// Run a git command in the working tree and capture its output.
    ///
    /// A non-zero exit status, or failing to spawn git at all, is reported as
    /// [`TreeCompareError::CommandExecution`] carrying stderr.
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        log::debug!("Running git {}", args.join(" "));

        let output = Command::new("git")
            .args(["-c", "core.quotepath=off"])
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| TreeCompareError::command_execution(args, e.to_string()))?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(TreeCompareError::command_execution(args, stderr.trim()));
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
        })
    }

    pub fn head(&self) -> Result<HeadRef> {
        match self.repo.head() {
            Ok(head) => {
                let commit = head.target().map(|oid| oid.to_string());
                let name = if head.is_branch() {
                    head.shorthand().map(str::to_string)
                } else {
                    None
                };
                Ok(HeadRef { name, commit })
            }
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                // No commits yet: HEAD is symbolic but points nowhere
                let head = self.repo.find_reference("HEAD")?;
                let name = head
                    .symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(str::to_string);
                Ok(HeadRef { name, commit: None })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn branch(&self, name: &str) -> Result<BranchInfo> {
        if let Err(e) = self.repo.find_branch(name, BranchType::Local) {
            if e.code() == ErrorCode::NotFound && self.repo.is_empty().unwrap_or(false) {
                return Err(TreeCompareError::EmptyRepository);
            }
            return Err(e.into());
        }

        let refname = format!("refs/heads/{name}");
        let remote = self.repo.branch_upstream_remote(&refname).ok();
        let merge = self.repo.branch_upstream_merge(&refname).ok();

        let upstream = match (remote, merge) {
            (Some(remote), Some(merge)) => {
                let remote = remote.as_str().unwrap_or_default().to_string();
                let merge = merge.as_str().unwrap_or_default();
                let name = merge.strip_prefix("refs/heads/").unwrap_or(merge).to_string();
                Some(Upstream { remote, name })
            }
            _ => None,
        };

        Ok(BranchInfo {
            name: name.to_string(),
            upstream,
        })
    }

    /// All local branches, remote-tracking refs and tags, sorted by name
    pub fn refs(&self) -> Result<Vec<RefInfo>> {
        let mut refs = Vec::new();

        for reference in self.repo.references()? {
            let reference = reference?;
            let kind = if reference.is_branch() {
                RefKind::Head
            } else if reference.is_remote() {
                RefKind::RemoteHead
            } else if reference.is_tag() {
                RefKind::Tag
            } else {
                continue;
            };

            let Some(name) = reference.shorthand() else {
                continue;
            };
            let commit = reference
                .peel_to_commit()
                .ok()
                .map(|commit| commit.id().to_string());

            refs.push(RefInfo {
                name: name.to_string(),
                kind,
                commit,
            });
        }

        refs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(refs)
    }

    /// Content of `<ref>:<path>`
    pub fn show(&self, object_spec: &str) -> Result<String> {
        Ok(self.run(&["show", object_spec])?.stdout)
    }
}

/// Lexically normalize a path, dropping `.` components and trailing separators
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
