//! Resolution of the default comparison base and of branch commits from on-disk refs.
//!
//! git has no porcelain command that reads back what `git remote set-head` recorded,
//! so the remote's default branch is read from `refs/remotes/<remote>/HEAD`, a one-line
//! file of the form `ref: refs/remotes/<remote>/<branch>`. Branch commits are read from
//! loose ref files with a fallback to `packed-refs`.

use crate::core::{
    error::{Result, TreeCompareError},
    git::{GitRepo, HeadRef},
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const SYMBOLIC_REF_PREFIX: &str = "ref: refs/remotes/";
const FALLBACK_REMOTE: &str = "origin";

/// Default branch of the remote HEAD is tracking, e.g. `origin/main`.
///
/// Returns `Ok(None)` whenever no default can be determined: no commits yet, no
/// upstream configured, no `<remote>/HEAD` ref, or an unreadable pointer file.
pub fn default_branch(repo: &GitRepo, head: &HeadRef) -> Result<Option<String>> {
    let remote = match &head.name {
        Some(name) => match repo.branch(name) {
            Ok(branch) => match branch.upstream {
                Some(upstream) => upstream.remote,
                None => return Ok(None),
            },
            Err(TreeCompareError::EmptyRepository) => return Ok(None),
            Err(e) => return Err(e),
        },
        // detached HEAD, try the conventional remote
        None => FALLBACK_REMOTE.to_string(),
    };

    let remote_head = format!("{remote}/HEAD");
    if !repo.refs()?.iter().any(|r| r.name == remote_head) {
        log::debug!("No {remote_head} ref, no default branch");
        return Ok(None);
    }

    match read_remote_head(&repo.common_dir(), &remote) {
        Ok(branch) => Ok(Some(branch)),
        Err(e) => {
            log::debug!("{e}");
            Ok(None)
        }
    }
}

/// Base to compare against when the user has not picked one: the remote default
/// branch, else the HEAD branch itself, else the detached HEAD commit.
pub fn resolve_base(repo: &GitRepo, head: &HeadRef) -> Result<String> {
    if let Some(branch) = default_branch(repo, head)? {
        return Ok(branch);
    }
    head.name
        .clone()
        .or_else(|| head.commit.clone())
        .ok_or_else(|| TreeCompareError::reference_resolution("HEAD does not point anywhere"))
}

/// Read `<common_dir>/refs/remotes/<remote>/HEAD` and return `<remote>/<branch>`
pub fn read_remote_head(common_dir: &Path, remote: &str) -> Result<String> {
    let path = common_dir
        .join("refs")
        .join("remotes")
        .join(remote)
        .join("HEAD");
    let content = fs::read_to_string(&path).map_err(|e| {
        TreeCompareError::reference_resolution(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_symbolic_ref(&content).ok_or_else(|| {
        TreeCompareError::reference_resolution(format!(
            "{} is not a remote symbolic ref",
            path.display()
        ))
    })
}

/// `ref: refs/remotes/origin/main` -> `origin/main`
pub fn parse_symbolic_ref(content: &str) -> Option<String> {
    content
        .trim()
        .strip_prefix(SYMBOLIC_REF_PREFIX)
        .filter(|target| !target.is_empty())
        .map(str::to_string)
}

/// Commit a local branch points to, read without going through git.
///
/// The loose file `refs/heads/<branch>` is tried first, then `packed-refs`.
pub fn branch_commit(common_dir: &Path, branch: &str) -> Result<String> {
    let loose = common_dir.join("refs").join("heads").join(branch);
    if let Ok(content) = fs::read_to_string(&loose) {
        return Ok(content.trim().to_string());
    }

    let packed = read_packed_refs(common_dir)?;
    packed
        .get(&format!("refs/heads/{branch}"))
        .cloned()
        .ok_or_else(|| {
            TreeCompareError::reference_resolution(format!(
                "could not determine commit for \"{branch}\""
            ))
        })
}

/// Map of ref name to commit from `<common_dir>/packed-refs`
pub fn read_packed_refs(common_dir: &Path) -> Result<HashMap<String, String>> {
    let content = fs::read_to_string(common_dir.join("packed-refs"))?;
    Ok(parse_packed_refs(&content))
}

/// Parse `<hex-commit> <ref-name>` lines; comments and peeled `^` lines are skipped
pub fn parse_packed_refs(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| {
            let (commit, name) = line.split_once(' ')?;
            let is_hex = !commit.is_empty() && commit.chars().all(|c| c.is_ascii_hexdigit());
            (is_hex && !name.is_empty()).then(|| (name.to_string(), commit.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_symbolic_ref() {
        assert_eq!(
            parse_symbolic_ref("ref: refs/remotes/origin/develop\n"),
            Some("origin/develop".to_string())
        );
        assert_eq!(parse_symbolic_ref("ref: refs/heads/main"), None);
        assert_eq!(parse_symbolic_ref("0123abcd"), None);
        assert_eq!(parse_symbolic_ref("ref: refs/remotes/"), None);
    }

    #[test]
    fn test_parse_packed_refs() {
        let content = "# pack-refs with: peeled fully-peeled sorted \n\
            1111111111111111111111111111111111111111 refs/heads/main\n\
            2222222222222222222222222222222222222222 refs/tags/v1\n\
            ^3333333333333333333333333333333333333333\n";
        let refs = parse_packed_refs(content);
        assert_eq!(refs.len(), 2);
        assert_eq!(
            refs.get("refs/heads/main").map(String::as_str),
            Some("1111111111111111111111111111111111111111")
        );
    }

    #[test]
    fn test_branch_commit_prefers_loose_ref() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("refs/heads/feature"))?;
        fs::write(dir.path().join("refs/heads/feature/x"), "aaaa\n")?;
        fs::write(
            dir.path().join("packed-refs"),
            "bbbb refs/heads/feature/x\ncccc refs/heads/main\n",
        )?;

        assert_eq!(branch_commit(dir.path(), "feature/x")?, "aaaa");
        assert_eq!(branch_commit(dir.path(), "main")?, "cccc");
        Ok(())
    }

    #[test]
    fn test_branch_commit_unknown_branch() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("packed-refs"), "cccc refs/heads/main\n")?;
        let err = branch_commit(dir.path(), "missing").unwrap_err();
        assert!(matches!(err, TreeCompareError::ReferenceResolution { .. }));
        Ok(())
    }

    #[test]
    fn test_read_remote_head_missing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let err = read_remote_head(dir.path(), "origin").unwrap_err();
        assert!(matches!(err, TreeCompareError::ReferenceResolution { .. }));
        Ok(())
    }
}
