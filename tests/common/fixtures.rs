//! Predefined repository scenarios

#![allow(dead_code)]

use super::repository::*;
use git_tree_compare::core::error::Result;

/// One committed tree, then a working tree with every kind of change:
///
/// - `src/core/git.rs` modified
/// - `src/old.rs` deleted
/// - `docs/guide/intro.md` added to the index
/// - `notes/todo.txt` untracked
/// - `README.md` untouched
pub fn create_mixed_changes_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_test_files(
        &repo.path,
        &["src/core/git.rs", "src/old.rs", "README.md"],
    )?;
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Initial commit")?;

    modify_test_files(&repo.path, &["src/core/git.rs"])?;
    remove_file(&repo.path, "src/old.rs")?;
    create_file(&repo.path, "docs/guide/intro.md", "# Intro\n")?;
    git_add(&repo.path, "docs/guide/intro.md")?;
    create_file(&repo.path, "notes/todo.txt", "later\n")?;

    Ok(repo)
}

/// Repository whose `main` tracks `origin/main`, with `origin/HEAD` pointing at
/// `origin/develop`. No remote is ever contacted; the refs are written locally.
pub fn create_repo_with_remote_default() -> Result<TestRepo> {
    let repo = setup_test_repo_with_initial_commit()?;
    let path = repo.path.clone();

    git(&path, &["remote", "add", "origin", "https://example.invalid/repo.git"])?;
    git(&path, &["update-ref", "refs/remotes/origin/main", "HEAD"])?;
    git(&path, &["update-ref", "refs/remotes/origin/develop", "HEAD"])?;
    git(
        &path,
        &["symbolic-ref", "refs/remotes/origin/HEAD", "refs/remotes/origin/develop"],
    )?;
    git(&path, &["config", "branch.main.remote", "origin"])?;
    git(&path, &["config", "branch.main.merge", "refs/heads/main"])?;

    Ok(repo)
}
