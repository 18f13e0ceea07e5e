//! Git repository management and setup utilities
//!
//! Creates throwaway repositories and drives them through the git binary, the same
//! way a user would.

#![allow(dead_code)]

use git_tree_compare::core::error::{Result, TreeCompareError};
use git_tree_compare::core::git::GitRepo;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Temporary repository. The TempDir must stay alive for the duration of the test.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path of a file inside the repository
    pub fn file(&self, rel: &str) -> PathBuf {
        self.path.join(rel)
    }

    pub fn open(&self) -> Result<GitRepo> {
        GitRepo::open(&self.path)
    }
}

/// Run git in `repo_path`, failing on a non-zero exit status
pub fn git(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()?;
    if !output.status.success() {
        return Err(TreeCompareError::command_execution(
            args,
            String::from_utf8_lossy(&output.stderr).trim(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Sets up a fresh git repository with `main` as its unborn branch
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    // canonical so paths compare equal to the ones GitRepo reports
    let path = fs::canonicalize(temp_dir.path())?;

    git(&path, &["init", "-q"])?;
    git(&path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;

    Ok(TestRepo { temp_dir, path })
}

/// Sets up a git repository with one commit containing "initial.txt"
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    create_file(&repo.path, "initial.txt", "initial content\n")?;
    git_add(&repo.path, "initial.txt")?;
    git_commit(&repo.path, "Initial commit")?;
    Ok(repo)
}

/// Creates a file, including missing parent folders
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn git_add(repo_path: &Path, filename: &str) -> Result<()> {
    git(repo_path, &["add", filename]).map(|_| ())
}

pub fn git_commit(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["commit", "-q", "-m", message]).map(|_| ())
}

/// Removes a file from the filesystem (not from git)
pub fn remove_file(repo_path: &Path, filename: &str) -> Result<()> {
    fs::remove_file(repo_path.join(filename))?;
    Ok(())
}

/// Creates files with numbered content
pub fn create_test_files(repo_path: &Path, filenames: &[&str]) -> Result<()> {
    for (i, filename) in filenames.iter().enumerate() {
        create_file(repo_path, filename, &format!("content{}\nline 2\n", i + 1))?;
    }
    Ok(())
}

/// Overwrites files with numbered content different from [`create_test_files`]
pub fn modify_test_files(repo_path: &Path, filenames: &[&str]) -> Result<()> {
    for (i, filename) in filenames.iter().enumerate() {
        create_file(
            repo_path,
            filename,
            &format!("modified{}\nline 2\nnew line\n", i + 1),
        )?;
    }
    Ok(())
}
