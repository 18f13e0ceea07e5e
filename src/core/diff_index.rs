//! Extraction and reconciliation of the flat diff against a base reference.
//!
//! Two independent listings are combined here: the tracked changes reported by
//! `git diff-index --no-renames <base>` and the untracked files reported by
//! `git ls-files --others --exclude-standard`. The result is a flat list of
//! [`StatusRecord`]s, unique by absolute path and sorted by path bytes.
//!
//! # Raw format
//! Every `diff-index` line has a fixed-width prefix
//! (`:<mode> <mode> <sha1> <sha1> <status>\t<path>`), so fields are sliced at fixed
//! offsets instead of splitting on whitespace; paths may contain spaces.

use crate::core::{
    diff_status::{DiffStatus, StatusRecord, MODE_EMPTY, MODE_REGULAR_FILE},
    error::{Result, TreeCompareError},
    git::GitRepo,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

const MODE_LEN: usize = 6;
const SHA1_LEN: usize = 40;
const SRC_MODE_OFFSET: usize = 1;
const DST_MODE_OFFSET: usize = 2 + MODE_LEN;
const STATUS_OFFSET: usize = 2 * MODE_LEN + 2 * SHA1_LEN + 5;
const PATH_OFFSET: usize = STATUS_OFFSET + 2;

/// Parse a single raw `diff-index` line into a record rooted at `repo_root`
pub fn parse_diff_index_line(repo_root: &Path, line: &str) -> Result<StatusRecord> {
    let field = |start: usize, len: usize, name: &str| {
        line.get(start..start + len)
            .ok_or_else(|| TreeCompareError::format_parse(line, format!("missing {name}")))
    };

    if !line.starts_with(':') {
        return Err(TreeCompareError::format_parse(line, "expected leading ':'"));
    }

    let src_mode = field(SRC_MODE_OFFSET, MODE_LEN, "source mode")?;
    let dst_mode = field(DST_MODE_OFFSET, MODE_LEN, "destination mode")?;
    let code = field(STATUS_OFFSET, 1, "status")?;
    let status = DiffStatus::from_raw_code(code)?;

    let path = line
        .get(PATH_OFFSET..)
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .ok_or_else(|| TreeCompareError::format_parse(line, "missing path"))?;

    Ok(StatusRecord::new(repo_root, status, path, src_mode, dst_mode))
}

/// Parse the full `diff-index` output.
///
/// An unmerged path can be reported more than once; it collapses into a single
/// record and the conflict wins over any other status.
pub fn parse_diff_index_output(repo_root: &Path, stdout: &str) -> Result<Vec<StatusRecord>> {
    let mut records: Vec<StatusRecord> = Vec::new();
    let mut positions: HashMap<PathBuf, usize> = HashMap::new();

    for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
        let record = parse_diff_index_line(repo_root, line)?;
        match positions.get(&record.abs_path) {
            Some(&pos) => {
                if record.status == DiffStatus::Conflict {
                    records[pos] = record;
                }
            }
            None => {
                positions.insert(record.abs_path.clone(), records.len());
                records.push(record);
            }
        }
    }

    Ok(records)
}

/// Parse `ls-files --others` output, one bare relative path per line
pub fn parse_untracked_output(repo_root: &Path, stdout: &str) -> Vec<StatusRecord> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            StatusRecord::new(
                repo_root,
                DiffStatus::Untracked,
                line,
                MODE_EMPTY,
                MODE_REGULAR_FILE,
            )
        })
        .collect()
}

/// Merge tracked and untracked records into one sorted list.
///
/// A path that was deleted and then recreated without being staged shows up in both
/// listings; the untracked record is the newer state and replaces the tracked one.
pub fn reconcile(tracked: Vec<StatusRecord>, untracked: Vec<StatusRecord>) -> Vec<StatusRecord> {
    let untracked_paths: HashSet<&Path> =
        untracked.iter().map(|record| record.abs_path.as_path()).collect();

    let mut records: Vec<StatusRecord> = tracked
        .into_iter()
        .filter(|record| !untracked_paths.contains(record.abs_path.as_path()))
        .collect();
    records.extend(untracked);

    sort_by_path(&mut records);
    records
}

/// Sort records ascending by the raw bytes of their absolute path
pub fn sort_by_path(records: &mut [StatusRecord]) {
    records.sort_by(|a, b| a.abs_path.as_os_str().cmp(b.abs_path.as_os_str()));
}

/// Compute the flat diff of working tree and index against `base_ref`.
///
/// When `refresh_index` is set the index stat data is refreshed first so that files
/// which were only touched do not show up as modified. Failures of that refresh are
/// ignored. Command failures (no commits yet, repository busy) propagate as
/// [`TreeCompareError::CommandExecution`].
pub fn diff_index(repo: &GitRepo, base_ref: &str, refresh_index: bool) -> Result<Vec<StatusRecord>> {
    if refresh_index {
        if let Err(e) = repo.run(&["update-index", "--refresh", "-q"]) {
            log::debug!("Index refresh failed, continuing: {e}");
        }
    }

    let tracked_output = repo.run(&["diff-index", "--no-renames", base_ref, "--"])?;
    let untracked_output = repo.run(&["ls-files", "--others", "--exclude-standard"])?;

    let tracked = parse_diff_index_output(repo.root(), &tracked_output.stdout)?;
    let untracked = parse_untracked_output(repo.root(), &untracked_output.stdout);

    log::debug!(
        "diff against {base_ref}: {} tracked, {} untracked",
        tracked.len(),
        untracked.len()
    );

    Ok(reconcile(tracked, untracked))
}
