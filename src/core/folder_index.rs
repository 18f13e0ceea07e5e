//! Folder-to-entries index over a flat diff.
//!
//! [`FolderIndex`] maps every folder that is an ancestor of a changed path, up to and
//! including the repository root, to the records that live directly inside it. Child
//! folders are not stored; they are the keys whose parent is the queried folder.
//! Keys are kept in a `BTreeMap`, so the candidates for a folder's children form one
//! contiguous range starting right after the folder itself.

use crate::core::diff_status::StatusRecord;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderIndex {
    root: PathBuf,
    folders: BTreeMap<PathBuf, Vec<StatusRecord>>,
}

impl FolderIndex {
    /// Index containing only the repository root
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut folders = BTreeMap::new();
        folders.insert(root.clone(), Vec::new());
        FolderIndex { root, folders }
    }

    /// Build the index from a path-sorted flat list.
    ///
    /// Records keep their input order inside each folder.
    pub fn build(root: impl Into<PathBuf>, records: &[StatusRecord]) -> Self {
        let mut index = FolderIndex::empty(root);

        for record in records {
            let folder = record.folder().to_path_buf();
            index.insert_ancestors(&folder);
            index
                .folders
                .entry(folder)
                .or_default()
                .push(record.clone());
        }

        index
    }

    fn insert_ancestors(&mut self, folder: &Path) {
        let mut current = Some(folder);
        while let Some(dir) = current {
            if self.folders.contains_key(dir) || !dir.starts_with(&self.root) {
                break;
            }
            self.folders.insert(dir.to_path_buf(), Vec::new());
            current = dir.parent();
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, folder: &Path) -> bool {
        self.folders.contains_key(folder)
    }

    /// Records directly inside `folder`, in path order
    pub fn files_in(&self, folder: &Path) -> &[StatusRecord] {
        self.folders
            .get(folder)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Folders directly inside `folder`, sorted
    pub fn child_folders(&self, folder: &Path) -> Vec<&Path> {
        self.folders
            .range::<Path, _>((Bound::Excluded(folder), Bound::Unbounded))
            .map(|(key, _)| key.as_path())
            .take_while(|key| key.starts_with(folder))
            .filter(|key| key.parent() == Some(folder))
            .collect()
    }

    /// Every indexed folder, sorted
    pub fn folders(&self) -> impl Iterator<Item = &Path> {
        self.folders.keys().map(PathBuf::as_path)
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    /// Total number of records across all folders
    pub fn record_count(&self) -> usize {
        self.folders.values().map(Vec::len).sum()
    }
}
