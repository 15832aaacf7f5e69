//! Filtered, sorted directory listings.

use std::cmp::Ordering;

use pocket_types::error::Result;

use crate::path::has_extension;
use crate::{EntryKind, Vfs};

/// One entry of a [`list_files`] result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl FileEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// List `path`, keeping directories plus the files whose extension is in
/// `filter` (case-insensitive). `None` keeps every file.
///
/// Directories sort before files; within each group names compare
/// case-insensitively.
pub fn list_files(vfs: &dyn Vfs, path: &str, filter: Option<&[&str]>) -> Result<Vec<FileEntry>> {
    let mut entries: Vec<FileEntry> = vfs
        .readdir(path)?
        .into_iter()
        .filter(|e| {
            e.kind == EntryKind::Directory
                || filter.is_none_or(|exts| exts.iter().any(|ext| has_extension(&e.name, ext)))
        })
        .map(|e| FileEntry {
            name: e.name,
            kind: e.kind,
        })
        .collect();
    entries.sort_by(compare_entries);
    log::debug!("listed {} entries in {path}", entries.len());
    Ok(entries)
}

fn compare_entries(a: &FileEntry, b: &FileEntry) -> Ordering {
    match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
}
