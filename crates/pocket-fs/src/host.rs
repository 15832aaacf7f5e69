//! VFS backed by a directory on the host file system.

use std::fs;
use std::path::{Path, PathBuf};

use pocket_types::error::{PocketError, Result};

use crate::{EntryKind, Vfs, VfsEntry, VfsMetadata};

/// Exposes `root` on the host as `/`.
///
/// `..` components never climb above `root`.
#[derive(Debug, Clone)]
pub struct HostVfs {
    root: PathBuf,
}

impl HostVfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host path for a VFS path.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let mut parts: Vec<&str> = Vec::new();
        for part in path.split(['/', '\\']) {
            match part {
                "" | "." => {},
                ".." => {
                    parts.pop();
                },
                p => parts.push(p),
            }
        }
        parts.iter().fold(self.root.clone(), |acc, p| acc.join(p))
    }
}

fn vfs_err(op: &str, path: &Path, e: std::io::Error) -> PocketError {
    PocketError::Vfs(format!("{op} {}: {e}", path.display()))
}

fn kind_of(ft: fs::FileType) -> EntryKind {
    if ft.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}

impl Vfs for HostVfs {
    fn readdir(&self, path: &str) -> Result<Vec<VfsEntry>> {
        let host = self.resolve(path);
        let rd = fs::read_dir(&host).map_err(|e| vfs_err("readdir", &host, e))?;
        let mut entries = Vec::new();
        for entry in rd {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("skipping unreadable entry in {}: {e}", host.display());
                    continue;
                },
            };
            // Follows symlinks so a linked directory lists as a directory.
            let Ok(meta) = fs::metadata(entry.path()) else {
                continue;
            };
            entries.push(VfsEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind: kind_of(meta.file_type()),
                size: if meta.is_dir() { 0 } else { meta.len() },
            });
        }
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let host = self.resolve(path);
        fs::read(&host).map_err(|e| vfs_err("read", &host, e))
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let host = self.resolve(path);
        fs::write(&host, data).map_err(|e| vfs_err("write", &host, e))
    }

    fn stat(&self, path: &str) -> Result<VfsMetadata> {
        let host = self.resolve(path);
        let meta = fs::metadata(&host).map_err(|e| vfs_err("stat", &host, e))?;
        Ok(VfsMetadata {
            kind: kind_of(meta.file_type()),
            size: if meta.is_dir() { 0 } else { meta.len() },
        })
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        let host = self.resolve(path);
        fs::create_dir_all(&host).map_err(|e| vfs_err("mkdir", &host, e))
    }

    fn remove(&mut self, path: &str) -> Result<()> {
        let host = self.resolve(path);
        if host == self.root {
            return Err(PocketError::Vfs("cannot remove root".to_string()));
        }
        let meta = fs::metadata(&host).map_err(|e| vfs_err("remove", &host, e))?;
        let removed = if meta.is_dir() {
            fs::remove_dir(&host)
        } else {
            fs::remove_file(&host)
        };
        removed.map_err(|e| vfs_err("remove", &host, e))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }
}
