//! Virtual file system for pocket.
//!
//! All paths are `/`-separated and rooted at `/`. [`MemoryVfs`] keeps the
//! whole tree in memory; [`HostVfs`] maps it onto a directory of the host
//! file system. The file browser only ever talks to the [`Vfs`] trait.

mod host;
mod listing;
mod memory;
pub mod path;

pub use host::HostVfs;
pub use listing::{FileEntry, list_files};
pub use memory::MemoryVfs;

use pocket_types::error::Result;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One child returned by [`Vfs::readdir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsEntry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
}

/// Result of [`Vfs::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VfsMetadata {
    pub kind: EntryKind,
    pub size: u64,
}

/// File system operations used by pocket.
pub trait Vfs {
    /// Direct children of a directory, in no particular order.
    fn readdir(&self, path: &str) -> Result<Vec<VfsEntry>>;

    /// Whole contents of a file.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Create or replace a file. The parent directory must exist.
    fn write(&mut self, path: &str, data: &[u8]) -> Result<()>;

    fn stat(&self, path: &str) -> Result<VfsMetadata>;

    /// Create a directory and any missing parents. Existing directories are
    /// not an error.
    fn mkdir(&mut self, path: &str) -> Result<()>;

    /// Remove a file or an empty directory.
    fn remove(&mut self, path: &str) -> Result<()>;

    fn exists(&self, path: &str) -> bool;
}
