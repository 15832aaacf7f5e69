//! In-memory VFS.
//!
//! The tree is a `BTreeMap` from canonical paths to nodes, so the children
//! of a directory are a contiguous key range starting at `"{dir}/"`.

use std::collections::BTreeMap;

use pocket_types::error::{PocketError, Result};

use crate::{EntryKind, Vfs, VfsEntry, VfsMetadata};

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
}

impl Node {
    fn metadata(&self) -> VfsMetadata {
        match self {
            Node::File(data) => VfsMetadata {
                kind: EntryKind::File,
                size: data.len() as u64,
            },
            Node::Dir => VfsMetadata {
                kind: EntryKind::Directory,
                size: 0,
            },
        }
    }
}

/// A file system that lives entirely in memory.
#[derive(Debug)]
pub struct MemoryVfs {
    nodes: BTreeMap<String, Node>,
}

impl Default for MemoryVfs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVfs {
    /// An empty tree holding only `/`.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Dir);
        Self { nodes }
    }

    /// Build a tree from `(path, contents)` pairs. Paths ending in `/` are
    /// directories; parents are created as needed.
    pub fn with_tree(entries: &[(&str, &str)]) -> Result<Self> {
        let mut vfs = Self::new();
        for (path, data) in entries {
            if path.ends_with('/') {
                vfs.mkdir(path)?;
            } else {
                vfs.mkdir(&parent_of(&canonical(path)))?;
                vfs.write(path, data.as_bytes())?;
            }
        }
        Ok(vfs)
    }

    fn node(&self, path: &str) -> Option<&Node> {
        self.nodes.get(&canonical(path))
    }
}

/// Canonical form: leading `/`, no empty or `.` components, `..` applied,
/// no trailing `/` except for the root.
fn canonical(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            p => parts.push(p),
        }
    }
    format!("/{}", parts.join("/"))
}

fn parent_of(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => path[..i].to_string(),
    }
}

fn child_prefix(dir: &str) -> String {
    if dir == "/" {
        "/".to_string()
    } else {
        format!("{dir}/")
    }
}

impl Vfs for MemoryVfs {
    fn readdir(&self, path: &str) -> Result<Vec<VfsEntry>> {
        let dir = canonical(path);
        match self.nodes.get(&dir) {
            Some(Node::Dir) => {},
            Some(Node::File(_)) => return Err(PocketError::Vfs(format!("not a directory: {dir}"))),
            None => return Err(PocketError::Vfs(format!("no such directory: {dir}"))),
        }
        let prefix = child_prefix(&dir);
        Ok(self
            .nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, node)| {
                let name = &key[prefix.len()..];
                (!name.is_empty() && !name.contains('/')).then(|| {
                    let meta = node.metadata();
                    VfsEntry {
                        name: name.to_string(),
                        kind: meta.kind,
                        size: meta.size,
                    }
                })
            })
            .collect())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        match self.node(path) {
            Some(Node::File(data)) => Ok(data.clone()),
            Some(Node::Dir) => Err(PocketError::Vfs(format!("is a directory: {path}"))),
            None => Err(PocketError::Vfs(format!("no such file: {path}"))),
        }
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let path = canonical(path);
        if let Some(Node::Dir) = self.nodes.get(&path) {
            return Err(PocketError::Vfs(format!("is a directory: {path}")));
        }
        let parent = parent_of(&path);
        if !matches!(self.nodes.get(&parent), Some(Node::Dir)) {
            return Err(PocketError::Vfs(format!("no parent directory: {parent}")));
        }
        self.nodes.insert(path, Node::File(data.to_vec()));
        Ok(())
    }

    fn stat(&self, path: &str) -> Result<VfsMetadata> {
        self.node(path)
            .map(Node::metadata)
            .ok_or_else(|| PocketError::Vfs(format!("no such path: {path}")))
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        let path = canonical(path);
        let mut partial = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            partial.push('/');
            partial.push_str(part);
            match self.nodes.get(&partial) {
                Some(Node::Dir) => {},
                Some(Node::File(_)) => {
                    return Err(PocketError::Vfs(format!("not a directory: {partial}")));
                },
                None => {
                    self.nodes.insert(partial.clone(), Node::Dir);
                },
            }
        }
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<()> {
        let path = canonical(path);
        if path == "/" {
            return Err(PocketError::Vfs("cannot remove root".to_string()));
        }
        match self.nodes.get(&path) {
            Some(Node::Dir) => {
                let prefix = child_prefix(&path);
                if self
                    .nodes
                    .range(prefix.clone()..)
                    .next()
                    .is_some_and(|(k, _)| k.starts_with(&prefix))
                {
                    return Err(PocketError::Vfs(format!("directory not empty: {path}")));
                }
            },
            Some(Node::File(_)) => {},
            None => return Err(PocketError::Vfs(format!("no such path: {path}"))),
        }
        self.nodes.remove(&path);
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.node(path).is_some()
    }
}
