use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::vfs::stats::Stats;

/// Stable handle of an inode inside a [`DirectoryIndex`](crate::DirectoryIndex).
///
/// Two handles are equal iff they name the same inode. Handles are never reused by the
/// index that issued them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InodeId(u64);

impl InodeId {
    pub(crate) fn new(raw: u64) -> InodeId {
        InodeId(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the indexed hierarchy: either a file with a caller-defined payload, or a
/// directory holding named children.
#[derive(Debug, Clone, PartialEq)]
pub enum Inode<T> {
    File(FileInode<T>),
    Dir(DirInode),
}

impl<T> Inode<T> {
    pub fn is_file(&self) -> bool {
        matches!(self, Inode::File(_))
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Inode::Dir(_))
    }

    pub fn as_file(&self) -> Option<&FileInode<T>> {
        match self {
            Inode::File(file) => Some(file),
            Inode::Dir(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut FileInode<T>> {
        match self {
            Inode::File(file) => Some(file),
            Inode::Dir(_) => None,
        }
    }

    pub fn as_dir(&self) -> Option<&DirInode> {
        match self {
            Inode::Dir(dir) => Some(dir),
            Inode::File(_) => None,
        }
    }

    pub(crate) fn as_dir_mut(&mut self) -> Option<&mut DirInode> {
        match self {
            Inode::Dir(dir) => Some(dir),
            Inode::File(_) => None,
        }
    }
}

/// Leaf inode. The payload is opaque to the index.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInode<T> {
    data: T,
}

impl<T> FileInode<T> {
    pub fn new(data: T) -> FileInode<T> {
        FileInode { data }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Replaces the payload, returning the previous one.
    pub fn set_data(&mut self, data: T) -> T {
        std::mem::replace(&mut self.data, data)
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

/// Directory inode: a mapping from child name to child handle.
///
/// Names never contain a separator. Mutation is reserved to the index so that the
/// directory map and the child mappings cannot disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirInode {
    children: HashMap<String, InodeId>,
}

impl DirInode {
    pub fn new() -> DirInode {
        DirInode::default()
    }

    /// Fixed metadata every directory reports.
    pub fn stats(&self) -> Stats {
        Stats::directory()
    }

    /// Snapshot of the child names.
    pub fn listing(&self) -> BTreeSet<String> {
        self.children.keys().cloned().collect()
    }

    pub fn item(&self, name: &str) -> Option<InodeId> {
        self.children.get(name).copied()
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, InodeId)> {
        self.children.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Adds `name -> id`. Returns `false` without touching the mapping if `name` is taken.
    pub(crate) fn add_item(&mut self, name: &str, id: InodeId) -> bool {
        if self.children.contains_key(name) {
            return false;
        }
        self.children.insert(name.to_owned(), id);
        true
    }

    pub(crate) fn remove_item(&mut self, name: &str) -> Option<InodeId> {
        self.children.remove(name)
    }
}
