//! This module provides the directory index: a flat map from absolute directory paths to
//! directory inodes, backed by an arena of file and directory inodes.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::core::{IndexError, Result, utils};
use crate::vfs::inode::{DirInode, FileInode, Inode, InodeId};
use crate::vfs::listing::Listing;
use crate::vfs::stats::Stats;

/// An in-memory index that resolves absolute paths to inodes in O(depth).
///
/// `DirectoryIndex` does not walk the tree one hop at a time: every directory is reachable
/// directly through its absolute path, and files are found by splitting the path into
/// `(parent, leaf)` and asking the parent directory for `leaf`.
///
/// ### Internal state
///
/// * `inodes`: the arena holding every inode allocated by this index, attached to the
///   tree or not. Directories refer to their children by [`InodeId`], never by value.
///
/// * `dirs`: absolute directory path to directory handle.
///   - Key: `PathBuf` starting with `/`.
///   - Only directories are keys; files live solely in their parent's child mapping.
///
/// * `root`: handle of the root directory, registered at `/` from construction on.
///
/// ### Invariants
///
/// 1. **Root existence**: `/` is always a key of `dirs` and is never removed.
/// 2. **Reachability**: a path is a key of `dirs` iff it names a directory reachable from
///    the root through indexed ancestors.
/// 3. **Linkage**: if directory `D` holds a directory child `N`, then `D/N` is a key of
///    `dirs` mapping to that same handle.
/// 4. **Single parent**: an inode is attached under at most one directory.
///
/// ### Lifecycle
///
/// - On creation: `dirs` contains only the root.
/// - Inodes are allocated detached with [`create_file`](Self::create_file) or
///   [`create_dir`](Self::create_dir), then linked with [`insert`](Self::insert).
///   Missing ancestors are created on the way.
/// - [`remove`](Self::remove) detaches an inode and prunes its whole subtree.
/// - Nothing is persisted; the index is rebuilt from a [`Listing`] on every start.
///
/// ### Thread Safety
///
/// This struct is **not thread-safe by default**. If concurrent access is required, wrap it in
/// a synchronization primitive (e.g., `Arc<Mutex<DirectoryIndex<T>>>`) at the application level.
///
/// ### Example
///
/// ```
/// use vfs_index::DirectoryIndex;
///
/// let mut index = DirectoryIndex::new();
/// let note = index.create_file(b"Hello".to_vec());
///
/// index.insert("/docs/note.txt", note).unwrap();
///
/// assert_eq!(index.lookup("/docs/note.txt").unwrap(), note);
/// assert!(index.list("/docs").unwrap().contains("note.txt"));
/// ```
#[derive(Debug)]
pub struct DirectoryIndex<T> {
    inodes: HashMap<InodeId, Slot<T>>,
    dirs: HashMap<PathBuf, InodeId>,
    root: InodeId,
    next_id: u64,
}

#[derive(Debug)]
struct Slot<T> {
    inode: Inode<T>,
    attached: bool,
}

/// An inode taken out of the index by [`DirectoryIndex::remove`].
///
/// A removed directory comes back empty: its descendants are pruned from the index.
#[derive(Debug)]
pub struct Removed<T> {
    pub id: InodeId,
    pub inode: Inode<T>,
}

impl<T> Default for DirectoryIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DirectoryIndex<T> {
    /// Creates an index holding only an empty root directory.
    pub fn new() -> Self {
        let mut index = Self {
            inodes: HashMap::new(),
            dirs: HashMap::new(),
            root: InodeId::new(0),
            next_id: 0,
        };
        let root = index.alloc(Inode::Dir(DirInode::new()));
        index
            .inodes
            .entry(root)
            .and_modify(|slot| slot.attached = true);
        index.dirs.insert(PathBuf::from(utils::ROOT), root);
        index.root = root;
        index
    }

    pub fn root(&self) -> InodeId {
        self.root
    }

    /// Number of directories currently reachable through the index, root included.
    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    /// Allocates a detached file inode owning `data`.
    pub fn create_file(&mut self, data: T) -> InodeId {
        self.alloc(Inode::File(FileInode::new(data)))
    }

    /// Allocates a detached, empty directory inode.
    pub fn create_dir(&mut self) -> InodeId {
        self.alloc(Inode::Dir(DirInode::new()))
    }

    pub fn get(&self, id: InodeId) -> Option<&Inode<T>> {
        self.inodes.get(&id).map(|slot| &slot.inode)
    }

    /// Takes a detached inode back out of the index.
    ///
    /// Returns `None` for unknown handles and for inodes that are linked into the tree
    /// (use [`remove`](Self::remove) for those).
    pub fn release(&mut self, id: InodeId) -> Option<Inode<T>> {
        match self.inodes.get(&id) {
            Some(slot) if !slot.attached => self.inodes.remove(&id).map(|slot| slot.inode),
            _ => None,
        }
    }

    /// Links the inode `id` at the absolute `path`, creating missing parent directories.
    ///
    /// # Arguments
    /// * `path` - absolute path of the new entry.
    /// * `id` - a handle issued by this index.
    ///
    /// # Returns
    /// * `Ok(())` - the inode is reachable at `path`. Inserting the same inode at the path
    ///   that already holds it is a no-op.
    /// * `Err(IndexError)`:
    ///   - `InvalidPath` if `path` is not absolute or contains `.`/`..`.
    ///   - `NullInode` if `id` was not issued by this index or was released.
    ///   - `NameConflict` if another inode occupies `path` or one of the parents that
    ///     would have to be created is a file.
    ///   - `AlreadyAttached` if `id` is linked at another path.
    ///
    /// # Notes
    /// - **All or nothing**: every conflict is detected before the tree is touched, so a
    ///   failed insert never leaves freshly created parent directories behind.
    /// - Inserting a directory registers it in the directory map; its existing children
    ///   are not walked (a directory can only be inserted while detached, hence empty).
    pub fn insert<P: AsRef<Path>>(&mut self, path: P, id: InodeId) -> Result<()> {
        let path = path.as_ref();
        utils::validate(path)?;
        let attached = match self.inodes.get(&id) {
            Some(slot) => slot.attached,
            None => return Err(IndexError::null_inode(id)),
        };

        if let Some(&existing) = self.dirs.get(path) {
            if existing == id {
                return Ok(());
            }
            debug!("insert {}: occupied by directory {}", path.display(), existing);
            return Err(IndexError::name_conflict(path));
        }

        let (parent, leaf) = utils::split_path(path);
        let missing = self.missing_ancestors(parent)?;
        if missing.is_empty() {
            let occupant = self.dir_at(parent).and_then(|dir| dir.item(leaf));
            match occupant {
                Some(existing) if existing == id => return Ok(()),
                Some(existing) => {
                    debug!("insert {}: occupied by {}", path.display(), existing);
                    return Err(IndexError::name_conflict(path));
                }
                None => {}
            }
        }
        if attached {
            return Err(IndexError::already_attached(path));
        }

        for dir_path in &missing {
            debug!("materializing ancestor {}", dir_path.display());
            let dir = self.create_dir();
            self.attach(dir_path, dir)?;
        }
        self.attach(path, id)
    }

    /// Removes the file or directory at `path` and returns it.
    ///
    /// If the path is a directory, all its contents are removed recursively and every
    /// descendant directory disappears from the index. The returned directory is empty.
    ///
    /// Returns `NotFound` if the parent is not indexed, if the parent has no such child,
    /// or if `path` is the root (which has no entry in a parent of its own).
    pub fn remove<P: AsRef<Path>>(&mut self, path: P) -> Result<Removed<T>> {
        let path = path.as_ref();
        utils::validate(path)?;
        if utils::is_root(path) {
            return Err(IndexError::not_found(path));
        }
        let (parent, leaf) = utils::split_path(path);

        let id = self
            .dirs
            .get(parent)
            .copied()
            .and_then(|parent_id| self.dir_mut(parent_id))
            .and_then(|dir| dir.remove_item(leaf))
            .ok_or_else(|| IndexError::not_found(path))?;
        let mut slot = self
            .inodes
            .remove(&id)
            .ok_or_else(|| IndexError::null_inode(id))?;

        if let Inode::Dir(dir) = &mut slot.inode {
            let pruned = self.prune(path, std::mem::take(dir));
            self.dirs.remove(path);
            debug!("removed {} and {} descendants", path.display(), pruned);
        } else {
            trace!("removed file {}", path.display());
        }

        Ok(Removed {
            id,
            inode: slot.inode,
        })
    }

    /// Returns a snapshot of the child names of the directory at `path`.
    ///
    /// The set is detached: later mutations of the index do not show up in it.
    pub fn list<P: AsRef<Path>>(&self, path: P) -> Result<BTreeSet<String>> {
        let path = path.as_ref();
        utils::validate(path)?;
        self.dir_at(path)
            .map(DirInode::listing)
            .ok_or_else(|| IndexError::not_found(path))
    }

    /// Resolves `path` to the handle of the inode stored there.
    pub fn lookup<P: AsRef<Path>>(&self, path: P) -> Result<InodeId> {
        let path = path.as_ref();
        utils::validate(path)?;
        let (parent, leaf) = utils::split_path(path);
        let parent_id = *self
            .dirs
            .get(parent)
            .ok_or_else(|| IndexError::not_found(path))?;
        if parent == path {
            return Ok(parent_id);
        }
        self.get(parent_id)
            .and_then(Inode::as_dir)
            .and_then(|dir| dir.item(leaf))
            .ok_or_else(|| IndexError::not_found(path))
    }

    /// Resolves `path` to the inode stored there.
    pub fn get_path<P: AsRef<Path>>(&self, path: P) -> Result<&Inode<T>> {
        let path = path.as_ref();
        let id = self.lookup(path)?;
        self.get(id).ok_or_else(|| IndexError::not_found(path))
    }

    /// Mutable access to the file at `path`. Payload changes are visible through the index.
    pub fn file_mut<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut FileInode<T>> {
        let path = path.as_ref();
        let id = self.lookup(path)?;
        match self.inodes.get_mut(&id).map(|slot| &mut slot.inode) {
            Some(Inode::File(file)) => Ok(file),
            Some(Inode::Dir(_)) => Err(IndexError::is_a_directory(path)),
            None => Err(IndexError::not_found(path)),
        }
    }

    /// Checks if a `path` resolves to an inode. Invalid paths never exist.
    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.lookup(path).is_ok()
    }

    /// Checks if `path` is a directory. Errors if it does not exist.
    pub fn is_dir<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.get_path(path)?.is_dir())
    }

    /// Checks if `path` is a file. Errors if it does not exist.
    pub fn is_file<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.get_path(path)?.is_file())
    }

    /// Calls `visit` with the payload of every file in the tree, once each.
    ///
    /// Order is unspecified, both across directories and within one.
    pub fn iter_files<F: FnMut(&T)>(&self, mut visit: F) {
        for &dir_id in self.dirs.values() {
            let Some(dir) = self.get(dir_id).and_then(Inode::as_dir) else {
                continue;
            };
            for (_, child) in dir.items() {
                if let Some(Inode::File(file)) = self.get(child) {
                    visit(file.data());
                }
            }
        }
    }

    /// Like [`iter_files`](Self::iter_files), with mutable access to the payloads.
    pub fn iter_files_mut<F: FnMut(&mut T)>(&mut self, mut visit: F) {
        let children: Vec<InodeId> = self
            .dirs
            .values()
            .filter_map(|&dir_id| self.get(dir_id).and_then(Inode::as_dir))
            .flat_map(|dir| dir.items().map(|(_, child)| child))
            .collect();
        for child in children {
            if let Some(Slot {
                inode: Inode::File(file),
                ..
            }) = self.inodes.get_mut(&child)
            {
                visit(file.data_mut());
            }
        }
    }

    /// Builds an index from a nested [`Listing`], calling `make_payload` with the absolute
    /// path of every file.
    ///
    /// The listing is walked with an explicit queue, so deeply nested listings do not
    /// grow the call stack. Entries go through the same linking step as
    /// [`insert`](Self::insert).
    ///
    /// Returns `InvalidPath` if a name in the listing is empty, `.`, `..` or contains `/`.
    pub fn from_listing_with<F>(listing: &Listing, mut make_payload: F) -> Result<Self>
    where
        F: FnMut(&Path) -> T,
    {
        let mut index = Self::new();
        let mut queue = VecDeque::from([(PathBuf::from(utils::ROOT), listing)]);

        while let Some((dir_path, contents)) = queue.pop_front() {
            for (name, child) in contents.entries() {
                let path = dir_path.join(name);
                if !utils::is_valid_name(name) {
                    return Err(IndexError::invalid_path(path));
                }
                let id = match child {
                    Some(sub) => {
                        queue.push_back((path.clone(), sub));
                        index.create_dir()
                    }
                    None => {
                        let data = make_payload(&path);
                        index.create_file(data)
                    }
                };
                index.attach(&path, id)?;
            }
        }

        debug!(
            "built index: {} directories, {} inodes",
            index.dirs.len(),
            index.inodes.len()
        );
        Ok(index)
    }

    fn alloc(&mut self, inode: Inode<T>) -> InodeId {
        let id = InodeId::new(self.next_id);
        self.next_id += 1;
        self.inodes.insert(
            id,
            Slot {
                inode,
                attached: false,
            },
        );
        id
    }

    fn dir_at(&self, path: &Path) -> Option<&DirInode> {
        self.dirs
            .get(path)
            .and_then(|&id| self.get(id))
            .and_then(Inode::as_dir)
    }

    fn dir_mut(&mut self, id: InodeId) -> Option<&mut DirInode> {
        self.inodes
            .get_mut(&id)
            .and_then(|slot| slot.inode.as_dir_mut())
    }

    /// Collects the directories between the closest indexed ancestor of `dir_path` and
    /// `dir_path` itself, top-down. Fails if the first of them is taken by a file.
    fn missing_ancestors(&self, dir_path: &Path) -> Result<Vec<PathBuf>> {
        let mut missing = Vec::new();
        let mut current = dir_path;
        while !self.dirs.contains_key(current) {
            missing.push(current.to_path_buf());
            current = utils::split_path(current).0;
        }

        if let Some(topmost) = missing.last() {
            let (_, name) = utils::split_path(topmost);
            if self.dir_at(current).and_then(|dir| dir.item(name)).is_some() {
                debug!("cannot create {}: a file is in the way", topmost.display());
                return Err(IndexError::name_conflict(topmost));
            }
        }

        missing.reverse();
        Ok(missing)
    }

    /// Links `id` under the parent of `path`, registering it in `dirs` if it is a directory.
    /// The parent must already be indexed.
    fn attach(&mut self, path: &Path, id: InodeId) -> Result<()> {
        let (parent, leaf) = utils::split_path(path);
        let is_dir = self
            .get(id)
            .map(Inode::is_dir)
            .ok_or_else(|| IndexError::null_inode(id))?;
        let parent_id = *self
            .dirs
            .get(parent)
            .ok_or_else(|| IndexError::not_found(parent))?;
        let parent_dir = self
            .dir_mut(parent_id)
            .ok_or_else(|| IndexError::not_found(parent))?;
        if !parent_dir.add_item(leaf, id) {
            return Err(IndexError::name_conflict(path));
        }

        if let Some(slot) = self.inodes.get_mut(&id) {
            slot.attached = true;
        }
        if is_dir {
            self.dirs.insert(path.to_path_buf(), id);
        }
        trace!("attached {} at {}", id, path.display());
        Ok(())
    }

    /// Drops every descendant of the detached directory `dir` from the arena and from
    /// `dirs`. Returns the number of inodes dropped.
    fn prune(&mut self, path: &Path, dir: DirInode) -> usize {
        let mut pruned = 0;
        let mut stack = vec![(path.to_path_buf(), dir)];
        while let Some((dir_path, dir)) = stack.pop() {
            for (name, child) in dir.items() {
                pruned += 1;
                if let Some(Slot {
                    inode: Inode::Dir(sub),
                    ..
                }) = self.inodes.remove(&child)
                {
                    let child_path = dir_path.join(name);
                    self.dirs.remove(&child_path);
                    stack.push((child_path, sub));
                }
            }
        }
        pruned
    }
}

impl DirectoryIndex<Stats> {
    /// Builds an index from a nested [`Listing`]. Files get placeholder metadata: unknown
    /// size and the default mode.
    pub fn from_listing(listing: &Listing) -> Result<Self> {
        Self::from_listing_with(listing, |_| Stats::unknown_file())
    }

    /// Builds an index from a JSON listing such as `{"a": {"b": null}, "c": null}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_listing(&Listing::from_json(json)?)
    }
}
