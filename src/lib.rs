//! An in-memory index of absolute paths to file and directory inodes, meant as the
//! lookup layer of a virtual or overlay file system.
//!
//! ### Overview
//!
//! `vfs-index` keeps every directory of a tree in a flat map keyed by its absolute path,
//! so resolving a path costs one split and two map lookups instead of a walk from the root.
//! The file system layer on top owns the payload carried by each file (stat metadata,
//! a content handle, ...); the index never looks inside it.
//!
//! **Key ideas**:
//! - **Handles**: inodes live in an arena owned by [`DirectoryIndex`] and are referred to by
//!   [`InodeId`], so directories and the path map never fight over ownership.
//! - **Implicit parents**: inserting `/a/b/c` creates `/a` and `/a/b` when they are missing.
//! - **All-or-nothing inserts**: a failed insert leaves the index exactly as it was.
//! - **Bulk load**: [`DirectoryIndex::from_listing`] builds a whole tree from a nested
//!   [`Listing`], such as the JSON emitted by a directory scanner.
//!
//! ```
//! use vfs_index::DirectoryIndex;
//!
//! let index = DirectoryIndex::from_json(r#"{"docs": {"a.md": null}, "b.txt": null}"#).unwrap();
//! assert!(index.is_dir("/docs").unwrap());
//! assert!(index.is_file("/docs/a.md").unwrap());
//! ```

mod core;
mod vfs;

pub use self::core::{IndexError, Result, utils};
pub use vfs::{
    DEFAULT_MODE, DIR_SIZE, DirInode, DirectoryIndex, EntryType, FileInode, Inode, InodeId,
    Listing, Removed, Stats,
};
