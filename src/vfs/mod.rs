mod index;
mod inode;
mod listing;
mod stats;

pub use index::{DirectoryIndex, Removed};
pub use inode::{DirInode, FileInode, Inode, InodeId};
pub use listing::Listing;
pub use stats::{DEFAULT_MODE, DIR_SIZE, EntryType, Stats};
