//! Error type shared by every index operation.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::vfs::InodeId;

/// Outcome of a failed index operation.
///
/// `InvalidPath` and `NullInode` are caller mistakes. `NameConflict` and `NotFound` are
/// routine answers to probing operations and are expected to be matched on.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Path is not absolute, not UTF-8, or contains `.`/`..` components.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Inode handle does not belong to this index.
    #[error("no such inode: {0}")]
    NullInode(String),

    /// A different inode already occupies the path.
    #[error("name conflict: {0}")]
    NameConflict(String),

    /// Path (or one of its parents) is not in the index.
    #[error("{0} does not exist")]
    NotFound(String),

    /// Path names a directory where a file was expected.
    #[error("{0} is a directory")]
    IsADirectory(String),

    /// Inode is already linked under another path.
    #[error("inode already attached elsewhere: {0}")]
    AlreadyAttached(String),

    /// Listing description could not be parsed.
    #[error("invalid listing: {0}")]
    InvalidListing(#[from] serde_json::Error),
}

impl IndexError {
    pub fn invalid_path<P: AsRef<Path>>(path: P) -> Self {
        Self::InvalidPath(path.as_ref().display().to_string())
    }

    pub fn null_inode(id: InodeId) -> Self {
        Self::NullInode(id.to_string())
    }

    pub fn name_conflict<P: AsRef<Path>>(path: P) -> Self {
        Self::NameConflict(path.as_ref().display().to_string())
    }

    pub fn not_found<P: AsRef<Path>>(path: P) -> Self {
        Self::NotFound(path.as_ref().display().to_string())
    }

    pub fn is_a_directory<P: AsRef<Path>>(path: P) -> Self {
        Self::IsADirectory(path.as_ref().display().to_string())
    }

    pub fn already_attached<P: AsRef<Path>>(path: P) -> Self {
        Self::AlreadyAttached(path.as_ref().display().to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::NameConflict(_) | Self::AlreadyAttached(_))
    }
}

/// Lets a filesystem layer surface index failures as I/O errors.
impl From<IndexError> for io::Error {
    fn from(e: IndexError) -> Self {
        let kind = match &e {
            IndexError::InvalidPath(_) => io::ErrorKind::InvalidInput,
            IndexError::NullInode(_) => io::ErrorKind::InvalidInput,
            IndexError::NameConflict(_) => io::ErrorKind::AlreadyExists,
            IndexError::NotFound(_) => io::ErrorKind::NotFound,
            IndexError::IsADirectory(_) => io::ErrorKind::IsADirectory,
            IndexError::AlreadyAttached(_) => io::ErrorKind::AlreadyExists,
            IndexError::InvalidListing(_) => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_checks() {
        assert!(IndexError::not_found("/a").is_not_found());
        assert!(!IndexError::not_found("/a").is_conflict());
        assert!(IndexError::name_conflict("/a").is_conflict());
        assert!(IndexError::already_attached("/a").is_conflict());
        assert!(!IndexError::invalid_path("a").is_not_found());
    }

    #[test]
    fn test_messages_mention_path() {
        assert_eq!(IndexError::not_found("/a/b").to_string(), "/a/b does not exist");
        assert_eq!(
            IndexError::invalid_path("rel").to_string(),
            "invalid path: rel"
        );
    }

    #[test]
    fn test_into_io_error() {
        let err: io::Error = IndexError::not_found("/x").into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err: io::Error = IndexError::name_conflict("/x").into();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);

        let err: io::Error = IndexError::invalid_path("x").into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
