/// Size reported for every directory.
pub const DIR_SIZE: u64 = 4096;

/// Permission bits used for directories and for files built from a listing (`r-xr-xr-x`).
pub const DEFAULT_MODE: u32 = 0o555;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
}

/// Metadata record attached to inodes.
///
/// `size` is `None` when it is not known yet, which is the case for files that were
/// built from a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    entry_type: EntryType,
    size: Option<u64>,
    mode: u32,
}

impl Stats {
    pub fn new(entry_type: EntryType, size: Option<u64>, mode: u32) -> Stats {
        Stats {
            entry_type,
            size,
            mode,
        }
    }

    pub fn directory() -> Stats {
        Stats::new(EntryType::Directory, Some(DIR_SIZE), DEFAULT_MODE)
    }

    /// Placeholder metadata for a file whose size has not been fetched.
    pub fn unknown_file() -> Stats {
        Stats::new(EntryType::File, None, DEFAULT_MODE)
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn set_size(&mut self, size: u64) {
        self.size = Some(size);
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}
