use crate::{Entry, FileMetadata, VfsError};
use std::io::Read;
use std::path::Path;

/// Virtual File System trait for abstracting filesystem operations
///
/// The comparison engine only touches the filesystem through this trait, so
/// tests can substitute instrumented implementations (for example one that
/// counts how many files were opened).
pub trait Vfs: Send + Sync {
    /// Returns the metadata for a specific path, following symlinks
    fn metadata(&self, path: &Path) -> Result<FileMetadata, VfsError>;

    /// Lists the immediate children of a directory
    ///
    /// With `follow_symlinks` unset an entry is classified by its own type,
    /// so a symlink to a directory is reported as a file.
    fn read_dir(&self, path: &Path, follow_symlinks: bool) -> Result<Vec<Entry>, VfsError>;

    /// Opens a file for reading (returns a Read trait object)
    fn open_file(&self, path: &Path) -> Result<Box<dyn Read + Send>, VfsError>;
}
