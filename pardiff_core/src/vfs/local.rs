use pardiff_common::{Entry, FileMetadata, Vfs, VfsError};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Local filesystem VFS implementation
///
/// Paths are used exactly as given, so report lines echo the caller's paths.
#[derive(Debug, Default)]
pub struct LocalVfs {
    _private: (),
}

impl LocalVfs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Vfs for LocalVfs {
    fn metadata(&self, path: &Path) -> Result<FileMetadata, VfsError> {
        let meta = fs::metadata(path).map_err(|e| VfsError::from_io(path, e))?;

        Ok(FileMetadata {
            size: meta.len(),
            is_dir: meta.is_dir(),
        })
    }

    fn read_dir(&self, path: &Path, follow_symlinks: bool) -> Result<Vec<Entry>, VfsError> {
        let meta = fs::metadata(path).map_err(|e| VfsError::from_io(path, e))?;
        if !meta.is_dir() {
            return Err(VfsError::NotADirectory(path.display().to_string()));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| VfsError::from_io(path, e))? {
            let entry = entry.map_err(|e| VfsError::from_io(path, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| VfsError::from_io(&entry.path(), e))?;

            let is_dir = if follow_symlinks && file_type.is_symlink() {
                let target = entry.path();
                fs::metadata(&target)
                    .map_err(|e| VfsError::from_io(&target, e))?
                    .is_dir()
            } else {
                file_type.is_dir()
            };

            entries.push(Entry::new(entry.file_name(), is_dir));
        }

        Ok(entries)
    }

    fn open_file(&self, path: &Path) -> Result<Box<dyn Read + Send>, VfsError> {
        let file = fs::File::open(path).map_err(|e| VfsError::from_io(path, e))?;
        if file.metadata()?.is_dir() {
            return Err(VfsError::NotAFile(path.display().to_string()));
        }
        Ok(Box::new(file))
    }
}
