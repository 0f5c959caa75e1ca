use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("{}: {source}", path.display())]
    PathIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("VFS error: {0}")]
    Vfs(#[from] VfsError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// One side is a file and the other a directory.
    #[error("Cannot compare between a file and a directory: {} and {}", left.display(), right.display())]
    MixedTypes { left: PathBuf, right: PathBuf },

    #[error("Output error: {0}")]
    Output(String),
}

impl DiffError {
    pub fn path_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PathIo {
            path: path.into(),
            source,
        }
    }

    /// Attach `path` to bare I/O failures coming out of a VFS.
    pub fn from_vfs(path: &std::path::Path, err: VfsError) -> Self {
        match err {
            VfsError::Io(source) => Self::path_io(path, source),
            other => Self::Vfs(other),
        }
    }

    /// Usage faults are rejected before any comparison runs.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::MixedTypes { .. })
    }
}

pub type Result<T> = std::result::Result<T, DiffError>;

#[derive(Error, Debug)]
pub enum VfsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a file: {0}")]
    NotAFile(String),
}

impl VfsError {
    /// Map an I/O error on `path` to the closest variant.
    pub fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.display().to_string()),
            std::io::ErrorKind::PermissionDenied => {
                Self::PermissionDenied(path.display().to_string())
            }
            _ => Self::Io(err),
        }
    }
}
