use serde::Deserialize;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;

/// Kind of a directory entry as seen by the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immediate child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: OsString,
    pub is_dir: bool,
}

impl Entry {
    pub fn new(name: impl Into<OsString>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }

    pub fn file(name: impl Into<OsString>) -> Self {
        Self::new(name, false)
    }

    pub fn dir(name: impl Into<OsString>) -> Self {
        Self::new(name, true)
    }
}

/// Metadata for a file or directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub size: u64,
    pub is_dir: bool,
}

/// Outcome of matching one name across two directory listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPair {
    /// Name exists only in the left listing
    OnlyInLeft(OsString),
    /// Name exists only in the right listing
    OnlyInRight(OsString),
    BothFiles(PathBuf, PathBuf),
    BothDirectories(PathBuf, PathBuf),
    LeftDirRightFile(PathBuf, PathBuf),
    LeftFileRightDir(PathBuf, PathBuf),
}

impl EntryPair {
    /// Name this pair was matched on.
    pub fn name(&self) -> Option<&OsStr> {
        match self {
            Self::OnlyInLeft(name) | Self::OnlyInRight(name) => Some(name.as_os_str()),
            Self::BothFiles(left, _)
            | Self::BothDirectories(left, _)
            | Self::LeftDirRightFile(left, _)
            | Self::LeftFileRightDir(left, _) => left.file_name(),
        }
    }
}

const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const MAGENTA: &str = "\x1b[95m";
const RESET: &str = "\x1b[0m";

/// A single reported difference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportLine {
    FilesDiffer {
        left: PathBuf,
        right: PathBuf,
    },
    OnlyIn {
        dir: PathBuf,
        name: OsString,
    },
    TypeMismatch {
        left: PathBuf,
        left_kind: EntryKind,
        right: PathBuf,
        right_kind: EntryKind,
    },
    CommonSubdirSkipped {
        left: PathBuf,
        right: PathBuf,
    },
}

impl ReportLine {
    /// Render the line, optionally wrapping key tokens in ANSI colors.
    pub fn render(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("{code}{text}{RESET}")
            } else {
                text.to_string()
            }
        };

        match self {
            Self::FilesDiffer { left, right } => format!(
                "Files {} and {} {}",
                left.display(),
                right.display(),
                paint(RED, "differ")
            ),
            Self::OnlyIn { dir, name } => {
                format!(
                    "{} {}: {}",
                    paint(YELLOW, "Only in"),
                    dir.display(),
                    name.to_string_lossy()
                )
            }
            Self::TypeMismatch {
                left,
                left_kind,
                right,
                right_kind,
            } => format!(
                "{} is a {} while {} is a {}",
                left.display(),
                paint(MAGENTA, left_kind.as_str()),
                right.display(),
                paint(MAGENTA, right_kind.as_str())
            ),
            Self::CommonSubdirSkipped { left, right } => format!(
                "Common subdirectories: {} and {}",
                left.display(),
                right.display()
            ),
        }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// When to color report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(&self, is_terminal: bool) -> bool {
        match self {
            Self::Auto => is_terminal,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024;

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiffConfig {
    /// Descend into common subdirectories
    #[serde(default)]
    pub recursive: bool,

    /// Classify listed symlinks by the type of their target
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Bytes read per step when comparing files
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Worker threads (0 = one per CPU)
    #[serde(default)]
    pub threads: usize,

    #[serde(default)]
    pub color: ColorMode,

    /// Gitignore-style patterns; matching entries are skipped on both sides
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            follow_symlinks: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            threads: 0,
            color: ColorMode::Auto,
            exclude: Vec::new(),
        }
    }
}
