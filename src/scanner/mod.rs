//! Scanner module for directory traversal and content fingerprinting.
//!
//! This module provides functionality for:
//! - Deterministic, name-sorted directory walking using walkdir
//! - Content fingerprinting with SHA-256 or BLAKE3, in full or fast mode
//! - Exclusion helpers (substring tokens, empty files)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Streaming fingerprint computation
//! - [`path_utils`]: Small path and token helpers shared by the walker and reports
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     exclude_empty: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}", file.path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{
    check_prefix, Fingerprint, FingerprintMode, Fingerprinter, HashAlgorithm, FAST_PREFIX_SIZE,
};
pub use walker::{WalkOutcome, Walker};

/// A regular file discovered by the walker.
///
/// Only the path is stored. Size and kind are read from the filesystem each
/// time they are asked for, so an entry never reports stale metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    /// Path to the file, rooted at the walk root
    pub path: PathBuf,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Current size of the file in bytes.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be stat'ed.
    pub fn size(&self) -> io::Result<u64> {
        std::fs::metadata(&self.path).map(|m| m.len())
    }

    /// Whether the path currently refers to a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.path.is_dir()
    }

    /// Final path component as a string.
    #[must_use]
    pub fn name(&self) -> String {
        path_utils::file_name(&self.path.to_string_lossy()).to_string()
    }

    /// Borrow the path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for FileEntry {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl From<PathBuf> for FileEntry {
    fn from(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Descend into subdirectories. When false only direct children are listed.
    pub recursive: bool,

    /// Substring tokens. A path containing any of them is skipped.
    pub exclude: Vec<String>,

    /// Skip zero-byte files.
    pub exclude_empty: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            exclude: Vec::new(),
            exclude_empty: false,
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration from CLI arguments.
    #[must_use]
    pub fn new(recursive: bool, exclude: Vec<String>, exclude_empty: bool) -> Self {
        Self {
            recursive,
            exclude,
            exclude_empty,
        }
    }

    /// Enable/disable recursion.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the exclusion tokens.
    #[must_use]
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Enable/disable skipping of empty files.
    #[must_use]
    pub fn with_exclude_empty(mut self, exclude_empty: bool) -> Self {
        self.exclude_empty = exclude_empty;
        self
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The root path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// A directory could not be read. The walk skips it and continues.
    #[error("Cannot read directory {path}: {source}")]
    UnreadableDirectory {
        /// Directory that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// An I/O error occurred while inspecting a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PathNotFound(p)
            | Self::UnreadableDirectory { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Errors that can occur while fingerprinting a file.
#[derive(thiserror::Error, Debug)]
pub enum FingerprintError {
    /// The file does not exist (it may have been removed during the scan).
    #[error("File not found: {0}")]
    PathNotFound(PathBuf),

    /// Directories have no content fingerprint.
    #[error("Is a directory: {0}")]
    PathIsDirectory(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl FingerprintError {
    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PathNotFound(p) | Self::PathIsDirectory(p) | Self::Io { path: p, .. } => p,
        }
    }

    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::PathNotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
