//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and collecting the regular files that are candidates for duplicate
//! detection.
//!
//! # Ordering
//!
//! Entries of every directory are visited sorted by file name, depth-first.
//! The classifier treats the first file seen with a given fingerprint as the
//! original, so this order decides which copy is kept. It is stable for an
//! unchanged tree.
//!
//! # Filtering
//!
//! - `.git` directories are never entered
//! - Paths containing any exclusion token are skipped
//! - Zero-byte files are skipped when `exclude_empty` is set
//! - Symbolic links are neither followed nor reported
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let outcome = walker.collect().expect("root exists");
//! println!("{} files, {} errors", outcome.files.len(), outcome.errors.len());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::path_utils::is_excluded;
use super::{FileEntry, ScanError, WalkerConfig};

/// Name of the version-control directory that is never descended into.
const VCS_DIR: &str = ".git";

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

/// Files found by a walk, plus the non-fatal errors met along the way.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Regular files in traversal order
    pub files: Vec<FileEntry>,
    /// Unreadable directories and files that could not be inspected
    pub errors: Vec<ScanError>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root path of this walker.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn check_root(&self) -> Result<(), ScanError> {
        match fs::symlink_metadata(&self.root) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ScanError::PathNotFound(self.root.clone()))
            }
            Err(e) => Err(ScanError::Io {
                path: self.root.clone(),
                source: e,
            }),
        }
    }

    /// Walk the directory tree, yielding file entries in traversal order.
    ///
    /// A missing root yields a single [`ScanError::PathNotFound`]. Every
    /// other error is yielded in place and iteration carries on with the
    /// next entry.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let root_error = self.check_root().err();
        let entries = root_error
            .is_none()
            .then(|| self.entries())
            .into_iter()
            .flatten();

        root_error.map(Err).into_iter().chain(entries)
    }

    /// Walk the whole tree and split the results into files and errors.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::PathNotFound`] if the root does not exist, or
    /// [`ScanError::Io`] if the root cannot be stat'ed. Errors below the root
    /// are collected into [`WalkOutcome::errors`] instead.
    pub fn collect(&self) -> Result<WalkOutcome, ScanError> {
        self.check_root()?;

        let mut outcome = WalkOutcome::default();
        for result in self.entries() {
            match result {
                Ok(file) => outcome.files.push(file),
                Err(e) => outcome.errors.push(e),
            }
        }

        log::debug!(
            "Walk of {} found {} files ({} errors)",
            self.root.display(),
            outcome.files.len(),
            outcome.errors.len()
        );
        Ok(outcome)
    }

    fn entries(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let max_depth = if self.config.recursive { usize::MAX } else { 1 };

        WalkDir::new(&self.root)
            .follow_links(false)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.should_descend(entry))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(entry),
                Err(e) => Some(Err(self.convert_walk_error(e))),
            })
    }

    /// Prune `.git` and excluded directories before walkdir reads them.
    fn should_descend(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        if entry.file_name() == VCS_DIR {
            log::trace!("Skipping VCS directory: {}", entry.path().display());
            return false;
        }
        if is_excluded(&entry.path().to_string_lossy(), &self.config.exclude) {
            log::trace!("Ignoring directory: {}", entry.path().display());
            return false;
        }
        true
    }

    /// Turn a walkdir entry into a FileEntry if it passes every filter.
    fn process_entry(&self, entry: DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();
        if !file_type.is_file() {
            if file_type.is_symlink() {
                log::trace!("Skipping symlink: {}", entry.path().display());
            }
            return None;
        }

        if is_excluded(&entry.path().to_string_lossy(), &self.config.exclude) {
            log::trace!("Ignoring file: {}", entry.path().display());
            return None;
        }

        if self.config.exclude_empty {
            match entry.metadata() {
                Ok(metadata) if metadata.len() == 0 => {
                    log::debug!("Skipping empty file: {}", entry.path().display());
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    let path = entry.path().to_path_buf();
                    log::warn!("Cannot stat {}: {}", path.display(), e);
                    return Some(Err(ScanError::Io {
                        path,
                        source: io::Error::from(e),
                    }));
                }
            }
        }

        Some(Ok(FileEntry::new(entry.into_path())))
    }

    fn convert_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        log::warn!("Skipping {}: {}", path.display(), error);
        ScanError::UnreadableDirectory {
            path,
            source: io::Error::from(error),
        }
    }
}
