//! Resolution actions for duplicates.
//!
//! This module provides functionality for:
//! - Deleting duplicates (unlink, or move to the system trash)
//! - Replacing duplicates with hard or symbolic links to their original
//! - Gating destructive actions behind a yes/no prompt
//!
//! Every action requires its target to exist beforehand and fails with
//! [`ActionError::PathNotFound`] otherwise. Bulk operations never abort
//! part-way: each failure is recorded in a [`BatchResult`] and the loop moves
//! on to the next file.
//!
//! ```no_run
//! use dupfinder::actions::{delete_batch, DeleteConfig};
//! use std::path::PathBuf;
//!
//! let paths = vec![PathBuf::from("/tmp/copy.txt")];
//! let result = delete_batch(&paths, &DeleteConfig::permanent(), None);
//! println!("{}", result.summary());
//! ```

pub mod confirm;
pub mod delete;
pub mod link;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use confirm::{confirm, is_affirmative};
pub use delete::{delete_batch, delete_file, delete_to_trash, DeleteConfig};
pub use link::{hard_link, link_batch, replace_with_link, soft_link, LinkKind};

/// Error type for resolution actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Target did not exist when the action started.
    #[error("File not found: {0}")]
    PathNotFound(PathBuf),

    /// Link destination is occupied and replacement was not forced.
    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// The removal syscall failed.
    #[error("Failed to delete {path}: {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Moving the file to the trash failed.
    #[error("Failed to move {path} to trash: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Any other I/O failure (stat, link creation).
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ActionError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PathNotFound(p)
            | Self::DestinationExists(p)
            | Self::DeleteFailed { path: p, .. }
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Stat `path`, mapping a missing file to [`ActionError::PathNotFound`].
pub(crate) fn require_existing(path: &Path) -> Result<std::fs::Metadata, ActionError> {
    std::fs::symlink_metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ActionError::PathNotFound(path.to_path_buf()),
        _ => ActionError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// What a successful action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Unlinked from the filesystem
    Deleted,
    /// Moved to the system trash
    Trashed,
    /// Replaced with a link of the given kind
    Linked(LinkKind),
}

/// A successful action on one file.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    /// File acted on.
    pub path: PathBuf,
    /// Bytes released (file size before the action).
    pub size: u64,
    /// What was done.
    pub kind: ActionKind,
}

impl ActionOutcome {
    /// Final path component of the file acted on.
    #[must_use]
    pub fn name(&self) -> String {
        crate::scanner::path_utils::file_name(&self.path.to_string_lossy()).to_string()
    }

    /// Status line reported to the operator, e.g. `copy.txt deleted`.
    #[must_use]
    pub fn status_line(&self) -> String {
        match self.kind {
            ActionKind::Deleted => format!("{} deleted", self.name()),
            ActionKind::Trashed => format!("{} moved to trash", self.name()),
            ActionKind::Linked(kind) => format!("{} replaced with {} link", self.name(), kind),
        }
    }
}

/// Callback invoked as a batch progresses.
pub trait BatchCallback {
    /// Called after each successful action.
    fn on_success(&self, outcome: &ActionOutcome);

    /// Called after each failed action.
    fn on_failure(&self, error: &ActionError);
}

/// Results of a bulk delete or link pass.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Successful actions, in input order.
    pub successes: Vec<ActionOutcome>,
    /// Failed actions, in input order.
    pub failures: Vec<ActionError>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl BatchResult {
    /// Number of successful actions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed actions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Whether every action succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record(
        &mut self,
        outcome: Result<ActionOutcome, ActionError>,
        callback: Option<&dyn BatchCallback>,
    ) {
        match outcome {
            Ok(done) => {
                if let Some(cb) = callback {
                    cb.on_success(&done);
                }
                self.bytes_freed += done.size;
                self.successes.push(done);
            }
            Err(e) => {
                log::warn!("{}", e);
                if let Some(cb) = callback {
                    cb.on_failure(&e);
                }
                self.failures.push(e);
            }
        }
    }

    /// Human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let freed = bytesize::ByteSize(self.bytes_freed);
        if self.all_succeeded() {
            format!("Processed {} file(s), freed {}", self.success_count(), freed)
        } else {
            format!(
                "Processed {} file(s), {} failed, freed {}",
                self.success_count(),
                self.failure_count(),
                freed
            )
        }
    }
}
