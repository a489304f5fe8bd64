//! File deletion.
//!
//! # Overview
//!
//! Duplicates are removed either permanently (`fs::remove_file`, the
//! default) or by moving them to the platform trash with the `trash` crate.
//! Both paths check that the file exists first and report its size so the
//! caller can total the space reclaimed.
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::actions::delete::delete_file;
//! use std::path::Path;
//!
//! match delete_file(Path::new("/path/to/copy.txt")) {
//!     Ok(outcome) => println!("{}", outcome.status_line()),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::{require_existing, ActionError, ActionKind, ActionOutcome, BatchCallback, BatchResult};

/// Configuration for deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteConfig {
    /// Move to the system trash instead of unlinking.
    pub use_trash: bool,
}

impl DeleteConfig {
    /// Unlink files permanently.
    #[must_use]
    pub fn permanent() -> Self {
        Self { use_trash: false }
    }

    /// Move files to the system trash.
    #[must_use]
    pub fn trash() -> Self {
        Self { use_trash: true }
    }
}

/// Permanently delete one file.
///
/// **WARNING**: This cannot be undone.
///
/// # Errors
///
/// - [`ActionError::PathNotFound`] if the file does not exist
/// - [`ActionError::DeleteFailed`] if the removal fails
pub fn delete_file(path: &Path) -> Result<ActionOutcome, ActionError> {
    let size = require_existing(path)?.len();

    fs::remove_file(path).map_err(|e| ActionError::DeleteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::info!("Deleted {} ({} bytes)", path.display(), size);
    Ok(ActionOutcome {
        path: path.to_path_buf(),
        size,
        kind: ActionKind::Deleted,
    })
}

/// Move one file to the system trash.
///
/// # Errors
///
/// - [`ActionError::PathNotFound`] if the file does not exist
/// - [`ActionError::TrashFailed`] if the platform trash rejects it
pub fn delete_to_trash(path: &Path) -> Result<ActionOutcome, ActionError> {
    let size = require_existing(path)?.len();

    trash::delete(path).map_err(|e| ActionError::TrashFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(ActionOutcome {
        path: path.to_path_buf(),
        size,
        kind: ActionKind::Trashed,
    })
}

/// Delete every path, continuing past failures.
///
/// The callback, if any, sees each outcome as it happens.
pub fn delete_batch(
    paths: &[PathBuf],
    config: &DeleteConfig,
    callback: Option<&dyn BatchCallback>,
) -> BatchResult {
    log::debug!(
        "Deleting {} file(s) ({})",
        paths.len(),
        if config.use_trash { "trash" } else { "permanent" }
    );

    let mut result = BatchResult::default();
    for path in paths {
        let outcome = if config.use_trash {
            delete_to_trash(path)
        } else {
            delete_file(path)
        };
        result.record(outcome, callback);
    }

    log::info!("{}", result.summary());
    result
}
