//! Replace duplicates with links.
//!
//! `dest` is the duplicate being replaced and `src` the original it points
//! to afterwards. Without `force`, an existing `dest` is left untouched and
//! the call fails with [`ActionError::DestinationExists`].

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{require_existing, ActionError, ActionKind, ActionOutcome, BatchCallback, BatchResult};
use crate::duplicates::Duplicate;

/// Kind of link to create.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Hard link (same filesystem only)
    Hard,
    /// Symbolic link to the absolute path of the original
    Soft,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hard => write!(f, "hard"),
            Self::Soft => write!(f, "soft"),
        }
    }
}

/// Make `dest` a hard link to `src`.
///
/// # Errors
///
/// - [`ActionError::PathNotFound`] if `src` does not exist
/// - [`ActionError::DestinationExists`] if `dest` exists and `force` is false
/// - [`ActionError::Io`] if the link cannot be created or moved into place
///
/// On error an existing `dest` is left as it was.
pub fn hard_link(src: &Path, dest: &Path, force: bool) -> Result<ActionOutcome, ActionError> {
    make_link(src, dest, force, LinkKind::Hard)
}

/// Make `dest` a symbolic link to `src`.
///
/// # Errors
///
/// Same as [`hard_link`].
pub fn soft_link(src: &Path, dest: &Path, force: bool) -> Result<ActionOutcome, ActionError> {
    make_link(src, dest, force, LinkKind::Soft)
}

/// Replace `dest` with a link to `src`, whether or not `dest` exists.
///
/// # Errors
///
/// Same as [`hard_link`], minus [`ActionError::DestinationExists`].
pub fn replace_with_link(
    src: &Path,
    dest: &Path,
    kind: LinkKind,
) -> Result<ActionOutcome, ActionError> {
    make_link(src, dest, true, kind)
}

fn make_link(
    src: &Path,
    dest: &Path,
    force: bool,
    kind: LinkKind,
) -> Result<ActionOutcome, ActionError> {
    require_existing(src)?;
    let io_error = |source: io::Error| ActionError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let existing = match fs::symlink_metadata(dest) {
        Ok(meta) if !force => {
            log::debug!("Refusing to replace {} ({} bytes)", dest.display(), meta.len());
            return Err(ActionError::DestinationExists(dest.to_path_buf()));
        }
        Ok(meta) => Some(meta.len()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(io_error(e)),
    };

    let target = match kind {
        LinkKind::Hard => src.to_path_buf(),
        LinkKind::Soft => fs::canonicalize(src).map_err(io_error)?,
    };

    match existing {
        None => create_link(&target, dest, kind).map_err(io_error)?,
        Some(_) => {
            // The old file stays in place until the new link is renamed over it.
            let staged = staging_path(dest);
            create_link(&target, &staged, kind).map_err(io_error)?;
            if let Err(e) = fs::rename(&staged, dest) {
                if let Err(cleanup) = fs::remove_file(&staged) {
                    log::warn!("Cannot remove {}: {}", staged.display(), cleanup);
                }
                return Err(io_error(e));
            }
        }
    }

    log::info!(
        "Linked {} -> {} ({})",
        dest.display(),
        src.display(),
        kind
    );
    Ok(ActionOutcome {
        path: dest.to_path_buf(),
        size: existing.unwrap_or(0),
        kind: ActionKind::Linked(kind),
    })
}

fn create_link(target: &Path, link: &Path, kind: LinkKind) -> io::Result<()> {
    match kind {
        LinkKind::Hard => fs::hard_link(target, link),
        LinkKind::Soft => symlink_file(target, link),
    }
}

/// Hidden sibling of `dest` used to build the replacement link.
fn staging_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(dest.file_name().unwrap_or(dest.as_os_str()));
    name.push(format!(".dupfinder-{}.tmp", std::process::id()));
    dest.with_file_name(name)
}

#[cfg(unix)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

/// Replace every duplicate with a link to its original, continuing past failures.
pub fn link_batch(
    duplicates: &[Duplicate],
    kind: LinkKind,
    callback: Option<&dyn BatchCallback>,
) -> BatchResult {
    log::debug!("Linking {} duplicate(s) ({})", duplicates.len(), kind);

    let mut result = BatchResult::default();
    for dup in duplicates {
        result.record(replace_with_link(&dup.original, &dup.path, kind), callback);
    }

    log::info!("{}", result.summary());
    result
}
