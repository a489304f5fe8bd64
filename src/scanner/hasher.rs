//! Streaming file fingerprinting.
//!
//! # Overview
//!
//! A [`Fingerprint`] is the lowercase hex digest of a file's content. The
//! [`Fingerprinter`] computes it in one of two modes:
//!
//! - [`FingerprintMode::Full`] digests every byte. Equal full fingerprints mean
//!   equal content; this is the only mode that proves two files are duplicates.
//! - [`FingerprintMode::Fast`] digests only the first [`FAST_PREFIX_SIZE`] bytes
//!   (or the whole file if it is shorter). Equal fast fingerprints are
//!   necessary but NOT sufficient for equal content: two files that share
//!   their first MiB and diverge afterwards have the same fast fingerprint.
//!
//! Files are streamed through a fixed buffer, never loaded whole.
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::scanner::{Fingerprinter, HashAlgorithm};
//! use std::path::Path;
//!
//! let hasher = Fingerprinter::full(HashAlgorithm::Sha256);
//! let fingerprint = hasher.fingerprint(Path::new("photo.jpg")).unwrap();
//! println!("{}", fingerprint);
//! ```

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::FingerprintError;

/// Number of bytes covered by a fast-mode fingerprint (1 MiB).
pub const FAST_PREFIX_SIZE: u64 = 1024 * 1024;

/// Read buffer size for streaming.
const BUFFER_SIZE: usize = 64 * 1024;

/// 256-bit digest used for fingerprints.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256, same output as `sha256sum`
    #[default]
    Sha256,
    /// BLAKE3
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Blake3 => write!(f, "blake3"),
        }
    }
}

/// How much of a file a fingerprint covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintMode {
    /// Entire content
    #[default]
    Full,
    /// First [`FAST_PREFIX_SIZE`] bytes only
    Fast,
}

impl FingerprintMode {
    /// Maximum number of bytes read in this mode.
    #[must_use]
    pub fn byte_limit(self) -> u64 {
        match self {
            Self::Full => u64::MAX,
            Self::Fast => FAST_PREFIX_SIZE,
        }
    }
}

impl fmt::Display for FingerprintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Fast => write!(f, "fast"),
        }
    }
}

/// Hex-encoded content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated digest for display.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

enum DigestState {
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize(self) -> Fingerprint {
        let hex = match self {
            Self::Sha256(h) => format!("{:x}", h.finalize()),
            Self::Blake3(h) => h.finalize().to_hex().to_string(),
        };
        Fingerprint(hex)
    }
}

/// Computes fingerprints with a fixed algorithm and mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fingerprinter {
    algorithm: HashAlgorithm,
    mode: FingerprintMode,
}

impl Fingerprinter {
    /// Create a fingerprinter.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, mode: FingerprintMode) -> Self {
        Self { algorithm, mode }
    }

    /// Full-content fingerprinter.
    #[must_use]
    pub fn full(algorithm: HashAlgorithm) -> Self {
        Self::new(algorithm, FingerprintMode::Full)
    }

    /// Prefix-only fingerprinter.
    #[must_use]
    pub fn fast(algorithm: HashAlgorithm) -> Self {
        Self::new(algorithm, FingerprintMode::Fast)
    }

    /// Digest algorithm in use.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Mode in use.
    #[must_use]
    pub fn mode(&self) -> FingerprintMode {
        self.mode
    }

    /// Compute the fingerprint of a file.
    ///
    /// # Errors
    ///
    /// - [`FingerprintError::PathNotFound`] if the path does not exist
    /// - [`FingerprintError::PathIsDirectory`] if the path is a directory
    /// - [`FingerprintError::Io`] on any other open or read failure
    pub fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        let metadata = fs::metadata(path).map_err(|e| FingerprintError::from_io(path, e))?;
        if metadata.is_dir() {
            return Err(FingerprintError::PathIsDirectory(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|e| FingerprintError::from_io(path, e))?;
        let mut reader = file.take(self.mode.byte_limit());
        let mut state = DigestState::new(self.algorithm);
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(FingerprintError::from_io(path, e)),
            };
            state.update(&buffer[..n]);
        }

        let fingerprint = state.finalize();
        log::trace!(
            "{} {} {}: {}",
            self.algorithm,
            self.mode,
            path.display(),
            fingerprint.short()
        );
        Ok(fingerprint)
    }
}

/// Compare the fast-mode fingerprints of two files.
///
/// A `true` result only says the first [`FAST_PREFIX_SIZE`] bytes match.
///
/// # Errors
///
/// Returns the first [`FingerprintError`] met on either file.
pub fn check_prefix(
    first: &Path,
    second: &Path,
    algorithm: HashAlgorithm,
) -> Result<bool, FingerprintError> {
    let hasher = Fingerprinter::fast(algorithm);
    Ok(hasher.fingerprint(first)? == hasher.fingerprint(second)?)
}
