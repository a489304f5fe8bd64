//! JSON report for a classification run.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "files": ["/data/a.txt", "/data/b.txt", "/data/c.txt"],
//!   "unique": ["/data/a.txt", "/data/c.txt"],
//!   "duplicates": [
//!     {
//!       "path": "/data/b.txt",
//!       "original": "/data/a.txt",
//!       "fingerprint": "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
//!     }
//!   ],
//!   "failures": [],
//!   "summary": {
//!     "total_files": 3,
//!     "unique_files": 2,
//!     "duplicate_files": 1,
//!     "reclaimable_bytes": 5,
//!     "mode": "full",
//!     "algorithm": "sha256"
//!   }
//! }
//! ```

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::duplicates::{ClassificationResult, ScanStrategy};
use crate::scanner::{FileEntry, HashAlgorithm};

/// A duplicate in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicate {
    /// The redundant copy
    pub path: String,
    /// Representative it duplicates
    pub original: String,
    /// Hex fingerprint shared with the original
    pub fingerprint: String,
}

/// A file that could not be fingerprinted.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFailure {
    /// File path
    pub path: String,
    /// Error message
    pub error: String,
}

/// Summary statistics in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Files handed to the classifier
    pub total_files: usize,
    /// Representatives kept
    pub unique_files: usize,
    /// Duplicates found
    pub duplicate_files: usize,
    /// Bytes freed by removing every duplicate
    pub reclaimable_bytes: u64,
    /// Fingerprint strategy
    pub mode: ScanStrategy,
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
}

/// Complete JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Every walked file, in traversal order
    pub files: Vec<String>,
    /// Representatives, in traversal order
    pub unique: Vec<String>,
    /// Duplicates, in traversal order
    pub duplicates: Vec<JsonDuplicate>,
    /// Files skipped because fingerprinting failed
    pub failures: Vec<JsonFailure>,
    /// Scan summary
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the report.
    ///
    /// # Example
    ///
    /// ```
    /// use dupfinder::duplicates::{ClassificationResult, ScanStrategy};
    /// use dupfinder::output::json::JsonOutput;
    /// use dupfinder::scanner::HashAlgorithm;
    ///
    /// let result = ClassificationResult::default();
    /// let output = JsonOutput::new(&[], &result, ScanStrategy::Full, HashAlgorithm::Sha256);
    /// assert!(output.duplicates.is_empty());
    /// assert_eq!(output.summary.total_files, 0);
    /// ```
    #[must_use]
    pub fn new(
        files: &[FileEntry],
        result: &ClassificationResult,
        mode: ScanStrategy,
        algorithm: HashAlgorithm,
    ) -> Self {
        Self {
            files: files.iter().map(|f| path_string(&f.path)).collect(),
            unique: result.unique.iter().map(|p| path_string(p)).collect(),
            duplicates: result
                .duplicates
                .iter()
                .map(|d| JsonDuplicate {
                    path: path_string(&d.path),
                    original: path_string(&d.original),
                    fingerprint: d.fingerprint.to_string(),
                })
                .collect(),
            failures: result
                .failures
                .iter()
                .map(|e| JsonFailure {
                    path: path_string(e.path()),
                    error: e.to_string(),
                })
                .collect(),
            summary: JsonSummary {
                total_files: result.total_files,
                unique_files: result.unique_count(),
                duplicate_files: result.duplicate_count(),
                reclaimable_bytes: result.reclaimable_bytes(),
                mode,
                algorithm,
            },
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur while writing JSON.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// Serialization failed
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing failed
    #[error("I/O error during JSON output: {0}")]
    Io(#[from] std::io::Error),
}
