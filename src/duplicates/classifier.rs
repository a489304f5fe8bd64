//! Duplicate classification.
//!
//! # Overview
//!
//! The classifier makes a single pass over the walked files, in traversal
//! order. The first file seen with a given fingerprint becomes the
//! *representative* (kept as the original); every later file with the same
//! fingerprint is a duplicate of it. Files that cannot be fingerprinted are
//! reported in [`ClassificationResult::failures`] and belong to neither set.
//!
//! The pass is order-sensitive: a different traversal order can pick a
//! different representative for a group, while the grouping itself stays the
//! same. Parallel fingerprinting (`jobs > 1`) is collected back into
//! traversal order before classification, so it never changes the result.
//!
//! # Strategies
//!
//! - [`ScanStrategy::Full`]: key on full-content fingerprints (default)
//! - [`ScanStrategy::Fast`]: key on 1 MiB prefix fingerprints. Files that
//!   share a prefix but differ later are wrongly reported as duplicates
//! - [`ScanStrategy::Verified`]: key on prefix fingerprints, then confirm every
//!   prefix collision with full fingerprints. Same result as `Full`
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::duplicates::Classifier;
//! use dupfinder::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let outcome = Walker::new(Path::new("."), WalkerConfig::default())
//!     .collect()
//!     .unwrap();
//! let result = Classifier::with_defaults().classify(&outcome.files).unwrap();
//! println!("{}", result.summary_line());
//! ```

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::progress::{ProgressCallback, PHASE_FINGERPRINT};
use crate::scanner::{FileEntry, Fingerprint, FingerprintError, Fingerprinter, HashAlgorithm};

/// Which fingerprints drive classification.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ScanStrategy {
    /// Full-content fingerprints
    #[default]
    Full,
    /// Prefix fingerprints only (may report false duplicates)
    Fast,
    /// Prefix fingerprints confirmed by full fingerprints
    Verified,
}

impl fmt::Display for ScanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Fast => write!(f, "fast"),
            Self::Verified => write!(f, "verified"),
        }
    }
}

/// Configuration for a classification run.
#[derive(Clone, Default)]
pub struct ClassifierConfig {
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Fingerprint strategy.
    pub strategy: ScanStrategy,
    /// Fingerprinting threads. 0 and 1 both mean sequential.
    pub jobs: usize,
    /// Abort on the first fingerprint failure instead of skipping the file.
    pub strict: bool,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("algorithm", &self.algorithm)
            .field("strategy", &self.strategy)
            .field("jobs", &self.jobs)
            .field("strict", &self.strict)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl ClassifierConfig {
    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the fingerprint strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ScanStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the number of fingerprinting threads.
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Enable/disable abort-on-first-failure.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Fingerprint → representative path.
///
/// The first path observed for a fingerprint is kept; later observations
/// only look it up.
#[derive(Debug, Default)]
pub struct FingerprintIndex {
    map: HashMap<Fingerprint, PathBuf>,
}

impl FingerprintIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index sized for `capacity` fingerprints.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Record `path` under `fingerprint`.
    ///
    /// Returns `None` if `path` became the representative, or the existing
    /// representative if the fingerprint was already known.
    pub fn observe(&mut self, fingerprint: &Fingerprint, path: &Path) -> Option<&Path> {
        match self.map.entry(fingerprint.clone()) {
            Entry::Occupied(entry) => Some(entry.into_mut().as_path()),
            Entry::Vacant(entry) => {
                entry.insert(path.to_path_buf());
                None
            }
        }
    }

    /// Representative for a fingerprint, if any.
    #[must_use]
    pub fn representative(&self, fingerprint: &Fingerprint) -> Option<&Path> {
        self.map.get(fingerprint).map(PathBuf::as_path)
    }

    /// Number of distinct fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no fingerprint has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// A file whose content matches an earlier representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    /// The redundant copy
    pub path: PathBuf,
    /// The representative it duplicates
    pub original: PathBuf,
    /// Shared fingerprint
    pub fingerprint: Fingerprint,
}

/// A representative together with all of its copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Retained original
    pub original: PathBuf,
    /// Shared fingerprint
    pub fingerprint: Fingerprint,
    /// Copies in traversal order
    pub copies: Vec<PathBuf>,
}

/// Outcome of a classification run.
#[derive(Debug, Default)]
pub struct ClassificationResult {
    /// Number of distinct paths handed to the classifier
    pub total_files: usize,
    /// Representatives, in traversal order
    pub unique: Vec<PathBuf>,
    /// Duplicates, in traversal order
    pub duplicates: Vec<Duplicate>,
    /// Files that could not be fingerprinted
    pub failures: Vec<FingerprintError>,
}

impl ClassificationResult {
    /// Number of unique files.
    #[must_use]
    pub fn unique_count(&self) -> usize {
        self.unique.len()
    }

    /// Number of duplicate files.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// Number of files skipped because fingerprinting failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Whether any duplicate was found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// Paths of all duplicates, in traversal order.
    #[must_use]
    pub fn duplicate_paths(&self) -> Vec<PathBuf> {
        self.duplicates.iter().map(|d| d.path.clone()).collect()
    }

    /// Whether `path` was classified as a duplicate.
    #[must_use]
    pub fn is_duplicate(&self, path: &Path) -> bool {
        self.duplicates.iter().any(|d| d.path == path)
    }

    /// Duplicates grouped under their representative, in representative order.
    #[must_use]
    pub fn groups(&self) -> Vec<DuplicateGroup> {
        let mut by_original: HashMap<&Path, DuplicateGroup> = HashMap::new();
        for dup in &self.duplicates {
            by_original
                .entry(dup.original.as_path())
                .or_insert_with(|| DuplicateGroup {
                    original: dup.original.clone(),
                    fingerprint: dup.fingerprint.clone(),
                    copies: Vec::new(),
                })
                .copies
                .push(dup.path.clone());
        }

        self.unique
            .iter()
            .filter_map(|path| by_original.remove(path.as_path()))
            .collect()
    }

    /// Bytes freed by removing every duplicate.
    ///
    /// Sizes are read from the filesystem now; files that can no longer be
    /// stat'ed count as zero.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.duplicates
            .iter()
            .filter_map(|d| std::fs::metadata(&d.path).ok())
            .map(|m| m.len())
            .sum()
    }

    /// The one-line count summary.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "Total file(s): {}  Unique file(s): {}  Duplicate file(s): {}",
            self.total_files,
            self.unique_count(),
            self.duplicate_count()
        )
    }
}

/// Classify files with an arbitrary fingerprint function.
///
/// This is the bare single pass: every failure is recorded and skipped.
///
/// # Example
///
/// ```
/// use dupfinder::duplicates::classify;
/// use dupfinder::scanner::FileEntry;
///
/// let result = classify(&[], |_| unreachable!());
/// assert_eq!(result.unique_count(), 0);
/// assert_eq!(result.duplicate_count(), 0);
/// ```
pub fn classify<F>(files: &[FileEntry], mut fingerprint: F) -> ClassificationResult
where
    F: FnMut(&Path) -> Result<Fingerprint, FingerprintError>,
{
    let results = files.iter().map(|file| fingerprint(&file.path));
    // Without strict mode the pass cannot fail.
    match classify_fingerprints(files, results, false, None) {
        Ok(result) => result,
        Err(_) => unreachable!("non-strict classification never fails"),
    }
}

/// Fold fingerprints, given in traversal order, into a result.
fn classify_fingerprints<I>(
    files: &[FileEntry],
    fingerprints: I,
    strict: bool,
    progress: Option<&dyn ProgressCallback>,
) -> Result<ClassificationResult, FingerprintError>
where
    I: IntoIterator<Item = Result<Fingerprint, FingerprintError>>,
{
    let mut index = FingerprintIndex::with_capacity(files.len());
    let mut seen = HashSet::with_capacity(files.len());
    let mut result = ClassificationResult::default();

    for (position, (file, fingerprint)) in files.iter().zip(fingerprints).enumerate() {
        if let Some(cb) = progress {
            cb.on_progress(position + 1, &file.path.to_string_lossy());
        }
        if !seen.insert(file.path.as_path()) {
            log::debug!("Ignoring repeated path: {}", file.path.display());
            continue;
        }
        result.total_files += 1;

        let fingerprint = match fingerprint {
            Ok(fp) => fp,
            Err(e) if strict => return Err(e),
            Err(e) => {
                log::warn!("Skipping {}: {}", file.path.display(), e);
                result.failures.push(e);
                continue;
            }
        };

        match index.observe(&fingerprint, &file.path) {
            None => result.unique.push(file.path.clone()),
            Some(original) => {
                log::debug!(
                    "{} duplicates {}",
                    file.path.display(),
                    original.display()
                );
                result.duplicates.push(Duplicate {
                    path: file.path.clone(),
                    original: original.to_path_buf(),
                    fingerprint,
                });
            }
        }
    }

    Ok(result)
}

/// Full fingerprint of a representative in a verified-mode bucket.
enum FullState {
    Pending,
    Known(Fingerprint),
    Unavailable,
}

struct Candidate {
    path: PathBuf,
    full: FullState,
}

/// Duplicate classifier.
#[derive(Debug, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier with the given configuration.
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Create a classifier with default configuration (full SHA-256, sequential).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Partition `files` into unique and duplicate sets.
    ///
    /// # Errors
    ///
    /// Only in strict mode: the first [`FingerprintError`] met. Otherwise
    /// failures are collected into [`ClassificationResult::failures`].
    pub fn classify(&self, files: &[FileEntry]) -> Result<ClassificationResult, FingerprintError> {
        let progress = self.config.progress_callback.as_deref();
        if let Some(cb) = progress {
            cb.on_phase_start(PHASE_FINGERPRINT, files.len());
        }

        log::info!(
            "Classifying {} files ({} {}, {} job(s))",
            files.len(),
            self.config.strategy,
            self.config.algorithm,
            self.config.jobs.max(1)
        );

        let result = match self.config.strategy {
            ScanStrategy::Full => {
                self.classify_keyed(files, Fingerprinter::full(self.config.algorithm))
            }
            ScanStrategy::Fast => {
                self.classify_keyed(files, Fingerprinter::fast(self.config.algorithm))
            }
            ScanStrategy::Verified => self.classify_verified(files),
        };

        if let Some(cb) = progress {
            cb.on_phase_end(PHASE_FINGERPRINT);
        }

        if let Ok(ref r) = result {
            log::info!("{}", r.summary_line());
        }
        result
    }

    fn classify_keyed(
        &self,
        files: &[FileEntry],
        hasher: Fingerprinter,
    ) -> Result<ClassificationResult, FingerprintError> {
        let progress = self.config.progress_callback.as_deref();

        if self.config.jobs > 1 {
            if let Some(fingerprints) = self.fingerprint_parallel(files, hasher) {
                // Progress was reported by the workers.
                return classify_fingerprints(files, fingerprints, self.config.strict, None);
            }
        }

        let fingerprints = files.iter().map(|file| hasher.fingerprint(&file.path));
        classify_fingerprints(files, fingerprints, self.config.strict, progress)
    }

    /// Fingerprint every file on a dedicated pool, returned in input order.
    fn fingerprint_parallel(
        &self,
        files: &[FileEntry],
        hasher: Fingerprinter,
    ) -> Option<Vec<Result<Fingerprint, FingerprintError>>> {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                log::warn!("Failed to build thread pool, hashing sequentially: {}", e);
                return None;
            }
        };

        let done = AtomicUsize::new(0);
        let progress = self.config.progress_callback.as_deref();

        // par_iter().collect() keeps input order, which the single pass relies on.
        Some(pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let fp = hasher.fingerprint(&file.path);
                    if let Some(cb) = progress {
                        let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                        cb.on_progress(n, &file.path.to_string_lossy());
                    }
                    fp
                })
                .collect()
        }))
    }

    fn classify_verified(
        &self,
        files: &[FileEntry],
    ) -> Result<ClassificationResult, FingerprintError> {
        let fast = Fingerprinter::fast(self.config.algorithm);
        let full = Fingerprinter::full(self.config.algorithm);
        verify_prefixes(
            files,
            self.config.strict,
            self.config.progress_callback.as_deref(),
            |path| fast.fingerprint(path),
            |path| full.fingerprint(path),
        )
    }
}

/// Bucket files by prefix fingerprint and confirm collisions with full ones.
///
/// A representative whose full fingerprint cannot be computed when it is
/// first needed is moved from `unique` to `failures`, as a full pass would
/// have done.
fn verify_prefixes<P, F>(
    files: &[FileEntry],
    strict: bool,
    progress: Option<&dyn ProgressCallback>,
    mut prefix: P,
    mut full: F,
) -> Result<ClassificationResult, FingerprintError>
where
    P: FnMut(&Path) -> Result<Fingerprint, FingerprintError>,
    F: FnMut(&Path) -> Result<Fingerprint, FingerprintError>,
{
    let mut buckets: HashMap<Fingerprint, Vec<Candidate>> = HashMap::new();
    let mut seen = HashSet::with_capacity(files.len());
    let mut result = ClassificationResult::default();

    for (position, file) in files.iter().enumerate() {
        if let Some(cb) = progress {
            cb.on_progress(position + 1, &file.path.to_string_lossy());
        }
        if !seen.insert(file.path.as_path()) {
            log::debug!("Ignoring repeated path: {}", file.path.display());
            continue;
        }
        result.total_files += 1;

        let key = match prefix(&file.path) {
            Ok(fp) => fp,
            Err(e) => {
                record_failure(&mut result, e, strict)?;
                continue;
            }
        };

        let bucket = match buckets.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(vec![Candidate {
                    path: file.path.clone(),
                    full: FullState::Pending,
                }]);
                result.unique.push(file.path.clone());
                continue;
            }
            Entry::Occupied(entry) => entry.into_mut(),
        };

        let own = match full(&file.path) {
            Ok(fp) => fp,
            Err(e) => {
                record_failure(&mut result, e, strict)?;
                continue;
            }
        };

        let mut original = None;
        for candidate in bucket.iter_mut() {
            if let FullState::Pending = candidate.full {
                candidate.full = match full(&candidate.path) {
                    Ok(fp) => FullState::Known(fp),
                    Err(e) => {
                        result.unique.retain(|p| *p != candidate.path);
                        record_failure(&mut result, e, strict)?;
                        FullState::Unavailable
                    }
                };
            }
            if matches!(candidate.full, FullState::Known(ref fp) if *fp == own) {
                original = Some(candidate.path.clone());
                break;
            }
        }

        match original {
            Some(original) => {
                log::debug!("{} duplicates {}", file.path.display(), original.display());
                result.duplicates.push(Duplicate {
                    path: file.path.clone(),
                    original,
                    fingerprint: own,
                });
            }
            None => {
                log::debug!("Prefix collision without full match: {}", file.path.display());
                bucket.push(Candidate {
                    path: file.path.clone(),
                    full: FullState::Known(own),
                });
                result.unique.push(file.path.clone());
            }
        }
    }

    Ok(result)
}

fn record_failure(
    result: &mut ClassificationResult,
    error: FingerprintError,
    strict: bool,
) -> Result<(), FingerprintError> {
    if strict {
        return Err(error);
    }
    log::warn!("Skipping {}: {}", error.path().display(), error);
    result.failures.push(error);
    Ok(())
}
