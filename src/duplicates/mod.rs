//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Building the fingerprint index (first path seen per fingerprint)
//! - Partitioning the walked files into unique and duplicate sets
//! - Grouping duplicates under the representative they copy

pub mod classifier;

pub use classifier::{
    classify, ClassificationResult, Classifier, ClassifierConfig, Duplicate, DuplicateGroup,
    FingerprintIndex, ScanStrategy,
};
