//! Report formatters for classification results.
//!
//! - Text for the operator: colored listing, count summary, duplicate groups
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::duplicates::{Classifier, ScanStrategy};
//! use dupfinder::output::json::JsonOutput;
//! use dupfinder::scanner::{HashAlgorithm, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let outcome = Walker::new(Path::new("."), WalkerConfig::default()).collect().unwrap();
//! let result = Classifier::with_defaults().classify(&outcome.files).unwrap();
//!
//! let output = JsonOutput::new(&outcome.files, &result, ScanStrategy::Full, HashAlgorithm::Sha256);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;
