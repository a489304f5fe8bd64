//! dupfinder - duplicate file finder
//!
//! Walks a directory tree, fingerprints every regular file by content
//! (SHA-256 or BLAKE3, full or 1 MiB prefix) and splits the files into
//! originals and duplicates. The first file met in traversal order is the
//! original; later copies can be deleted, trashed, or replaced with links.

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

pub use app::run_app;
