//! Command-line interface definitions.
//!
//! Global options (verbosity, color, error format) apply to every
//! subcommand. `find` is the only subcommand.
//!
//! # Example
//!
//! ```bash
//! # List files, report duplicates, then ask before deleting them
//! dupfinder find ~/Downloads
//!
//! # Delete duplicates without asking
//! dupfinder find ~/Downloads --delete
//!
//! # Replace duplicates with hard links, JSON report
//! dupfinder find ~/Downloads --link hard --output json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::actions::LinkKind;
use crate::config::ConfigOverrides;
use crate::duplicates::ScanStrategy;
use crate::scanner::path_utils::parse_exclusions;
use crate::scanner::HashAlgorithm;

/// Find duplicate files by content fingerprint.
#[derive(Debug, Parser)]
#[command(name = "dupfinder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find duplicate files under a directory
    Find(FindArgs),
}

/// Arguments for `find`.
#[derive(Debug, Args)]
pub struct FindArgs {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Delete duplicates without asking
    #[arg(short, long)]
    pub delete: bool,

    /// Only scan direct children of PATH
    #[arg(long)]
    pub no_recursive: bool,

    /// Skip paths containing any of these comma-separated substrings
    ///
    /// Can be given multiple times.
    #[arg(short, long, value_name = "TOKENS")]
    pub exclude: Vec<String>,

    /// Skip zero-byte files
    #[arg(long)]
    pub exclude_empty: bool,

    /// Compare only the first 1 MiB of each file
    ///
    /// Faster, but files that differ after the first 1 MiB are reported as
    /// duplicates.
    #[arg(long, conflicts_with = "verify")]
    pub fast: bool,

    /// Compare prefixes first, then confirm matches on full content
    #[arg(long)]
    pub verify: bool,

    /// Digest algorithm
    #[arg(long, value_enum)]
    pub algorithm: Option<HashAlgorithm>,

    /// Fingerprinting threads (1 = sequential)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Replace duplicates with links to their original instead of deleting
    #[arg(long, value_enum, value_name = "KIND")]
    pub link: Option<LinkKind>,

    /// Move deleted files to the system trash
    #[arg(long, conflicts_with = "link")]
    pub trash: bool,

    /// Answer yes to every prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Abort on the first file that cannot be fingerprinted
    #[arg(long)]
    pub strict: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Configuration file (default: platform config dir)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl FindArgs {
    /// Exclusion tokens from every `--exclude`, split on commas.
    #[must_use]
    pub fn exclusions(&self) -> Vec<String> {
        self.exclude
            .iter()
            .flat_map(|raw| parse_exclusions(raw))
            .collect()
    }

    /// Strategy requested on the command line, if any.
    #[must_use]
    pub fn strategy(&self) -> Option<ScanStrategy> {
        if self.fast {
            Some(ScanStrategy::Fast)
        } else if self.verify {
            Some(ScanStrategy::Verified)
        } else {
            None
        }
    }

    /// Config layer holding the flags that were actually given.
    #[must_use]
    pub fn overrides(&self, no_color: bool) -> ConfigOverrides {
        let exclude = self.exclusions();
        ConfigOverrides {
            recursive: self.no_recursive.then_some(false),
            exclude: (!exclude.is_empty()).then_some(exclude),
            exclude_empty: self.exclude_empty.then_some(true),
            algorithm: self.algorithm,
            mode: self.strategy(),
            jobs: self.jobs.map(usize::from),
            trash: self.trash.then_some(true),
            color: no_color.then_some(false),
        }
    }
}

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing and prompts
    Text,
    /// Machine-readable report, never prompts
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
