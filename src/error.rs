//! Exit codes and structured error reporting.

use serde::Serialize;

/// Process exit codes.
///
/// - 0: completed, duplicates found
/// - 1: fatal error
/// - 2: completed, no duplicates
/// - 3: completed, but some files were skipped or some actions failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Duplicates were found (and resolved, if requested).
    Success = 0,
    /// Fatal error.
    GeneralError = 1,
    /// No duplicates were found.
    NoDuplicates = 2,
    /// Per-file errors occurred along the way.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Machine-readable code name.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DF000",
            Self::GeneralError => "DF001",
            Self::NoDuplicates => "DF002",
            Self::PartialSuccess => "DF003",
        }
    }

    /// Pick the code for a finished run.
    #[must_use]
    pub fn from_outcome(had_errors: bool, found_duplicates: bool) -> Self {
        if had_errors {
            Self::PartialSuccess
        } else if found_duplicates {
            Self::Success
        } else {
            Self::NoDuplicates
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

/// Fatal error in JSON form, for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// Code name, e.g. "DF001"
    pub code: String,
    /// Numeric exit code
    pub exit_code: i32,
    /// Error chain, outermost first
    pub message: String,
}

impl StructuredError {
    /// Build from an error and the exit code it maps to.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}
