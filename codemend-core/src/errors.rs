//! errors.rs - Custom error types for the codemend-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// All error types raised by `codemend-core`.
///
/// Per-file read/write failures never surface through this type during a run;
/// they are recorded in the `Report` instead. What reaches the caller is fatal.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MendError {
    #[error("Failed to compile rewrite rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Cannot enumerate files under '{}': {source}", .root.display())]
    SelectorRoot {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
