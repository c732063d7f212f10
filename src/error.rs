//! # Error Handling
//!
//! This module defines the centralized error type for `component-builder`.
//! It uses the `thiserror` library to create a single `Error` enum covering
//! every failure a build stage can report, each with enough context to be
//! shown to the caller verbatim.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes. Every pipeline stage returns
//!   `Result<T, Error>`; the pipeline turns the first error it meets into a
//!   failed `BuildOutcome` whose message is the error's display text.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The variants group into:
//!
//! - Filesystem errors (deleting stale checkouts, writing generated files).
//! - Git errors (clone failures, branch resolution).
//! - Process errors (launch failures, output on stderr, non-zero exits,
//!   timeouts, cancellation).
//! - Manifest errors (missing or malformed manifest files, write failures).
//! - Request and configuration errors.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for component-builder operations
#[derive(Error, Debug)]
pub enum Error {
    /// A filesystem operation on a build directory failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// Cloning a repository failed.
    ///
    /// `message` carries git's own error output unchanged.
    #[error("Git clone error for {url}@{r#ref}: {message}")]
    GitClone {
        url: String,
        r#ref: String,
        message: String,
    },

    /// A git command other than clone failed.
    #[error("Git command failed in {}: {command} - {stderr}", dir.display())]
    GitCommand {
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    /// An external executable could not be started.
    #[error("error:{program}: {message}")]
    ProcessLaunch { program: String, message: String },

    /// An external executable wrote to its error stream.
    #[error("stderr:{stderr}")]
    ProcessOutput { program: String, stderr: String },

    /// An external executable exited unsuccessfully without writing to stderr.
    #[error("{program} exited with {}", code.map(|c| format!("status {}", c)).unwrap_or_else(|| "a signal".to_string()))]
    ProcessExit { program: String, code: Option<i32> },

    /// An external executable ran longer than the configured limit.
    #[error("{program} timed out after {}s", timeout.as_secs())]
    ProcessTimeout { program: String, timeout: Duration },

    /// The request was cancelled before it finished.
    #[error("Build cancelled during {stage}")]
    Cancelled { stage: String },

    /// A manifest file was missing, unreadable or not a JSON object.
    #[error("Manifest read error for {}: {message}", path.display())]
    ManifestRead { path: PathBuf, message: String },

    /// The merged manifest could not be written.
    #[error("Manifest write error for {}: {message}", path.display())]
    ManifestWrite { path: PathBuf, message: String },

    /// A build request failed validation before any work was done.
    #[error("Invalid build request: {message}")]
    InvalidRequest { message: String },

    /// The builder configuration file could not be parsed.
    #[error("Configuration parsing error: {message}")]
    ConfigParse { message: String },

    /// A mutex guarding shared state has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
