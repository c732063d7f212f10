//! # Repository Fetching
//!
//! This module provides the `RepositoryFetcher`, which places a fresh checkout
//! of a remote repository at a target directory.
//!
//! ## Design
//!
//! A fetch always starts from an empty target: whatever is at the target path
//! is deleted first, so a build never runs on top of a stale checkout. The
//! repository is then cloned and the requested branch checked out.
//!
//! Git itself is reached through the **`GitOperations`** trait. In the main
//! application `DefaultGitOperations` wraps the `git` command from
//! `crate::git`; tests substitute implementations that write fixture files
//! instead of talking to a remote.
//!
//! ## Failure behaviour
//!
//! - Deleting the old target fails → `Error::Filesystem`.
//! - Cloning fails → the clone error, with git's output unchanged.
//! - Checking out the branch fails after a successful clone → logged as a
//!   warning only. The fetch succeeds with the default branch's content.
//!
//! A failed clone may leave an empty or partial directory behind; callers
//! must not assume the target is clean after a failure.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::process::Limits;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones `url` into `target_dir`, which does not exist yet.
    fn clone_repo(
        &self,
        url: &str,
        ref_name: &str,
        target_dir: &Path,
        limits: Limits<'_>,
    ) -> Result<()>;

    /// Checks out `branch` in an existing clone.
    fn checkout(&self, repo_dir: &Path, branch: &str, limits: Limits<'_>) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_repo(
        &self,
        url: &str,
        ref_name: &str,
        target_dir: &Path,
        limits: Limits<'_>,
    ) -> Result<()> {
        crate::git::clone(url, ref_name, target_dir, limits)
    }

    fn checkout(&self, repo_dir: &Path, branch: &str, limits: Limits<'_>) -> Result<()> {
        crate::git::checkout(repo_dir, branch, limits)
    }
}

/// Places fresh checkouts of repositories on disk
#[derive(Clone)]
pub struct RepositoryFetcher {
    git_ops: Arc<dyn GitOperations>,
}

impl RepositoryFetcher {
    /// Creates a fetcher backed by the system `git` command.
    pub fn new() -> Self {
        Self::with_operations(Arc::new(DefaultGitOperations))
    }

    /// Creates a fetcher with a custom `GitOperations` implementation.
    pub fn with_operations(git_ops: Arc<dyn GitOperations>) -> Self {
        Self { git_ops }
    }

    /// Deletes `target_dir`, clones `url` into it and checks out `branch`.
    ///
    /// Both git runs are bounded by `limits`. Returns the target directory
    /// on success.
    pub fn fetch(
        &self,
        url: &str,
        target_dir: &Path,
        branch: &str,
        limits: Limits<'_>,
    ) -> Result<PathBuf> {
        info!("Fetching {}@{} into {}", url, branch, target_dir.display());
        remove_target(target_dir)?;

        if let Err(e) = self.git_ops.clone_repo(url, branch, target_dir, limits) {
            warn!("Clone of {} failed: {}", url, e);
            return Err(e);
        }

        if let Err(e) = self.git_ops.checkout(target_dir, branch, limits) {
            warn!(
                "Could not resolve branch '{}' for {}, keeping the default branch: {}",
                branch, url, e
            );
        }

        Ok(target_dir.to_path_buf())
    }
}

impl Default for RepositoryFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove whatever is at `path`, tolerating its absence
fn remove_target(path: &Path) -> Result<()> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    };

    result.map_err(|e| Error::Filesystem {
        message: format!("Failed to remove '{}': {}", path.display(), e),
    })
}
